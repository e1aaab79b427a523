//! # Plugsmith CLI
//!
//! Plugin scaffolding, migration and workspace dependency tool.
//!
//! ## Startup sequence
//!
//! 1. Parse CLI arguments (clap handles `--help` / `--version` early-exit).
//! 2. Load configuration (defaults + file + env).
//! 3. Initialise the tracing subscriber (logging), optionally to a file.
//! 4. Build the [`OutputManager`].
//! 5. Dispatch to the appropriate command handler.
//! 6. Translate any [`CliError`] into a user-facing message and exit code.
//!
//! ## Exit codes
//!
//! | Code | Meaning                        |
//! |------|--------------------------------|
//! |  0   | Success                        |
//! |  1   | Internal error or tool failure |
//! |  2   | User / input error             |
//! |  3   | Resource not found             |
//! |  4   | Configuration error            |
//! |  5   | Node.js older than required    |

use std::io::IsTerminal as _;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info, instrument};

use plugsmith_core::{
    application::tasks::{
        CheckNodeVersionTask, GithubTemplatesTask, UpdateTask, WorkspaceRefreshTask,
    },
    domain::PluginType,
};

use crate::{
    cli::{Cli, Commands, ConfigCommands},
    commands::run_task,
    config::AppConfig,
    error::{CliError, CliResult},
    logging::init_logging,
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;

fn main() -> ExitCode {
    // Silently ignored if .env doesn't exist.
    let _ = dotenvy::dotenv();

    // ── 1. Parse arguments ────────────────────────────────────────────────
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help / --version arrive here too and exit 0.
            let _ = e.print();
            return ExitCode::from(if e.use_stderr() { 2 } else { 0 });
        }
    };

    // ── 2. Load configuration ─────────────────────────────────────────────
    // Commands that create the config file accept a `--config` path that
    // does not exist yet.
    let creates_config = matches!(
        cli.command,
        Commands::Init(_) | Commands::Config(ConfigCommands::Set { .. } | ConfigCommands::Path)
    );
    let loaded = if creates_config {
        AppConfig::load_with(cli.global.config.as_ref(), false)
    } else {
        AppConfig::load(cli.global.config.as_ref())
    };
    let config = match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {e:#}");
            return ExitCode::from(4);
        }
    };

    // ── 3. Initialise tracing ─────────────────────────────────────────────
    let _log_guard = match init_logging(&cli.global, config.logging.file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialise logging: {e:#}");
            return ExitCode::from(1);
        }
    };

    debug!(
        verbose = cli.global.verbose,
        quiet = cli.global.quiet,
        no_color = cli.global.no_color,
        ?config,
        "CLI started"
    );

    // ── 4. Build output manager ───────────────────────────────────────────
    let output = OutputManager::new(&cli.global, &config);
    let verbose = cli.global.verbose > 0;
    let color = !cli.global.no_color && !config.output.no_color;

    // ── 5. Dispatch + 6. Error handling ──────────────────────────────────
    match run(cli, config, output) {
        Ok(()) => {
            info!("Plugsmith completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => handle_error(e, verbose, color),
    }
}

/// Dispatch to the correct command handler.
#[instrument(skip_all)]
fn run(cli: Cli, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let global = cli.global;
    match cli.command {
        Commands::Install(args) => commands::install::execute(args, global, config, output),
        Commands::ListPlugins(args) => {
            commands::list_plugins::execute(args, global, config, output)
        }
        Commands::CheckVersion => {
            run_task(&CheckNodeVersionTask::new(), &global, &config, &output).map(drop)
        }
        Commands::ChangeType(args) => {
            commands::change_type::execute(args, global, config, output)
        }
        Commands::ToLibType => {
            commands::change_type::migrate(PluginType::Lib, global, config, output)
        }
        Commands::ToSlibType => {
            commands::change_type::migrate(PluginType::Slib, global, config, output)
        }
        Commands::Update => run_task(&UpdateTask::new(), &global, &config, &output).map(drop),
        Commands::Workspace => {
            run_task(&WorkspaceRefreshTask::new(), &global, &config, &output).map(drop)
        }
        Commands::GithubTemplates => {
            run_task(&GithubTemplatesTask::new(), &global, &config, &output).map(drop)
        }
        Commands::Init(args) => commands::init::execute(args, global, output),
        Commands::Completions(args) => commands::completions::execute(args),
        Commands::Config(cmd) => commands::config::execute(cmd, global, config, output),
    }
}

/// Translate a `CliError` into a user message and an appropriate exit code.
fn handle_error(err: CliError, verbose: bool, color: bool) -> ExitCode {
    err.log();

    // stderr, so the message survives stdout redirection.
    eprint!("{}", err.render(verbose, color && std::io::stderr().is_terminal()));

    ExitCode::from(err.exit_code())
}

// ── tests ─────────────────────────────────────────────────────────────────────
