//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "plugsmith",
    bin_name = "plugsmith",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Plugin project scaffolding and workspace tooling",
    long_about = "Plugsmith installs packages and plugin repositories into plugin \
                  workspaces, migrates plugins between types and keeps their \
                  scaffold files up to date.",
    after_help = "EXAMPLES:\n\
        \x20 plugsmith install lodash\n\
        \x20 plugsmith install --plugin acme/charts#develop --for dashboard\n\
        \x20 plugsmith change-type --type lib\n\
        \x20 plugsmith list-plugins --format json",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Install packages or plugin repositories.
    #[command(
        visible_alias = "i",
        about = "Install packages or plugins",
        after_help = "EXAMPLES:\n\
            \x20 plugsmith install lodash react@18\n\
            \x20 plugsmith install --plugin charts acme/maps#v2\n\
            \x20 plugsmith install --plugin --ssh --skip-install acme/maps\n\
            \x20 plugsmith install moment --for dashboard"
    )]
    Install(InstallArgs),

    /// List the plugins of a workspace.
    #[command(
        visible_alias = "ls",
        about = "List plugins in the workspace",
        after_help = "EXAMPLES:\n\
            \x20 plugsmith list-plugins\n\
            \x20 plugsmith list-plugins --format json"
    )]
    ListPlugins(ListPluginsArgs),

    /// Compare installed Node.js and npm against the required versions.
    #[command(about = "Check Node.js and npm versions")]
    CheckVersion,

    /// Change the plugin type, migrating scaffold files and manifest.
    #[command(
        about = "Change the plugin type",
        after_help = "EXAMPLES:\n\
            \x20 plugsmith change-type --type lib\n\
            \x20 plugsmith change-type -t slib"
    )]
    ChangeType(ChangeTypeArgs),

    /// Migrate a hybrid plugin to a web library.
    #[command(about = "Migrate to a web library (lib)")]
    ToLibType,

    /// Migrate a hybrid plugin to a server library.
    #[command(about = "Migrate to a server library (slib)")]
    ToSlibType,

    /// Re-apply scaffold files and manifest fragment for the current type.
    #[command(about = "Update scaffold files for the current type")]
    Update,

    /// Refresh the workspace module list and shared dependencies.
    #[command(about = "Refresh the workspace")]
    Workspace,

    /// Copy issue and pull-request templates into `.github/`.
    #[command(about = "Add GitHub issue and PR templates")]
    GithubTemplates,

    /// Initialise a Plugsmith configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 plugsmith init\n\
            \x20 plugsmith init --force"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 plugsmith completions bash > ~/.local/share/bash-completion/completions/plugsmith\n\
            \x20 plugsmith completions zsh  > ~/.zfunc/_plugsmith\n\
            \x20 plugsmith completions fish > ~/.config/fish/completions/plugsmith.fish"
    )]
    Completions(CompletionsArgs),

    /// Manage the Plugsmith configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 plugsmith config get install.ssh\n\
            \x20 plugsmith config set install.clone_policy fail-fast\n\
            \x20 plugsmith config list"
    )]
    Config(ConfigCommands),
}

// ── install ───────────────────────────────────────────────────────────────────

/// Arguments for `plugsmith install`.
#[derive(Debug, Args)]
pub struct InstallArgs {
    /// Package names, or plugin identifiers with `--plugin`.
    #[arg(value_name = "ID", required = true, num_args = 1..)]
    pub identifiers: Vec<String>,

    /// Treat identifiers as `[github:][owner/]repo[#ref]` plugin repositories.
    #[arg(short = 'p', long = "plugin", help = "Install as plugins (git clone)")]
    pub plugin: bool,

    /// Clone over SSH instead of HTTPS.
    #[arg(short = 's', long = "ssh", help = "Clone plugins over SSH")]
    pub ssh: bool,

    /// Do not run `npm install` after cloning.
    #[arg(long = "skip-install", help = "Skip npm install after cloning")]
    pub skip_install: bool,

    /// Stop at the first failed clone.
    #[arg(long = "fail-fast", help = "Abort on the first failed clone")]
    pub fail_fast: bool,

    /// Plugin directory (inside the workspace) that records the result.
    #[arg(long = "for", value_name = "PLUGIN", help = "Record the result in PLUGIN")]
    pub for_plugin: Option<String>,
}

// ── list-plugins ──────────────────────────────────────────────────────────────

/// Arguments for `plugsmith list-plugins`.
#[derive(Debug, Args)]
pub struct ListPluginsArgs {
    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list-plugins` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Grouped by side.
    Table,
    /// One name per line.
    List,
    /// `{ "web": [...], "server": [...], "all": [...] }`.
    Json,
}

// ── change-type ───────────────────────────────────────────────────────────────

/// Arguments for `plugsmith change-type`.
#[derive(Debug, Args)]
pub struct ChangeTypeArgs {
    /// Target plugin type. Prompted for when omitted on a terminal.
    #[arg(
        short = 't',
        long = "type",
        value_name = "TYPE",
        help = "Target type (app, bundle, lib, slib, service, lib-slib, lib-service, app-slib)"
    )]
    pub plugin_type: Option<String>,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `plugsmith init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `plugsmith completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `plugsmith config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `install.ssh`.
        key: String,
    },
    /// Set a configuration key in the config file.
    Set {
        /// Dotted key path.
        key: String,
        /// New value.
        value: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_plugin_install() {
        let cli = Cli::parse_from([
            "plugsmith",
            "install",
            "-p",
            "-s",
            "--skip-install",
            "--fail-fast",
            "--for",
            "dashboard",
            "acme/charts#develop",
            "maps",
        ]);
        let Commands::Install(args) = cli.command else {
            panic!("expected Install command");
        };
        assert!(args.plugin && args.ssh && args.skip_install && args.fail_fast);
        assert_eq!(args.for_plugin.as_deref(), Some("dashboard"));
        assert_eq!(args.identifiers, ["acme/charts#develop", "maps"]);
    }

    #[test]
    fn install_requires_identifiers() {
        assert!(Cli::try_parse_from(["plugsmith", "install"]).is_err());
    }

    #[test]
    fn kebab_case_command_names() {
        for name in [
            "list-plugins",
            "check-version",
            "to-lib-type",
            "to-slib-type",
            "github-templates",
        ] {
            assert!(
                Cli::try_parse_from(["plugsmith", name]).is_ok(),
                "{name} should parse"
            );
        }
    }

    #[test]
    fn change_type_short_flag() {
        let cli = Cli::parse_from(["plugsmith", "change-type", "-t", "slib"]);
        let Commands::ChangeType(args) = cli.command else {
            panic!("expected ChangeType command");
        };
        assert_eq!(args.plugin_type.as_deref(), Some("slib"));
    }

    #[test]
    fn global_cwd_after_subcommand() {
        let cli = Cli::parse_from(["plugsmith", "update", "--cwd", "/tmp/p"]);
        assert_eq!(cli.global.cwd.as_deref(), Some(std::path::Path::new("/tmp/p")));
    }

    #[test]
    fn list_format_json() {
        let cli = Cli::parse_from(["plugsmith", "ls", "--format", "json"]);
        let Commands::ListPlugins(args) = cli.command else {
            panic!("expected ListPlugins command");
        };
        assert_eq!(args.format, ListFormat::Json);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["plugsmith", "--quiet", "--verbose", "workspace"]);
        assert!(result.is_err());
    }
}
