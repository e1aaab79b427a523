//! Command handlers.
//!
//! Each handler translates CLI arguments into core tasks, runs them against
//! the production adapters, and renders what they report.

pub mod change_type;
pub mod completions;
pub mod config;
pub mod init;
pub mod install;
pub mod list_plugins;

use std::path::{Path, PathBuf};

use tracing::debug;

use plugsmith_adapters::{
    BuiltinScaffolds, DirectoryScaffolds, LocalFilesystem, SystemProcessRunner,
};
use plugsmith_core::application::{
    ports::ScaffoldStore,
    tasks::{Ports, Task, TaskContext, TaskOutcome, VersionPolicy},
};

use crate::{
    cli::GlobalArgs,
    config::AppConfig,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

/// Production adapters plus the directory and version policy of one run.
pub struct Workbench {
    fs: LocalFilesystem,
    runner: SystemProcessRunner,
    scaffolds: Box<dyn ScaffoldStore>,
    cwd: PathBuf,
    policy: VersionPolicy,
}

impl Workbench {
    pub fn open(global: &GlobalArgs, config: &AppConfig) -> CliResult<Self> {
        let cwd = global
            .working_dir()
            .with_cli_context(|| "failed to determine the working directory")?;
        let policy = config.version_policy(&cwd, global.quiet)?;

        let scaffolds: Box<dyn ScaffoldStore> = match &config.scaffolds.dir {
            Some(dir) => {
                let root = cwd.join(dir);
                debug!(root = %root.display(), "using scaffolds from directory");
                Box::new(DirectoryScaffolds::new(root))
            }
            None => Box::new(BuiltinScaffolds::new()),
        };

        Ok(Self {
            fs: LocalFilesystem::new(),
            runner: SystemProcessRunner::new(),
            scaffolds,
            cwd,
            policy,
        })
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn fs(&self) -> &LocalFilesystem {
        &self.fs
    }

    /// A fresh context (and so a fresh session) for one top-level command.
    pub fn context(&self) -> TaskContext<'_> {
        let ports = Ports::new(&self.fs, &self.runner, self.scaffolds.as_ref());
        TaskContext::new(ports, &self.cwd, self.policy.clone())
    }
}

/// Run one task with a spinner, then show the notices it collected.
///
/// Notices produced before a failure are still shown.
pub fn run_task(
    task: &dyn Task,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<TaskOutcome> {
    let bench = Workbench::open(global, config)?;
    let mut ctx = bench.context();

    let spinner = output.spinner(format!("{}...", task.name()));
    let result = task.run(&mut ctx);
    spinner.finish_and_clear();

    output.notices(&ctx.take_notices())?;
    let outcome = result?;
    if let TaskOutcome::Skipped { reason } = &outcome {
        debug!(task = task.name(), %reason, "task skipped");
    }
    Ok(outcome)
}
