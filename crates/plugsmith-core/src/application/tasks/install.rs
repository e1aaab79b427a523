//! Dependency installer.
//!
//! Two paths share one entry point:
//! - plain packages go through `npm install --save` in the working root and
//!   only the newly added entries are attributed to the owning plugin;
//! - plugins (`--plugin`) are cloned next to each other in the working root,
//!   the workspace is refreshed and a bulk `npm install` follows.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::Invocation,
        tasks::{CheckNodeVersionTask, Task, TaskContext, TaskOutcome, WorkspaceRefreshTask},
    },
    domain::{DependencyMap, PluginReference, dependency_diff},
    error::PlugsmithResult,
};

/// What to do when one plugin fails to clone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClonePolicy {
    /// Report the failure and keep going with the remaining plugins.
    #[default]
    Continue,
    /// Abort the whole batch.
    FailFast,
}

impl fmt::Display for ClonePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Continue => "continue",
            Self::FailFast => "fail-fast",
        })
    }
}

impl FromStr for ClonePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "continue" => Ok(Self::Continue),
            "fail-fast" | "fail_fast" | "failfast" => Ok(Self::FailFast),
            other => Err(format!(
                "unknown clone policy '{other}' (expected 'continue' or 'fail-fast')"
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallOptions {
    /// Treat identifiers as plugin repositories to clone.
    pub plugins: bool,
    pub ssh: bool,
    /// Skip the bulk `npm install` after cloning.
    pub skip_install: bool,
    pub clone_policy: ClonePolicy,
    /// Plugin directory (inside the working root) that owns the result.
    pub target_plugin: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloneStatus {
    Cloned,
    Failed {
        exit_code: Option<i32>,
        stderr: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneOutcome {
    pub reference: PluginReference,
    pub status: CloneStatus,
}

impl CloneOutcome {
    pub fn is_cloned(&self) -> bool {
        self.status == CloneStatus::Cloned
    }
}

/// What an install run did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstallReport {
    /// Where processes ran.
    pub root: PathBuf,
    /// Whose manifest received the result.
    pub owner: PathBuf,
    /// Entries merged into the owner's `dependencies`.
    pub recorded: DependencyMap,
    pub clones: Vec<CloneOutcome>,
    /// Identifiers that could not be resolved and were skipped.
    pub unresolved: Vec<String>,
}

pub struct InstallTask {
    identifiers: Vec<String>,
    options: InstallOptions,
}

impl InstallTask {
    pub fn new(identifiers: Vec<String>, options: InstallOptions) -> Self {
        Self {
            identifiers,
            options,
        }
    }

    /// Run the install and return the full report.
    #[instrument(skip_all, fields(count = self.identifiers.len(), plugins = self.options.plugins))]
    pub fn execute(&self, ctx: &mut TaskContext<'_>) -> PlugsmithResult<InstallReport> {
        CheckNodeVersionTask::new().run(ctx)?;

        let (root, owner) = self.layout(ctx);
        debug!(root = %root.display(), owner = %owner.display(), "install layout");

        let report = InstallReport {
            root,
            owner,
            ..InstallReport::default()
        };
        if self.options.plugins {
            self.install_plugins(ctx, report)
        } else {
            self.install_packages(ctx, report)
        }
    }

    /// Working root: the enclosing workspace when there is one. Owner: the
    /// `--for` plugin inside the root, else the starting directory.
    fn layout(&self, ctx: &TaskContext<'_>) -> (PathBuf, PathBuf) {
        let files = ctx.files();
        let cwd = ctx.cwd().to_path_buf();
        let root = if files.is_workspace(&cwd) {
            cwd.clone()
        } else {
            files.enclosing_workspace(&cwd).unwrap_or_else(|| cwd.clone())
        };
        let owner = match &self.options.target_plugin {
            Some(name) => root.join(name),
            None => cwd,
        };
        (root, owner)
    }

    fn install_packages(
        &self,
        ctx: &mut TaskContext<'_>,
        mut report: InstallReport,
    ) -> PlugsmithResult<InstallReport> {
        let files = ctx.files();
        let before = files.read_manifest_or_default(&report.root)?.dependencies();

        let invocation = Invocation::new("npm", &report.root)
            .args(["install", "--save"])
            .args(self.identifiers.iter().cloned());
        ctx.run_process(&invocation)?.check(&invocation)?;

        let after = files.read_manifest_or_default(&report.root)?.dependencies();
        report.recorded = dependency_diff(&before, &after);
        info!(added = report.recorded.len(), "npm install finished");

        if report.owner != report.root && !report.recorded.is_empty() {
            record(ctx, &report.owner, &report.recorded, true)?;
        }

        match report.recorded.len() {
            0 => ctx.info("No new dependencies were added"),
            n => ctx.success(format!(
                "Added {n} dependenc{} to {}",
                if n == 1 { "y" } else { "ies" },
                display_name(&report.owner)
            )),
        }
        Ok(report)
    }

    fn install_plugins(
        &self,
        ctx: &mut TaskContext<'_>,
        mut report: InstallReport,
    ) -> PlugsmithResult<InstallReport> {
        let mut resolved = Vec::new();
        for raw in &self.identifiers {
            let reference = PluginReference::resolve(raw, self.options.ssh);
            if reference.is_resolved() {
                resolved.push(reference);
            } else {
                ctx.warn(format!("Skipping '{raw}': not a recognizable plugin identifier"));
                report.unresolved.push(raw.clone());
            }
        }

        for reference in resolved {
            let Some(args) = reference.clone_args() else {
                continue;
            };
            let invocation = Invocation::new("git", &report.root).args(args);
            let output = ctx.run_process(&invocation)?;

            if output.success() {
                info!(plugin = reference.name(), "cloned");
                report.clones.push(CloneOutcome {
                    reference,
                    status: CloneStatus::Cloned,
                });
                continue;
            }

            if self.options.clone_policy == ClonePolicy::FailFast {
                return Err(ApplicationError::CloneFailed {
                    plugin: reference.name().to_string(),
                    exit_code: output.exit_code,
                    stderr: output.stderr,
                }
                .into());
            }
            ctx.warn(format!(
                "Cloning {} failed{}; continuing with the remaining plugins",
                reference.name(),
                output
                    .exit_code
                    .map(|c| format!(" (exit code {c})"))
                    .unwrap_or_default()
            ));
            report.clones.push(CloneOutcome {
                reference,
                status: CloneStatus::Failed {
                    exit_code: output.exit_code,
                    stderr: output.stderr,
                },
            });
        }

        if ctx.files().is_workspace(&report.root) {
            WorkspaceRefreshTask::at(report.root.clone()).run(ctx)?;
        } else {
            debug!(root = %report.root.display(), "not a workspace, skipping refresh");
        }

        if self.options.skip_install {
            ctx.info("Skipping npm install");
        } else {
            let invocation = Invocation::new("npm", &report.root).arg("install");
            ctx.run_process(&invocation)?.check(&invocation)?;
        }

        report.recorded = report
            .clones
            .iter()
            .filter(|c| c.is_cloned())
            .map(|c| {
                (
                    c.reference.name().to_string(),
                    Value::String(c.reference.url().to_string()),
                )
            })
            .collect();

        if !report.recorded.is_empty() {
            record(ctx, &report.owner, &report.recorded, false)?;
            let names: Vec<&str> = report.recorded.keys().map(String::as_str).collect();
            ctx.success(format!("Installed plugins: {}", names.join(", ")));
        }
        Ok(report)
    }
}

/// Merge `entries` into the `dependencies` of the manifest in `dir`.
fn record(
    ctx: &TaskContext<'_>,
    dir: &Path,
    entries: &DependencyMap,
    must_exist: bool,
) -> PlugsmithResult<()> {
    let files = ctx.files();
    let manifest = if must_exist {
        files.read_manifest(dir)?
    } else {
        files.read_manifest_or_default(dir)?
    };
    files.write_manifest(dir, &manifest.with_dependencies_merged(entries))
}

fn display_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string())
}

impl Task for InstallTask {
    fn name(&self) -> &str {
        "install"
    }

    fn run(&self, ctx: &mut TaskContext<'_>) -> PlugsmithResult<TaskOutcome> {
        self.execute(ctx).map(|_| TaskOutcome::Done)
    }
}
