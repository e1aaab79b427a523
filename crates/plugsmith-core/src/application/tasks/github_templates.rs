//! Issue and pull-request templates.

use std::path::PathBuf;

use tracing::instrument;

use crate::{
    application::tasks::{Task, TaskContext, TaskOutcome},
    error::PlugsmithResult,
};

/// Copies the `.github/` templates into every plugin of a workspace, or
/// into the current plugin when not started from a workspace root.
#[derive(Debug, Default, Clone, Copy)]
pub struct GithubTemplatesTask;

impl GithubTemplatesTask {
    pub fn new() -> Self {
        Self
    }
}

impl Task for GithubTemplatesTask {
    fn name(&self) -> &str {
        "github-templates"
    }

    #[instrument(skip_all, name = "github_templates")]
    fn run(&self, ctx: &mut TaskContext<'_>) -> PlugsmithResult<TaskOutcome> {
        let cwd = ctx.cwd().to_path_buf();
        let files = ctx.files();
        let targets: Vec<PathBuf> = if files.is_workspace(&cwd) {
            ctx.scanner()
                .scan(&cwd)?
                .all
                .into_iter()
                .map(|name| cwd.join(name))
                .collect()
        } else {
            vec![cwd]
        };

        if targets.is_empty() {
            let reason = "workspace contains no plugins".to_string();
            ctx.warn(format!("Nothing to do: {reason}"));
            return Ok(TaskOutcome::Skipped { reason });
        }

        let templates = ctx.ports().scaffolds.github_templates()?;
        for dir in &targets {
            files.write_files(dir, &templates)?;
        }
        ctx.success(format!(
            "Wrote {} GitHub template(s) into {} plugin(s)",
            templates.len(),
            targets.len()
        ));
        Ok(TaskOutcome::Done)
    }
}
