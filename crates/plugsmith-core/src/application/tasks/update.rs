//! Re-apply the configured type's scaffold to an existing project.

use tracing::{debug, instrument};

use crate::{
    application::{
        ApplicationError,
        tasks::{Task, TaskContext, TaskOutcome},
    },
    domain::{PROJECT_CONFIG_FILE, ScaffoldFile, extend_manifest},
    error::PlugsmithResult,
};

/// Rewrites the invariant scaffold files of every side of the project's
/// type and deep-merges each side's manifest fragment.
///
/// Files that two sides both provide (a hybrid's `.gitignore`) are written
/// once with both contents.
#[derive(Debug, Default, Clone, Copy)]
pub struct UpdateTask;

impl UpdateTask {
    pub fn new() -> Self {
        Self
    }
}

impl Task for UpdateTask {
    fn name(&self) -> &str {
        "update"
    }

    #[instrument(skip_all, name = "update")]
    fn run(&self, ctx: &mut TaskContext<'_>) -> PlugsmithResult<TaskOutcome> {
        let cwd = ctx.cwd().to_path_buf();
        let files = ctx.files();
        let config = files.read_config(&cwd)?;
        let Some(plugin_type) = config.plugin_type else {
            return Err(ApplicationError::MissingPluginType {
                path: cwd.join(PROJECT_CONFIG_FILE),
            }
            .into());
        };

        let mut manifest = files.read_manifest(&cwd)?;
        let render = config.render_context(&ctx.directory_name());
        let mut written: Vec<ScaffoldFile> = Vec::new();

        for side in plugin_type.sides() {
            let scaffold = ctx.ports().scaffolds.scaffold(side)?;
            for file in scaffold.render_files(&render) {
                match written.iter_mut().find(|w| w.path() == file.path()) {
                    Some(existing) if existing.content != file.content => {
                        existing.content.push_str(&file.content);
                    }
                    Some(_) => {}
                    None => written.push(file),
                }
            }
            manifest = extend_manifest(&manifest, &scaffold.render_manifest(&render)?);
            debug!(%side, "side applied");
        }

        files.write_files(&cwd, &written)?;
        files.write_manifest(&cwd, &manifest)?;
        ctx.success(format!(
            "Updated {} ({plugin_type}): {} scaffold file(s) rewritten",
            ctx.directory_name(),
            written.len()
        ));
        Ok(TaskOutcome::Done)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::application::ports::MockProcessRunner;
    use crate::application::tasks::testing::{FixedScaffolds, MemFs};
    use crate::application::tasks::{Ports, VersionPolicy};
    use crate::domain::Manifest;
    use crate::error::ErrorCategory;

    #[test]
    fn missing_type_is_fatal() {
        let fs = MemFs::default().with_file("/p/package.json", "{}");
        let runner = MockProcessRunner::new();
        let mut ctx = TaskContext::new(
            Ports::new(&fs, &runner, &FixedScaffolds),
            "/p",
            VersionPolicy::default(),
        );
        let err = UpdateTask::new().run(&mut ctx).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(fs.read("/p/package.json").unwrap(), "{}");
    }

    #[test]
    fn hybrid_update_merges_both_sides() {
        let fs = MemFs::default()
            .with_file("/p/.plugsmith.json", r#"{"type":"lib-slib"}"#)
            .with_file(
                "/p/package.json",
                r#"{"name":"p","scripts":{"lint":"eslint"},"dependencies":{"a":"1"}}"#,
            );
        let runner = MockProcessRunner::new();
        let mut ctx = TaskContext::new(
            Ports::new(&fs, &runner, &FixedScaffolds),
            "/p",
            VersionPolicy::default(),
        );

        UpdateTask::new().run(&mut ctx).unwrap();

        let manifest = Manifest::parse(&fs.read("/p/package.json").unwrap()).unwrap();
        assert_eq!(
            manifest.get("scripts"),
            Some(&json!({ "lint": "eslint", "build": "webpack", "test": "pytest" }))
        );
        assert_eq!(manifest.get("dependencies"), Some(&json!({ "a": "1" })));
        assert_eq!(
            fs.read("/p/.gitignore").unwrap(),
            "node_modules/\n__pycache__/\n"
        );
    }
}
