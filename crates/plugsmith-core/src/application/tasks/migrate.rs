//! Plugin type transitions.

use tracing::{info, instrument};

use crate::{
    application::tasks::{Task, TaskContext, TaskOutcome},
    domain::{MigrationPlan, PluginType},
    error::PlugsmithResult,
};

/// Moves the project in the working directory to another plugin type.
///
/// The manifest is read before anything is deleted, so a project without a
/// `package.json` is left untouched. The new type is recorded in the project
/// configuration as the last step.
#[derive(Debug, Clone)]
pub struct MigrateTypeTask {
    to: PluginType,
    name: String,
}

impl MigrateTypeTask {
    pub fn new(to: PluginType) -> Self {
        Self {
            to,
            name: format!("to-{to}-type"),
        }
    }

    pub fn target(&self) -> PluginType {
        self.to
    }
}

impl Task for MigrateTypeTask {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip_all, fields(to = %self.to))]
    fn run(&self, ctx: &mut TaskContext<'_>) -> PlugsmithResult<TaskOutcome> {
        let cwd = ctx.cwd().to_path_buf();
        let files = ctx.files();
        let config = files.read_config(&cwd)?;

        let plan = match MigrationPlan::plan(config.plugin_type, self.to)? {
            MigrationPlan::Skip { reason } => {
                ctx.warn(format!("Nothing to do: {reason}"));
                return Ok(TaskOutcome::Skipped { reason });
            }
            MigrationPlan::Apply(plan) => plan,
        };

        let manifest = files.read_manifest(&cwd)?;
        let scaffold = ctx.ports().scaffolds.scaffold(plan.scaffold_side)?;
        let next_config = config.with_type(plan.to);
        let render = next_config.render_context(&ctx.directory_name());
        let fragment = scaffold.render_manifest(&render)?;

        let removed = files.delete_files(&cwd, plan.delete)?;
        info!(removed = removed.len(), "removed files of the other side");
        files.write_files(&cwd, &scaffold.render_files(&render))?;
        files.write_manifest(&cwd, &plan.manifest_patch.apply(&manifest, &fragment))?;
        files.write_config(&cwd, &next_config)?;

        ctx.success(format!(
            "Converted {} to '{}' ({} file(s) removed)",
            plan.from
                .map_or_else(|| "project".to_string(), |f| format!("'{f}'")),
            plan.to,
            removed.len()
        ));
        Ok(TaskOutcome::Done)
    }
}

/// `change-type`: validates the requested type and composes the matching
/// transition.
#[derive(Debug, Clone)]
pub struct ChangeTypeTask {
    to: PluginType,
}

impl ChangeTypeTask {
    pub fn new(to: PluginType) -> Self {
        Self { to }
    }

    /// Parse a user-supplied type name (`server` is accepted for `service`).
    pub fn parse(raw: &str) -> PlugsmithResult<Self> {
        Ok(Self::new(raw.parse()?))
    }
}

impl Task for ChangeTypeTask {
    fn name(&self) -> &str {
        "change-type"
    }

    fn run(&self, ctx: &mut TaskContext<'_>) -> PlugsmithResult<TaskOutcome> {
        let current = ctx.files().read_config(ctx.cwd())?.plugin_type;
        info!(
            from = current.map_or("unknown", |t| t.as_str()),
            to = %self.to,
            "changing plugin type"
        );
        MigrateTypeTask::new(self.to).run(ctx)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::application::ports::MockProcessRunner;
    use crate::application::tasks::testing::{FixedScaffolds, MemFs};
    use crate::application::tasks::{Ports, VersionPolicy};
    use crate::domain::{DomainError, Manifest, ProjectConfig};
    use crate::error::PlugsmithError;

    fn hybrid_project() -> MemFs {
        MemFs::default()
            .with_file("/p/.plugsmith.json", r#"{"name":"demo","type":"lib-slib"}"#)
            .with_file(
                "/p/package.json",
                r#"{"name":"demo","version":"1.2.3","scripts":{"start":"x"},"files":["src"],"engines":{"node":">=18"},"dependencies":{"a":"1"}}"#,
            )
            .with_file("/p/webpack.config.js", "")
            .with_file("/p/requirements.txt", "")
            .with_file("/p/setup.py", "")
    }

    fn context<'a>(fs: &'a MemFs, runner: &'a MockProcessRunner) -> TaskContext<'a> {
        TaskContext::new(
            Ports::new(fs, runner, &FixedScaffolds),
            "/p",
            VersionPolicy::default(),
        )
    }

    #[test]
    fn hybrid_to_lib_drops_server_side() {
        let fs = hybrid_project();
        let runner = MockProcessRunner::new();
        let mut ctx = context(&fs, &runner);

        let outcome = ChangeTypeTask::parse("lib").unwrap().run(&mut ctx).unwrap();
        assert_eq!(outcome, TaskOutcome::Done);

        assert!(fs.read("/p/requirements.txt").is_none());
        assert!(fs.read("/p/setup.py").is_none());
        assert!(fs.read("/p/webpack.config.js").is_some());
        assert_eq!(fs.read("/p/.gitignore").unwrap(), "node_modules/\n");

        let manifest = Manifest::parse(&fs.read("/p/package.json").unwrap()).unwrap();
        assert_eq!(manifest.get("scripts"), Some(&json!({ "build": "webpack" })));
        assert_eq!(manifest.get("files"), Some(&json!(["dist"])));
        assert_eq!(manifest.get("version"), Some(&json!("1.2.3")));
        assert_eq!(manifest.get("engines"), Some(&json!({ "node": ">=18" })));

        let config = ProjectConfig::parse(&fs.read("/p/.plugsmith.json").unwrap()).unwrap();
        assert_eq!(config.plugin_type, Some(PluginType::Lib));
    }

    #[test]
    fn hybrid_to_slib_drops_web_side() {
        let fs = hybrid_project();
        let runner = MockProcessRunner::new();
        let mut ctx = context(&fs, &runner);

        MigrateTypeTask::new(PluginType::Slib).run(&mut ctx).unwrap();

        assert!(fs.read("/p/webpack.config.js").is_none());
        assert!(fs.read("/p/requirements.txt").is_some());
        let manifest = Manifest::parse(&fs.read("/p/package.json").unwrap()).unwrap();
        assert!(!manifest.contains_key("engines"));
        assert!(!manifest.contains_key("dependencies"));
        assert_eq!(manifest.get("scripts"), Some(&json!({ "test": "pytest" })));
        assert_eq!(manifest.get("version"), Some(&json!("1.2.3")));
    }

    #[test]
    fn upgrade_is_skipped_without_changes() {
        let fs = MemFs::default()
            .with_file("/p/.plugsmith.json", r#"{"type":"lib"}"#)
            .with_file("/p/package.json", "{}");
        let runner = MockProcessRunner::new();
        let mut ctx = context(&fs, &runner);

        let outcome = ChangeTypeTask::new(PluginType::LibSlib).run(&mut ctx).unwrap();
        assert!(matches!(outcome, TaskOutcome::Skipped { .. }));
        assert_eq!(fs.read("/p/package.json").unwrap(), "{}");
        assert_eq!(fs.read("/p/.plugsmith.json").unwrap(), r#"{"type":"lib"}"#);
    }

    #[test]
    fn unsupported_transition_fails() {
        let fs = MemFs::default().with_file("/p/.plugsmith.json", r#"{"type":"lib"}"#);
        let runner = MockProcessRunner::new();
        let mut ctx = context(&fs, &runner);

        let err = ChangeTypeTask::new(PluginType::Service).run(&mut ctx).unwrap_err();
        assert!(matches!(
            err,
            PlugsmithError::Domain(DomainError::UnsupportedTransition { .. })
        ));
    }

    #[test]
    fn unknown_type_name_is_rejected() {
        assert!(ChangeTypeTask::parse("desktop").is_err());
        assert!(ChangeTypeTask::parse("server").is_ok());
    }

    #[test]
    fn missing_manifest_leaves_files_alone() {
        let fs = MemFs::default()
            .with_file("/p/.plugsmith.json", r#"{"type":"lib-slib"}"#)
            .with_file("/p/requirements.txt", "");
        let runner = MockProcessRunner::new();
        let mut ctx = context(&fs, &runner);

        assert!(MigrateTypeTask::new(PluginType::Lib).run(&mut ctx).is_err());
        assert!(fs.read("/p/requirements.txt").is_some());
    }
}
