//! The version gate and the tool's own version report.

use tracing::{info, instrument};

use crate::{
    application::{
        ports::Invocation,
        tasks::{Task, TaskContext, TaskOutcome},
    },
    domain::{GateVerdict, ToolVersion, ToolVersions, VersionRequirement},
    error::PlugsmithResult,
};

/// Reports the running tool version once per session, as a notice unless the
/// version policy is quiet.
#[derive(Debug, Default, Clone, Copy)]
pub struct CheckOwnVersionTask;

impl CheckOwnVersionTask {
    pub fn new() -> Self {
        Self
    }
}

impl Task for CheckOwnVersionTask {
    fn name(&self) -> &str {
        "own-version-check"
    }

    fn run(&self, ctx: &mut TaskContext<'_>) -> PlugsmithResult<TaskOutcome> {
        if !ctx.session.notify_own_version_once() {
            return Ok(TaskOutcome::Skipped {
                reason: "own version already reported".into(),
            });
        }
        info!(version = crate::VERSION, "plugsmith");
        if !ctx.versions.quiet {
            ctx.info(format!("plugsmith v{}", crate::VERSION));
        }
        Ok(TaskOutcome::Done)
    }
}

/// Compares installed node/npm against the required versions.
///
/// Composes [`CheckOwnVersionTask`] first. Fatal mismatches are returned as
/// errors; a satisfied or tolerated result is reported once per session.
#[derive(Debug, Default, Clone, Copy)]
pub struct CheckNodeVersionTask;

impl CheckNodeVersionTask {
    pub fn new() -> Self {
        Self
    }

    /// Ask `node` and `npm` for their versions.
    pub fn installed_versions(ctx: &TaskContext<'_>) -> PlugsmithResult<ToolVersions> {
        Ok(ToolVersions::new(
            Self::query_version(ctx, "node")?,
            Self::query_version(ctx, "npm")?,
        ))
    }

    fn query_version(ctx: &TaskContext<'_>, program: &str) -> PlugsmithResult<ToolVersion> {
        let invocation = Invocation::new(program, ctx.cwd()).arg("--version");
        let output = ctx.run_process(&invocation)?.check(&invocation)?;
        Ok(ToolVersion::parse(&output.stdout)?)
    }
}

impl Task for CheckNodeVersionTask {
    fn name(&self) -> &str {
        "check-node-version"
    }

    #[instrument(skip_all, name = "check_node_version")]
    fn run(&self, ctx: &mut TaskContext<'_>) -> PlugsmithResult<TaskOutcome> {
        CheckOwnVersionTask::new().run(ctx)?;

        if ctx.session.version_shown() {
            return Ok(TaskOutcome::Skipped {
                reason: "versions already checked".into(),
            });
        }

        let installed = Self::installed_versions(ctx)?;
        let requirement = VersionRequirement::evaluate(installed, ctx.versions.required.clone());
        info!(
            installed_node = %requirement.installed.node,
            installed_npm = %requirement.installed.npm,
            satisfied = requirement.is_satisfied,
            "version gate"
        );

        match ctx.session.check_required_version(&requirement)? {
            Some(GateVerdict::Satisfied(message)) if !ctx.versions.quiet => ctx.info(message),
            Some(GateVerdict::Warning(message)) => ctx.warn(message),
            _ => {}
        }
        Ok(TaskOutcome::Done)
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::function;

    use super::*;
    use crate::application::ports::{MockProcessRunner, ProcessOutput};
    use crate::application::tasks::testing::{FixedScaffolds, MemFs};
    use crate::application::tasks::{NoticeLevel, Ports, VersionPolicy};

    fn answer(stdout: &str) -> ProcessOutput {
        ProcessOutput {
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    fn runner(node: &'static str, npm: &'static str) -> MockProcessRunner {
        let mut runner = MockProcessRunner::new();
        runner
            .expect_run()
            .with(function(|i: &Invocation| i.program == "node"))
            .returning(move |_| Ok(answer(node)));
        runner
            .expect_run()
            .with(function(|i: &Invocation| i.program == "npm"))
            .returning(move |_| Ok(answer(npm)));
        runner
    }

    fn policy(node: &str, npm: &str) -> VersionPolicy {
        VersionPolicy::new(ToolVersions::parse(node, npm).unwrap())
    }

    #[test]
    fn satisfied_gate_reports_once() {
        let fs = MemFs::default();
        let runner = runner("v18.19.0\n", "9.6.7\n");
        let mut ctx = TaskContext::new(
            Ports::new(&fs, &runner, &FixedScaffolds),
            "/p",
            policy("18", "9"),
        );

        assert_eq!(CheckNodeVersionTask::new().run(&mut ctx).unwrap(), TaskOutcome::Done);
        assert!(matches!(
            CheckNodeVersionTask::new().run(&mut ctx).unwrap(),
            TaskOutcome::Skipped { .. }
        ));
        assert_eq!(ctx.notices().len(), 2);
        assert_eq!(ctx.notices()[1].level, NoticeLevel::Info);
        assert!(ctx.notices()[1].message.contains("v18.19.0"));
    }

    #[test]
    fn own_version_is_reported_once_per_session() {
        let fs = MemFs::default();
        let runner = MockProcessRunner::new();
        let mut ctx = TaskContext::new(
            Ports::new(&fs, &runner, &FixedScaffolds),
            "/p",
            VersionPolicy::default(),
        );

        assert_eq!(CheckOwnVersionTask::new().run(&mut ctx).unwrap(), TaskOutcome::Done);
        assert!(matches!(
            CheckOwnVersionTask::new().run(&mut ctx).unwrap(),
            TaskOutcome::Skipped { .. }
        ));

        let expected = format!("plugsmith v{}", crate::VERSION);
        let reports: Vec<_> = ctx
            .notices()
            .iter()
            .filter(|n| n.message == expected)
            .collect();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].level, NoticeLevel::Info);
    }

    #[test]
    fn gate_leads_with_own_version() {
        let fs = MemFs::default();
        let runner = runner("18.0.0", "9.0.0");
        let mut ctx = TaskContext::new(
            Ports::new(&fs, &runner, &FixedScaffolds),
            "/p",
            policy("18", "9"),
        );
        CheckNodeVersionTask::new().run(&mut ctx).unwrap();
        CheckOwnVersionTask::new().run(&mut ctx).unwrap();
        assert_eq!(ctx.notices()[0].message, format!("plugsmith v{}", crate::VERSION));
        assert_eq!(ctx.notices().len(), 2);
    }

    #[test]
    fn quiet_policy_hides_satisfied_message() {
        let fs = MemFs::default();
        let runner = runner("18.0.0", "9.0.0");
        let mut ctx = TaskContext::new(
            Ports::new(&fs, &runner, &FixedScaffolds),
            "/p",
            policy("18", "9").quiet(true),
        );
        CheckNodeVersionTask::new().run(&mut ctx).unwrap();
        assert!(ctx.notices().is_empty());
    }

    #[test]
    fn newer_node_warns_and_continues() {
        let fs = MemFs::default();
        let runner = runner("3.0.0", "3.0.0");
        let mut ctx = TaskContext::new(
            Ports::new(&fs, &runner, &FixedScaffolds),
            "/p",
            policy("2", "2"),
        );
        CheckNodeVersionTask::new().run(&mut ctx).unwrap();
        let last = ctx.notices().last().unwrap();
        assert_eq!(last.level, NoticeLevel::Warning);
        assert!(last.message.starts_with("Warnings: "));
    }

    #[test]
    fn older_node_is_fatal() {
        let fs = MemFs::default();
        let runner = runner("1.0.0", "1.0.0");
        let mut ctx = TaskContext::new(
            Ports::new(&fs, &runner, &FixedScaffolds),
            "/p",
            policy("2", "2"),
        );
        let err = CheckNodeVersionTask::new().run(&mut ctx).unwrap_err();
        assert!(err.is_version_mismatch());
        assert!(err.to_string().contains("1.0.0"));
        assert!(!ctx.session.version_shown());
    }

    #[test]
    fn missing_node_propagates_process_error() {
        let fs = MemFs::default();
        let mut runner = MockProcessRunner::new();
        runner.expect_run().returning(|i| {
            Err(crate::application::ApplicationError::ProcessSpawn {
                command: i.command_line(),
                reason: "No such file or directory".into(),
            }
            .into())
        });
        let mut ctx = TaskContext::new(
            Ports::new(&fs, &runner, &FixedScaffolds),
            "/p",
            VersionPolicy::default(),
        );
        let err = CheckNodeVersionTask::new().run(&mut ctx).unwrap_err();
        assert!(err.to_string().contains("node --version"));
    }
}
