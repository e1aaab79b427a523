//! `plugsmith install` — add packages or clone plugin repositories.

use serde_json::{Value, json};
use tracing::instrument;

use plugsmith_core::application::tasks::{
    CloneStatus, ClonePolicy, InstallOptions, InstallReport, InstallTask,
};

use crate::{
    cli::{GlobalArgs, InstallArgs, OutputFormat},
    commands::Workbench,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all, fields(count = args.identifiers.len(), plugin = args.plugin))]
pub fn execute(
    args: InstallArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let options = options(&args, &config);
    let task = InstallTask::new(args.identifiers, options);

    let bench = Workbench::open(&global, &config)?;
    let mut ctx = bench.context();

    let spinner = output.spinner(if args.plugin {
        "Cloning plugins..."
    } else {
        "Installing packages..."
    });
    let result = task.execute(&mut ctx);
    spinner.finish_and_clear();

    output.notices(&ctx.take_notices())?;
    let report = result?;

    if output.format() == OutputFormat::Json {
        output.json(&report_json(&report))?;
    }
    Ok(())
}

/// CLI flags win over configured defaults; a flag can only switch a
/// behaviour on.
fn options(args: &InstallArgs, config: &AppConfig) -> InstallOptions {
    InstallOptions {
        plugins: args.plugin,
        ssh: args.ssh || config.install.ssh,
        skip_install: args.skip_install || config.install.skip_install,
        clone_policy: if args.fail_fast {
            ClonePolicy::FailFast
        } else {
            config.install.clone_policy
        },
        target_plugin: args.for_plugin.clone(),
    }
}

fn report_json(report: &InstallReport) -> Value {
    let clones: Vec<Value> = report
        .clones
        .iter()
        .map(|c| match &c.status {
            CloneStatus::Cloned => json!({
                "name": c.reference.name(),
                "url": c.reference.url(),
                "status": "cloned",
            }),
            CloneStatus::Failed { exit_code, stderr } => json!({
                "name": c.reference.name(),
                "url": c.reference.url(),
                "status": "failed",
                "exit_code": exit_code,
                "stderr": stderr,
            }),
        })
        .collect();

    json!({
        "root": report.root.display().to_string(),
        "owner": report.owner.display().to_string(),
        "recorded": report.recorded,
        "clones": clones,
        "unresolved": report.unresolved,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;

    use plugsmith_core::{application::tasks::CloneOutcome, domain::PluginReference};

    fn args(plugin: bool, fail_fast: bool) -> InstallArgs {
        InstallArgs {
            identifiers: vec!["acme/charts".into()],
            plugin,
            ssh: false,
            skip_install: false,
            fail_fast,
            for_plugin: Some("dashboard".into()),
        }
    }

    #[test]
    fn config_defaults_apply_without_flags() {
        let mut config = AppConfig::default();
        config.install.ssh = true;
        config.install.clone_policy = ClonePolicy::FailFast;

        let opts = options(&args(true, false), &config);
        assert!(opts.plugins);
        assert!(opts.ssh);
        assert_eq!(opts.clone_policy, ClonePolicy::FailFast);
        assert_eq!(opts.target_plugin.as_deref(), Some("dashboard"));
    }

    #[test]
    fn fail_fast_flag_wins() {
        let opts = options(&args(true, true), &AppConfig::default());
        assert_eq!(opts.clone_policy, ClonePolicy::FailFast);
        assert!(!opts.skip_install);
    }

    #[test]
    fn report_lists_failed_clones_with_exit_code() {
        let report = InstallReport {
            root: PathBuf::from("/ws"),
            owner: PathBuf::from("/ws/dashboard"),
            clones: vec![CloneOutcome {
                reference: PluginReference::resolve("acme/charts", false),
                status: CloneStatus::Failed {
                    exit_code: Some(128),
                    stderr: "not found".into(),
                },
            }],
            unresolved: vec!["???".into()],
            ..InstallReport::default()
        };

        let value = report_json(&report);
        assert_eq!(value["clones"][0]["status"], "failed");
        assert_eq!(value["clones"][0]["exit_code"], 128);
        assert_eq!(value["clones"][0]["name"], "charts");
        assert_eq!(value["unresolved"][0], "???");
    }
}
