//! `plugsmith change-type`, `to-lib-type` and `to-slib-type`.

use tracing::instrument;

use plugsmith_core::{
    application::tasks::{ChangeTypeTask, MigrateTypeTask},
    domain::PluginType,
};

use crate::{
    cli::{ChangeTypeArgs, GlobalArgs},
    commands::run_task,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Change to the type given with `--type`, or one picked interactively.
#[instrument(skip_all, fields(to = args.plugin_type.as_deref().unwrap_or("?")))]
pub fn execute(
    args: ChangeTypeArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let raw = match args.plugin_type {
        Some(raw) => raw,
        None => prompt_type(&global)?,
    };
    let task = ChangeTypeTask::parse(&raw)?;
    run_task(&task, &global, &config, &output)?;
    Ok(())
}

/// Fixed-target migration (`to-lib-type`, `to-slib-type`).
pub fn migrate(
    to: PluginType,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    run_task(&MigrateTypeTask::new(to), &global, &config, &output)?;
    Ok(())
}

fn missing_type() -> CliError {
    let names: Vec<&str> = PluginType::ALL.iter().map(|t| t.as_str()).collect();
    CliError::InvalidInput {
        message: format!("--type is required (one of {})", names.join(", ")),
    }
}

#[cfg(feature = "interactive")]
fn prompt_type(global: &GlobalArgs) -> CliResult<String> {
    use std::io::IsTerminal;

    use dialoguer::{Select, theme::ColorfulTheme};

    if global.quiet || !std::io::stdin().is_terminal() {
        return Err(missing_type());
    }

    let items: Vec<String> = PluginType::ALL
        .iter()
        .map(|t| format!("{:<12} {}", t.as_str(), t.description()))
        .collect();

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Plugin type")
        .items(&items)
        .default(0)
        .interact_opt()
        .map_err(|e| CliError::IoError {
            message: "failed to read the type selection".into(),
            source: std::io::Error::other(e),
        })?;

    match selection {
        Some(index) => Ok(PluginType::ALL[index].as_str().to_string()),
        None => Err(CliError::Cancelled),
    }
}

#[cfg(not(feature = "interactive"))]
fn prompt_type(_global: &GlobalArgs) -> CliResult<String> {
    Err(missing_type())
}
