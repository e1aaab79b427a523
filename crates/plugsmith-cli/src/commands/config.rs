//! `plugsmith config` — read and write configuration values.

use std::path::{Path, PathBuf};

use plugsmith_core::{application::tasks::ClonePolicy, domain::ToolVersion};

use crate::{
    cli::{ConfigCommands, GlobalArgs},
    config::{AppConfig, KNOWN_KEYS},
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = config.get(&key).ok_or_else(|| unknown_key(&key))?;
            output.print(&value)?;
        }

        ConfigCommands::Set { key, value } => {
            let path = active_path(&global);
            set_value(&path, &key, &value)?;
            output.success(&format!("Set {key} = {value} in {}", path.display()))?;
        }

        ConfigCommands::List => {
            output.header("Current Configuration:")?;
            let serialised =
                toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
                    message: format!("Failed to serialise config: {e}"),
                    source: Some(Box::new(e)),
                })?;
            output.print(serialised.trim_end())?;
        }

        ConfigCommands::Path => {
            output.print(&active_path(&global).display().to_string())?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

/// `--config FILE` when given, else the platform default.
fn active_path(global: &GlobalArgs) -> PathBuf {
    global.config.clone().unwrap_or_else(AppConfig::config_path)
}

fn unknown_key(key: &str) -> CliError {
    CliError::ConfigError {
        message: format!(
            "Unknown config key: '{key}' (known keys: {})",
            KNOWN_KEYS.join(", ")
        ),
        source: None,
    }
}

/// Validate `raw` for `key` and convert it to its TOML value.
fn parse_value(key: &str, raw: &str) -> CliResult<toml::Value> {
    let invalid = |reason: String| CliError::InvalidInput {
        message: format!("invalid value '{raw}' for {key}: {reason}"),
    };
    match key {
        "install.ssh" | "install.skip_install" | "output.no_color" => raw
            .parse::<bool>()
            .map(toml::Value::Boolean)
            .map_err(|e| invalid(e.to_string())),
        "install.clone_policy" => raw
            .parse::<ClonePolicy>()
            .map(|p| toml::Value::String(p.to_string()))
            .map_err(invalid),
        "versions.node" | "versions.npm" => ToolVersion::parse(raw)
            .map(|_| toml::Value::String(raw.trim().to_string()))
            .map_err(|e| invalid(e.to_string())),
        _ if KNOWN_KEYS.contains(&key) => Ok(toml::Value::String(raw.to_string())),
        _ => Err(unknown_key(key)),
    }
}

/// Write `key = value` into the TOML file at `path`, keeping other keys.
fn set_value(path: &Path, key: &str, raw: &str) -> CliResult<()> {
    let value = parse_value(key, raw)?;
    let (section, field) = key.split_once('.').ok_or_else(|| unknown_key(key))?;

    let mut table = if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_cli_context(|| format!("Failed to read '{}'", path.display()))?;
        toml::from_str::<toml::Table>(&content).map_err(|e| CliError::ConfigError {
            message: format!("Failed to parse '{}': {e}", path.display()),
            source: Some(Box::new(e)),
        })?
    } else {
        toml::Table::new()
    };

    let entry = table
        .entry(section)
        .or_insert(toml::Value::Table(toml::Table::new()));
    let toml::Value::Table(section_table) = entry else {
        return Err(CliError::ConfigError {
            message: format!("'{section}' in '{}' is not a table", path.display()),
            source: None,
        });
    };
    section_table.insert(field.to_string(), value);

    let rendered = toml::to_string_pretty(&table).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise config: {e}"),
        source: Some(Box::new(e)),
    })?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_cli_context(|| format!("Failed to create '{}'", parent.display()))?;
    }
    std::fs::write(path, rendered)
        .with_cli_context(|| format!("Failed to write '{}'", path.display()))?;
    Ok(())
}

// ── tests ─────────────────────────────────────────────────────────────────────
