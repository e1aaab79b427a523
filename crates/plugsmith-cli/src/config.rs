//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `PLUGSMITH_<SECTION>__<KEY>`, plus the
//!    `PLUGSMITH_SCAFFOLDS_DIR` shorthand
//! 3. Config file (`--config FILE`, or [`AppConfig::config_path`])
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

use plugsmith_core::{
    application::tasks::{ClonePolicy, VersionPolicy},
    domain::{ToolVersion, ToolVersions},
    error::PlugsmithResult,
};

/// File holding the required Node.js version, as written by `nvm`.
pub const NVMRC_FILE: &str = ".nvmrc";

/// File holding the required npm version.
pub const NPM_VERSION_FILE: &str = ".npm-version";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub install: InstallConfig,
    pub versions: VersionsConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
    pub scaffolds: ScaffoldsConfig,
}

/// Defaults for `plugsmith install`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    pub ssh: bool,
    pub skip_install: bool,
    pub clone_policy: ClonePolicy,
}

/// Required toolchain versions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionsConfig {
    pub node: String,
    pub npm: String,
    /// Directory holding `.nvmrc` / `.npm-version`; these win over
    /// `node` / `npm` when present.
    pub requirements_dir: Option<PathBuf>,
}

impl Default for VersionsConfig {
    fn default() -> Self {
        Self {
            node: "18".into(),
            npm: "9".into(),
            requirements_dir: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Append logs to this file in addition to stderr.
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaffoldsConfig {
    /// Read scaffolds from this directory instead of the built-in set.
    pub dir: Option<PathBuf>,
}

/// Every key `config get` / `config set` understand.
pub const KNOWN_KEYS: [&str; 9] = [
    "install.ssh",
    "install.skip_install",
    "install.clone_policy",
    "versions.node",
    "versions.npm",
    "versions.requirements_dir",
    "output.no_color",
    "logging.file",
    "scaffolds.dir",
];

impl AppConfig {
    /// Load configuration: defaults, then the config file, then environment.
    ///
    /// A file passed with `--config` must exist; the default location is
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        Self::load_with(config_file, true)
    }

    /// Like [`Self::load`], but `explicit_required = false` tolerates a
    /// missing `--config` file (for commands that create it).
    pub fn load_with(
        config_file: Option<&PathBuf>,
        explicit_required: bool,
    ) -> anyhow::Result<Self> {
        let defaults =
            Config::try_from(&Self::default()).context("failed to serialise default config")?;

        let file = match config_file {
            Some(path) => File::from(path.as_path())
                .format(FileFormat::Toml)
                .required(explicit_required),
            None => File::from(Self::config_path())
                .format(FileFormat::Toml)
                .required(false),
        };

        let settings = Config::builder()
            .add_source(defaults)
            .add_source(file)
            .add_source(
                Environment::with_prefix("PLUGSMITH")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option(
                "scaffolds.dir",
                std::env::var("PLUGSMITH_SCAFFOLDS_DIR").ok(),
            )?
            .build()
            .context("failed to read configuration")?;

        settings
            .try_deserialize()
            .context("invalid configuration")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.plugsmith.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "plugsmith", "plugsmith")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".plugsmith.toml"))
    }

    /// Required versions: the requirement files when present, otherwise
    /// `versions.node` / `versions.npm`.
    ///
    /// A relative `requirements_dir` is resolved against `cwd`.
    pub fn required_versions(&self, cwd: &Path) -> PlugsmithResult<ToolVersions> {
        let dir = self
            .versions
            .requirements_dir
            .as_ref()
            .map(|d| cwd.join(d));

        let read = |file: &str, fallback: &str| -> PlugsmithResult<ToolVersion> {
            let from_file = dir
                .as_ref()
                .and_then(|d| std::fs::read_to_string(d.join(file)).ok())
                .filter(|s| !s.trim().is_empty());
            match from_file {
                Some(raw) => {
                    debug!(file, version = raw.trim(), "required version from file");
                    Ok(ToolVersion::parse(&raw)?)
                }
                None => Ok(ToolVersion::parse(fallback)?),
            }
        };

        Ok(ToolVersions::new(
            read(NVMRC_FILE, &self.versions.node)?,
            read(NPM_VERSION_FILE, &self.versions.npm)?,
        ))
    }

    /// Gate policy for this run.
    pub fn version_policy(&self, cwd: &Path, quiet: bool) -> PlugsmithResult<VersionPolicy> {
        Ok(VersionPolicy::new(self.required_versions(cwd)?).quiet(quiet))
    }

    /// Value of a dotted key, rendered as text.
    pub fn get(&self, key: &str) -> Option<String> {
        let path = |p: &Option<PathBuf>| {
            p.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        };
        let value = match key {
            "install.ssh" => self.install.ssh.to_string(),
            "install.skip_install" => self.install.skip_install.to_string(),
            "install.clone_policy" => self.install.clone_policy.to_string(),
            "versions.node" => self.versions.node.clone(),
            "versions.npm" => self.versions.npm.clone(),
            "versions.requirements_dir" => path(&self.versions.requirements_dir),
            "output.no_color" => self.output.no_color.to_string(),
            "logging.file" => path(&self.logging.file),
            "scaffolds.dir" => path(&self.scaffolds.dir),
            _ => return None,
        };
        Some(value)
    }
}
