//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// An external program could not be started at all.
    #[error("Could not run `{command}`: {reason}")]
    ProcessSpawn { command: String, reason: String },

    /// An external program ran and exited unsuccessfully.
    #[error("`{command}` failed with {}", exit_label(.exit_code))]
    ProcessFailed {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    /// Cloning a plugin repository failed (fail-fast policy).
    #[error("Cloning {plugin} failed with {}", exit_label(.exit_code))]
    CloneFailed {
        plugin: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    /// The project has no type recorded in its configuration.
    #[error("No plugin type configured in {path}")]
    MissingPluginType { path: PathBuf },

    /// A required manifest does not exist.
    #[error("No package.json found at {path}")]
    ManifestNotFound { path: PathBuf },

    /// A scaffold could not be provided by the store.
    #[error("Scaffold not available: {name}")]
    ScaffoldUnavailable { name: String },

    /// Shared state lock poisoned.
    #[error("Internal lock poisoned")]
    StoreLockError,
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("exit code {c}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::ProcessSpawn { command, .. } => {
                let program = command.split_whitespace().next().unwrap_or_default();
                vec![
                    format!("Is `{program}` installed and on your PATH?"),
                    format!("Try running `{program} --version`"),
                ]
            }
            Self::ProcessFailed { stderr, .. } | Self::CloneFailed { stderr, .. } => {
                let mut out = vec!["Check the command output below".to_string()];
                out.extend(stderr.lines().take(10).map(|l| format!("  {l}")));
                out
            }
            Self::MissingPluginType { .. } => vec![
                "Set the project type first: plugsmith change-type --type <TYPE>".into(),
                "Or add \"type\" to .plugsmith.json".into(),
            ],
            Self::ManifestNotFound { .. } => vec![
                "Run this command from inside a plugin directory".into(),
                "Or pass --cwd <DIR>".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FilesystemError { .. } | Self::StoreLockError => ErrorCategory::Internal,
            Self::ProcessSpawn { .. } | Self::ProcessFailed { .. } | Self::CloneFailed { .. } => {
                ErrorCategory::External
            }
            Self::MissingPluginType { .. } => ErrorCategory::Configuration,
            Self::ManifestNotFound { .. } | Self::ScaffoldUnavailable { .. } => {
                ErrorCategory::NotFound
            }
        }
    }
}
