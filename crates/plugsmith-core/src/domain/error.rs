// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

use crate::error::ErrorCategory;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (they travel through composed task chains)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Unknown plugin type '{0}'")]
    UnknownPluginType(String),

    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("Invalid project configuration: {0}")]
    InvalidProjectConfig(String),

    #[error("Invalid version '{0}'")]
    InvalidVersion(String),

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    // ========================================================================
    // Compatibility Errors
    // ========================================================================
    /// The installed toolchain is older than the required one.
    #[error("{message}")]
    VersionMismatch { message: String },

    #[error("No transition from '{from}' to '{to}'")]
    UnsupportedTransition { from: String, to: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::UnknownPluginType(_) => vec![
                "Supported types: app, bundle, lib, slib, service, lib-slib, lib-service, app-slib"
                    .into(),
            ],
            Self::InvalidManifest(_) => vec![
                "Check that package.json is valid JSON with an object at the top level".into(),
            ],
            Self::InvalidProjectConfig(_) => vec![
                "Check that .plugsmith.json is valid JSON with an object at the top level".into(),
            ],
            Self::VersionMismatch { .. } => vec![
                "Install Node Version Manager (NVM): https://github.com/nvm-sh/nvm#install--update-script".into(),
                "Then install the required Node.js version with `nvm install`".into(),
            ],
            Self::UnsupportedTransition { to, .. } => vec![
                format!("Plugsmith cannot migrate a project to '{to}'"),
                "Supported migration targets: lib, slib".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownPluginType(_)
            | Self::InvalidManifest(_)
            | Self::InvalidProjectConfig(_)
            | Self::InvalidVersion(_)
            | Self::AbsolutePathNotAllowed { .. } => ErrorCategory::Validation,
            Self::VersionMismatch { .. } | Self::UnsupportedTransition { .. } => {
                ErrorCategory::Compatibility
            }
        }
    }
}
