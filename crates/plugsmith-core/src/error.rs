//! The error every core operation returns: a domain or an application
//! failure, each able to say what the user can do about it.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

#[derive(Debug, Error, Clone)]
pub enum PlugsmithError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Application(#[from] ApplicationError),
}

impl PlugsmithError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => e.category(),
            Self::Application(e) => e.category(),
        }
    }

    /// `true` when the error came from the version gate.
    pub fn is_version_mismatch(&self) -> bool {
        matches!(self, Self::Domain(DomainError::VersionMismatch { .. }))
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Compatibility,
    NotFound,
    Configuration,
    External,
    Internal,
}

/// Convenient result type alias.
pub type PlugsmithResult<T> = Result<T, PlugsmithError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_mismatch_is_detected() {
        let err: PlugsmithError = DomainError::VersionMismatch {
            message: "too old".into(),
        }
        .into();
        assert!(err.is_version_mismatch());
        assert_eq!(err.category(), ErrorCategory::Compatibility);
    }

    #[test]
    fn messages_pass_through_unchanged() {
        let err: PlugsmithError = ApplicationError::MissingPluginType {
            path: "/p/.plugsmith.json".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "No plugin type configured in /p/.plugsmith.json"
        );
        assert!(!err.is_version_mismatch());
    }
}
