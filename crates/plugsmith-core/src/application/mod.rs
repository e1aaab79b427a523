//! Application layer for Plugsmith.
//!
//! This layer contains:
//! - **Tasks**: composable units of work (install, version gate, migrations)
//! - **Services**: project file access and workspace scanning shared by tasks
//! - **Session**: per-run state such as "version message already shown"
//! - **Ports**: interface definitions (traits) for external dependencies
//! - **Errors**: application-specific error types
//!
//! Business rules live in `crate::domain`; this layer only sequences them
//! against the ports.

pub mod error;
pub mod ports;
pub mod services;
pub mod session;
pub mod tasks;

pub use services::{ProjectFiles, WorkspaceScanner};
pub use session::Session;

// Re-export port traits (for adapter implementation)
pub use ports::{Filesystem, Invocation, ProcessOutput, ProcessRunner, ScaffoldStore};

pub use error::ApplicationError;
