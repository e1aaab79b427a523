//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `plugsmith-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `ProcessRunner`: External programs (npm, git, node)
//!   - `ScaffoldStore`: Scaffold files shipped with the tool
//!
//! - **Driving (Input) Ports**: the [`Task`](crate::application::tasks::Task) trait,
//!   run by the CLI

pub mod output;

#[cfg(test)]
pub use output::MockProcessRunner;
pub use output::{Filesystem, Invocation, ProcessOutput, ProcessRunner, ScaffoldStore};
