//! Infrastructure adapters for Plugsmith.
//!
//! This crate implements the ports defined in `plugsmith-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod process;
pub mod scaffold_store;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use process::{ScriptedProcessRunner, SystemProcessRunner};
pub use scaffold_store::{BuiltinScaffolds, DirectoryScaffolds};
