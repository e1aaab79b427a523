//! Application services.
//!
//! Shared helpers the tasks build on:
//! - [`ProjectFiles`]: manifest, project config and workspace marker access
//! - [`WorkspaceScanner`]: marker-file classification of workspace children

pub mod project;
pub mod scanner;

pub use project::ProjectFiles;
pub use scanner::WorkspaceScanner;
