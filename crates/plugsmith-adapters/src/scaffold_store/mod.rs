//! Scaffold store adapters.

mod builtin;
mod directory;

pub use builtin::BuiltinScaffolds;
pub use directory::DirectoryScaffolds;
