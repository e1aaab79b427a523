//! Core domain layer for Plugsmith.
//!
//! Pure logic only: no filesystem, no processes. Everything that touches the
//! outside world goes through the ports in `crate::application::ports`.
//!
//! - [`plugin_ref`]: `[github:][owner/]repo[#ref]` parsing and clone arguments
//! - [`manifest`]: value-in / value-out `package.json` transforms
//! - [`version`]: tool version comparison behind the version gate
//! - [`classification`]: marker-file classification of workspace directories
//! - [`migration`]: plugin type transitions
pub mod classification;
pub mod error;
pub mod manifest;
pub mod migration;
pub mod plugin_ref;
pub mod plugin_type;
pub mod project;
pub mod render;
pub mod scaffold;
pub mod version;

pub use classification::{PluginClassification, PluginListing, SERVER_MARKER, WEB_MARKER};
pub use error::DomainError;
pub use manifest::{
    DependencyMap, MANIFEST_FILE, Manifest, dependency_diff, extend_manifest, merge_manifest,
};
pub use migration::{ManifestPatch, MigrationPlan, TransitionPlan};
pub use plugin_ref::{ParseIdentifierError, PluginReference, RepoIdentifier};
pub use plugin_type::{PluginSide, PluginType};
pub use project::{PROJECT_CONFIG_FILE, ProjectConfig, WORKSPACE_MARKER, WorkspaceConfig};
pub use render::RenderContext;
pub use scaffold::{Scaffold, ScaffoldFile};
pub use version::{GateVerdict, ToolVersion, ToolVersions, VersionRequirement};
