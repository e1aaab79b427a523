//! Plugsmith Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Plugsmith
//! plugin scaffolding tool, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          plugsmith-cli (CLI)            │
//! │     (Builds tasks, renders notices)     │
//! └──────────────────┬──────────────────────┘
//!                    │ runs
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Application Tasks                │
//! │  (Install, VersionGate, MigrateType,    │
//! │   WorkspaceRefresh, Update, ...)        │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, ProcessRunner, Scaffolds)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   plugsmith-adapters (Infrastructure)   │
//! │ (LocalFilesystem, SystemProcessRunner)  │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (PluginReference, Manifest, PluginType, │
//! │  VersionGate, MigrationPlan)            │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use plugsmith_core::prelude::*;
//!
//! # fn demo(fs: &dyn Filesystem, runner: &dyn ProcessRunner, store: &dyn ScaffoldStore) -> PlugsmithResult<()> {
//! let ports = Ports::new(fs, runner, store);
//! let mut ctx = TaskContext::new(ports, "/work/my_plugin", VersionPolicy::default());
//!
//! let install = InstallTask::new(vec!["lodash".into()], InstallOptions::default());
//! Sequence::new("install")
//!     .then(CheckNodeVersionTask::new())
//!     .then(install)
//!     .run(&mut ctx)?;
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ports::{Filesystem, Invocation, ProcessOutput, ProcessRunner, ScaffoldStore},
        services::{ProjectFiles, WorkspaceScanner},
        session::Session,
        tasks::{
            ChangeTypeTask, CheckNodeVersionTask, CheckOwnVersionTask, CloneOutcome, ClonePolicy,
            CloneStatus, GithubTemplatesTask, InstallOptions, InstallReport, InstallTask,
            MigrateTypeTask, Notice, NoticeLevel, Ports, Sequence, Task, TaskContext,
            TaskOutcome, UpdateTask, VersionPolicy, WorkspaceRefreshTask,
        },
    };
    pub use crate::domain::{
        Manifest, PluginListing, PluginReference, PluginSide, PluginType, ProjectConfig,
        RenderContext, Scaffold, ScaffoldFile, ToolVersion, ToolVersions, VersionRequirement,
    };
    pub use crate::error::{PlugsmithError, PlugsmithResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
