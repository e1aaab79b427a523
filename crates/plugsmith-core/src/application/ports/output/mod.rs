//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `plugsmith-adapters` crate provides implementations.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::application::ApplicationError;
use crate::domain::{PluginSide, Scaffold, ScaffoldFile};
use crate::error::PlugsmithResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `plugsmith_adapters::filesystem::LocalFilesystem` (production)
/// - `plugsmith_adapters::filesystem::MemoryFilesystem` (testing)
pub trait Filesystem: Send + Sync {
    /// Read a whole file as UTF-8.
    fn read_to_string(&self, path: &Path) -> PlugsmithResult<String>;

    /// Write content to a file, replacing it. The parent must exist.
    fn write_file(&self, path: &Path, content: &str) -> PlugsmithResult<()>;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> PlugsmithResult<()>;

    /// Remove a file. Removing a missing file succeeds.
    fn remove_file(&self, path: &Path) -> PlugsmithResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Names of the immediate subdirectories of `path`.
    fn list_dirs(&self, path: &Path) -> PlugsmithResult<Vec<String>>;
}

/// A program invocation: command, arguments and working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl Invocation {
    pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// `program arg1 arg2 ...`
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (in {})", self.command_line(), self.cwd.display())
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Convert a non-zero exit into [`ApplicationError::ProcessFailed`].
    pub fn check(self, invocation: &Invocation) -> PlugsmithResult<Self> {
        if self.success() {
            Ok(self)
        } else {
            Err(ApplicationError::ProcessFailed {
                command: invocation.command_line(),
                exit_code: self.exit_code,
                stderr: self.stderr,
            }
            .into())
        }
    }
}

/// Port for running external programs (package manager, git, node).
///
/// Implementations block until the process exits. An `Err` means the
/// process could not be started; a started process that fails is an `Ok`
/// with a non-zero [`ProcessOutput::exit_code`].
#[cfg_attr(test, mockall::automock)]
pub trait ProcessRunner: Send + Sync {
    fn run(&self, invocation: &Invocation) -> PlugsmithResult<ProcessOutput>;
}

/// Port for the scaffold files shipped with the tool.
///
/// Implemented by:
/// - `plugsmith_adapters::scaffold_store::BuiltinScaffolds`
pub trait ScaffoldStore: Send + Sync {
    /// Invariant files and manifest fragment for one side.
    fn scaffold(&self, side: PluginSide) -> PlugsmithResult<Scaffold>;

    /// Issue and pull-request templates placed under `.github/`.
    fn github_templates(&self) -> PlugsmithResult<Vec<ScaffoldFile>>;
}
