//! Composable tasks.
//!
//! Every top-level command is a [`Task`]. A task may run other tasks to
//! completion from inside its own `run` (composition); the child's error
//! propagates out of the parent unchanged. [`Sequence`] chains tasks and
//! stops at the first failure.

pub mod github_templates;
pub mod install;
pub mod migrate;
pub mod update;
pub mod version_check;
pub mod workspace;

use std::path::{Path, PathBuf};

use tracing::{debug, info, info_span, warn};

use crate::{
    application::{
        ports::{Filesystem, Invocation, ProcessOutput, ProcessRunner, ScaffoldStore},
        services::{ProjectFiles, WorkspaceScanner},
        session::Session,
    },
    domain::{ToolVersion, ToolVersions},
    error::PlugsmithResult,
};

pub use github_templates::GithubTemplatesTask;
pub use install::{
    ClonePolicy, CloneOutcome, CloneStatus, InstallOptions, InstallReport, InstallTask,
};
pub use migrate::{ChangeTypeTask, MigrateTypeTask};
pub use update::UpdateTask;
pub use version_check::{CheckNodeVersionTask, CheckOwnVersionTask};
pub use workspace::WorkspaceRefreshTask;

/// The adapters a task talks to.
#[derive(Clone, Copy)]
pub struct Ports<'a> {
    pub fs: &'a dyn Filesystem,
    pub runner: &'a dyn ProcessRunner,
    pub scaffolds: &'a dyn ScaffoldStore,
}

impl<'a> Ports<'a> {
    pub fn new(
        fs: &'a dyn Filesystem,
        runner: &'a dyn ProcessRunner,
        scaffolds: &'a dyn ScaffoldStore,
    ) -> Self {
        Self {
            fs,
            runner,
            scaffolds,
        }
    }
}

/// Required tool versions and whether a satisfied gate stays silent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionPolicy {
    pub required: ToolVersions,
    pub quiet: bool,
}

impl VersionPolicy {
    pub fn new(required: ToolVersions) -> Self {
        Self {
            required,
            quiet: false,
        }
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }
}

impl Default for VersionPolicy {
    fn default() -> Self {
        Self::new(ToolVersions::new(
            ToolVersion::from_parts(&[18]),
            ToolVersion::from_parts(&[9]),
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
}

/// A user-facing message produced by a task. The CLI decides how to show it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Done,
    Skipped { reason: String },
}

/// Everything a running task may touch.
pub struct TaskContext<'a> {
    ports: Ports<'a>,
    cwd: PathBuf,
    pub session: Session,
    pub versions: VersionPolicy,
    notices: Vec<Notice>,
}

impl<'a> TaskContext<'a> {
    pub fn new(ports: Ports<'a>, cwd: impl Into<PathBuf>, versions: VersionPolicy) -> Self {
        Self {
            ports,
            cwd: cwd.into(),
            session: Session::new(),
            versions,
            notices: Vec::new(),
        }
    }

    pub fn ports(&self) -> Ports<'a> {
        self.ports
    }

    /// The directory the command was started in.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Last component of [`cwd`](Self::cwd).
    pub fn directory_name(&self) -> String {
        self.cwd
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn files(&self) -> ProjectFiles<'a> {
        ProjectFiles::new(self.ports.fs)
    }

    pub fn scanner(&self) -> WorkspaceScanner<'a> {
        WorkspaceScanner::new(self.ports.fs)
    }

    pub fn run_process(&self, invocation: &Invocation) -> PlugsmithResult<ProcessOutput> {
        debug!(%invocation, "running");
        self.ports.runner.run(invocation)
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Info, message.into());
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Success, message.into());
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{message}");
        self.push(NoticeLevel::Warning, message);
    }

    fn push(&mut self, level: NoticeLevel, message: String) {
        self.notices.push(Notice { level, message });
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

/// A unit of work with a uniform lifecycle.
pub trait Task {
    fn name(&self) -> &str;

    fn run(&self, ctx: &mut TaskContext<'_>) -> PlugsmithResult<TaskOutcome>;
}

/// Runs tasks in order, stopping at the first error.
pub struct Sequence {
    name: String,
    tasks: Vec<Box<dyn Task>>,
}

impl Sequence {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tasks: Vec::new(),
        }
    }

    pub fn then(mut self, task: impl Task + 'static) -> Self {
        self.tasks.push(Box::new(task));
        self
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl Task for Sequence {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, ctx: &mut TaskContext<'_>) -> PlugsmithResult<TaskOutcome> {
        for task in &self.tasks {
            let span = info_span!("task", name = task.name());
            let _guard = span.enter();
            if let TaskOutcome::Skipped { reason } = task.run(ctx)? {
                info!(%reason, "skipped");
            }
        }
        Ok(TaskOutcome::Done)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Minimal in-crate port implementations for unit tests.

    use std::collections::{BTreeMap, BTreeSet};
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    use crate::application::ports::{Filesystem, ScaffoldStore};
    use crate::domain::{PluginSide, Scaffold, ScaffoldFile};
    use crate::error::PlugsmithResult;

    #[derive(Default)]
    pub struct MemFs {
        files: Mutex<BTreeMap<PathBuf, String>>,
        dirs: Mutex<BTreeSet<PathBuf>>,
    }

    impl MemFs {
        pub fn with_file(self, path: impl AsRef<Path>, content: &str) -> Self {
            let path = path.as_ref();
            if let Some(parent) = path.parent() {
                self.create_dir_all(parent).unwrap();
            }
            self.write_file(path, content).unwrap();
            self
        }

        pub fn read(&self, path: impl AsRef<Path>) -> Option<String> {
            self.files.lock().unwrap().get(path.as_ref()).cloned()
        }
    }

    impl Filesystem for MemFs {
        fn read_to_string(&self, path: &Path) -> PlugsmithResult<String> {
            self.read(path).ok_or_else(|| {
                crate::application::ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "not found".into(),
                }
                .into()
            })
        }

        fn write_file(&self, path: &Path, content: &str) -> PlugsmithResult<()> {
            self.files
                .lock()
                .unwrap()
                .insert(path.to_path_buf(), content.to_string());
            Ok(())
        }

        fn create_dir_all(&self, path: &Path) -> PlugsmithResult<()> {
            let mut dirs = self.dirs.lock().unwrap();
            for ancestor in path.ancestors() {
                dirs.insert(ancestor.to_path_buf());
            }
            Ok(())
        }

        fn remove_file(&self, path: &Path) -> PlugsmithResult<()> {
            self.files.lock().unwrap().remove(path);
            Ok(())
        }

        fn exists(&self, path: &Path) -> bool {
            self.files.lock().unwrap().contains_key(path)
                || self.dirs.lock().unwrap().contains(path)
        }

        fn list_dirs(&self, path: &Path) -> PlugsmithResult<Vec<String>> {
            Ok(self
                .dirs
                .lock()
                .unwrap()
                .iter()
                .filter(|d| d.parent() == Some(path))
                .filter_map(|d| d.file_name().map(|n| n.to_string_lossy().into_owned()))
                .collect())
        }
    }

    pub struct FixedScaffolds;

    impl ScaffoldStore for FixedScaffolds {
        fn scaffold(&self, side: PluginSide) -> PlugsmithResult<Scaffold> {
            let (files, manifest_template) = match side {
                PluginSide::Web => (
                    vec![ScaffoldFile::new(".gitignore", "node_modules/\n")?],
                    r#"{ "name": "{{name}}", "scripts": { "build": "webpack" }, "files": ["dist"] }"#,
                ),
                PluginSide::Server => (
                    vec![ScaffoldFile::new(".gitignore", "__pycache__/\n")?],
                    r#"{ "name": "{{name}}", "scripts": { "test": "pytest" } }"#,
                ),
            };
            Ok(Scaffold {
                side,
                files,
                manifest_template: manifest_template.to_string(),
            })
        }

        fn github_templates(&self) -> PlugsmithResult<Vec<ScaffoldFile>> {
            Ok(vec![ScaffoldFile::new(
                ".github/PULL_REQUEST_TEMPLATE.md",
                "## Summary\n",
            )?])
        }
    }
}
