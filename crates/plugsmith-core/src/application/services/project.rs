//! Reading and writing the files a plugin project is made of.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{
        MANIFEST_FILE, Manifest, PROJECT_CONFIG_FILE, ProjectConfig, ScaffoldFile,
        WORKSPACE_MARKER, WorkspaceConfig,
    },
    error::PlugsmithResult,
};

/// Typed access to `package.json`, `.plugsmith.json` and the workspace
/// marker of a project directory.
#[derive(Clone, Copy)]
pub struct ProjectFiles<'a> {
    fs: &'a dyn Filesystem,
}

impl<'a> ProjectFiles<'a> {
    pub fn new(fs: &'a dyn Filesystem) -> Self {
        Self { fs }
    }

    pub fn has_manifest(&self, dir: &Path) -> bool {
        self.fs.exists(&dir.join(MANIFEST_FILE))
    }

    /// Read `dir/package.json`; a missing file is an error.
    pub fn read_manifest(&self, dir: &Path) -> PlugsmithResult<Manifest> {
        let path = dir.join(MANIFEST_FILE);
        if !self.fs.exists(&path) {
            return Err(ApplicationError::ManifestNotFound { path }.into());
        }
        Ok(Manifest::parse(&self.fs.read_to_string(&path)?)?)
    }

    /// Read `dir/package.json`, or an empty manifest when it does not exist.
    pub fn read_manifest_or_default(&self, dir: &Path) -> PlugsmithResult<Manifest> {
        if self.has_manifest(dir) {
            self.read_manifest(dir)
        } else {
            Ok(Manifest::new())
        }
    }

    #[instrument(skip(self, manifest), fields(dir = %dir.display()))]
    pub fn write_manifest(&self, dir: &Path, manifest: &Manifest) -> PlugsmithResult<()> {
        self.fs
            .write_file(&dir.join(MANIFEST_FILE), &manifest.to_pretty_string())
    }

    /// Project configuration; an absent file yields an empty config.
    pub fn read_config(&self, dir: &Path) -> PlugsmithResult<ProjectConfig> {
        let path = dir.join(PROJECT_CONFIG_FILE);
        if !self.fs.exists(&path) {
            debug!(path = %path.display(), "no project config, using defaults");
            return Ok(ProjectConfig::default());
        }
        Ok(ProjectConfig::parse(&self.fs.read_to_string(&path)?)?)
    }

    pub fn write_config(&self, dir: &Path, config: &ProjectConfig) -> PlugsmithResult<()> {
        self.fs
            .write_file(&dir.join(PROJECT_CONFIG_FILE), &config.to_pretty_string())
    }

    pub fn is_workspace(&self, dir: &Path) -> bool {
        self.fs.exists(&dir.join(WORKSPACE_MARKER))
    }

    /// The parent of `plugin_dir` when that parent is a workspace root.
    pub fn enclosing_workspace(&self, plugin_dir: &Path) -> Option<PathBuf> {
        plugin_dir
            .parent()
            .filter(|parent| self.is_workspace(parent))
            .map(Path::to_path_buf)
    }

    pub fn read_workspace(&self, root: &Path) -> PlugsmithResult<WorkspaceConfig> {
        let path = root.join(WORKSPACE_MARKER);
        if !self.fs.exists(&path) {
            return Ok(WorkspaceConfig::default());
        }
        Ok(WorkspaceConfig::parse(&self.fs.read_to_string(&path)?)?)
    }

    pub fn write_workspace(&self, root: &Path, config: &WorkspaceConfig) -> PlugsmithResult<()> {
        self.fs
            .write_file(&root.join(WORKSPACE_MARKER), &config.to_pretty_string())
    }

    /// Write scaffold files below `dir`, creating parent directories.
    pub fn write_files(&self, dir: &Path, files: &[ScaffoldFile]) -> PlugsmithResult<()> {
        for file in files {
            let path = dir.join(file.path());
            if let Some(parent) = path.parent() {
                self.fs.create_dir_all(parent)?;
            }
            self.fs.write_file(&path, &file.content)?;
        }
        Ok(())
    }

    /// Delete the listed paths below `dir`; returns those that existed.
    pub fn delete_files(&self, dir: &Path, paths: &[&str]) -> PlugsmithResult<Vec<String>> {
        let mut removed = Vec::new();
        for rel in paths {
            let path = dir.join(rel);
            if self.fs.exists(&path) {
                self.fs.remove_file(&path)?;
                removed.push((*rel).to_string());
            }
        }
        Ok(removed)
    }
}
