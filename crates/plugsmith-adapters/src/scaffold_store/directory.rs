//! Scaffolds loaded from a directory on disk.
//!
//! ```text
//! <root>/
//! ├── web/
//! │   ├── package.json       ← manifest fragment template (required)
//! │   ├── .gitignore         ← every other file is copied, path kept
//! │   └── .circleci/config.yml
//! ├── server/
//! │   └── ...
//! └── github/                ← placed under `.github/`
//!     └── PULL_REQUEST_TEMPLATE.md
//! ```

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};
use walkdir::WalkDir;

use plugsmith_core::{
    application::{ApplicationError, ports::ScaffoldStore},
    domain::{MANIFEST_FILE, PluginSide, Scaffold, ScaffoldFile},
    error::PlugsmithResult,
};

/// Scaffolds read from a user-provided directory, e.g. for a company-wide
/// CI configuration.
#[derive(Debug, Clone)]
pub struct DirectoryScaffolds {
    root: PathBuf,
}

impl DirectoryScaffolds {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `(relative path with '/' separators, content)` for every file below
    /// `dir`, sorted by path.
    fn read_tree(&self, dir: &Path) -> PlugsmithResult<Vec<(String, String)>> {
        let unavailable = || ApplicationError::ScaffoldUnavailable {
            name: dir.display().to_string(),
        };
        if !dir.is_dir() {
            return Err(unavailable().into());
        }

        let mut out = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| ApplicationError::FilesystemError {
                path: dir.to_path_buf(),
                reason: e.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let rel = entry
                .path()
                .strip_prefix(dir)
                .map_err(|_| unavailable())?
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            let content = std::fs::read_to_string(entry.path()).map_err(|e| {
                ApplicationError::FilesystemError {
                    path: entry.path().to_path_buf(),
                    reason: format!("Failed to read scaffold file: {e}"),
                }
            })?;
            out.push((rel, content));
        }
        Ok(out)
    }
}

impl ScaffoldStore for DirectoryScaffolds {
    #[instrument(skip(self), fields(root = %self.root.display()))]
    fn scaffold(&self, side: PluginSide) -> PlugsmithResult<Scaffold> {
        let dir = self.root.join(side.to_string());
        let mut manifest_template = None;
        let mut files = Vec::new();

        for (rel, content) in self.read_tree(&dir)? {
            if rel == MANIFEST_FILE {
                manifest_template = Some(content);
            } else {
                files.push(ScaffoldFile::new(rel, content)?);
            }
        }

        let manifest_template =
            manifest_template.ok_or_else(|| ApplicationError::ScaffoldUnavailable {
                name: dir.join(MANIFEST_FILE).display().to_string(),
            })?;
        debug!(files = files.len(), "scaffold loaded");
        Ok(Scaffold {
            side,
            files,
            manifest_template,
        })
    }

    fn github_templates(&self) -> PlugsmithResult<Vec<ScaffoldFile>> {
        self.read_tree(&self.root.join("github"))?
            .into_iter()
            .map(|(rel, content)| -> PlugsmithResult<ScaffoldFile> {
                Ok(ScaffoldFile::new(format!(".github/{rel}"), content)?)
            })
            .collect()
    }
}
