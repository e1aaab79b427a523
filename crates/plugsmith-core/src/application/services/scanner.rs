//! Plugin directory scanner.

use std::path::Path;

use tracing::{debug, instrument};

use crate::{
    application::ports::Filesystem,
    domain::{PluginClassification, PluginListing, SERVER_MARKER, WEB_MARKER},
    error::PlugsmithResult,
};

/// Classifies the immediate children of a workspace root.
#[derive(Clone, Copy)]
pub struct WorkspaceScanner<'a> {
    fs: &'a dyn Filesystem,
}

impl<'a> WorkspaceScanner<'a> {
    pub fn new(fs: &'a dyn Filesystem) -> Self {
        Self { fs }
    }

    pub fn classify(&self, dir: &Path) -> PluginClassification {
        PluginClassification {
            web: self.fs.exists(&dir.join(WEB_MARKER)),
            server: self.fs.exists(&dir.join(SERVER_MARKER)),
        }
    }

    /// Scan one level below `root`. Deeper nesting is never inspected and
    /// dot-directories are never plugins, marker or not.
    #[instrument(skip(self), fields(root = %root.display()))]
    pub fn scan(&self, root: &Path) -> PlugsmithResult<PluginListing> {
        let entries = self
            .fs
            .list_dirs(root)?
            .into_iter()
            .filter(|name| !name.starts_with('.'))
            .map(|name| {
                let class = self.classify(&root.join(&name));
                (name, class)
            });
        let listing = PluginListing::from_classified(entries);
        debug!(
            web = listing.web.len(),
            server = listing.server.len(),
            "workspace scanned"
        );
        Ok(listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::tasks::testing::MemFs;

    #[test]
    fn hidden_directories_are_not_plugins() {
        let fs = MemFs::default()
            .with_file("/ws/alpha/webpack.config.js", "")
            .with_file("/ws/.cache/webpack.config.js", "")
            .with_file("/ws/.venv/requirements.txt", "");

        let listing = WorkspaceScanner::new(&fs).scan(Path::new("/ws")).unwrap();

        assert_eq!(listing.web, vec!["alpha"]);
        assert!(listing.server.is_empty());
        assert_eq!(listing.all, vec!["alpha"]);
    }

    #[test]
    fn directories_without_markers_are_dropped() {
        let fs = MemFs::default()
            .with_file("/ws/docs/readme.md", "")
            .with_file("/ws/beta/requirements.txt", "");

        let listing = WorkspaceScanner::new(&fs).scan(Path::new("/ws")).unwrap();

        assert!(listing.web.is_empty());
        assert_eq!(listing.server, vec!["beta"]);
    }
}
