//! Classification of workspace directories by marker file.

use std::collections::BTreeSet;

use serde::Serialize;

/// A directory containing this file is a web plugin.
pub const WEB_MARKER: &str = "webpack.config.js";

/// A directory containing this file is a server plugin.
pub const SERVER_MARKER: &str = "requirements.txt";

/// Marker flags found in one directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PluginClassification {
    pub web: bool,
    pub server: bool,
}

impl PluginClassification {
    pub fn is_plugin(&self) -> bool {
        self.web || self.server
    }
}

/// Result of scanning a workspace: sorted plugin directory names.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PluginListing {
    pub web: Vec<String>,
    pub server: Vec<String>,
    pub all: Vec<String>,
}

impl PluginListing {
    /// Build a listing from `(directory name, classification)` pairs.
    ///
    /// Output lists are sorted ascending and free of duplicates; directories
    /// with neither marker are dropped.
    pub fn from_classified<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, PluginClassification)>,
        S: Into<String>,
    {
        let mut web = BTreeSet::new();
        let mut server = BTreeSet::new();
        for (name, class) in entries {
            let name = name.into();
            if class.web {
                web.insert(name.clone());
            }
            if class.server {
                server.insert(name);
            }
        }
        let all = web.union(&server).cloned().collect();
        Self {
            web: web.into_iter().collect(),
            server: server.into_iter().collect(),
            all,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.all.iter().any(|p| p == name)
    }
}
