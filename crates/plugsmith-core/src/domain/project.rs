//! Persisted project and workspace configuration.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{DomainError, PluginType, RenderContext};

/// Per-project configuration file.
pub const PROJECT_CONFIG_FILE: &str = ".plugsmith.json";

/// Marks a directory as a multi-plugin workspace root.
pub const WORKSPACE_MARKER: &str = ".plugsmith-workspace.json";

/// Contents of [`PROJECT_CONFIG_FILE`].
///
/// Keys other than `name` and `type` are kept verbatim and exposed to
/// scaffold templates as variables.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub plugin_type: Option<PluginType>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProjectConfig {
    pub fn parse(content: &str) -> Result<Self, DomainError> {
        serde_json::from_str(content).map_err(|e| DomainError::InvalidProjectConfig(e.to_string()))
    }

    pub fn to_pretty_string(&self) -> String {
        let mut out = serde_json::to_string_pretty(self).unwrap_or_else(|_| String::from("{}"));
        out.push('\n');
        out
    }

    pub fn with_type(&self, plugin_type: PluginType) -> Self {
        Self {
            plugin_type: Some(plugin_type),
            ..self.clone()
        }
    }

    /// Template variables: every scalar key, plus `name` (falling back to
    /// the directory name) and `type`.
    pub fn render_context(&self, directory_name: &str) -> RenderContext {
        let mut ctx = RenderContext::new();
        for (key, value) in &self.extra {
            let rendered = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => continue,
            };
            ctx = ctx.with_variable(key.clone(), rendered);
        }
        let name = self.name.as_deref().unwrap_or(directory_name);
        ctx = ctx.with_variable("name", name);
        if ctx.get("description").is_none() {
            ctx = ctx.with_variable("description", "");
        }
        if let Some(t) = self.plugin_type {
            ctx = ctx.with_variable("type", t.as_str());
        }
        ctx
    }
}

/// Contents of [`WORKSPACE_MARKER`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    #[serde(default)]
    pub modules: Vec<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WorkspaceConfig {
    /// Parse the marker; an empty file is an empty configuration.
    pub fn parse(content: &str) -> Result<Self, DomainError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(content).map_err(|e| DomainError::InvalidProjectConfig(e.to_string()))
    }

    pub fn to_pretty_string(&self) -> String {
        let mut out = serde_json::to_string_pretty(self).unwrap_or_else(|_| String::from("{}"));
        out.push('\n');
        out
    }
}
