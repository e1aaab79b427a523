//! Variable substitution for scaffold files and manifest fragments.

use std::collections::HashMap;

/// Context for template rendering.
///
/// A **Value Object** holding the variables a scaffold file may reference as
/// `{{variable}}`. Immutable after creation; transformations return new
/// instances (see [`with_variable`](Self::with_variable)).
///
/// ## Edge Cases
///
/// - `{{unknown}}` remains as literal `{{unknown}}` (no error)
/// - `{{name}}{{name}}` → both replaced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    variables: HashMap<String, String>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable, consuming self and returning a new context.
    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    /// Replace `{{key}}` placeholders with their values.
    pub fn render(&self, template: &str) -> String {
        let mut result = template.to_string();
        for (key, value) in &self.variables {
            let placeholder = format!("{{{{{key}}}}}");
            result = result.replace(&placeholder, value);
        }
        result
    }

    /// A copy whose values are escaped for use inside JSON string literals.
    ///
    /// Manifest templates are rendered with this so that a description
    /// containing quotes still yields valid JSON.
    pub fn escaped_for_json(&self) -> Self {
        let variables = self
            .variables
            .iter()
            .map(|(k, v)| (k.clone(), escape_json(v)))
            .collect();
        Self { variables }
    }
}

fn escape_json(value: &str) -> String {
    let quoted = serde_json::Value::String(value.to_string()).to_string();
    quoted[1..quoted.len() - 1].to_string()
}
