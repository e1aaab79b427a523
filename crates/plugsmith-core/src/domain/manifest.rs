//! The project manifest (`package.json`).
//!
//! A [`Manifest`] is a JSON object. Every transform here takes a manifest by
//! reference and returns a new one; nothing mutates a manifest that another
//! step may still be holding.

use serde_json::{Map, Value};

use crate::domain::DomainError;

pub const MANIFEST_FILE: &str = "package.json";

pub const DEPENDENCIES: &str = "dependencies";
pub const DEV_DEPENDENCIES: &str = "devDependencies";
pub const SCRIPTS: &str = "scripts";

/// Dependency name → version specifier.
pub type DependencyMap = Map<String, Value>;

/// A project's JSON package descriptor.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Manifest(Map<String, Value>);

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a manifest; the top level must be a JSON object.
    pub fn parse(content: &str) -> Result<Self, DomainError> {
        match serde_json::from_str::<Value>(content) {
            Ok(Value::Object(map)) => Ok(Self(map)),
            Ok(other) => Err(DomainError::InvalidManifest(format!(
                "expected an object at the top level, found {}",
                json_kind(&other)
            ))),
            Err(e) => Err(DomainError::InvalidManifest(e.to_string())),
        }
    }

    /// Pretty-printed JSON with a trailing newline.
    pub fn to_pretty_string(&self) -> String {
        let mut out =
            serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| String::from("{}"));
        out.push('\n');
        out
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Copy with `key` set to `value`.
    pub fn with(&self, key: impl Into<String>, value: Value) -> Self {
        let mut next = self.0.clone();
        next.insert(key.into(), value);
        Self(next)
    }

    /// The object under `key`, empty when absent or not an object.
    pub fn object(&self, key: &str) -> Map<String, Value> {
        match self.0.get(key) {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        }
    }

    pub fn dependencies(&self) -> DependencyMap {
        self.object(DEPENDENCIES)
    }

    /// Copy with `additions` merged into `dependencies`; existing keys are
    /// overwritten by the addition.
    pub fn with_dependencies_merged(&self, additions: &DependencyMap) -> Self {
        let mut deps = self.dependencies();
        for (name, spec) in additions {
            deps.insert(name.clone(), spec.clone());
        }
        self.with(DEPENDENCIES, Value::Object(deps))
    }
}

impl From<Map<String, Value>> for Manifest {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Entries of `after` whose keys are not in `before`.
///
/// Only newly added dependencies are attributed to the plugin being
/// installed into; version bumps of pre-existing entries are not.
pub fn dependency_diff(before: &DependencyMap, after: &DependencyMap) -> DependencyMap {
    after
        .iter()
        .filter(|(name, _)| !before.contains_key(*name))
        .map(|(name, spec)| (name.clone(), spec.clone()))
        .collect()
}

/// `current` without `remove_keys`, then `overlay` assigned on top.
pub fn merge_manifest(current: &Manifest, remove_keys: &[&str], overlay: &Manifest) -> Manifest {
    let mut next: Map<String, Value> = current
        .0
        .iter()
        .filter(|(key, _)| !remove_keys.contains(&key.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    for (key, value) in &overlay.0 {
        next.insert(key.clone(), value.clone());
    }
    Manifest(next)
}

/// Deep merge: objects merge key by key, anything else in `overlay` wins.
///
/// Used when a scaffold's fragment is re-applied over a manifest that the
/// user has since edited; their extra scripts and dependencies survive.
pub fn extend_manifest(current: &Manifest, overlay: &Manifest) -> Manifest {
    let mut next = current.0.clone();
    extend_map(&mut next, &overlay.0);
    Manifest(next)
}

fn extend_map(target: &mut Map<String, Value>, overlay: &Map<String, Value>) {
    for (key, value) in overlay {
        match (target.get_mut(key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                extend_map(existing, incoming);
            }
            _ => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

/// `overlay` restricted to `keys`.
pub fn pick(overlay: &Manifest, keys: &[&str]) -> Manifest {
    Manifest(
        overlay
            .0
            .iter()
            .filter(|(key, _)| keys.contains(&key.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
    )
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
