//! Tool versions and the comparison the version gate is built on.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::domain::DomainError;

/// A dotted numeric version such as `18`, `18.3` or `v20.11.1`.
///
/// Pre-release and build suffixes are ignored for comparison but kept for
/// display.
#[derive(Debug, Clone)]
pub struct ToolVersion {
    raw: String,
    parts: Vec<u64>,
}

impl ToolVersion {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        let body = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);
        let core = body.split(['-', '+', ' ']).next().unwrap_or_default();

        let parts = core
            .split('.')
            .map(|p| p.parse::<u64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| DomainError::InvalidVersion(raw.trim().to_string()))?;

        Ok(Self {
            raw: trimmed.to_string(),
            parts,
        })
    }

    /// Build a version from numeric components, e.g. `&[18, 3]` → `18.3`.
    pub fn from_parts(parts: &[u64]) -> Self {
        let raw = parts
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(".");
        Self {
            raw,
            parts: parts.to_vec(),
        }
    }

    /// `true` when every component the requirement names is equal, so `18`
    /// accepts any `18.x.y`.
    pub fn satisfies(&self, required: &ToolVersion) -> bool {
        required
            .parts
            .iter()
            .enumerate()
            .all(|(i, p)| self.part(i) == *p)
    }

    fn part(&self, i: usize) -> u64 {
        self.parts.get(i).copied().unwrap_or(0)
    }
}

impl PartialEq for ToolVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ToolVersion {}

impl PartialOrd for ToolVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ToolVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.parts.len().max(other.parts.len());
        (0..len)
            .map(|i| self.part(i).cmp(&other.part(i)))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl FromStr for ToolVersion {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ToolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Node.js and npm versions, installed or required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolVersions {
    pub node: ToolVersion,
    pub npm: ToolVersion,
}

impl ToolVersions {
    pub fn new(node: ToolVersion, npm: ToolVersion) -> Self {
        Self { node, npm }
    }

    pub fn parse(node: &str, npm: &str) -> Result<Self, DomainError> {
        Ok(Self::new(node.parse()?, npm.parse()?))
    }
}

/// Snapshot comparison of installed against required tool versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRequirement {
    pub installed: ToolVersions,
    pub required: ToolVersions,
    pub is_satisfied: bool,
}

impl VersionRequirement {
    pub fn new(installed: ToolVersions, required: ToolVersions, is_satisfied: bool) -> Self {
        Self {
            installed,
            required,
            is_satisfied,
        }
    }

    /// Compute `is_satisfied` from the versions themselves.
    pub fn evaluate(installed: ToolVersions, required: ToolVersions) -> Self {
        let is_satisfied = installed.node.satisfies(&required.node)
            && installed.npm.satisfies(&required.npm);
        Self::new(installed, required, is_satisfied)
    }

    /// Decide what the gate does with this requirement.
    ///
    /// Newer-than-required installs are tolerated with a warning; anything
    /// at or below the required node version is fatal.
    pub fn verdict(&self) -> Result<GateVerdict, DomainError> {
        if self.is_satisfied {
            return Ok(GateVerdict::Satisfied(self.summary()));
        }
        if self.installed.node > self.required.node {
            return Ok(GateVerdict::Warning(format!("Warnings: {}", self.summary())));
        }
        Err(DomainError::VersionMismatch {
            message: format!(
                "{}\nTo update:\n1. Install Node.js Version Manager (NVM): \
                 https://github.com/nvm-sh/nvm#install--update-script\n\
                 2. Install Node.js {} via NVM: nvm install {}",
                self.summary(),
                self.required.node,
                self.required.node
            ),
        })
    }

    fn summary(&self) -> String {
        format!(
            "Your Node.js version is {} (npm: {}). Required Node.js version is {} (npm: {}).",
            self.installed.node, self.installed.npm, self.required.node, self.required.npm
        )
    }
}

/// Non-fatal gate result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateVerdict {
    Satisfied(String),
    Warning(String),
}

impl GateVerdict {
    pub fn message(&self) -> &str {
        match self {
            Self::Satisfied(m) | Self::Warning(m) => m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn versions(node: &str, npm: &str) -> ToolVersions {
        ToolVersions::parse(node, npm).unwrap()
    }

    #[test]
    fn parses_common_forms() {
        assert_eq!(ToolVersion::parse("v18.3.0").unwrap().to_string(), "v18.3.0");
        assert_eq!(
            ToolVersion::parse("20.11.1\n").unwrap(),
            ToolVersion::parse("20.11.1").unwrap()
        );
        assert_eq!(
            ToolVersion::parse("9.8.1-rc.1").unwrap(),
            ToolVersion::parse("9.8.1").unwrap()
        );
        assert!(ToolVersion::parse("lts/*").is_err());
        assert!(ToolVersion::parse("").is_err());
    }

    #[test]
    fn ordering_pads_missing_components() {
        let a: ToolVersion = "18".parse().unwrap();
        let b: ToolVersion = "18.0.0".parse().unwrap();
        let c: ToolVersion = "18.3".parse().unwrap();
        assert_eq!(a, b);
        assert!(c > a);
    }

    #[test]
    fn prefix_satisfaction() {
        let req: ToolVersion = "18".parse().unwrap();
        assert!(ToolVersion::parse("18.19.1").unwrap().satisfies(&req));
        assert!(!ToolVersion::parse("20.1.0").unwrap().satisfies(&req));
        let exact: ToolVersion = "18.3".parse().unwrap();
        assert!(!ToolVersion::parse("18.4.0").unwrap().satisfies(&exact));
    }

    #[test]
    fn evaluate_requires_both_tools() {
        let r = VersionRequirement::evaluate(versions("18.1.0", "10.0.0"), versions("18", "9"));
        assert!(!r.is_satisfied);
        let r = VersionRequirement::evaluate(versions("18.1.0", "9.6.7"), versions("18", "9"));
        assert!(r.is_satisfied);
    }

    #[test]
    fn satisfied_verdict_mentions_both_versions() {
        let r = VersionRequirement::new(versions("2", "2"), versions("2", "2"), true);
        let v = r.verdict().unwrap();
        assert!(matches!(v, GateVerdict::Satisfied(_)));
        assert!(v.message().contains("Your Node.js version is 2 (npm: 2)"));
    }

    #[test]
    fn older_install_is_fatal() {
        let r = VersionRequirement::new(versions("1", "1"), versions("2", "2"), false);
        let err = r.verdict().unwrap_err();
        let DomainError::VersionMismatch { message } = err else {
            panic!("expected version mismatch");
        };
        assert!(message.contains("Your Node.js version is 1 (npm: 1)"));
        assert!(message.contains("Required Node.js version is 2 (npm: 2)"));
        assert!(message.contains("nvm install 2"));
    }

    #[test]
    fn equal_but_unsatisfied_is_fatal() {
        let r = VersionRequirement::new(versions("2", "1"), versions("2", "2"), false);
        assert!(r.verdict().is_err());
    }

    #[test]
    fn newer_install_only_warns() {
        let r = VersionRequirement::new(versions("3", "3"), versions("2", "2"), false);
        let v = r.verdict().unwrap();
        assert!(matches!(v, GateVerdict::Warning(_)));
        assert!(v.message().contains("Your Node.js version is 3 (npm: 3)"));
    }
}
