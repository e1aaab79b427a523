//! Plugin identifiers and the references resolved from them.
//!
//! A plugin identifier is what a user types on the command line:
//!
//! ```text
//! [github:][owner/]repo[#ref]
//! ```
//!
//! [`RepoIdentifier::parse`] turns that into a typed value (or a
//! [`ParseIdentifierError`]), and [`PluginReference::resolve`] turns the typed
//! value into everything the installer needs: the name the plugin is recorded
//! under, the dependency specifier written to the manifest, and the clone
//! arguments.

use std::fmt;
use std::str::FromStr;

const GITHUB_PREFIX: &str = "github:";
const GIT_SUFFIX: &str = ".git";

/// A parsed `[owner/]repo[#ref]` identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoIdentifier {
    pub owner: Option<String>,
    pub repo: String,
    pub reference: Option<String>,
}

/// Why an identifier could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseIdentifierError {
    Empty,
    TooManySegments(usize),
    InvalidSegment(String),
    EmptyReference,
}

impl fmt::Display for ParseIdentifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "identifier is empty"),
            Self::TooManySegments(n) => {
                write!(f, "expected [owner/]repo but found {n} path segments")
            }
            Self::InvalidSegment(s) => write!(f, "'{s}' is not a valid owner or repository name"),
            Self::EmptyReference => write!(f, "'#' must be followed by a branch, tag or commit"),
        }
    }
}

impl std::error::Error for ParseIdentifierError {}

impl RepoIdentifier {
    /// Parse a raw identifier.
    pub fn parse(raw: &str) -> Result<Self, ParseIdentifierError> {
        let raw = raw.trim();
        let body = raw.strip_prefix(GITHUB_PREFIX).unwrap_or(raw);
        if body.is_empty() {
            return Err(ParseIdentifierError::Empty);
        }

        let (path, reference) = match body.split_once('#') {
            Some((path, reference)) => {
                if reference.is_empty() || reference.chars().any(char::is_whitespace) {
                    return Err(ParseIdentifierError::EmptyReference);
                }
                (path, Some(reference.to_string()))
            }
            None => (body, None),
        };

        let segments: Vec<&str> = path.split('/').collect();
        let (owner, repo) = match segments.as_slice() {
            [repo] => (None, *repo),
            [owner, repo] => (Some(*owner), *repo),
            _ => return Err(ParseIdentifierError::TooManySegments(segments.len())),
        };

        let repo = repo.strip_suffix(GIT_SUFFIX).unwrap_or(repo);
        for segment in owner.iter().chain(std::iter::once(&repo)) {
            if !is_name(segment) {
                return Err(ParseIdentifierError::InvalidSegment((*segment).to_string()));
            }
        }

        Ok(Self {
            owner: owner.map(str::to_string),
            repo: repo.to_string(),
            reference,
        })
    }

    /// `owner/repo` or just `repo`.
    pub fn path(&self) -> String {
        match &self.owner {
            Some(owner) => format!("{owner}/{}", self.repo),
            None => self.repo.clone(),
        }
    }

    /// Clone URL for this repository.
    pub fn clone_url(&self, ssh: bool) -> String {
        if ssh {
            format!("git@github.com:{}.git", self.path())
        } else {
            format!("https://github.com/{}.git", self.path())
        }
    }

    /// Dependency specifier as recorded in a manifest.
    pub fn specifier(&self) -> String {
        match &self.reference {
            Some(r) => format!("{GITHUB_PREFIX}{}#{r}", self.path()),
            None => format!("{GITHUB_PREFIX}{}", self.path()),
        }
    }
}

impl FromStr for RepoIdentifier {
    type Err = ParseIdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn is_name(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Where and how to clone a resolved plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CloneSource {
    url: String,
    branch: Option<String>,
}

/// A plugin identifier resolved for installation.
///
/// Invariant: [`repo`](Self::repo) is empty exactly when the identifier could
/// not be parsed. Callers must skip such references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginReference {
    name: String,
    url: String,
    source: Option<CloneSource>,
}

impl PluginReference {
    /// Resolve a raw identifier, preferring SSH clone URLs when `ssh` is set.
    pub fn resolve(raw: &str, ssh: bool) -> Self {
        match RepoIdentifier::parse(raw) {
            Ok(id) => Self::from_identifier(&id, ssh),
            Err(_) => Self::unresolved(raw),
        }
    }

    pub fn from_identifier(id: &RepoIdentifier, ssh: bool) -> Self {
        Self {
            name: id.repo.clone(),
            url: id.specifier(),
            source: Some(CloneSource {
                url: id.clone_url(ssh),
                branch: id.reference.clone(),
            }),
        }
    }

    fn unresolved(raw: &str) -> Self {
        Self {
            name: raw.to_string(),
            url: String::new(),
            source: None,
        }
    }

    /// Plugin (directory) name, or the raw input when unresolvable.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dependency specifier, e.g. `github:owner/repo#develop`.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Clone argument string: `-b <ref> <url>`, `<url>`, or empty.
    pub fn repo(&self) -> String {
        self.clone_args()
            .map(|args| args[1..].join(" "))
            .unwrap_or_default()
    }

    pub fn is_resolved(&self) -> bool {
        self.source.is_some()
    }

    /// Branch selector, if the identifier carried one.
    pub fn branch(&self) -> Option<&str> {
        self.source.as_ref().and_then(|s| s.branch.as_deref())
    }

    /// Full `git` argument vector, `None` when unresolvable.
    pub fn clone_args(&self) -> Option<Vec<String>> {
        let source = self.source.as_ref()?;
        let mut args = vec!["clone".to_string()];
        if let Some(branch) = &source.branch {
            args.push("-b".into());
            args.push(branch.clone());
        }
        args.push(source.url.clone());
        Some(args)
    }
}

impl fmt::Display for PluginReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_resolved() {
            write!(f, "{} ({})", self.name, self.url)
        } else {
            write!(f, "{} (unresolved)", self.name)
        }
    }
}
