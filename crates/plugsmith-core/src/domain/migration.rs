//! Plugin type transitions.
//!
//! Only two transitions exist: dropping the server side (`to lib`) and
//! dropping the web side (`to slib`). A target that merely adds a side to the
//! current type is an upgrade, which is not implemented and resolves to
//! [`MigrationPlan::Skip`].

use crate::domain::{DomainError, Manifest, PluginSide, PluginType, manifest};

/// Files belonging to the server side, removed when migrating to `lib`.
pub const SERVER_SIDE_FILES: &[&str] = &[
    "buildPython.js",
    "deploy/docker-compose.partial.yml",
    "docker_packages.txt",
    "docs/.gitignore",
    "docs/_static/touch.txt",
    "docs/_templates/touch.txt",
    "docs/conf.py",
    "docs/index.rst",
    "requirements.txt",
    "requirements_dev.txt",
    "setup.cfg",
    "setup.py",
    "test/__init__.py",
    "test/config.json",
    "tox.ini",
];

/// Files belonging to the web side, removed when migrating to `slib`.
pub const WEB_SIDE_FILES: &[&str] = &[
    "buildInfo.js",
    "index.js",
    "jest.config.js",
    "phovea_registry.js",
    "src/index.ts",
    "src/phovea.ts",
    "tests.webpack.js",
    "tests/index.test.ts",
    "tsconfig.json",
    "tsconfig_dev.json",
    "tsd.d.ts",
    "tslint.json",
    "typedoc.json",
    "webpack.config.js",
];

/// How the target side's manifest fragment is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestPatch {
    /// Take only these keys from the fragment; keys missing there are removed.
    ReplaceKeys(&'static [&'static str]),
    /// Remove these keys, then assign the whole fragment on top.
    RemoveThenOverlay(&'static [&'static str]),
}

impl ManifestPatch {
    pub fn apply(&self, current: &Manifest, fragment: &Manifest) -> Manifest {
        match self {
            Self::ReplaceKeys(keys) => {
                let picked = manifest::pick(fragment, keys);
                let missing: Vec<&str> = keys
                    .iter()
                    .copied()
                    .filter(|k| !picked.contains_key(k))
                    .collect();
                manifest::merge_manifest(current, &missing, &picked)
            }
            Self::RemoveThenOverlay(keys) => manifest::merge_manifest(current, keys, fragment),
        }
    }
}

/// A concrete transition to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPlan {
    pub from: Option<PluginType>,
    pub to: PluginType,
    pub delete: &'static [&'static str],
    pub scaffold_side: PluginSide,
    pub manifest_patch: ManifestPatch,
}

/// What a type change amounts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationPlan {
    Apply(TransitionPlan),
    Skip { reason: String },
}

impl MigrationPlan {
    /// Plan the move from `from` (unknown when unset) to `to`.
    pub fn plan(from: Option<PluginType>, to: PluginType) -> Result<Self, DomainError> {
        if from == Some(to) {
            return Ok(Self::Skip {
                reason: format!("project is already of type '{to}'"),
            });
        }

        match to {
            PluginType::Lib => Ok(Self::Apply(TransitionPlan {
                from,
                to,
                delete: SERVER_SIDE_FILES,
                scaffold_side: PluginSide::Web,
                manifest_patch: ManifestPatch::ReplaceKeys(&["scripts", "files"]),
            })),
            PluginType::Slib => Ok(Self::Apply(TransitionPlan {
                from,
                to,
                delete: WEB_SIDE_FILES,
                scaffold_side: PluginSide::Server,
                manifest_patch: ManifestPatch::RemoveThenOverlay(&[
                    "engines",
                    "dependencies",
                    "devDependencies",
                ]),
            })),
            _ => match from {
                Some(f) if is_upgrade(f, to) => Ok(Self::Skip {
                    reason: format!("upgrading from '{f}' to '{to}' is not implemented"),
                }),
                _ => Err(DomainError::UnsupportedTransition {
                    from: from.map_or_else(|| "unknown".to_string(), |f| f.to_string()),
                    to: to.to_string(),
                }),
            },
        }
    }
}

/// `to` keeps every side of `from` and adds at least one.
fn is_upgrade(from: PluginType, to: PluginType) -> bool {
    let target = to.sides();
    let source = from.sides();
    source.iter().all(|s| target.contains(s)) && target.len() > source.len()
}
