//! Invariant scaffold files shipped for each plugin side.

use std::path::{Component, Path};

use crate::domain::{DomainError, Manifest, PluginSide, RenderContext};

/// A file copied into a project, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldFile {
    path: String,
    pub content: String,
}

impl ScaffoldFile {
    /// Fails for absolute paths or paths escaping the project root.
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Result<Self, DomainError> {
        let path = path.into();
        let p = Path::new(&path);
        if p.is_absolute()
            || p
                .components()
                .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            return Err(DomainError::AbsolutePathNotAllowed { path });
        }
        Ok(Self {
            path,
            content: content.into(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn rendered(&self, ctx: &RenderContext) -> Self {
        Self {
            path: self.path.clone(),
            content: ctx.render(&self.content),
        }
    }
}

/// Everything a side contributes to a project: scaffold files plus the
/// manifest fragment template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scaffold {
    pub side: PluginSide,
    pub files: Vec<ScaffoldFile>,
    pub manifest_template: String,
}

impl Scaffold {
    /// Render the manifest template with JSON-escaped variables and parse it.
    pub fn render_manifest(&self, ctx: &RenderContext) -> Result<Manifest, DomainError> {
        Manifest::parse(&ctx.escaped_for_json().render(&self.manifest_template))
    }

    pub fn render_files(&self, ctx: &RenderContext) -> Vec<ScaffoldFile> {
        self.files.iter().map(|f| f.rendered(ctx)).collect()
    }
}
