//! Scaffolds compiled into the binary.

use plugsmith_core::{
    application::ports::ScaffoldStore,
    domain::{PluginSide, Scaffold, ScaffoldFile},
    error::PlugsmithResult,
};

const WEB_GITIGNORE: &str = include_str!("../../scaffolds/web/gitignore");
const WEB_CIRCLECI: &str = include_str!("../../scaffolds/web/circleci.yml");
const WEB_MANIFEST: &str = include_str!("../../scaffolds/web/package.json");

const SERVER_GITIGNORE: &str = include_str!("../../scaffolds/server/gitignore");
const SERVER_CIRCLECI: &str = include_str!("../../scaffolds/server/circleci.yml");
const SERVER_MANIFEST: &str = include_str!("../../scaffolds/server/package.json");

const GITHUB_TEMPLATES: &[(&str, &str)] = &[
    (
        ".github/ISSUE_TEMPLATE/bug_report.md",
        include_str!("../../scaffolds/github/ISSUE_TEMPLATE/bug_report.md"),
    ),
    (
        ".github/ISSUE_TEMPLATE/feature_request.md",
        include_str!("../../scaffolds/github/ISSUE_TEMPLATE/feature_request.md"),
    ),
    (
        ".github/PULL_REQUEST_TEMPLATE.md",
        include_str!("../../scaffolds/github/PULL_REQUEST_TEMPLATE.md"),
    ),
];

/// The scaffolds that ship with plugsmith.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinScaffolds;

impl BuiltinScaffolds {
    pub fn new() -> Self {
        Self
    }
}

impl ScaffoldStore for BuiltinScaffolds {
    fn scaffold(&self, side: PluginSide) -> PlugsmithResult<Scaffold> {
        let (gitignore, circleci, manifest) = match side {
            PluginSide::Web => (WEB_GITIGNORE, WEB_CIRCLECI, WEB_MANIFEST),
            PluginSide::Server => (SERVER_GITIGNORE, SERVER_CIRCLECI, SERVER_MANIFEST),
        };
        Ok(Scaffold {
            side,
            files: vec![
                ScaffoldFile::new(".gitignore", gitignore)?,
                ScaffoldFile::new(".circleci/config.yml", circleci)?,
            ],
            manifest_template: manifest.to_string(),
        })
    }

    fn github_templates(&self) -> PlugsmithResult<Vec<ScaffoldFile>> {
        GITHUB_TEMPLATES
            .iter()
            .map(|(path, content)| -> PlugsmithResult<ScaffoldFile> {
                Ok(ScaffoldFile::new(*path, *content)?)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plugsmith_core::domain::RenderContext;

    #[test]
    fn manifest_templates_render_to_valid_json() {
        let ctx = RenderContext::new()
            .with_variable("name", "my_plugin")
            .with_variable("description", "says \"hi\"");
        for side in [PluginSide::Web, PluginSide::Server] {
            let scaffold = BuiltinScaffolds::new().scaffold(side).unwrap();
            let manifest = scaffold.render_manifest(&ctx).unwrap();
            assert!(manifest.contains_key("scripts"), "{side}");
            assert!(manifest.contains_key("files"), "{side}");
        }
    }

    #[test]
    fn web_fragment_carries_engines_server_does_not() {
        let ctx = RenderContext::new().with_variable("name", "p");
        let web = BuiltinScaffolds::new().scaffold(PluginSide::Web).unwrap();
        let server = BuiltinScaffolds::new().scaffold(PluginSide::Server).unwrap();
        assert!(web.render_manifest(&ctx).unwrap().contains_key("engines"));
        assert!(!server.render_manifest(&ctx).unwrap().contains_key("engines"));
    }

    #[test]
    fn circleci_keeps_cache_checksums() {
        let ctx = RenderContext::new().with_variable("name", "p");
        let web = BuiltinScaffolds::new().scaffold(PluginSide::Web).unwrap();
        let ci = web
            .render_files(&ctx)
            .into_iter()
            .find(|f| f.path() == ".circleci/config.yml")
            .unwrap();
        assert!(ci.content.contains("working_directory: ~/p"));
        assert!(ci.content.contains(r#"{{ checksum "package.json" }}"#));
    }

    #[test]
    fn github_templates_live_under_dot_github() {
        let files = BuiltinScaffolds::new().github_templates().unwrap();
        assert_eq!(files.len(), 3);
        assert!(files.iter().all(|f| f.path().starts_with(".github/")));
    }
}
