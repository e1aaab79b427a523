//! Workspace refresh: plugin module list and the web plugins' manifests
//! folded into the workspace manifest.

use std::collections::HashMap;
use std::path::PathBuf;

use serde_json::{Map, Value};
use tracing::{info, instrument, warn};

use crate::{
    application::tasks::{Task, TaskContext, TaskOutcome},
    domain::{
        DependencyMap, Manifest, PluginListing,
        manifest::{DEPENDENCIES, DEV_DEPENDENCIES, SCRIPTS},
    },
    error::PlugsmithResult,
};

/// Rewrites the workspace marker's `modules` from the plugins currently on
/// disk and merges the web plugins' `dependencies`, `devDependencies` and
/// scripts into the workspace manifest.
#[derive(Debug, Default, Clone)]
pub struct WorkspaceRefreshTask {
    root: Option<PathBuf>,
}

impl WorkspaceRefreshTask {
    /// Refresh the workspace the command was started in.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }
}

impl Task for WorkspaceRefreshTask {
    fn name(&self) -> &str {
        "workspace"
    }

    #[instrument(skip_all, name = "workspace_refresh")]
    fn run(&self, ctx: &mut TaskContext<'_>) -> PlugsmithResult<TaskOutcome> {
        let root = self
            .root
            .clone()
            .unwrap_or_else(|| ctx.cwd().to_path_buf());
        let files = ctx.files();
        let listing = ctx.scanner().scan(&root)?;

        let mut marker = files.read_workspace(&root)?;
        marker.modules = listing.all.clone();
        files.write_workspace(&root, &marker)?;

        let mut manifests = Vec::with_capacity(listing.web.len());
        for plugin in &listing.web {
            let dir = root.join(plugin);
            if files.has_manifest(&dir) {
                manifests.push((plugin.clone(), files.read_manifest(&dir)?));
            }
        }
        let web = WebContributions::collect(&manifests, &listing);
        for message in web.overrides {
            ctx.warn(message);
        }

        let manifest = files.read_manifest_or_default(&root)?;
        let mut deps = manifest.dependencies();
        deps.retain(|name, _| !listing.contains(name));
        deps.extend(web.dependencies.entries);

        let mut manifest = if manifest.as_map().is_empty() {
            let name = root
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "workspace".into());
            manifest
                .with("name", Value::String(name))
                .with("private", Value::Bool(true))
        } else {
            manifest
        };
        manifest = manifest.with(DEPENDENCIES, Value::Object(deps));
        if !web.dev_dependencies.entries.is_empty() {
            let mut dev = manifest.object(DEV_DEPENDENCIES);
            dev.extend(web.dev_dependencies.entries);
            manifest = manifest.with(DEV_DEPENDENCIES, Value::Object(dev));
        }
        if !web.scripts.is_empty() {
            let mut scripts = manifest.object(SCRIPTS);
            scripts.extend(web.scripts);
            manifest = manifest.with(SCRIPTS, Value::Object(scripts));
        }
        files.write_manifest(&root, &manifest)?;

        info!(plugins = listing.all.len(), "workspace refreshed");
        ctx.info(format!(
            "Workspace refreshed: {} plugin(s) {}",
            listing.all.len(),
            if listing.is_empty() {
                String::new()
            } else {
                format!("[{}]", listing.all.join(", "))
            }
        ));
        Ok(TaskOutcome::Done)
    }
}

/// One dependency section merged across plugins, remembering which plugin
/// supplied each entry.
#[derive(Debug, Default)]
struct MergedSection {
    entries: DependencyMap,
    owners: HashMap<String, String>,
}

impl MergedSection {
    /// Later plugins replace earlier specifiers; every replacement of a
    /// different specifier is returned as a message.
    fn absorb(&mut self, section: &str, plugin: &str, incoming: DependencyMap) -> Vec<String> {
        let mut overrides = Vec::new();
        for (name, spec) in incoming {
            if let Some(previous) = self.entries.get(&name).filter(|prev| **prev != spec) {
                let owner = self.owners.get(&name).map(String::as_str).unwrap_or_default();
                warn!(%section, dependency = %name, replaced = %previous, by = %spec, "conflict");
                overrides.push(format!(
                    "{section}.{name}: {spec} from {plugin} replaces {previous} from {owner}"
                ));
            }
            self.owners.insert(name.clone(), plugin.to_owned());
            self.entries.insert(name, spec);
        }
        overrides
    }
}

/// What the web plugins hand up to the workspace manifest.
#[derive(Debug, Default)]
struct WebContributions {
    dependencies: MergedSection,
    dev_dependencies: MergedSection,
    /// `<script>:<plugin>` → `cd <plugin> && npm run <script>`.
    scripts: Map<String, Value>,
    overrides: Vec<String>,
}

impl WebContributions {
    /// Fold plugin manifests in the order given. Workspace plugins never
    /// land in `dependencies`; `pre*` and `post*` scripts get no scoped
    /// entry since npm runs them around their main script.
    fn collect(manifests: &[(String, Manifest)], listing: &PluginListing) -> Self {
        let mut out = Self::default();
        for (plugin, manifest) in manifests {
            let mut deps = manifest.dependencies();
            deps.retain(|name, _| !listing.contains(name));
            let overrides = out.dependencies.absorb(DEPENDENCIES, plugin, deps);
            out.overrides.extend(overrides);

            let dev = manifest.object(DEV_DEPENDENCIES);
            let overrides = out.dev_dependencies.absorb(DEV_DEPENDENCIES, plugin, dev);
            out.overrides.extend(overrides);

            for script in manifest.object(SCRIPTS).keys() {
                if script.starts_with("pre") || script.starts_with("post") {
                    continue;
                }
                out.scripts.insert(
                    format!("{script}:{plugin}"),
                    Value::String(format!("cd {plugin} && npm run {script}")),
                );
            }
        }
        out
    }
}
