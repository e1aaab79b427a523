//! Integration tests for plugsmith-core, driven through the real adapters.

use std::fs;
use std::path::Path;

use plugsmith_adapters::{
    BuiltinScaffolds, LocalFilesystem, MemoryFilesystem, ScriptedProcessRunner,
};
use plugsmith_core::{
    application::ports::ProcessOutput,
    domain::{Manifest, PluginType, ProjectConfig, WorkspaceConfig},
    prelude::*,
};
use serde_json::json;
use tempfile::TempDir;

fn manifest_at(fs: &MemoryFilesystem, path: &str) -> Manifest {
    Manifest::parse(&fs.read_file(path).unwrap()).unwrap()
}

fn ok() -> ProcessOutput {
    ProcessOutput {
        exit_code: Some(0),
        ..ProcessOutput::default()
    }
}

/// A workspace with one plugin, `alpha`, whose install will be attributed.
fn workspace() -> MemoryFilesystem {
    MemoryFilesystem::new()
        .with_file("/ws/.plugsmith-workspace.json", r#"{"modules":["alpha"]}"#)
        .with_file(
            "/ws/package.json",
            r#"{"name":"ws","dependencies":{"react":"^18.2.0"}}"#,
        )
        .with_file("/ws/alpha/webpack.config.js", "")
        .with_file("/ws/alpha/package.json", r#"{"name":"alpha","dependencies":{}}"#)
}

#[test]
fn package_install_attributes_only_new_dependencies() {
    let fs = workspace();
    let npm_fs = fs.clone();
    let runner = ScriptedProcessRunner::new()
        .with_tool_versions("18.19.0", "9.8.1")
        .respond_with("npm", &["install", "--save"], move |_| {
            // npm adds lodash and bumps react in the workspace root
            npm_fs.insert_file(
                "/ws/package.json",
                r#"{"name":"ws","dependencies":{"react":"^18.3.0","lodash":"^4.17.21"}}"#,
            );
            ok()
        });
    let ports = Ports::new(&fs, &runner, &BuiltinScaffolds);
    let mut ctx = TaskContext::new(ports, "/ws/alpha", VersionPolicy::default());

    let report = InstallTask::new(vec!["lodash".into()], InstallOptions::default())
        .execute(&mut ctx)
        .unwrap();

    assert_eq!(report.root, Path::new("/ws"));
    assert_eq!(report.recorded.len(), 1);
    assert_eq!(
        manifest_at(&fs, "/ws/alpha/package.json").get("dependencies"),
        Some(&json!({ "lodash": "^4.17.21" }))
    );
    let commands = runner.command_lines();
    assert_eq!(commands.last().unwrap(), "npm install --save lodash");
    assert_eq!(runner.calls().last().unwrap().cwd, Path::new("/ws"));
}

#[test]
fn plugin_install_clones_refreshes_and_records() {
    let fs = workspace();
    let clone_fs = fs.clone();
    let runner = ScriptedProcessRunner::new()
        .with_tool_versions("18.19.0", "9.8.1")
        .fail("git", &["clone", "https://github.com/acme/missing.git"], 128, "not found")
        .respond_with("git", &["clone"], move |inv| {
            // simulate the checkout: a web plugin named after the repo
            let url = inv.args.last().unwrap();
            let name = url.rsplit('/').next().unwrap().trim_end_matches(".git");
            clone_fs.insert_file(format!("/ws/{name}/webpack.config.js"), "");
            clone_fs.insert_file(
                format!("/ws/{name}/package.json"),
                r#"{"dependencies":{"d3":"^7.0.0"}}"#,
            );
            ok()
        })
        .succeed("npm", &["install"], "");
    let ports = Ports::new(&fs, &runner, &BuiltinScaffolds);
    let mut ctx = TaskContext::new(ports, "/ws/alpha", VersionPolicy::default());

    let options = InstallOptions {
        plugins: true,
        ..InstallOptions::default()
    };
    let report = InstallTask::new(
        vec![
            "acme/missing".into(),
            "not a repo!".into(),
            "github:acme/beta#develop".into(),
        ],
        options,
    )
    .execute(&mut ctx)
    .unwrap();

    assert_eq!(report.unresolved, vec!["not a repo!".to_string()]);
    assert_eq!(report.clones.len(), 2);
    assert!(!report.clones[0].is_cloned());
    assert!(report.clones[1].is_cloned());

    let commands = runner.command_lines();
    assert!(
        commands.contains(&"git clone -b develop https://github.com/acme/beta.git".to_string())
    );
    assert_eq!(commands.last().unwrap(), "npm install");

    let marker =
        WorkspaceConfig::parse(&fs.read_file("/ws/.plugsmith-workspace.json").unwrap()).unwrap();
    assert_eq!(marker.modules, vec!["alpha", "beta"]);

    let root = manifest_at(&fs, "/ws/package.json");
    assert_eq!(root.dependencies().get("d3"), Some(&json!("^7.0.0")));
    assert_eq!(
        manifest_at(&fs, "/ws/alpha/package.json").get("dependencies"),
        Some(&json!({ "beta": "github:acme/beta#develop" }))
    );
}

#[test]
fn skip_install_and_ssh_are_honoured() {
    let fs = workspace();
    let runner = ScriptedProcessRunner::new()
        .with_tool_versions("18.0.0", "9.0.0")
        .succeed("git", &["clone"], "");
    let ports = Ports::new(&fs, &runner, &BuiltinScaffolds);
    let mut ctx = TaskContext::new(ports, "/ws", VersionPolicy::default());

    let options = InstallOptions {
        plugins: true,
        ssh: true,
        skip_install: true,
        target_plugin: Some("alpha".into()),
        ..InstallOptions::default()
    };
    InstallTask::new(vec!["acme/gamma".into()], options)
        .execute(&mut ctx)
        .unwrap();

    let commands = runner.command_lines();
    assert!(commands.contains(&"git clone git@github.com:acme/gamma.git".to_string()));
    assert!(!commands.iter().any(|c| c == "npm install"));
    assert!(
        fs.read_file("/ws/alpha/package.json")
            .unwrap()
            .contains("github:acme/gamma")
    );
}

#[test]
fn version_gate_runs_once_per_sequence() {
    let fs = workspace();
    let runner = ScriptedProcessRunner::new().with_tool_versions("18.19.0", "9.8.1");
    let ports = Ports::new(&fs, &runner, &BuiltinScaffolds);
    let mut ctx = TaskContext::new(ports, "/ws", VersionPolicy::default());

    Sequence::new("check")
        .then(CheckNodeVersionTask::new())
        .then(CheckNodeVersionTask::new())
        .run(&mut ctx)
        .unwrap();

    assert_eq!(runner.calls().len(), 2, "node and npm queried once each");
    assert_eq!(ctx.notices().len(), 2, "own version and gate result");
}

#[test]
fn scanner_classifies_real_directories() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    for (dir, marker) in [
        ("pluginA", "webpack.config.js"),
        ("pluginB", "requirements.txt"),
        ("pluginC", "webpack.config.js"),
        ("pluginC", "requirements.txt"),
        (".hidden", "requirements.txt"),
    ] {
        fs::create_dir_all(root.join(dir)).unwrap();
        fs::write(root.join(dir).join(marker), "").unwrap();
    }
    fs::create_dir_all(root.join("docs")).unwrap();
    fs::create_dir_all(root.join("nested/pluginD")).unwrap();
    fs::write(root.join("nested/pluginD/webpack.config.js"), "").unwrap();

    let local = LocalFilesystem::new();
    let listing = WorkspaceScanner::new(&local).scan(root).unwrap();

    assert_eq!(listing.web, vec!["pluginA", "pluginC"]);
    assert_eq!(listing.server, vec!["pluginB", "pluginC"]);
    assert_eq!(listing.all, vec!["pluginA", "pluginB", "pluginC"]);
}

#[test]
fn migration_on_disk_rewrites_project() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("my_plugin");
    fs::create_dir_all(dir.join("docs")).unwrap();
    fs::write(dir.join(".plugsmith.json"), r#"{"type":"lib-slib"}"#).unwrap();
    fs::write(
        dir.join("package.json"),
        r#"{"name":"my_plugin","version":"2.0.0","engines":{"node":">=18"},"dependencies":{"x":"1"}}"#,
    )
    .unwrap();
    fs::write(dir.join("webpack.config.js"), "").unwrap();
    fs::write(dir.join("tsconfig.json"), "{}").unwrap();
    fs::write(dir.join("setup.py"), "").unwrap();
    fs::write(dir.join("docs/conf.py"), "").unwrap();

    let local = LocalFilesystem::new();
    let runner = ScriptedProcessRunner::new();
    let mut ctx = TaskContext::new(
        Ports::new(&local, &runner, &BuiltinScaffolds),
        &dir,
        VersionPolicy::default(),
    );
    ChangeTypeTask::new(PluginType::Slib).run(&mut ctx).unwrap();

    assert!(!dir.join("webpack.config.js").exists());
    assert!(!dir.join("tsconfig.json").exists());
    assert!(dir.join("setup.py").exists());
    assert!(dir.join(".circleci/config.yml").exists());
    assert!(fs::read_to_string(dir.join(".gitignore")).unwrap().contains("__pycache__/"));

    let manifest = Manifest::parse(&fs::read_to_string(dir.join("package.json")).unwrap()).unwrap();
    assert_eq!(manifest.get("version"), Some(&json!("2.0.0")));
    assert!(!manifest.contains_key("engines"));
    assert!(!manifest.contains_key("dependencies"));
    assert!(manifest.contains_key("scripts"));

    let config = ProjectConfig::parse(&fs::read_to_string(dir.join(".plugsmith.json")).unwrap())
        .unwrap();
    assert_eq!(config.plugin_type, Some(PluginType::Slib));
    assert!(runner.calls().is_empty());
}
