//! Command-line runs against temporary directories

use clap::Parser;
use nodeforge_cli::{read_file_set, run, Cli, Status};
use nodeforge_test_utils::ORDER_FLOW_YAML;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn cli(args: &[&str]) -> Cli {
    Cli::parse_from(std::iter::once("nodeforge").chain(args.iter().copied()))
}

fn path(p: &Path) -> &str {
    p.to_str().unwrap()
}

/// Temp dir with `spec.yaml` holding the order-flow scenario
fn workspace() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("spec.yaml"), ORDER_FLOW_YAML).unwrap();
    dir
}

#[test]
fn generate_writes_a_project_that_validates() {
    let dir = workspace();
    let spec = dir.path().join("spec.yaml");
    let out = dir.path().join("order-flow");

    let status = run(cli(&["generate", path(&spec), "--out", path(&out)])).unwrap();
    assert_eq!(status, Status::Success);
    assert!(out.join("flow.py").is_file());
    assert!(out.join("tests").join("test_nodes.py").is_file());
    assert_eq!(read_file_set(&out).unwrap().len(), 13);

    let status = run(cli(&["validate", path(&out)])).unwrap();
    assert_eq!(status, Status::Success);
}

#[test]
fn second_generate_needs_force() {
    let dir = workspace();
    let spec = dir.path().join("spec.yaml");
    let out = dir.path().join("out");

    run(cli(&["generate", path(&spec), "--out", path(&out)])).unwrap();
    let err = run(cli(&["generate", path(&spec), "--out", path(&out)])).unwrap_err();
    assert!(err.to_string().contains("--force"));

    let status = run(cli(&["generate", path(&spec), "--out", path(&out), "--force"])).unwrap();
    assert_eq!(status, Status::Success);
}

#[test]
fn validate_fails_on_vendor_import() {
    let dir = workspace();
    let spec = dir.path().join("spec.yaml");
    let out = dir.path().join("out");
    run(cli(&["generate", path(&spec), "--out", path(&out)])).unwrap();

    let utils = out.join("utils.py");
    let text = fs::read_to_string(&utils).unwrap();
    fs::write(&utils, format!("import boto3\n{text}")).unwrap();

    let status = run(cli(&["validate", path(&out), "--json"])).unwrap();
    assert_eq!(status, Status::ValidationFailed);
}

#[test]
fn config_file_reaches_the_manifest() {
    let dir = workspace();
    let spec = dir.path().join("spec.yaml");
    let config = dir.path().join("nodeforge.toml");
    let out = dir.path().join("out");
    fs::write(&config, "project_version = \"2.0.0\"\npython_requires = \">=3.11\"\n").unwrap();

    run(cli(&["--config", path(&config), "generate", path(&spec), "--out", path(&out)])).unwrap();

    let pyproject: toml::Table = fs::read_to_string(out.join("pyproject.toml")).unwrap().parse().unwrap();
    assert_eq!(pyproject["project"]["version"].as_str(), Some("2.0.0"));
    assert_eq!(pyproject["project"]["requires-python"].as_str(), Some(">=3.11"));
}

#[test]
fn unknown_config_key_is_rejected() {
    let dir = workspace();
    let config = dir.path().join("nodeforge.toml");
    fs::write(&config, "colour = \"blue\"\n").unwrap();

    let err = run(cli(&["--config", path(&config), "classify", "-d", "summarize documents"])).unwrap_err();
    assert!(format!("{err:#}").contains("nodeforge.toml"));
}

#[test]
fn broken_table_override_is_rejected() {
    let dir = workspace();
    let tables = dir.path().join("tables");
    fs::create_dir_all(&tables).unwrap();
    fs::write(tables.join("deny_list.yaml"), "entries: [unterminated\n").unwrap();

    let err = run(cli(&["--tables", path(&tables), "classify", "-d", "summarize documents"])).unwrap_err();
    assert!(format!("{err:#}").contains("deny_list.yaml"));
}

#[test]
fn classify_accepts_spec_or_description() {
    let dir = workspace();
    let spec = dir.path().join("spec.yaml");

    assert_eq!(run(cli(&["classify", path(&spec)])).unwrap(), Status::Success);
    assert_eq!(
        run(cli(&["classify", "--description", "retrieve documents", "--json"])).unwrap(),
        Status::Success
    );
    assert!(Cli::try_parse_from(["nodeforge", "classify"]).is_err());
}

#[test]
fn missing_spec_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let err = run(cli(&["generate", "does-not-exist.yaml", "--out", path(&out)])).unwrap_err();
    assert!(format!("{err:#}").contains("does-not-exist.yaml"));
    assert!(!out.exists());
}
