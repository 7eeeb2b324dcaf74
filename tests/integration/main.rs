//! Integration tests for refgraph
//!
//! These tests run the CLI binary against documents written to a temporary
//! directory.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn refgraph(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_refgraph"))
        .args(args)
        .output()
        .expect("Failed to execute refgraph")
}

fn write_doc(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path.to_string_lossy().to_string()
}

/// Test that the CLI can be invoked
#[test]
fn test_cli_invocation() {
    let output = refgraph(&["--help"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("Resolve JSON References"));
}

#[test]
fn test_check_reports_references() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_doc(
        temp_dir.path(),
        "tree.json",
        r##"{ "node": { "children": [ { "$ref": "#/node" } ] } }"##,
    );

    let output = refgraph(&["check", &file, "--json"]);
    assert!(output.status.success());

    let stats: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stats["references"], 1);
    assert_eq!(stats["objects"], 2);
    assert_eq!(stats["arrays"], 1);
}

#[test]
fn test_get_follows_references() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_doc(
        temp_dir.path(),
        "doc.yaml",
        "definitions:\n  name: widget\nalias:\n  $ref: '#/definitions/name'\n",
    );

    let output = refgraph(&["get", &file, "/alias"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), r#"string "widget""#);
}

#[test]
fn test_format_override() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_doc(temp_dir.path(), "doc.txt", "list: [1, 2, 3]\n");

    let output = refgraph(&["--format", "yaml", "get", &file, "/list"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "array of 3 elements");
}

#[test]
fn test_reference_cycle_fails() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_doc(
        temp_dir.path(),
        "cycle.json",
        r##"{ "a": { "$ref": "#/b" }, "b": { "$ref": "#/a" } }"##,
    );

    let output = refgraph(&["check", &file]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("never reaches a concrete value"));
}
