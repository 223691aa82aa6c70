#![allow(deprecated)]
//! End-to-end checks of the `apphost` binary.

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn apphost_cmd() -> Command {
    Command::cargo_bin("apphost").expect("binary not found")
}

fn shop_manifest() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("shop.json")
}

#[test]
fn help_lists_commands() {
    apphost_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("catalog"));
}

#[test]
fn generate_writes_the_program() {
    let temp_dir = TempDir::new().expect("tempdir");
    apphost_cmd()
        .arg("generate")
        .arg(shop_manifest())
        .arg("--output-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("apphost.cs"));

    let source = std::fs::read_to_string(temp_dir.path().join("apphost.cs")).expect("output");
    assert!(source.contains("var orders = pg.AddDatabase("));
}

#[test]
fn generate_to_stdout_honours_sdk_version() {
    apphost_cmd()
        .arg("generate")
        .arg(shop_manifest())
        .arg("--stdout")
        .arg("--sdk-version")
        .arg("9.5.2")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("#:sdk Aspire.AppHost.Sdk@9.5.2\n"))
        .stdout(predicate::str::contains("#:package Aspire.Hosting@9.5.2"));
}

#[test]
fn check_reports_resource_count() {
    apphost_cmd()
        .arg("check")
        .arg(shop_manifest())
        .assert()
        .success()
        .stdout(predicate::str::contains("ok: 4 resources"));
}

#[test]
fn check_fails_on_bad_overload() {
    let temp_dir = TempDir::new().expect("tempdir");
    let manifest = temp_dir.path().join("bad.json");
    std::fs::write(
        &manifest,
        r#"{"resources": [{"factory": "add_container", "name": "web", "args": [42]}]}"#,
    )
    .expect("write manifest");

    apphost_cmd()
        .arg("check")
        .arg(&manifest)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no matching overload for 'add_container'"));
}

#[test]
fn catalog_json_lists_factories() {
    let output = apphost_cmd()
        .arg("catalog")
        .arg("--json")
        .output()
        .expect("run catalog");
    assert!(output.status.success());

    let listing: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    let factories = listing["factories"].as_array().expect("factories");
    assert!(factories.iter().any(|f| f["name"] == "add_postgres"));
    let resources = listing["resources"].as_array().expect("resources");
    assert_eq!(resources.len(), 9);
    assert_eq!(listing["enumerations"].as_array().map(Vec::len), Some(12));
}

#[test]
fn catalog_text_marks_experimental_members() {
    apphost_cmd()
        .arg("catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains("WithHttpProbe [with_http_probe(), http_probe=] experimental ASPIREPROBES001"));
}
