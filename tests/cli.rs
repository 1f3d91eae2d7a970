//! End-to-end tests for the `appcmd` binary
//!
//! These invoke the built binary and check exit codes and output from a
//! user's perspective.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn appcmd(dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("appcmd");
    cmd.current_dir(dir.path())
        .env("GOPATH", dir.path().join("go"))
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_unknown_command_prints_usage() {
    let temp = TempDir::new().unwrap();

    appcmd(&temp)
        .arg("bogus")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown command"))
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_missing_command_prints_usage() {
    let temp = TempDir::new().unwrap();

    appcmd(&temp)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_help_lists_commands() {
    let temp = TempDir::new().unwrap();

    appcmd(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("package"))
        .stdout(predicate::str::contains("--debug"));
}

#[test]
fn test_command_help_uses_long_description() {
    let temp = TempDir::new().unwrap();

    appcmd(&temp)
        .args(["clean", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("app/routes"));
}

#[test]
fn test_clean_removes_generated_files() {
    let temp = TempDir::new().unwrap();
    let app = temp.path().join("shop");
    fs::create_dir_all(app.join("app/tmp")).unwrap();
    fs::create_dir_all(app.join("app/routes")).unwrap();

    appcmd(&temp).args(["clean", "shop"]).assert().success();

    assert!(!app.join("app/tmp").exists());
    assert!(!app.join("app/routes").exists());
}

#[test]
fn test_workspace_failure_exits_without_usage() {
    let temp = TempDir::new().unwrap();

    appcmd(&temp)
        .args(["clean", "example.com/missing"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Unable to determine application path"));
}

#[test]
fn test_new_creates_application() {
    let temp = TempDir::new().unwrap();

    appcmd(&temp)
        .args(["new", "example.com/shop"])
        .assert()
        .success();

    let go_mod = fs::read_to_string(temp.path().join("example.com/shop/go.mod")).unwrap();
    assert!(go_mod.contains("module example.com/shop"));
}

#[test]
fn test_new_rejects_extra_arguments() {
    let temp = TempDir::new().unwrap();

    appcmd(&temp)
        .args(["new", "a", "b", "c"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid command line arguments"));

    assert!(!temp.path().join("a").exists());
}

#[test]
fn test_ini_override_without_command_fails() {
    let temp = TempDir::new().unwrap();
    let ini = temp.path().join("options.ini");
    fs::write(&ini, "[clean]\napplication-path = .\n").unwrap();

    appcmd(&temp)
        .arg("--ini")
        .arg(&ini)
        .arg("clean")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unable to select a command"));
}

#[test]
fn test_ini_none_parses_arguments() {
    let temp = TempDir::new().unwrap();

    appcmd(&temp)
        .args(["--ini", "none", "clean"])
        .assert()
        .success();
}

#[test]
fn test_version_prints_tool_version() {
    let temp = TempDir::new().unwrap();

    appcmd(&temp)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(concat!("appcmd ", env!("CARGO_PKG_VERSION"))));
}
