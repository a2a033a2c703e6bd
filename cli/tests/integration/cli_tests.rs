//! Integration tests for the CLI surface: help, version and global flags.

#![allow(clippy::expect_used)]

use predicates::prelude::*;

use crate::support::datacats;

#[test]
fn test_cli_no_args_shows_help() {
    // clap with arg_required_else_help shows help on stderr and exits 2
    datacats().assert().code(2).stderr(predicate::str::contains(
        "Provision self-contained open-data portal projects",
    ));
}

#[test]
fn test_cli_help_lists_commands() {
    datacats()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("purge"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("version"));
}

#[test]
fn test_create_help_lists_flags() {
    datacats()
        .args(["create", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--image-only"))
        .stdout(predicate::str::contains("--no-sysadmin"))
        .stdout(predicate::str::contains("--keep-on-failure"));
}

#[test]
fn test_cli_version_flag_shows_version() {
    datacats()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("datacats"));
}

#[test]
fn test_version_command_shows_version() {
    datacats()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(concat!(
            "datacats ",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn test_version_command_json_outputs_valid_json() {
    let output = datacats()
        .args(["version", "--json"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_unknown_command_fails() {
    datacats().arg("launch").assert().failure();
}
