//! # shipctl `status` Integration Tests
//!
//! File: cli/tests/status.rs
//!

mod common;

use common::*;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_status_without_configuration_fails() {
    let dir = tempdir().unwrap();
    shipctl_cmd()
        .args(["status", "--project"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("settings.json"));
}

#[test]
fn test_status_reports_settings_and_provision() {
    let dir = tempdir().unwrap();
    write_project(dir.path(), SETTINGS, r#"{"type": "docker", "provision": {"path": "./provision"}}"#);
    let provision = dir.path().join("provision");
    fs::create_dir(&provision).unwrap();
    fs::write(provision.join("docker-compose.yml"), "services: {}").unwrap();
    fs::write(provision.join(".env"), "A=1").unwrap();

    shipctl_cmd()
        .args(["status", "--project"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Port: 1"))
        .stdout(predicate::str::contains("User: deploy"))
        .stdout(predicate::str::contains("Current version: v1.2.3"))
        .stdout(predicate::str::contains("Project name: demo"))
        .stdout(predicate::str::contains("(2 entries)"))
        .stdout(predicate::str::contains("Type: docker"))
        .stdout(predicate::str::contains("Provision path: ./provision"));
}

#[test]
fn test_status_rejects_port_zero() {
    let dir = tempdir().unwrap();
    write_project(
        dir.path(),
        r#"{"server": {"host": "h", "port": 0, "user": "u"}}"#,
        r#"{"type": "ssh"}"#,
    );
    shipctl_cmd()
        .args(["status", "--project"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("port"));
}
