//! # shipctl CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! Shared helpers for the integration tests in `cli/tests/`. Each test file
//! declares `mod common;` and runs the compiled `shipctl` binary.
//!

#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::Path;

/// Command for the `shipctl` binary built for this test run.
///
/// `SHIPCTL_UPDATE_SERVER` points at a closed local port so the background
/// update check never reaches a real server.
pub fn shipctl_cmd() -> Command {
    let mut cmd = Command::cargo_bin("shipctl").expect("Failed to find shipctl binary for testing");
    cmd.env("SHIPCTL_UPDATE_SERVER", "http://127.0.0.1:1");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Writes `.shipctl/settings.json` and `.shipctl/deploy.json` under `root`.
pub fn write_project(root: &Path, settings: &str, deploy: &str) {
    let dir = root.join(".shipctl");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("settings.json"), settings).unwrap();
    fs::write(dir.join("deploy.json"), deploy).unwrap();
}

/// Minimal settings for a server nobody listens on.
pub const SETTINGS: &str = r#"{
    "server": { "host": "127.0.0.1", "port": 1, "user": "deploy" },
    "current_version": "v1.2.3",
    "project_name": "demo"
}"#;
