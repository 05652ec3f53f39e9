//! # shipctl Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error taxonomy shared by the configuration loader,
//! the deploy backends and the update machinery. Every failure on the deploy
//! path is surfaced immediately to the caller; there is no local retry or
//! partial-success reporting, so the variants below carry enough context
//! (which command, which path, which address) for a single error message to be
//! actionable.
//!
//! ## Architecture
//!
//! - `ShipError`: a `thiserror` enum with one variant per failure class.
//! - `Result<T>`: an alias for `anyhow::Result<T>`. Functions return
//!   `anyhow::Error` wrapping a `ShipError`, and callers attach context with
//!   `anyhow::Context`. Code that needs to branch on a specific failure uses
//!   `err.downcast_ref::<ShipError>()`.
//!
//! ## Examples
//!
//! ```rust
//! // Raise a specific error
//! if !git_dir.is_dir() {
//!     return Err(anyhow!(ShipError::NotAGitRepository { path: root.to_path_buf() }));
//! }
//!
//! // Branch on it further up
//! match deployer.execute(&commands).await {
//!     Err(e) if matches!(e.downcast_ref::<ShipError>(), Some(ShipError::NoAuthConfigured)) => { /* ... */ }
//!     other => other?,
//! }
//! ```
//!
use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for shipctl.
#[derive(Error, Debug)]
pub enum ShipError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unsupported deploy type '{kind}'. Supported types: ssh, docker, git")]
    UnsupportedType { kind: String },

    #[error("No SSH authentication configured (set server.ssh_key or server.password)")]
    NoAuthConfigured,

    #[error("Failed to read SSH key {path:?}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse SSH key {path:?}: {reason}")]
    KeyParse { path: PathBuf, reason: String },

    #[error("SSH connection to {addr} failed: {reason}")]
    Connection { addr: String, reason: String },

    #[error("Command '{cmd}' failed: {status}")]
    Execution { cmd: String, status: String },

    #[error("Compose manifest not found (checked {})", join_paths(.candidates))]
    ManifestNotFound { candidates: Vec<PathBuf> },

    #[error("{path:?} is not a Git repository and no repository was configured")]
    NotAGitRepository { path: PathBuf },

    #[error("Update failed: {0}")]
    Update(String),
}

/// Type alias for Result using anyhow::Error, matching how every module
/// reports failures.
pub type Result<T> = anyhow::Result<T>;

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Returns the `ShipError` carried by an `anyhow::Error`, if any.
pub fn ship_error(err: &anyhow::Error) -> Option<&ShipError> {
    err.downcast_ref::<ShipError>()
}
