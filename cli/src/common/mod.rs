//! # shipctl Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared building blocks used by the deploy backends and command handlers.
//! Command-specific logic lives in `commands::`, configuration and errors in
//! `core::`.
//!
//! - **`fs`**: small filesystem helpers (`ensure_dir_exists`, JSON writes).
//! - **`process`**: the command tokenizer and the local process runner.
//! - **`ssh`**: `russh` client sessions and SCP upload.
//! - **`update`**: release lookup and self-replacement of the binary.
//!
//! ```rust
//! use crate::common::{fs, process};
//!
//! fs::io::ensure_dir_exists(&config::config_dir(&root))?;
//! let tokens = process::tokenize("docker-compose up -d --build");
//! ```
//!

/// Filesystem helpers.
pub mod fs;
/// Command tokenizing and local process execution.
pub mod process;
/// SSH sessions and file upload.
pub mod ssh;
/// Release lookup, download and install.
pub mod update;
