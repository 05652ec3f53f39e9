//! # shipctl Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! One module per top-level subcommand. Each defines a clap `*Args` struct
//! and an async `handle_*` function that `main.rs` dispatches to.
//!
//! - `deploy`: run the configured deploy backend
//! - `init`: scaffold `.shipctl/` with default configuration
//! - `status`: show the project's configuration
//! - `update`: replace this binary with the latest release
//! - `upload`: copy one file to the configured server over SCP
//! - `version`: print the version
//!
//! Options that apply to every subcommand (`--project`, `-v`) are parsed in
//! `main.rs` and handed to the handlers as `GlobalOptions`.
//!
use crate::core::error::Result;
use anyhow::Context;
use std::path::PathBuf;

pub mod deploy;
pub mod init;
pub mod status;
pub mod update;
pub mod upload;
pub mod version;

/// Options shared by all subcommands.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Project directory given with `--project`.
    pub project: Option<PathBuf>,
    /// Number of `-v` flags.
    pub verbose: u8,
}

impl GlobalOptions {
    /// The project root: `--project` if given, else the current directory.
    pub fn project_root(&self) -> Result<PathBuf> {
        match &self.project {
            Some(path) => Ok(path.clone()),
            None => std::env::current_dir().context("Failed to determine the current directory"),
        }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose > 0
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_root_prefers_flag() {
        let opts = GlobalOptions {
            project: Some(PathBuf::from("/srv/app")),
            verbose: 0,
        };
        assert_eq!(opts.project_root().unwrap(), PathBuf::from("/srv/app"));
        assert!(!opts.is_verbose());
    }

    #[test]
    fn test_project_root_defaults_to_cwd() {
        let opts = GlobalOptions::default();
        assert_eq!(opts.project_root().unwrap(), std::env::current_dir().unwrap());
    }
}
