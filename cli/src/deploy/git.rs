//! # shipctl Git Deployer
//!
//! File: cli/src/deploy/git.rs
//!
//! ## Overview
//!
//! Brings the project directory up to date with Git, then runs the
//! post-deploy commands in it.
//!
//! - With a repository URL and no `<project>/.git`:
//!   - a missing or empty project directory is cloned into
//!     (`git clone -b <branch|main> <url> <project>`);
//!   - a directory that already holds files (at least `.shipctl/`) is turned
//!     into a checkout in place: `git init`, `git remote add origin <url>`,
//!     `git fetch origin <branch>`, `git checkout -B <branch> FETCH_HEAD`,
//!     then the branch is set to track `origin/<branch>`.
//! - With a repository URL and an existing checkout: `git pull`, then
//!   `git checkout <branch>` when a branch is configured.
//! - Without a repository URL: `<project>/.git` must already exist, else the
//!   run fails with `ShipError::NotAGitRepository`. Nothing is cloned.
//!
//! Commands passed to `execute` take precedence over the ones configured on
//! the deployer. They are tokenized and spawned exactly like the docker
//! backend does, without an environment overlay.
//!
use super::{DeployType, Deployer, GitConfig};
use crate::common::process::{self, CommandRunner, CommandSpec, ProcessRunner};
use crate::core::error::{Result, ShipError};
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Branch cloned when none is configured.
pub const DEFAULT_BRANCH: &str = "main";

/// Deployer that syncs the project with Git.
pub struct GitDeployer {
    config: GitConfig,
    runner: Arc<dyn CommandRunner>,
}

impl GitDeployer {
    pub fn new(config: GitConfig) -> Self {
        Self::with_runner(config, Arc::new(ProcessRunner))
    }

    /// Uses `runner` to spawn commands instead of real processes.
    pub fn with_runner(config: GitConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self { config, runner }
    }

    fn has_checkout(&self) -> bool {
        self.config.project_path.join(".git").is_dir()
    }

    fn branch(&self) -> &str {
        self.config.branch.as_deref().unwrap_or(DEFAULT_BRANCH)
    }

    async fn git(&self, args: &[&str], cwd: &Path) -> Result<()> {
        let spec = CommandSpec::new("git", args, Some(cwd));
        self.runner.run(&spec).await
    }

    /// Makes the non-empty `root` a checkout of `repository` without moving
    /// the files already in it.
    async fn init_in_place(&self, repository: &str, root: &Path) -> Result<()> {
        let branch = self.branch();
        let tracking = format!("origin/{}", branch);
        println!("📥 Fetching {} ({}) into {}", repository, branch, root.display());

        self.git(&["init"], root)
            .await
            .with_context(|| format!("Failed to initialise a repository in {:?}", root))?;
        self.git(&["remote", "add", "origin", repository], root)
            .await
            .context("Failed to add remote origin")?;
        self.git(&["fetch", "origin", branch], root)
            .await
            .with_context(|| format!("Failed to fetch {} from {}", branch, repository))?;
        self.git(&["checkout", "-B", branch, "FETCH_HEAD"], root)
            .await
            .with_context(|| format!("Failed to check out branch {}", branch))?;
        self.git(&["branch", "--set-upstream-to", tracking.as_str(), branch], root)
            .await
            .with_context(|| format!("Failed to track {}", tracking))
    }

    async fn clone_or_update(&self, repository: &str) -> Result<()> {
        let root = &self.config.project_path;

        if !self.has_checkout() && !is_missing_or_empty(root) {
            return self.init_in_place(repository, root).await;
        }

        if !self.has_checkout() {
            let branch = self.branch();
            let target = root.to_string_lossy().into_owned();
            println!("📥 Cloning repository: {}", repository);
            let clone = CommandSpec::new(
                "git",
                &["clone", "-b", branch, repository, target.as_str()],
                None,
            );
            return self
                .runner
                .run(&clone)
                .await
                .with_context(|| format!("Failed to clone {}", repository));
        }

        println!("🔄 Updating Git repository...");
        let pull = CommandSpec::new("git", &["pull"], Some(root.as_path()));
        self.runner.run(&pull).await.context("Failed to pull")?;

        if let Some(branch) = &self.config.branch {
            let checkout =
                CommandSpec::new("git", &["checkout", branch.as_str()], Some(root.as_path()));
            self.runner
                .run(&checkout)
                .await
                .with_context(|| format!("Failed to check out branch {}", branch))?;
        }
        Ok(())
    }
}

fn is_missing_or_empty(dir: &Path) -> bool {
    match fs::read_dir(dir) {
        Ok(mut entries) => entries.next().is_none(),
        Err(_) => !dir.exists(),
    }
}

#[async_trait]
impl Deployer for GitDeployer {
    async fn execute(&self, commands: &[String]) -> Result<()> {
        let commands = if commands.is_empty() {
            &self.config.commands[..]
        } else {
            commands
        };

        match &self.config.repository {
            Some(repository) => self.clone_or_update(repository).await?,
            None => {
                if !self.has_checkout() {
                    return Err(anyhow!(ShipError::NotAGitRepository {
                        path: self.config.project_path.clone(),
                    }));
                }
                println!("📦 Using local Git repository");
            }
        }

        if commands.is_empty() {
            info!("No post-deploy commands configured");
            return Ok(());
        }

        process::run_command_lines(
            self.runner.as_ref(),
            commands,
            &self.config.project_path,
            &HashMap::new(),
        )
        .await
    }

    fn kind(&self) -> DeployType {
        DeployType::Git
    }
}
