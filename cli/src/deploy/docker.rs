//! # shipctl Docker Compose Deployer
//!
//! File: cli/src/deploy/docker.rs
//!
//! ## Overview
//!
//! Rebuilds a Compose application in the project directory.
//!
//! 1. With no commands configured, the default lifecycle is used:
//!    `docker-compose down`, `docker-compose pull`, `docker-compose up -d --build`.
//! 2. The compose manifest is resolved in order: the configured path,
//!    `<project>/docker-compose.yml`, `<project>/provision/docker-compose.yml`.
//!    If none exists the run fails with `ShipError::ManifestNotFound`, naming
//!    every path it checked, before anything is spawned.
//! 3. Each command is tokenized and spawned with the project directory as
//!    its working directory and the configured environment overlaid on the
//!    current one. The first failure stops the run.
//!
use super::{DeployType, Deployer, DockerConfig};
use crate::common::process::{self, CommandRunner, ProcessRunner};
use crate::core::config::PROVISION_DIR;
use crate::core::error::{Result, ShipError};
use anyhow::anyhow;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Manifest file name looked up in the project and provision directories.
pub const COMPOSE_FILE_NAME: &str = "docker-compose.yml";

/// Lifecycle used when no commands are configured.
pub const DEFAULT_COMMANDS: [&str; 3] = [
    "docker-compose down",
    "docker-compose pull",
    "docker-compose up -d --build",
];

/// Deployer that drives Docker Compose locally.
pub struct DockerDeployer {
    config: DockerConfig,
    runner: Arc<dyn CommandRunner>,
}

impl DockerDeployer {
    pub fn new(config: DockerConfig) -> Self {
        Self::with_runner(config, Arc::new(ProcessRunner))
    }

    /// Uses `runner` to spawn commands instead of real processes.
    pub fn with_runner(config: DockerConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self { config, runner }
    }

    /// Finds the compose manifest for this project.
    pub fn resolve_manifest(&self) -> Result<PathBuf> {
        let root = &self.config.project_path;
        let candidates = match &self.config.compose_file {
            Some(explicit) => vec![root.join(explicit)],
            None => vec![
                root.join(COMPOSE_FILE_NAME),
                root.join(PROVISION_DIR).join(COMPOSE_FILE_NAME),
            ],
        };

        for candidate in &candidates {
            debug!("Looking for compose manifest at {}", candidate.display());
            if candidate.is_file() {
                return Ok(candidate.clone());
            }
        }

        Err(anyhow!(ShipError::ManifestNotFound { candidates }))
    }
}

#[async_trait]
impl Deployer for DockerDeployer {
    async fn execute(&self, commands: &[String]) -> Result<()> {
        let commands: Vec<String> = if commands.is_empty() {
            info!("No commands configured, using the default Compose lifecycle");
            DEFAULT_COMMANDS.iter().map(|c| c.to_string()).collect()
        } else {
            commands.to_vec()
        };

        let manifest = self.resolve_manifest()?;
        println!("📦 Using compose manifest: {}", manifest.display());

        process::run_command_lines(
            self.runner.as_ref(),
            &commands,
            &self.config.project_path,
            &self.config.environment,
        )
        .await
    }

    fn kind(&self) -> DeployType {
        DeployType::Docker
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::process::testing::RecordingRunner;
    use crate::core::error::ship_error;
    use std::collections::HashMap;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn config(root: &Path) -> DockerConfig {
        DockerConfig {
            project_path: root.to_path_buf(),
            compose_file: None,
            environment: HashMap::from([("NODE_ENV".to_string(), "production".to_string())]),
        }
    }

    #[tokio::test]
    async fn test_missing_manifest() {
        let dir = tempdir().unwrap();
        let runner = Arc::new(RecordingRunner::default());
        let deployer = DockerDeployer::with_runner(config(dir.path()), runner.clone());

        let err = deployer.execute(&[]).await.unwrap_err();

        match ship_error(&err) {
            Some(ShipError::ManifestNotFound { candidates }) => assert_eq!(
                candidates,
                &vec![
                    dir.path().join(COMPOSE_FILE_NAME),
                    dir.path().join(PROVISION_DIR).join(COMPOSE_FILE_NAME),
                ]
            ),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(runner.lines().is_empty());
    }

    #[test]
    fn test_manifest_lookup_order() {
        let dir = tempdir().unwrap();
        let deployer = DockerDeployer::new(config(dir.path()));

        let provision = dir.path().join(PROVISION_DIR);
        fs::create_dir(&provision).unwrap();
        fs::write(provision.join(COMPOSE_FILE_NAME), "services: {}").unwrap();
        assert_eq!(
            deployer.resolve_manifest().unwrap(),
            provision.join(COMPOSE_FILE_NAME)
        );

        fs::write(dir.path().join(COMPOSE_FILE_NAME), "services: {}").unwrap();
        assert_eq!(
            deployer.resolve_manifest().unwrap(),
            dir.path().join(COMPOSE_FILE_NAME)
        );
    }

    #[test]
    fn test_explicit_manifest() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(COMPOSE_FILE_NAME), "services: {}").unwrap();
        let mut cfg = config(dir.path());
        cfg.compose_file = Some(PathBuf::from("deploy/compose.prod.yml"));
        let deployer = DockerDeployer::new(cfg);

        // The explicit path is authoritative; no fallback to the default file.
        let err = deployer.resolve_manifest().unwrap_err();
        let expected = dir.path().join("deploy/compose.prod.yml");
        match ship_error(&err) {
            Some(ShipError::ManifestNotFound { candidates }) => {
                assert_eq!(candidates, &vec![expected.clone()])
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.to_string().contains(&expected.display().to_string()));
        assert!(!err.to_string().contains(&dir.path().join(COMPOSE_FILE_NAME).display().to_string()));

        fs::create_dir(dir.path().join("deploy")).unwrap();
        fs::write(dir.path().join("deploy/compose.prod.yml"), "services: {}").unwrap();
        assert_eq!(
            deployer.resolve_manifest().unwrap(),
            dir.path().join("deploy/compose.prod.yml")
        );
    }

    #[tokio::test]
    async fn test_default_commands_with_environment() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(COMPOSE_FILE_NAME), "services: {}").unwrap();
        let runner = Arc::new(RecordingRunner::default());
        let deployer = DockerDeployer::with_runner(config(dir.path()), runner.clone());

        deployer.execute(&[]).await.unwrap();

        assert_eq!(runner.lines(), DEFAULT_COMMANDS.to_vec());
        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls[2].program, "docker-compose");
        assert_eq!(calls[2].args, vec!["up", "-d", "--build"]);
        for call in calls.iter() {
            assert_eq!(call.cwd.as_deref(), Some(dir.path()));
            assert_eq!(call.env.get("NODE_ENV").map(String::as_str), Some("production"));
        }
    }

    #[tokio::test]
    async fn test_stops_at_first_failure() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(COMPOSE_FILE_NAME), "services: {}").unwrap();
        let runner = Arc::new(RecordingRunner::failing_at(1));
        let deployer = DockerDeployer::with_runner(config(dir.path()), runner.clone());

        let commands: Vec<String> = vec!["docker compose build".into(), "docker compose up -d".into()];
        let err = deployer.execute(&commands).await.unwrap_err();

        assert_eq!(runner.lines(), vec!["docker compose build"]);
        assert!(matches!(ship_error(&err), Some(ShipError::Execution { .. })));
    }
}
