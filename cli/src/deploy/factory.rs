//! # shipctl Deployer Factory
//!
//! File: cli/src/deploy/factory.rs
//!
//! Maps a deploy type string and a `DeployOptions` bag to a concrete backend.
//! Unknown types fail with `ShipError::UnsupportedType` and produce no deployer.
//!
use super::docker::DockerDeployer;
use super::git::GitDeployer;
use super::ssh::SshDeployer;
use super::{DeployOptions, DeployTarget, DeployType, Deployer};
use crate::core::error::Result;
use tracing::debug;

/// Creates the deployer for `deploy_type`.
pub fn create(deploy_type: &str, options: DeployOptions) -> Result<Box<dyn Deployer>> {
    let kind: DeployType = deploy_type.parse()?;
    Ok(from_target(DeployTarget::from_options(kind, options)))
}

/// Creates the deployer for an already-typed target.
pub fn from_target(target: DeployTarget) -> Box<dyn Deployer> {
    debug!("Creating '{}' deployer", target.kind());
    match target {
        DeployTarget::Ssh(config) => Box::new(SshDeployer::new(config)),
        DeployTarget::Docker(config) => Box::new(DockerDeployer::new(config)),
        DeployTarget::Git(config) => Box::new(GitDeployer::new(config)),
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{ship_error, ShipError};
    use std::collections::HashMap;
    use std::path::PathBuf;

    #[test]
    fn test_create_ssh() {
        let options = DeployOptions {
            host: Some("example.com".into()),
            port: Some(22),
            user: Some("deploy".into()),
            ..Default::default()
        };
        let deployer = create("ssh", options).unwrap();
        assert_eq!(deployer.kind(), DeployType::Ssh);
    }

    #[test]
    fn test_create_docker() {
        let options = DeployOptions {
            project_path: Some(PathBuf::from("/tmp/test")),
            environment: Some(HashMap::from([(
                "NODE_ENV".to_string(),
                "production".to_string(),
            )])),
            ..Default::default()
        };
        let deployer = create("docker", options).unwrap();
        assert_eq!(deployer.kind(), DeployType::Docker);
    }

    #[test]
    fn test_docker_environment_defaults_to_empty() {
        let options = DeployOptions {
            project_path: Some(PathBuf::from("/tmp/test")),
            ..Default::default()
        };
        match DeployTarget::from_options(DeployType::Docker, options) {
            DeployTarget::Docker(cfg) => assert!(cfg.environment.is_empty()),
            other => panic!("unexpected target: {:?}", other),
        }
    }

    #[test]
    fn test_create_git() {
        let options = DeployOptions {
            project_path: Some(PathBuf::from("/tmp/test")),
            branch: Some("main".into()),
            ..Default::default()
        };
        let deployer = create("git", options).unwrap();
        assert_eq!(deployer.kind(), DeployType::Git);
    }

    #[test]
    fn test_create_unsupported() {
        let result = create("bogus", DeployOptions::default());
        let err = result.err().expect("bogus type must not build a deployer");
        assert!(matches!(
            ship_error(&err),
            Some(ShipError::UnsupportedType { kind }) if kind == "bogus"
        ));
    }
}
