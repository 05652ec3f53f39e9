//! # shipctl Deploy Backends
//!
//! File: cli/src/deploy/mod.rs
//!
//! ## Overview
//!
//! A *deployer* runs an ordered list of post-deploy commands against one kind
//! of target. Three backends implement the same contract:
//!
//! - **`ssh`**: each command runs on a remote host through its own SSH session.
//! - **`docker`**: Docker Compose lifecycle commands run locally in the project.
//! - **`git`**: the project is cloned or pulled first, then the commands run locally.
//!
//! Every backend runs commands strictly in order and stops at the first
//! failure; commands after the failing one are never started.
//!
//! ## Architecture
//!
//! - `Deployer`: the object-safe async trait every backend implements.
//! - `DeployType`: the three accepted type strings, parsed with `FromStr`.
//! - `DeployOptions`: the typed option bag assembled by `shipctl deploy` from
//!   both configuration files. Each backend reads only its own fields.
//! - `DeployTarget`: the tagged union of per-backend configurations built
//!   from a type and an option bag.
//! - `factory::create`: type string + options → `Box<dyn Deployer>`.
//!
//! ```rust
//! let deployer = deploy::create(&deploy_config.deploy_type, options)?;
//! deployer.execute(&deploy_config.commands).await?;
//! ```
//!
use crate::core::error::{Result, ShipError};
use anyhow::anyhow;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub mod docker;
pub mod factory;
pub mod git;
pub mod ssh;

pub use factory::create;

/// Uniform execution contract for all deploy backends.
#[async_trait]
pub trait Deployer: Send + Sync {
    /// Runs `commands` in order. The first failure aborts the run and is returned.
    async fn execute(&self, commands: &[String]) -> Result<()>;

    /// The backend kind, for logging.
    fn kind(&self) -> DeployType;
}

/// Supported deploy types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployType {
    Ssh,
    Docker,
    Git,
}

impl FromStr for DeployType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ssh" => Ok(Self::Ssh),
            "docker" => Ok(Self::Docker),
            "git" => Ok(Self::Git),
            other => Err(anyhow!(ShipError::UnsupportedType {
                kind: other.to_string(),
            })),
        }
    }
}

impl fmt::Display for DeployType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ssh => "ssh",
            Self::Docker => "docker",
            Self::Git => "git",
        })
    }
}

/// Settings handed to the factory. Every field is optional; absent values
/// fall back to each backend's defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeployOptions {
    pub project_path: Option<PathBuf>,
    // ssh
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub ssh_key: Option<String>,
    pub password: Option<String>,
    // docker
    pub compose_file: Option<PathBuf>,
    pub environment: Option<HashMap<String, String>>,
    // git
    pub repository: Option<String>,
    pub branch: Option<String>,
    pub commands: Option<Vec<String>>,
}

/// Connection settings for the ssh backend.
#[derive(Debug, Clone, PartialEq)]
pub struct SshConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub ssh_key: Option<String>,
    pub password: Option<String>,
}

/// Settings for the docker backend.
#[derive(Debug, Clone, PartialEq)]
pub struct DockerConfig {
    pub project_path: PathBuf,
    pub compose_file: Option<PathBuf>,
    pub environment: HashMap<String, String>,
}

/// Settings for the git backend.
#[derive(Debug, Clone, PartialEq)]
pub struct GitConfig {
    pub project_path: PathBuf,
    pub repository: Option<String>,
    pub branch: Option<String>,
    pub commands: Vec<String>,
}

/// One backend configuration, selected by deploy type.
#[derive(Debug, Clone, PartialEq)]
pub enum DeployTarget {
    Ssh(SshConfig),
    Docker(DockerConfig),
    Git(GitConfig),
}

impl DeployTarget {
    /// Picks the fields relevant to `kind` out of `options`.
    pub fn from_options(kind: DeployType, options: DeployOptions) -> Self {
        let project_path = options.project_path.unwrap_or_else(|| PathBuf::from("."));
        let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());
        match kind {
            DeployType::Ssh => Self::Ssh(SshConfig {
                host: options.host.unwrap_or_default(),
                port: options.port.unwrap_or(22),
                user: options.user.unwrap_or_default(),
                ssh_key: non_empty(options.ssh_key),
                password: non_empty(options.password),
            }),
            DeployType::Docker => Self::Docker(DockerConfig {
                project_path,
                compose_file: options.compose_file,
                environment: options.environment.unwrap_or_default(),
            }),
            DeployType::Git => Self::Git(GitConfig {
                project_path,
                repository: non_empty(options.repository),
                branch: non_empty(options.branch),
                commands: options.commands.unwrap_or_default(),
            }),
        }
    }

    pub fn kind(&self) -> DeployType {
        match self {
            Self::Ssh(_) => DeployType::Ssh,
            Self::Docker(_) => DeployType::Docker,
            Self::Git(_) => DeployType::Git,
        }
    }
}
