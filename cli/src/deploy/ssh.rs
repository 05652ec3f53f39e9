//! # shipctl SSH Deployer
//!
//! File: cli/src/deploy/ssh.rs
//!
//! ## Overview
//!
//! Runs each post-deploy command on the configured server. Lifecycle of one
//! `execute` call:
//!
//! 1. Resolve credentials (key file wins over password). Missing credentials
//!    fail here with `ShipError::NoAuthConfigured`, before any connection.
//! 2. Connect to `host:port` (10 s dial timeout) and authenticate.
//! 3. For each command: open a session, run the raw command string through
//!    the remote shell (no local tokenization), stream its output, wait for
//!    the exit status, close the session. A non-zero status or a transport
//!    error stops the run; later commands are never sent.
//! 4. Disconnect.
//!
use super::{DeployType, Deployer, SshConfig};
use crate::common::ssh::{RemoteShell, SshCredentials, SshSession};
use crate::core::error::{Result, ShipError};
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use std::path::Path;
use tracing::{info, warn};

/// Deployer that executes commands over SSH.
#[derive(Debug, Clone)]
pub struct SshDeployer {
    config: SshConfig,
}

impl SshDeployer {
    pub fn new(config: SshConfig) -> Self {
        Self { config }
    }

    async fn connect(&self) -> Result<SshSession> {
        let credentials = SshCredentials::resolve(
            self.config.ssh_key.as_deref(),
            self.config.password.as_deref(),
        )
        .await?;
        SshSession::connect(
            &self.config.host,
            self.config.port,
            &self.config.user,
            credentials,
        )
        .await
    }

    /// Copies one local file to `remote_path` on the server (SCP).
    pub async fn upload_file(&self, local_path: &Path, remote_path: &str) -> Result<()> {
        let mut session = self.connect().await?;
        let result = session.upload_file(local_path, remote_path).await;
        disconnect(session).await;
        result
    }
}

#[async_trait]
impl Deployer for SshDeployer {
    async fn execute(&self, commands: &[String]) -> Result<()> {
        let mut session = self.connect().await?;
        let result = run_remote_commands(&mut session, commands).await;
        disconnect(session).await;
        result
    }

    fn kind(&self) -> DeployType {
        DeployType::Ssh
    }
}

async fn disconnect(session: SshSession) {
    let addr = session.addr().to_string();
    if let Err(e) = session.close().await {
        warn!("Failed to disconnect cleanly from {}: {}", addr, e);
    }
}

/// Executes `commands` one by one on `shell`, stopping at the first
/// transport error or non-zero exit status.
pub async fn run_remote_commands(shell: &mut dyn RemoteShell, commands: &[String]) -> Result<()> {
    let total = commands.len();
    for (index, command) in commands.iter().enumerate() {
        println!("  [{}/{}] Running: {}", index + 1, total, command);
        let status = shell
            .exec(command)
            .await
            .with_context(|| format!("Failed to run remote command '{}'", command))?;
        if status != 0 {
            warn!("Remote command '{}' exited with status {}", command, status);
            return Err(anyhow!(ShipError::Execution {
                cmd: command.clone(),
                status: format!("exit code {}", status),
            }));
        }
        info!("Remote command '{}' completed successfully.", command);
    }
    Ok(())
}
