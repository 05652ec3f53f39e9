//! # shipctl SSH Session (`common::ssh::session`)
//!
//! File: cli/src/common/ssh/session.rs
//!
//! ## Overview
//!
//! A thin wrapper around a `russh` client connection:
//!
//! 1. `SshCredentials::resolve` turns the configured key path / password into
//!    a usable credential *before* any network activity (key read and parse
//!    failures, or the absence of both, are reported here).
//! 2. `SshSession::connect` dials `host:port` with a timeout, completes the
//!    handshake and authenticates.
//! 3. `RemoteShell::exec` opens one session channel per command, streams the
//!    remote stdout/stderr to the local ones and returns the exit status.
//! 4. `SshSession::close` disconnects.
//!
//! Host keys are accepted without verification. Every acceptance is logged at
//! `warn` with the key's SHA-256 fingerprint so the trust decision is visible.
//!
use crate::core::error::{Result, ShipError};
use anyhow::anyhow;
use async_trait::async_trait;
use russh::client::{self, Handle};
use russh::keys::ssh_key::HashAlg;
use russh::keys::{PrivateKey, PrivateKeyWithHashAlg, PublicKey};
use russh::{ChannelMsg, Disconnect};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// Dial timeout for new connections.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// A resolved authentication method.
#[derive(Debug)]
pub enum SshCredentials {
    Key { path: PathBuf, key: Arc<PrivateKey> },
    Password(String),
}

impl SshCredentials {
    /// Picks the key when a key path is configured, else the password.
    ///
    /// # Errors
    ///
    /// - `ShipError::KeyRead` if the key file cannot be read.
    /// - `ShipError::KeyParse` if it is not a supported private key.
    /// - `ShipError::NoAuthConfigured` if neither is set (empty strings count as unset).
    pub async fn resolve(ssh_key: Option<&str>, password: Option<&str>) -> Result<Self> {
        if let Some(path) = ssh_key.filter(|p| !p.is_empty()) {
            let path = PathBuf::from(path);
            let key = load_private_key(&path).await?;
            debug!("Using public key authentication with {:?}", path);
            return Ok(Self::Key {
                path,
                key: Arc::new(key),
            });
        }
        if let Some(password) = password.filter(|p| !p.is_empty()) {
            debug!("Using password authentication");
            return Ok(Self::Password(password.to_string()));
        }
        Err(anyhow!(ShipError::NoAuthConfigured))
    }
}

async fn load_private_key(path: &Path) -> Result<PrivateKey> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| {
            anyhow!(ShipError::KeyRead {
                path: path.to_path_buf(),
                source,
            })
        })?;
    russh::keys::decode_secret_key(&content, None).map_err(|e| {
        anyhow!(ShipError::KeyParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    })
}

/// Runs shell commands on a remote host, one at a time.
#[async_trait]
pub trait RemoteShell: Send {
    /// Executes `command` through the remote user's shell and returns its
    /// exit status once the session has finished.
    async fn exec(&mut self, command: &str) -> Result<u32>;
}

/// Client handler; accepts every server key.
pub struct AcceptAnyHostKey {
    addr: String,
}

impl client::Handler for AcceptAnyHostKey {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        warn!(
            "Accepting host key for {} without verification ({})",
            self.addr,
            server_public_key.fingerprint(HashAlg::Sha256)
        );
        Ok(true)
    }
}

/// An authenticated SSH connection.
pub struct SshSession {
    handle: Handle<AcceptAnyHostKey>,
    addr: String,
}

impl SshSession {
    /// Connects to `host:port` and authenticates as `user`.
    ///
    /// Dial, handshake and authentication failures are all reported as
    /// `ShipError::Connection` carrying the address.
    pub async fn connect(
        host: &str,
        port: u16,
        user: &str,
        credentials: SshCredentials,
    ) -> Result<Self> {
        let addr = format!("{}:{}", host, port);
        let connection_error = |reason: String| {
            anyhow!(ShipError::Connection {
                addr: addr.clone(),
                reason,
            })
        };

        info!("Connecting to {} as '{}'", addr, user);
        let config = Arc::new(client::Config::default());
        let handler = AcceptAnyHostKey { addr: addr.clone() };
        let mut handle = tokio::time::timeout(
            CONNECT_TIMEOUT,
            client::connect(config, (host.to_string(), port), handler),
        )
        .await
        .map_err(|_| connection_error(format!("timed out after {}s", CONNECT_TIMEOUT.as_secs())))?
        .map_err(|e| connection_error(e.to_string()))?;

        let auth = match credentials {
            SshCredentials::Key { path, key } => {
                debug!("Authenticating with key {:?}", path);
                handle
                    .authenticate_publickey(user, PrivateKeyWithHashAlg::new(key, None))
                    .await
            }
            SshCredentials::Password(password) => {
                handle.authenticate_password(user, password).await
            }
        }
        .map_err(|e| connection_error(e.to_string()))?;

        if !auth.success() {
            return Err(connection_error(format!(
                "authentication rejected for user '{}'",
                user
            )));
        }

        info!("Authenticated to {}", addr);
        Ok(Self { handle, addr })
    }

    /// Remote address (`host:port`) of this session.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    pub(crate) fn handle(&self) -> &Handle<AcceptAnyHostKey> {
        &self.handle
    }

    /// Disconnects from the server.
    pub async fn close(self) -> Result<()> {
        self.handle
            .disconnect(Disconnect::ByApplication, "", "English")
            .await?;
        debug!("Disconnected from {}", self.addr);
        Ok(())
    }
}

#[async_trait]
impl RemoteShell for SshSession {
    async fn exec(&mut self, command: &str) -> Result<u32> {
        let mut channel = self.handle.channel_open_session().await?;
        channel.exec(true, command).await?;

        let mut stdout = tokio::io::stdout();
        let mut stderr = tokio::io::stderr();
        let mut exit_status = None;

        // The exit status may arrive before the last data, so drain until the
        // server closes the channel.
        while let Some(msg) = channel.wait().await {
            match msg {
                ChannelMsg::Data { ref data } => {
                    stdout.write_all(data).await?;
                    stdout.flush().await?;
                }
                ChannelMsg::ExtendedData { ref data, ext: 1 } => {
                    stderr.write_all(data).await?;
                    stderr.flush().await?;
                }
                ChannelMsg::ExitStatus { exit_status: code } => {
                    exit_status = Some(code);
                }
                _ => {}
            }
        }

        exit_status.ok_or_else(|| {
            anyhow!(ShipError::Execution {
                cmd: command.to_string(),
                status: "session closed without an exit status".to_string(),
            })
        })
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ship_error;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_resolve_without_credentials() {
        let err = SshCredentials::resolve(None, None).await.unwrap_err();
        assert!(matches!(ship_error(&err), Some(ShipError::NoAuthConfigured)));

        let err = SshCredentials::resolve(Some(""), Some("")).await.unwrap_err();
        assert!(matches!(ship_error(&err), Some(ShipError::NoAuthConfigured)));
    }

    #[tokio::test]
    async fn test_resolve_password() {
        let creds = SshCredentials::resolve(None, Some("hunter2")).await.unwrap();
        assert!(matches!(creds, SshCredentials::Password(p) if p == "hunter2"));
    }

    #[tokio::test]
    async fn test_resolve_missing_key_file() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("id_missing");
        let err = SshCredentials::resolve(missing.to_str(), Some("ignored"))
            .await
            .unwrap_err();
        assert!(matches!(ship_error(&err), Some(ShipError::KeyRead { .. })));
    }

    #[tokio::test]
    async fn test_resolve_garbage_key_file() {
        let dir = tempdir().unwrap();
        let key_path = dir.path().join("id_bogus");
        std::fs::write(&key_path, "not a private key").unwrap();
        let err = SshCredentials::resolve(key_path.to_str(), None)
            .await
            .unwrap_err();
        assert!(matches!(ship_error(&err), Some(ShipError::KeyParse { .. })));
    }

    #[tokio::test]
    async fn test_connect_refused_is_connection_error() {
        // Bind then drop a listener to get a local port with nothing behind it.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let err = SshSession::connect(
            "127.0.0.1",
            port,
            "deploy",
            SshCredentials::Password("x".into()),
        )
        .await
        .err()
        .expect("connection should fail");
        match ship_error(&err) {
            Some(ShipError::Connection { addr, .. }) => {
                assert_eq!(addr, &format!("127.0.0.1:{}", port))
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
