//! # shipctl SSH Module Interface
//!
//! File: cli/src/common/ssh/mod.rs
//!
//! ## Overview
//!
//! Everything the ssh deploy backend needs from an SSH transport, built on
//! `russh`:
//!
//! - **`session`**: credential resolution, connecting with a dial timeout,
//!   per-command session channels (`RemoteShell`), disconnect.
//! - **`scp`**: single-file upload through the SCP sink protocol.
//!
//! ```rust
//! let creds = ssh::SshCredentials::resolve(key.as_deref(), password.as_deref()).await?;
//! let mut session = ssh::SshSession::connect(&host, port, &user, creds).await?;
//! let status = session.exec("systemctl restart app").await?;
//! session.upload_file(Path::new("dist/app.tar.gz"), "/srv/app/app.tar.gz").await?;
//! session.close().await?;
//! ```
//!

/// Single-file upload over SCP.
pub mod scp;
/// Connection, authentication and remote command execution.
pub mod session;

pub use session::{RemoteShell, SshCredentials, SshSession};
