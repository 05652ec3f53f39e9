//! # shipctl SCP Upload (`common::ssh::scp`)
//!
//! File: cli/src/common/ssh/scp.rs
//!
//! Single-file upload over the classic SCP "sink" protocol: run `scp -t
//! <remote>` on the server, then send a `C<mode> <size> <name>` header line,
//! the raw bytes and a terminating NUL. There is no resume and no checksum;
//! success is the remote `scp` exit status. Status bytes `1`/`2` sent back by
//! the remote side carry a warning/error message, which is surfaced in the
//! returned error.
//!
use super::session::SshSession;
use crate::core::error::{Result, ShipError};
use anyhow::{anyhow, Context};
use russh::ChannelMsg;
use std::path::Path;
use tracing::{debug, info};

/// File mode sent for uploaded files.
pub const UPLOAD_MODE: u32 = 0o644;

/// Builds the SCP header line for a file.
pub fn scp_header(mode: u32, size: u64, name: &str) -> String {
    format!("C{:04o} {} {}\n", mode, size, name)
}

/// File name component used in the SCP header for a remote path.
fn remote_basename(remote_path: &str) -> &str {
    remote_path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(remote_path)
}

impl SshSession {
    /// Uploads `local_path` to `remote_path` on the connected host.
    pub async fn upload_file(&mut self, local_path: &Path, remote_path: &str) -> Result<()> {
        let file = tokio::fs::File::open(local_path)
            .await
            .with_context(|| format!("Failed to open local file {:?}", local_path))?;
        let size = file
            .metadata()
            .await
            .with_context(|| format!("Failed to stat local file {:?}", local_path))?
            .len();
        let header = scp_header(UPLOAD_MODE, size, remote_basename(remote_path));
        let command = format!("scp -t {}", remote_path);

        info!(
            "Uploading {:?} ({} bytes) to {}:{}",
            local_path,
            size,
            self.addr(),
            remote_path
        );

        let mut channel = self.handle().channel_open_session().await?;
        channel.exec(true, command.as_str()).await?;
        channel.data(header.as_bytes()).await?;
        channel.data(file).await?;
        channel.data(&b"\0"[..]).await?;
        channel.eof().await?;

        let mut exit_status = None;
        let mut remote_message = String::new();
        while let Some(msg) = channel.wait().await {
            match msg {
                ChannelMsg::Data { ref data } => {
                    // `\0` acknowledgements are expected; 1/2 prefix a message.
                    if matches!(data.first(), Some(1) | Some(2)) {
                        remote_message.push_str(String::from_utf8_lossy(&data[1..]).trim());
                    }
                }
                ChannelMsg::ExtendedData { ref data, .. } => {
                    remote_message.push_str(String::from_utf8_lossy(data).trim());
                }
                ChannelMsg::ExitStatus { exit_status: code } => exit_status = Some(code),
                _ => {}
            }
        }

        match exit_status {
            Some(0) => {
                debug!("Upload of {:?} finished", local_path);
                Ok(())
            }
            other => {
                let mut status = match other {
                    Some(code) => format!("exit code {}", code),
                    None => "session closed without an exit status".to_string(),
                };
                if !remote_message.is_empty() {
                    status.push_str(&format!(" ({})", remote_message));
                }
                Err(anyhow!(ShipError::Execution {
                    cmd: command,
                    status,
                }))
            }
        }
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scp_header() {
        assert_eq!(scp_header(0o644, 1234, "app.tar.gz"), "C0644 1234 app.tar.gz\n");
        assert_eq!(scp_header(0o755, 0, "run.sh"), "C0755 0 run.sh\n");
    }

    #[test]
    fn test_remote_basename() {
        assert_eq!(remote_basename("/srv/app/release.tar"), "release.tar");
        assert_eq!(remote_basename("release.tar"), "release.tar");
        assert_eq!(remote_basename("/srv/app/"), "app");
    }
}
