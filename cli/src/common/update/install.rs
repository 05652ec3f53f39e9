//! # shipctl Binary Installation (`common::update::install`)
//!
//! File: cli/src/common/update/install.rs
//!
//! Downloads a release binary to a staging file next to the running
//! executable and swaps it in.
//!
//! Staging files are created exclusively with a random name, so nothing
//! planted in a shared directory can be followed or reused.
//!
use crate::core::error::{Result, ShipError};
use anyhow::{anyhow, Context};
use reqwest::{Client, StatusCode};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Timeout for the binary download.
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Name prefix of staging files.
pub const STAGING_PREFIX: &str = ".shipctl-update-";

fn install_dir(current: &Path) -> &Path {
    match current.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Creates an empty staging file in the directory of `current`.
///
/// The file is removed when dropped unless it has been renamed away.
pub fn staging_file(current: &Path) -> Result<NamedTempFile> {
    let dir = install_dir(current);
    tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempfile_in(dir)
        .map_err(|e| {
            anyhow!(ShipError::Update(format!(
                "Failed to create a staging file in {:?}: {}",
                dir, e
            )))
        })
}

/// Downloads `url` into `dest`. Anything but `200 OK` is an error.
pub async fn download(url: &str, dest: &Path) -> Result<()> {
    let client = Client::builder()
        .timeout(DOWNLOAD_TIMEOUT)
        .user_agent(super::release::USER_AGENT)
        .build()
        .map_err(|e| anyhow!(ShipError::Update(format!("Failed to build HTTP client: {}", e))))?;

    info!("Downloading {} to {:?}", url, dest);
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| anyhow!(ShipError::Update(format!("Download of {} failed: {}", url, e))))?;
    if response.status() != StatusCode::OK {
        return Err(anyhow!(ShipError::Update(format!(
            "Download of {} failed with status {}",
            url,
            response.status()
        ))));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| anyhow!(ShipError::Update(format!("Download of {} interrupted: {}", url, e))))?;
    tokio::fs::write(dest, &bytes)
        .await
        .with_context(|| format!("Failed to write {:?}", dest))?;
    debug!("Downloaded {} bytes", bytes.len());
    Ok(())
}

/// Sets mode 0755 on Unix. No-op elsewhere.
pub fn make_executable(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))
            .with_context(|| format!("Failed to make {:?} executable", path))?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

/// Replaces `current` with `new_binary`.
///
/// On Unix the new file is renamed over the old one. When that fails (the
/// two live on different filesystems) the new file is copied into a staging
/// file beside `current` and that copy is renamed over it, so the running
/// executable is never opened for writing. On Windows the running executable
/// cannot be overwritten, so it is renamed to `<current>.old` first and
/// restored if the move fails.
pub fn install_binary(new_binary: &Path, current: &Path) -> Result<()> {
    if cfg!(windows) {
        let mut old = current.as_os_str().to_owned();
        old.push(".old");
        let old = PathBuf::from(old);
        fs::rename(current, &old).map_err(|e| {
            anyhow!(ShipError::Update(format!("Failed to move aside {:?}: {}", current, e)))
        })?;
        if let Err(e) = fs::rename(new_binary, current) {
            if let Err(restore) = fs::rename(&old, current) {
                warn!("Failed to restore {:?}: {}", current, restore);
            }
            return Err(anyhow!(ShipError::Update(format!(
                "Failed to install new binary: {}",
                e
            ))));
        }
        if let Err(e) = fs::remove_file(&old) {
            debug!("Leaving {:?} behind: {}", old, e);
        }
        return Ok(());
    }

    if let Err(e) = fs::rename(new_binary, current) {
        debug!("Rename failed ({}), copying next to {:?} first", e, current);
        let sibling = staging_file(current)?;
        fs::copy(new_binary, sibling.path()).map_err(|e| {
            anyhow!(ShipError::Update(format!("Failed to install new binary: {}", e)))
        })?;
        sibling.persist(current).map_err(|e| {
            anyhow!(ShipError::Update(format!(
                "Failed to install new binary: {}",
                e.error
            )))
        })?;
        if let Err(e) = fs::remove_file(new_binary) {
            debug!("Leaving {:?} behind: {}", new_binary, e);
        }
    }
    Ok(())
}
