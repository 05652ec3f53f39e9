//! # shipctl Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//!
//! ## Overview
//!
//! Small filesystem helpers used by `init` and `status`:
//! - **`ensure_dir_exists`**: `mkdir -p`, refusing paths that exist as files.
//! - **`write_json_if_absent`**: pretty-prints a value to a file unless the file
//!   is already there, so re-running `shipctl init` never clobbers edits.
//! - **`count_entries`**: number of entries in a directory (the `/provision`
//!   summary in `status`).
//!
//! ```rust
//! io::ensure_dir_exists(&config::config_dir(&root))?;
//! let created = io::write_json_if_absent(&config::settings_path(&root), &settings)?;
//! ```
//!
use crate::core::error::{Result, ShipError};
use anyhow::Context;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Ensures that a directory exists at `path`, creating parents as needed.
///
/// # Errors
///
/// Returns an `Err` if the path exists but is not a directory, or if creating
/// the directory fails (e.g., permissions).
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {:?}", path))?;
        info!("Created directory: {:?}", path);
    } else if !path.is_dir() {
        anyhow::bail!(ShipError::Config(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    } else {
        debug!("Directory already exists: {:?}", path);
    }
    Ok(())
}

/// Serializes `value` as pretty JSON into `path` unless the file exists.
///
/// Returns `Ok(true)` when the file was written and `Ok(false)` when an
/// existing file was left untouched. The parent directory is created first.
pub fn write_json_if_absent<T: Serialize>(path: &Path, value: &T) -> Result<bool> {
    if path.exists() {
        debug!("Keeping existing file: {:?}", path);
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        ensure_dir_exists(parent)?;
    }
    let content = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize {:?}", path))?;
    fs::write(path, content).with_context(|| format!("Failed to write to file {:?}", path))?;
    info!("Wrote file: {:?}", path);
    Ok(true)
}

/// Counts the entries of a directory.
pub fn count_entries(path: &Path) -> Result<usize> {
    let entries =
        fs::read_dir(path).with_context(|| format!("Failed to read directory {:?}", path))?;
    Ok(entries.filter_map(|e| e.ok()).count())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_dir_exists_creates_new() -> Result<()> {
        let base_dir = tempdir()?;
        let new_dir = base_dir.path().join(".shipctl/nested");
        assert!(!new_dir.exists());
        ensure_dir_exists(&new_dir)?;
        assert!(new_dir.is_dir());
        // Second call is a no-op.
        ensure_dir_exists(&new_dir)?;
        Ok(())
    }

    #[test]
    fn test_ensure_dir_exists_path_is_file() -> Result<()> {
        let base_dir = tempdir()?;
        let file_path = base_dir.path().join("a_file.txt");
        fs::write(&file_path, "hello")?;
        let result = ensure_dir_exists(&file_path);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Path exists but is not a directory"));
        Ok(())
    }

    #[test]
    fn test_write_json_if_absent() -> Result<()> {
        let base_dir = tempdir()?;
        let path = base_dir.path().join("cfg/out.json");
        let value = BTreeMap::from([("type", "git")]);

        assert!(write_json_if_absent(&path, &value)?);
        let written = fs::read_to_string(&path)?;
        assert!(written.contains("\"type\": \"git\""));

        let other = BTreeMap::from([("type", "ssh")]);
        assert!(!write_json_if_absent(&path, &other)?);
        assert_eq!(fs::read_to_string(&path)?, written);
        Ok(())
    }

    #[test]
    fn test_count_entries() -> Result<()> {
        let base_dir = tempdir()?;
        assert_eq!(count_entries(base_dir.path())?, 0);
        fs::write(base_dir.path().join("a"), "")?;
        fs::create_dir(base_dir.path().join("b"))?;
        assert_eq!(count_entries(base_dir.path())?, 2);
        assert!(count_entries(&base_dir.path().join("missing")).is_err());
        Ok(())
    }
}
