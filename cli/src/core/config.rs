//! # shipctl Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module loads and validates the two JSON documents that drive a deploy:
//!
//! - `<root>/.shipctl/settings.json`: the target server (host, port, user,
//!   credentials), the version currently deployed, an optional project name
//!   and an optional custom update server.
//! - `<root>/.shipctl/deploy.json`: the deploy type (`ssh`, `docker`, `git`),
//!   the ordered post-deploy commands, the environment overlay, the
//!   provisioning directory and a few backend-specific extras.
//!
//! Both documents are read once per invocation and never written back by the
//! deploy path. `shipctl init` is the only writer (see `default_settings` and
//! `default_deploy_config`).
//!
//! ## Architecture
//!
//! - Structured `serde` models with `#[serde(default)]` so that optional fields
//!   may be omitted. A field present with the wrong JSON type is a load error.
//! - `load_*` functions read, parse, expand (`~` in the key path) and validate.
//! - The deploy type stays a plain string here; it is checked when the
//!   deployer is created so that an unknown type is reported as
//!   `ShipError::UnsupportedType`, not as a parse failure.
//! - Missing SSH credentials are *not* a load error: they fail later, at
//!   execute time, and only for the ssh backend.
//!
//! ## Examples
//!
//! ```rust
//! config::check_project_structure(&root)?;
//! let settings = config::load_settings(&root)?;
//! let deploy = config::load_deploy_config(&root)?;
//! println!("{}@{}:{}", settings.server.user, settings.server.host, settings.server.port);
//! ```
//!
use crate::core::error::{Result, ShipError};
use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Directory (relative to the project root) holding both configuration files.
pub const CONFIG_DIR: &str = ".shipctl";
/// Server settings file name inside `CONFIG_DIR`.
pub const SETTINGS_FILE: &str = "settings.json";
/// Deploy configuration file name inside `CONFIG_DIR`.
pub const DEPLOY_FILE: &str = "deploy.json";
/// Conventional provisioning directory under the project root.
pub const PROVISION_DIR: &str = "provision";

/// Contents of `settings.json`.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    /// Version tag currently deployed on the server.
    #[serde(default)]
    pub current_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    /// Custom release server, e.g. `http://10.0.0.2:8080/updates`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_server: Option<String>,
}

/// Connection parameters for the ssh backend.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ServerSettings {
    #[serde(default)]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub user: String,
    /// Path to a private key. May start with `~`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: default_port(),
            user: String::new(),
            ssh_key: None,
            password: None,
        }
    }
}

/// Contents of `deploy.json`.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct DeployConfig {
    /// `ssh`, `docker` or `git`. Checked at dispatch time.
    #[serde(rename = "type", default)]
    pub deploy_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub environment: HashMap<String, String>,
    #[serde(default)]
    pub provision: ProvisionConfig,
    /// Explicit compose manifest (docker). Relative paths resolve against the project root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compose_file: Option<String>,
    /// Remote repository to clone/pull (git). Without it the root must already be a checkout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    /// Branch to clone or check out (git).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

/// Provisioning section of `deploy.json`.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct ProvisionConfig {
    #[serde(default)]
    pub path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
}

fn default_port() -> u16 {
    22
}

/// Path of the configuration directory for a project root.
pub fn config_dir(root: &Path) -> PathBuf {
    root.join(CONFIG_DIR)
}

/// Path of `settings.json` for a project root.
pub fn settings_path(root: &Path) -> PathBuf {
    config_dir(root).join(SETTINGS_FILE)
}

/// Path of `deploy.json` for a project root.
pub fn deploy_path(root: &Path) -> PathBuf {
    config_dir(root).join(DEPLOY_FILE)
}

/// Verifies that both configuration files exist under `root`.
pub fn check_project_structure(root: &Path) -> Result<()> {
    for path in [settings_path(root), deploy_path(root)] {
        if !path.is_file() {
            return Err(anyhow!(ShipError::Config(format!(
                "File not found: {} (run `shipctl init` to create it)",
                path.display()
            ))));
        }
    }
    debug!("Project structure valid at {}", root.display());
    Ok(())
}

/// Loads, expands and validates `settings.json`.
pub fn load_settings(root: &Path) -> Result<Settings> {
    let path = settings_path(root);
    info!("Loading server settings from: {}", path.display());
    let mut settings: Settings = read_json(&path)?;
    expand_settings_paths(&mut settings);
    validate_settings(&settings)
        .with_context(|| format!("Invalid settings in {}", path.display()))?;
    debug!("Loaded settings for host '{}'", settings.server.host);
    Ok(settings)
}

/// Loads `deploy.json`.
pub fn load_deploy_config(root: &Path) -> Result<DeployConfig> {
    let path = deploy_path(root);
    info!("Loading deploy configuration from: {}", path.display());
    let config: DeployConfig = read_json(&path)?;
    debug!(
        "Deploy type '{}' with {} command(s)",
        config.deploy_type,
        config.commands.len()
    );
    Ok(config)
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| {
        anyhow!(ShipError::Config(format!(
            "Failed to read {}: {}",
            path.display(),
            e
        )))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        anyhow!(ShipError::Config(format!(
            "Failed to parse {}: {}",
            path.display(),
            e
        )))
    })
}

fn expand_settings_paths(settings: &mut Settings) {
    if let Some(key) = settings.server.ssh_key.as_mut() {
        *key = shellexpand::tilde(key).into_owned();
        debug!("Expanded SSH key path: {}", key);
    }
}

fn validate_settings(settings: &Settings) -> Result<()> {
    if settings.server.port == 0 {
        return Err(anyhow!(ShipError::Config(
            "server.port must be between 1 and 65535".to_string()
        )));
    }
    Ok(())
}

/// Settings written by `shipctl init`; the user fills in the real server.
pub fn default_settings(project_name: &str) -> Settings {
    Settings {
        server: ServerSettings {
            host: "example.com".to_string(),
            port: 22,
            user: "deploy".to_string(),
            ssh_key: None,
            password: None,
        },
        current_version: "v0.0.0".to_string(),
        project_name: Some(project_name.to_string()),
        update_server: None,
    }
}

/// Deploy configuration written by `shipctl init`.
pub fn default_deploy_config() -> DeployConfig {
    DeployConfig {
        deploy_type: "ssh".to_string(),
        commands: vec![
            "git pull".to_string(),
            "npm install".to_string(),
            "npm run build".to_string(),
        ],
        environment: HashMap::from([("NODE_ENV".to_string(), "production".to_string())]),
        provision: ProvisionConfig {
            path: "./provision".to_string(),
            files: Vec::new(),
        },
        ..Default::default()
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ship_error;
    use tempfile::tempdir;

    fn write_config(root: &Path, settings: &str, deploy: &str) {
        let dir = config_dir(root);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(SETTINGS_FILE), settings).unwrap();
        fs::write(dir.join(DEPLOY_FILE), deploy).unwrap();
    }

    #[test]
    fn test_load_settings() {
        let temp_dir = tempdir().unwrap();
        write_config(
            temp_dir.path(),
            r#"{
                "server": { "host": "test.com", "port": 2222, "user": "testuser" },
                "current_version": "v1.0.0",
                "project_name": "test-project"
            }"#,
            "{}",
        );

        let settings = load_settings(temp_dir.path()).unwrap();
        assert_eq!(settings.server.host, "test.com");
        assert_eq!(settings.server.port, 2222);
        assert_eq!(settings.server.user, "testuser");
        assert_eq!(settings.current_version, "v1.0.0");
        assert_eq!(settings.project_name.as_deref(), Some("test-project"));
        assert!(settings.server.ssh_key.is_none());
        assert!(settings.update_server.is_none());
    }

    #[test]
    fn test_load_settings_defaults_port() {
        let temp_dir = tempdir().unwrap();
        write_config(temp_dir.path(), r#"{ "server": { "host": "h" } }"#, "{}");
        let settings = load_settings(temp_dir.path()).unwrap();
        assert_eq!(settings.server.port, 22);
    }

    #[test]
    fn test_load_settings_rejects_port_zero() {
        let temp_dir = tempdir().unwrap();
        write_config(temp_dir.path(), r#"{ "server": { "port": 0 } }"#, "{}");
        let err = load_settings(temp_dir.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("server.port"));
    }

    #[test]
    fn test_load_settings_expands_key_path() {
        let temp_dir = tempdir().unwrap();
        write_config(
            temp_dir.path(),
            r#"{ "server": { "host": "h", "ssh_key": "~/.ssh/id_ed25519" } }"#,
            "{}",
        );
        let settings = load_settings(temp_dir.path()).unwrap();
        let key = settings.server.ssh_key.unwrap();
        assert!(!key.starts_with('~'));
        assert!(key.ends_with(".ssh/id_ed25519"));
    }

    #[test]
    fn test_load_deploy_config() {
        let temp_dir = tempdir().unwrap();
        write_config(
            temp_dir.path(),
            "{}",
            r#"{
                "type": "ssh",
                "commands": ["git pull", "npm install", "npm run build"],
                "environment": { "NODE_ENV": "production" },
                "provision": { "path": "./provision" }
            }"#,
        );

        let config = load_deploy_config(temp_dir.path()).unwrap();
        assert_eq!(config.deploy_type, "ssh");
        assert_eq!(config.commands.len(), 3);
        assert_eq!(config.provision.path, "./provision");
        assert_eq!(config.environment.get("NODE_ENV").unwrap(), "production");
        assert!(config.repository.is_none());
    }

    #[test]
    fn test_load_deploy_config_wrong_field_type() {
        let temp_dir = tempdir().unwrap();
        write_config(temp_dir.path(), "{}", r#"{ "type": "docker", "environment": ["A=1"] }"#);
        let err = load_deploy_config(temp_dir.path()).unwrap_err();
        assert!(matches!(ship_error(&err), Some(ShipError::Config(_))));
    }

    #[test]
    fn test_unknown_type_loads() {
        let temp_dir = tempdir().unwrap();
        write_config(temp_dir.path(), "{}", r#"{ "type": "ftp" }"#);
        let config = load_deploy_config(temp_dir.path()).unwrap();
        assert_eq!(config.deploy_type, "ftp");
    }

    #[test]
    fn test_check_project_structure() {
        let temp_dir = tempdir().unwrap();
        let dir = config_dir(temp_dir.path());
        fs::create_dir_all(&dir).unwrap();

        assert!(check_project_structure(temp_dir.path()).is_err());

        fs::write(dir.join(SETTINGS_FILE), "{}").unwrap();
        let err = check_project_structure(temp_dir.path()).unwrap_err();
        assert!(err.to_string().contains(DEPLOY_FILE));

        fs::write(dir.join(DEPLOY_FILE), "{}").unwrap();
        assert!(check_project_structure(temp_dir.path()).is_ok());
    }

    #[test]
    fn test_defaults_serialize_and_reload() {
        let temp_dir = tempdir().unwrap();
        write_config(
            temp_dir.path(),
            &serde_json::to_string_pretty(&default_settings("demo")).unwrap(),
            &serde_json::to_string_pretty(&default_deploy_config()).unwrap(),
        );
        let settings = load_settings(temp_dir.path()).unwrap();
        assert_eq!(settings, default_settings("demo"));
        let deploy = load_deploy_config(temp_dir.path()).unwrap();
        assert_eq!(deploy, default_deploy_config());
    }
}
