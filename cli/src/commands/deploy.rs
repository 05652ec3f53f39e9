//! # shipctl Deploy Command
//!
//! File: cli/src/commands/deploy.rs
//!
//! ## Overview
//!
//! `shipctl deploy` loads both configuration files from the project root,
//! builds the backend selected by `deploy.json`'s `type` and runs the
//! configured commands through it.
//!
//! ## Workflow
//!
//! 1. Resolve the project root (`--project` or the current directory).
//! 2. Require `.shipctl/settings.json` and `.shipctl/deploy.json`.
//! 3. Load both. With `-v`, print the target server, the deployed version and
//!    whether `provision/` exists.
//! 4. Collect every deploy option from both files and hand them to the
//!    factory, which parses the type once and keeps what its backend reads.
//! 5. Execute `deploy.json`'s commands. The first failure ends the deploy.
//!
use super::GlobalOptions;
use crate::core::config::{self, DeployConfig, Settings, PROVISION_DIR};
use crate::core::error::Result;
use crate::deploy::{self, DeployOptions};
use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    about = "Deploy the project with the configured backend",
    long_about = "Runs the deploy described by .shipctl/deploy.json.\n\
                  The 'ssh' type runs each command on the server from .shipctl/settings.json,\n\
                  'docker' rebuilds the Compose application in the project directory, and\n\
                  'git' fetches or pulls the project before running the commands locally."
)]
pub struct DeployArgs {}

pub async fn handle_deploy(_args: DeployArgs, global: &GlobalOptions) -> Result<()> {
    let root = global.project_root()?;
    info!("Handling deploy command for {:?}", root);

    config::check_project_structure(&root).context("Invalid project structure")?;
    let settings = config::load_settings(&root).context("Failed to load settings.json")?;
    let deploy_config = config::load_deploy_config(&root).context("Failed to load deploy.json")?;

    if global.is_verbose() {
        println!("📦 Project: {}", root.display());
        println!(
            "🖥️  Server: {}@{}:{}",
            settings.server.user, settings.server.host, settings.server.port
        );
        println!("📋 Current version on server: {}", settings.current_version);
        if root.join(PROVISION_DIR).is_dir() {
            println!("✅ Directory /{}/ found", PROVISION_DIR);
        } else {
            println!("⚠️  Directory /{}/ not found", PROVISION_DIR);
        }
    }

    println!("\n🚀 Starting deploy...");
    println!("   Type: {}", deploy_config.deploy_type);

    let options = build_options(&root, &settings, &deploy_config);
    let deployer = deploy::create(&deploy_config.deploy_type, options)?;

    deployer
        .execute(&deploy_config.commands)
        .await
        .with_context(|| format!("Deploy ({}) failed", deployer.kind()))?;

    println!("\n✅ Deploy completed successfully!");
    Ok(())
}

/// Collects every deploy option from both config files. Each backend reads
/// only its own keys.
pub fn build_options(root: &Path, settings: &Settings, deploy_config: &DeployConfig) -> DeployOptions {
    let server = &settings.server;
    DeployOptions {
        project_path: Some(root.to_path_buf()),
        host: Some(server.host.clone()),
        port: Some(server.port),
        user: Some(server.user.clone()),
        ssh_key: server.ssh_key.clone(),
        password: server.password.clone(),
        environment: Some(deploy_config.environment.clone()),
        compose_file: deploy_config.compose_file.as_ref().map(PathBuf::from),
        repository: deploy_config.repository.clone(),
        branch: deploy_config.branch.clone(),
        commands: Some(deploy_config.commands.clone()),
    }
}
