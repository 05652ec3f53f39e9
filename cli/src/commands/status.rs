//! # shipctl Status Command
//!
//! File: cli/src/commands/status.rs
//!
//! Prints the project root, whether its configuration is complete, the
//! server settings, the deployed version and the deploy type.
//!
use super::GlobalOptions;
use crate::common::fs::io;
use crate::core::config::{self, PROVISION_DIR};
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(about = "Show the project's deploy configuration")]
pub struct StatusArgs {}

pub async fn handle_status(_args: StatusArgs, global: &GlobalOptions) -> Result<()> {
    let root = global.project_root()?;
    info!("Handling status command for {:?}", root);

    println!("📁 Project directory: {}\n", root.display());

    config::check_project_structure(&root).context("Invalid project structure")?;
    println!("✅ Project structure is valid");

    let settings = config::load_settings(&root).context("Failed to load settings.json")?;
    println!("\n📋 Server settings:");
    println!("   Host: {}", settings.server.host);
    println!("   Port: {}", settings.server.port);
    println!("   User: {}", settings.server.user);
    println!("   Current version: {}", settings.current_version);
    if let Some(name) = &settings.project_name {
        println!("   Project name: {}", name);
    }

    let provision = root.join(PROVISION_DIR);
    if provision.is_dir() {
        match io::count_entries(&provision) {
            Ok(count) => println!("\n📦 Directory /{}/ exists ({} entries)", PROVISION_DIR, count),
            Err(e) => {
                warn!("Could not list {:?}: {:#}", provision, e);
                println!("\n📦 Directory /{}/ exists", PROVISION_DIR);
            }
        }
    } else {
        println!("\n⚠️  Directory /{}/ not found", PROVISION_DIR);
    }

    let deploy_config = config::load_deploy_config(&root).context("Failed to load deploy.json")?;
    println!("\n🚀 Deploy configuration:");
    println!("   Type: {}", deploy_config.deploy_type);
    if !deploy_config.provision.path.is_empty() {
        println!("   Provision path: {}", deploy_config.provision.path);
    }
    Ok(())
}
