//! # shipctl Init Command
//!
//! File: cli/src/commands/init.rs
//!
//! Creates `.shipctl/settings.json` and `.shipctl/deploy.json` with starter
//! values. Files that already exist are left alone.
//!
use super::GlobalOptions;
use crate::common::fs::io;
use crate::core::config;
use crate::core::error::Result;
use clap::Parser;
use std::path::Path;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    about = "Create the .shipctl configuration files",
    long_about = "Creates .shipctl/settings.json and .shipctl/deploy.json in the project\n\
                  directory with example values. Existing files are never overwritten."
)]
pub struct InitArgs {}

pub async fn handle_init(_args: InitArgs, global: &GlobalOptions) -> Result<()> {
    let root = global.project_root()?;
    info!("Handling init command for {:?}", root);

    io::ensure_dir_exists(&config::config_dir(&root))?;

    let settings_path = config::settings_path(&root);
    if io::write_json_if_absent(&settings_path, &config::default_settings(&project_name(&root)))? {
        println!("✅ Created {}", settings_path.display());
    } else {
        println!("⚠️  {} already exists, leaving it unchanged", settings_path.display());
    }

    let deploy_path = config::deploy_path(&root);
    if io::write_json_if_absent(&deploy_path, &config::default_deploy_config())? {
        println!("✅ Created {}", deploy_path.display());
    } else {
        println!("⚠️  {} already exists, leaving it unchanged", deploy_path.display());
    }

    println!("\n📝 Next steps:");
    println!("   1. Edit {} with your server details", settings_path.display());
    println!("   2. Edit {} with your deploy commands", deploy_path.display());
    println!("   3. Run 'shipctl deploy'");
    Ok(())
}

/// Name of the project directory, used as the default project name.
fn project_name(root: &Path) -> String {
    let resolved = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
    resolved
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string())
}
