//! # shipctl Update Command
//!
//! File: cli/src/commands/update.rs
//!
//! ## Overview
//!
//! Replaces the running `shipctl` binary with the latest release.
//!
//! ## Workflow
//!
//! 1. Look up the latest release (custom update server, then GitHub).
//! 2. Stop if its tag matches the running version.
//! 3. Find the download URL for this platform's binary.
//! 4. Download it to a staging file beside the executable and mark it
//!    executable.
//! 5. Swap it in for the current executable.
//!
use super::GlobalOptions;
use crate::common::update::{self, install, release};
use crate::core::error::{Result, ShipError};
use anyhow::{anyhow, Context};
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    about = "Update shipctl to the latest release",
    long_about = "Checks for a newer shipctl release and installs it in place.\n\
                  Releases are looked up on the server named by SHIPCTL_UPDATE_SERVER or\n\
                  the update_server field of .shipctl/settings.json, falling back to GitHub."
)]
pub struct UpdateArgs {}

pub async fn handle_update(_args: UpdateArgs, global: &GlobalOptions) -> Result<()> {
    info!("Handling update command");
    println!("🔍 Checking for updates...");

    let root = global.project_root()?;
    let server = update::update_server_url(&root);
    let latest = release::latest_release(server.as_deref())
        .await
        .context("Failed to check for updates")?;

    let current = update::current_version();
    if update::versions_match(&latest.tag_name, &current) {
        println!("✅ You are already on the latest version: {}", current);
        return Ok(());
    }

    println!("📦 New version found: {} (current: {})", latest.tag_name, current);
    println!("🚀 Starting update...");

    let url = release::find_binary_asset(&latest, server.as_deref()).ok_or_else(|| {
        anyhow!(ShipError::Update(format!(
            "No {} binary in release {}. Download it manually from: {}",
            release::binary_name(),
            latest.tag_name,
            latest.html_url
        )))
    })?;

    let current_binary =
        std::env::current_exe().context("Failed to locate the running executable")?;
    let staged = install::staging_file(&current_binary)?.into_temp_path();

    println!("⬇️  Downloading {}...", latest.tag_name);
    install::download(&url, &staged).await?;
    install::make_executable(&staged)?;

    println!("📦 Installing new version...");
    install::install_binary(&staged, &current_binary)?;

    println!("✅ Update complete! New version: {}", latest.tag_name);
    println!("   Run 'shipctl version' to verify.");
    Ok(())
}
