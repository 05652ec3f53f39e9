//! # shipctl Upload Command
//!
//! File: cli/src/commands/upload.rs
//!
//! Copies one local file to the server from `settings.json` over SCP, using
//! the same credentials as the ssh deploy backend.
//!
use super::GlobalOptions;
use crate::core::config;
use crate::core::error::Result;
use crate::deploy::ssh::SshDeployer;
use crate::deploy::SshConfig;
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    about = "Upload a file to the configured server",
    long_about = "Copies a single local file to the server from .shipctl/settings.json\n\
                  over SCP. The remote path names the destination file."
)]
pub struct UploadArgs {
    /// Local file to send.
    pub local: PathBuf,
    /// Destination on the server.
    pub remote: String,
}

pub async fn handle_upload(args: UploadArgs, global: &GlobalOptions) -> Result<()> {
    let root = global.project_root()?;
    info!("Handling upload of {:?} to {}", args.local, args.remote);

    let settings = config::load_settings(&root).context("Failed to load settings.json")?;
    let server = settings.server;
    let target = format!("{}@{}:{}", server.user, server.host, args.remote);

    let deployer = SshDeployer::new(SshConfig {
        host: server.host,
        port: server.port,
        user: server.user,
        ssh_key: server.ssh_key.filter(|k| !k.is_empty()),
        password: server.password.filter(|p| !p.is_empty()),
    });

    println!("📤 Uploading {} to {}", args.local.display(), target);
    deployer
        .upload_file(&args.local, &args.remote)
        .await
        .with_context(|| format!("Upload to {} failed", target))?;
    println!("✅ Upload complete");
    Ok(())
}
