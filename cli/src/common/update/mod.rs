//! # shipctl Self-Update (`common::update`)
//!
//! File: cli/src/common/update/mod.rs
//!
//! ## Overview
//!
//! Release discovery and self-replacement for the `shipctl` binary.
//!
//! - **`release`**: where releases come from (custom server, then GitHub),
//!   platform binary naming, asset lookup.
//! - **`install`**: download to a staging file and swap it in.
//!
//! `check_for_updates` is the best-effort notice spawned by `main` on every
//! command except `update`. It never fails and never blocks the command.
//!
//! The custom server is taken from `SHIPCTL_UPDATE_SERVER`, else from the
//! `update_server` field of the project's `settings.json`.
//!
use crate::core::config;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

pub mod install;
pub mod release;

/// Environment variable naming a custom update server.
pub const UPDATE_SERVER_ENV: &str = "SHIPCTL_UPDATE_SERVER";

/// Delay before the background check starts talking to the network.
const CHECK_DELAY: Duration = Duration::from_millis(500);

/// Version of the running binary, with a leading `v`.
pub fn current_version() -> String {
    format!("v{}", env!("CARGO_PKG_VERSION"))
}

/// `true` when two version tags name the same version, ignoring a leading `v`.
pub fn versions_match(a: &str, b: &str) -> bool {
    a.trim_start_matches('v') == b.trim_start_matches('v')
}

/// Custom update server for the project at `root`, if one is configured.
pub fn update_server_url(root: &Path) -> Option<String> {
    if let Ok(url) = std::env::var(UPDATE_SERVER_ENV) {
        if !url.is_empty() {
            return Some(url);
        }
    }
    config::load_settings(root)
        .ok()
        .and_then(|s| s.update_server)
        .filter(|url| !url.is_empty())
}

/// Prints a notice when a newer release than `current` is published.
pub async fn check_for_updates(root: &Path, current: &str) {
    tokio::time::sleep(CHECK_DELAY).await;

    let server = update_server_url(root);
    let release = match release::latest_release(server.as_deref()).await {
        Ok(release) => release,
        Err(e) => {
            debug!("Background update check failed: {:#}", e);
            return;
        }
    };

    if !release.tag_name.is_empty() && !versions_match(&release.tag_name, current) {
        println!(
            "\n⚠️  New version available: {} (current: {})",
            release.tag_name, current
        );
        println!("   Run 'shipctl update' to install it");
        if !release.html_url.is_empty() {
            println!("   Or download it from: {}\n", release.html_url);
        } else {
            println!();
        }
    }
}
