//! # shipctl Release Lookup (`common::update::release`)
//!
//! File: cli/src/common/update/release.rs
//!
//! ## Overview
//!
//! Finds the newest published release of `shipctl`.
//!
//! - A custom update server (see `update_server_url`) is asked first, at
//!   `<server>/latest` unless the URL already ends in `/latest` or `/updates`.
//! - If there is no custom server, or it fails, the GitHub "latest release"
//!   API is used. A failing custom server is only logged at debug level,
//!   since the background check runs ahead of every command.
//!
//! A custom server may answer with a bare `{"tag_name": "v1.2.0"}`. In that
//! case a single asset pointing at `<base>/download/<binary>` is filled in.
//!
use crate::core::error::{Result, ShipError};
use anyhow::anyhow;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// GitHub repository (`owner/name`) that publishes release binaries.
pub const GITHUB_REPOSITORY: &str = "shipctl/shipctl";
/// User agent sent with every update request.
pub const USER_AGENT: &str = "shipctl-updater";
/// Timeout for release metadata requests.
pub const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// One published release.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
pub struct Release {
    #[serde(default)]
    pub tag_name: String,
    #[serde(default)]
    pub name: String,
    /// RFC 3339 timestamp, kept as text.
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

/// A downloadable file attached to a release.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
pub struct Asset {
    pub name: String,
    pub browser_download_url: String,
    #[serde(default)]
    pub size: u64,
}

/// Release binary name for the running platform, e.g. `shipctl-linux-amd64`.
pub fn binary_name() -> String {
    binary_name_for(std::env::consts::OS, std::env::consts::ARCH)
}

/// Release binary name for an OS/architecture pair as reported by
/// `std::env::consts`. Architectures use the Go-style names release
/// pipelines publish (`amd64`, `arm64`, `386`).
pub fn binary_name_for(os: &str, arch: &str) -> String {
    let arch = match arch {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        "x86" => "386",
        other => other,
    };
    let ext = if os == "windows" { ".exe" } else { "" };
    format!("shipctl-{}-{}{}", os, arch, ext)
}

/// URL queried on a custom server.
pub fn latest_url(server: &str) -> String {
    let url = server.trim_end_matches('/');
    if url.ends_with("/latest") || url.ends_with("/updates") {
        url.to_string()
    } else {
        format!("{}/latest", url)
    }
}

/// Base URL under which a custom server serves `/download/<binary>`.
pub fn download_base(server: &str) -> String {
    let url = server.trim_end_matches('/');
    let url = url.strip_suffix("/latest").unwrap_or(url);
    url.strip_suffix("/updates").unwrap_or(url).to_string()
}

/// Download URL of the binary for this platform.
///
/// An asset named exactly like `binary_name()` wins. Without one, a custom
/// server's conventional `<base>/download/<binary>` is used.
pub fn find_binary_asset(release: &Release, custom_server: Option<&str>) -> Option<String> {
    let binary = binary_name();
    if let Some(asset) = release.assets.iter().find(|a| a.name == binary) {
        return Some(asset.browser_download_url.clone());
    }
    custom_server.map(|server| format!("{}/download/{}", download_base(server), binary))
}

fn http_client() -> Result<Client> {
    Client::builder()
        .timeout(LOOKUP_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| anyhow!(ShipError::Update(format!("Failed to build HTTP client: {}", e))))
}

async fn get_release(url: &str, accept: &str) -> Result<Release> {
    debug!("Requesting release metadata from {}", url);
    let response = http_client()?
        .get(url)
        .header(ACCEPT, accept)
        .send()
        .await
        .map_err(|e| anyhow!(ShipError::Update(format!("Request to {} failed: {}", url, e))))?;

    if response.status() != StatusCode::OK {
        return Err(anyhow!(ShipError::Update(format!(
            "{} answered with status {}",
            url,
            response.status()
        ))));
    }

    response
        .json::<Release>()
        .await
        .map_err(|e| anyhow!(ShipError::Update(format!("Invalid release from {}: {}", url, e))))
}

/// Fetches the latest release from a custom update server.
pub async fn fetch_from_server(server: &str) -> Result<Release> {
    let url = latest_url(server);
    let mut release = get_release(&url, "application/json").await?;

    if release.assets.is_empty() && !release.tag_name.is_empty() {
        let binary = binary_name();
        let base = url.strip_suffix("/latest").unwrap_or(&url);
        release.assets.push(Asset {
            browser_download_url: format!("{}/download/{}", base, binary),
            name: binary,
            size: 0,
        });
    }
    Ok(release)
}

/// GitHub API endpoint for the latest release.
pub fn github_latest_url() -> String {
    format!(
        "https://api.github.com/repos/{}/releases/latest",
        GITHUB_REPOSITORY
    )
}

/// Latest release, preferring `custom_server` and falling back to GitHub.
pub async fn latest_release(custom_server: Option<&str>) -> Result<Release> {
    latest_release_from(custom_server, &github_latest_url()).await
}

async fn latest_release_from(custom_server: Option<&str>, github_url: &str) -> Result<Release> {
    if let Some(server) = custom_server {
        match fetch_from_server(server).await {
            Ok(release) => return Ok(release),
            Err(e) => debug!("Update server {} unavailable, trying GitHub: {:#}", server, e),
        }
    }
    get_release(github_url, "application/vnd.github.v3+json").await
}
