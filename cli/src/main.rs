//! # shipctl Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! Entry point for the `shipctl` deploy helper. It:
//! - parses the command line with Clap,
//! - sets up logging from the `-v` count (or `RUST_LOG`),
//! - starts the background update check (skipped for `update` itself),
//! - routes to the command handler and reports its error, if any.
//!
//! ## Examples
//!
//! ```bash
//! shipctl init
//! shipctl -v deploy
//! shipctl --project ../api status
//! ```
//!
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod common;
mod core;
mod deploy;

use commands::GlobalOptions;

#[derive(Parser, Debug)]
#[command(
    name = "shipctl",
    about = "🚀 shipctl: deploy projects over SSH, Docker Compose or Git",
    long_about = "Deploys the project in the current directory (or --project) using the\n\
                  configuration in .shipctl/settings.json and .shipctl/deploy.json.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Increase output verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Project directory (defaults to the current directory).
    #[arg(short, long, global = true, value_name = "PATH")]
    project: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(alias = "d")]
    Deploy(commands::deploy::DeployArgs),
    Init(commands::init::InitArgs),
    #[command(alias = "s")]
    Status(commands::status::StatusArgs),
    Update(commands::update::UpdateArgs),
    Upload(commands::upload::UploadArgs),
    Version(commands::version::VersionArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let global = GlobalOptions {
        project: cli.project,
        verbose: cli.verbose,
    };

    if !matches!(cli.command, Commands::Update(_)) {
        if let Ok(root) = global.project_root() {
            let current = common::update::current_version();
            tokio::spawn(async move {
                common::update::check_for_updates(&root, &current).await;
            });
        }
    }

    let command_result = match cli.command {
        Commands::Deploy(args) => commands::deploy::handle_deploy(args, &global).await,
        Commands::Init(args) => commands::init::handle_init(args, &global).await,
        Commands::Status(args) => commands::status::handle_status(args, &global).await,
        Commands::Update(args) => commands::update::handle_update(args, &global).await,
        Commands::Upload(args) => commands::upload::handle_upload(args, &global).await,
        Commands::Version(args) => commands::version::handle_version(args).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
