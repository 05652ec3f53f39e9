//! # shipctl Version Command
//!
//! File: cli/src/commands/version.rs
//!
use crate::common::update;
use crate::core::error::Result;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(about = "Print the shipctl version")]
pub struct VersionArgs {}

pub async fn handle_version(_args: VersionArgs) -> Result<()> {
    println!("shipctl version {}", update::current_version());
    Ok(())
}
