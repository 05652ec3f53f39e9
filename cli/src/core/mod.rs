//! # shipctl Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! Foundational pieces used by every command:
//! - `config`: loading and validating `.shipctl/settings.json` and `.shipctl/deploy.json`
//! - `error`: the `ShipError` taxonomy and the `Result` alias
//!
//! ```rust
//! use crate::core::config;
//! use crate::core::error::{Result, ShipError};
//! ```
//!
pub mod config;
pub mod error;
