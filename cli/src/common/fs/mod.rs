//! # shipctl Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!
//! ## Overview
//!
//! Groups the filesystem helpers. Only `io` exists today: directory creation,
//! write-once JSON files for `shipctl init`, and directory entry counting for
//! `shipctl status`.
//!

/// Basic file I/O operations (`ensure_dir_exists`, `write_json_if_absent`, `count_entries`).
pub mod io;
