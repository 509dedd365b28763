// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # labkit-observability
//!
//! Logging setup shared by the labkit binaries.
//!
//! Provides consistent `tracing` initialization with per-crate debug flag
//! support (`--debug-labkit-field`, `--debug-all`, `LABKIT_DEBUG=...`).
//!
//! ## Features
//! - `file-logging`: JSON log files in a timestamped run folder with retention

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

pub use cli::*;
pub use config::*;
pub use init::*;

/// Known labkit crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "labkit-config",
    "labkit-hal",
    "labkit-field",
    "labkit-render",
    "labkit-visualizer",
    "labkit-classifier",
    "labkit-api",
];

/// Convert a crate name into the `tracing` target module path
/// (`labkit-field` -> `labkit_field`).
pub fn crate_target(crate_name: &str) -> String {
    crate_name.replace('-', "_")
}
