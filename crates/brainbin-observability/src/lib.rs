// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # brainbin-observability
//!
//! Logging setup shared by the brainbin tools, with per-crate debug flag support.
//!
//! ## Features
//! - `file-logging`: JSON log files per run, with retention cleanup

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod init;

pub use cli::*;
pub use init::*;

/// Crate names accepted by the debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "brainbin",
    "brainbin-structures",
    "brainbin-serialization",
    "brainbin-config",
    "brainbin-observability",
];
