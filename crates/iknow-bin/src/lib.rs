// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 IKnow Team. All rights reserved.

//! # iknow-bin
//!
//! The `iknow` command-line tool.
//!
//! It runs the same auth core the web client uses, against a file-backed
//! token store, and reports where the client would have navigated:
//!
//! ```text
//! main.rs ──► cli.rs (clap) ──► config (iknow-config) ──► logging
//!                                      │
//!                                      ▼
//!                              commands/* ──► iknow-auth
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Show the stored token and session state (default command)
//! iknow
//!
//! # Sign in with a token issued by the backend
//! iknow login eyJhbGciOi...
//!
//! # Would an admin page let the current viewer in?
//! iknow check --role admin
//!
//! # Inspect a token without storing it
//! iknow decode eyJhbGciOi...
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;

// =============================================================================
// Re-exports
// =============================================================================

pub use cli::{Cli, Commands};
pub use error::{BinError, BinResult};
pub use logging::init_logging;

use iknow_config::ClientConfig;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Loads the configuration named on the command line, applying CLI
/// overrides. A missing file yields defaults.
pub fn load_config(cli: &Cli) -> BinResult<ClientConfig> {
    let mut config = iknow_config::load_config_or_default(&cli.config)?;

    if let Some(path) = &cli.storage {
        config.storage.backend = iknow_config::StorageBackendKind::File;
        config.storage.path = path.clone();
    }
    Ok(config)
}

/// Runs a parsed command line to completion.
pub fn run(cli: Cli) -> BinResult<()> {
    let config = load_config(&cli)?;

    let format = cli
        .log_format
        .unwrap_or_else(|| config.logging.format.into());
    init_logging(cli.effective_log_level(config.logging.level.as_str()), format);

    commands::execute(&cli, config)
}
