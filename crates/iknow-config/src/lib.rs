// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 IKnow Team. All rights reserved.

//! # iknow-config
//!
//! Configuration management for the IKnow campus client.
//!
//! ## Features
//!
//! - **Schema Definition**: auth core, token storage and logging sections
//! - **Multi-Format Support**: YAML, TOML, and JSON configuration files
//! - **Environment Overrides**: override config values via `IKNOW_*` variables
//! - **Backend Construction**: open the configured token storage backend
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use iknow_auth::RecordingNavigator;
//! use iknow_config::loader::load_config_or_default;
//!
//! let config = load_config_or_default("iknow.yaml").unwrap();
//! let ctx = config.auth_context(Arc::new(RecordingNavigator::new()));
//!
//! println!("Signed in: {}", ctx.session().is_authenticated());
//! ```
//!
//! Values in config files can reference environment variables:
//!
//! ```yaml
//! storage:
//!   path: "${IKNOW_HOME:.iknow}/storage.json"
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod error;
pub mod loader;
pub mod schema;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ConfigError, ConfigResult};
pub use loader::{
    load_config, load_config_or_default, load_config_str, ConfigFormat, ConfigLoader,
};
pub use schema::{
    ClientConfig, LogFormat, LogLevel, LoggingConfig, StorageBackendKind, StorageConfig,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Tests
// =============================================================================
