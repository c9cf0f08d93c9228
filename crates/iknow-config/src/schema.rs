// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 IKnow Team. All rights reserved.

//! Configuration schema for the IKnow client.
//!
//! ```yaml
//! auth:
//!   storage_key: token
//!   render_policy: blocking      # blocking | eager
//!   redirect_policy: presence    # presence | strict
//!   purge_invalid_tokens: true
//!   routes:
//!     login: /auth/login
//!     unmapped_role: /home
//!
//! storage:
//!   backend: file                # file | memory | unavailable
//!   path: .iknow/storage.json
//!
//! logging:
//!   level: info
//!   format: text                 # text | json | compact
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use iknow_auth::{
    AuthConfig, AuthContext, FileStorage, MemoryStorage, Navigator, StorageBackend,
    UnavailableStorage,
};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Default token storage file.
pub const DEFAULT_STORAGE_PATH: &str = ".iknow/storage.json";

// =============================================================================
// ClientConfig
// =============================================================================

/// Top-level client configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Auth core settings.
    pub auth: AuthConfig,

    /// Token storage settings.
    pub storage: StorageConfig,

    /// Logging settings.
    pub logging: LoggingConfig,
}

impl ClientConfig {
    /// Validates every section.
    pub fn validate(&self) -> ConfigResult<()> {
        self.auth.validate()?;
        self.storage.validate()?;
        Ok(())
    }

    /// Opens the configured storage backend.
    pub fn open_backend(&self) -> Arc<dyn StorageBackend> {
        self.storage.open()
    }

    /// Builds an auth context over the configured backend.
    pub fn auth_context(&self, navigator: Arc<dyn Navigator>) -> AuthContext {
        AuthContext::new(self.auth.clone(), self.open_backend(), navigator)
    }
}

// =============================================================================
// Storage
// =============================================================================

/// Which storage backend holds the token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackendKind {
    /// JSON key-value file.
    #[default]
    File,
    /// In-process map, lost on exit.
    Memory,
    /// No persistent storage.
    Unavailable,
}

impl StorageBackendKind {
    /// Returns the backend name.
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackendKind::File => "file",
            StorageBackendKind::Memory => "memory",
            StorageBackendKind::Unavailable => "unavailable",
        }
    }

    /// Parses a backend name (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "file" => Some(StorageBackendKind::File),
            "memory" => Some(StorageBackendKind::Memory),
            "unavailable" | "none" => Some(StorageBackendKind::Unavailable),
            _ => None,
        }
    }
}

/// Token storage configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend kind.
    pub backend: StorageBackendKind,

    /// Storage file path (file backend only).
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackendKind::default(),
            path: PathBuf::from(DEFAULT_STORAGE_PATH),
        }
    }
}

impl StorageConfig {
    /// Validates the storage configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.backend == StorageBackendKind::File && self.path.as_os_str().is_empty() {
            return Err(ConfigError::validation(
                "storage.path",
                "file backend requires a path",
            ));
        }
        Ok(())
    }

    /// Opens the configured backend.
    pub fn open(&self) -> Arc<dyn StorageBackend> {
        match self.backend {
            StorageBackendKind::File => Arc::new(FileStorage::new(&self.path)),
            StorageBackendKind::Memory => Arc::new(MemoryStorage::new()),
            StorageBackendKind::Unavailable => Arc::new(UnavailableStorage),
        }
    }
}

// =============================================================================
// Logging
// =============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level.
    pub level: LogLevel,

    /// Log format.
    pub format: LogFormat,
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Returns the level as a filter directive.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Parses a level name (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON lines.
    Json,
    /// Compact single-line text.
    Compact,
}

impl LogFormat {
    /// Parses a format name (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "text" | "pretty" => Some(LogFormat::Text),
            "json" => Some(LogFormat::Json),
            "compact" => Some(LogFormat::Compact),
            _ => None,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use iknow_auth::{RecordingNavigator, Token};

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.storage.backend, StorageBackendKind::File);
        assert_eq!(config.storage.path, PathBuf::from(DEFAULT_STORAGE_PATH));
        assert_eq!(config.logging.level, LogLevel::Info);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_backend_requires_path() {
        let mut config = ClientConfig::default();
        config.storage.path = PathBuf::new();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { .. })
        ));

        config.storage.backend = StorageBackendKind::Memory;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_auth_section() {
        let mut config = ClientConfig::default();
        config.auth.routes.login = "login".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Auth(_))));
    }

    #[test]
    fn test_open_backend() {
        let mut config = ClientConfig::default();
        config.storage.backend = StorageBackendKind::Unavailable;
        assert!(!config.open_backend().is_available());

        config.storage.backend = StorageBackendKind::Memory;
        let ctx = config.auth_context(Arc::new(RecordingNavigator::new()));
        ctx.store().set(&Token::new("a.b.c")).unwrap();
        assert!(ctx.store().exists());
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(StorageBackendKind::parse("FILE"), Some(StorageBackendKind::File));
        assert_eq!(StorageBackendKind::parse("none"), Some(StorageBackendKind::Unavailable));
        assert_eq!(StorageBackendKind::parse("redis"), None);
        assert_eq!(LogLevel::parse("warning"), Some(LogLevel::Warn));
        assert_eq!(LogFormat::parse("Json"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse("xml"), None);
    }
}
