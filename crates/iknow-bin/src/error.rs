// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 IKnow Team. All rights reserved.

//! Error types for the `iknow` binary.

use thiserror::Error;
use tracing::error;

/// Result type alias for iknow-bin operations.
pub type BinResult<T> = Result<T, BinError>;

/// Errors that can occur in the `iknow` binary.
#[derive(Debug, Error)]
pub enum BinError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Config loading error.
    #[error("Config error: {0}")]
    Config(#[from] iknow_config::ConfigError),

    /// Token storage error.
    #[error("Storage error: {0}")]
    Storage(#[from] iknow_auth::StorageError),

    /// The token could not be decoded.
    #[error("Token error: {0}")]
    Decode(#[from] iknow_auth::DecodeError),

    /// The guard denied access.
    #[error("Access denied: {0}")]
    Denied(String),

    /// Output could not be written.
    #[error("Output error: {0}")]
    Output(String),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        /// The context description.
        context: String,
        /// The underlying error.
        #[source]
        source: Box<BinError>,
    },
}

impl BinError {
    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Creates an access denied error.
    pub fn denied(msg: impl Into<String>) -> Self {
        Self::Denied(msg.into())
    }

    /// Adds context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Returns the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration(_) | Self::Config(_) => 1,
            Self::Storage(_) => 2,
            Self::Decode(_) => 3,
            Self::Denied(_) => 4,
            Self::Output(_) => 5,
            Self::WithContext { source, .. } => source.exit_code(),
        }
    }

    /// Returns the error type as a string for logging.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::Config(e) => e.error_type(),
            Self::Storage(_) => "storage",
            Self::Decode(_) => "decode",
            Self::Denied(_) => "denied",
            Self::Output(_) => "output",
            Self::WithContext { source, .. } => source.error_type(),
        }
    }

    fn root(&self) -> &BinError {
        match self {
            Self::WithContext { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<serde_json::Error> for BinError {
    fn from(err: serde_json::Error) -> Self {
        Self::Output(err.to_string())
    }
}

impl From<iknow_auth::AuthError> for BinError {
    fn from(err: iknow_auth::AuthError) -> Self {
        match err {
            iknow_auth::AuthError::Storage(e) => Self::Storage(e),
            iknow_auth::AuthError::Decode(e) => Self::Decode(e),
            other => Self::Configuration(other.to_string()),
        }
    }
}

// =============================================================================
// Error Reporting
// =============================================================================

/// Formats an error, its cause chain and a hint for unreadable config files.
pub fn report_lines(error: &BinError) -> Vec<String> {
    let mut lines = vec![format!("Error: {}", error)];

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        lines.push(format!("  Caused by: {}", cause));
        source = cause.source();
    }

    if let BinError::Config(e) = error.root() {
        if e.is_io_error() {
            lines.push("  Hint: pass --config <path> or create iknow.yaml in the working directory".to_string());
        }
    }
    lines
}

/// Reports an error with its cause chain on stderr.
pub fn report_error(error: &BinError) {
    error!(
        error_type = error.error_type(),
        exit_code = error.exit_code(),
        "{}",
        error
    );
    for line in report_lines(error) {
        eprintln!("{}", line);
    }
}

/// Reports an error and exits with the appropriate code.
pub fn report_error_and_exit(error: BinError) -> ! {
    report_error(&error);
    std::process::exit(error.exit_code())
}

// =============================================================================
// Tests
// =============================================================================
