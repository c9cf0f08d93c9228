// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 IKnow Team. All rights reserved.

//! Error hierarchy for the auth core.
//!
//! ```text
//! AuthError (root)
//! ├── StorageError   - token store backend failures
//! ├── DecodeError    - malformed token payloads
//! └── InvalidConfig  - auth configuration rejected by validation
//! ```
//!
//! The guard and the redirector never surface these to their callers: a
//! decode failure is routed exactly like a missing token, and storage read
//! failures are logged and reported as "no token".

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for auth operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Result type alias for storage backend operations.
pub type StorageResult<T> = Result<T, StorageError>;

// =============================================================================
// AuthError
// =============================================================================

/// The root error type for the auth core.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Token store error.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Token decoding error.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Invalid auth configuration.
    #[error("Invalid auth configuration for '{field}': {message}")]
    InvalidConfig {
        /// The offending field.
        field: String,
        /// Error message.
        message: String,
    },
}

impl AuthError {
    /// Creates an invalid configuration error.
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// StorageError
// =============================================================================

/// Errors raised by a [`StorageBackend`](crate::store::StorageBackend).
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("Storage I/O error at '{path}': {source}")]
    Io {
        /// Path of the backing file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The backing file exists but is not a valid key-value document.
    #[error("Corrupt storage file '{path}': {message}")]
    Corrupt {
        /// Path of the backing file.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Backend-specific failure.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl StorageError {
    /// Creates an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a corrupt-file error.
    pub fn corrupt(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Corrupt {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a generic backend error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}

// =============================================================================
// DecodeError
// =============================================================================

/// Reasons a token payload could not be decoded.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The token is not made of exactly three dot-separated segments.
    #[error("Expected 3 token segments, found {found}")]
    SegmentCount {
        /// Number of segments found.
        found: usize,
    },

    /// The payload segment is not valid base64.
    #[error("Invalid payload encoding: {0}")]
    Encoding(#[from] base64::DecodeError),

    /// The decoded payload is not valid JSON.
    #[error("Invalid payload JSON: {0}")]
    Payload(#[from] serde_json::Error),

    /// The decoded payload is JSON but not an object.
    #[error("Token payload is not a JSON object")]
    NotAnObject,
}

// =============================================================================
// Tests
// =============================================================================
