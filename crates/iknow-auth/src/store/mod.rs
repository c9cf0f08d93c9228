// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 IKnow Team. All rights reserved.

//! Token store and its storage backends.
//!
//! [`TokenStore`] is the sole authority for reading, writing and erasing the
//! persisted credential. UI code never touches a backend directly, so the
//! backing mechanism can be swapped:
//!
//! - [`MemoryStorage`]: in-process map (tests, embedded use)
//! - [`FileStorage`]: JSON key-value file (native clients, the CLI)
//! - [`UnavailableStorage`]: no persistent storage at all (pre-hydration)

mod backend;
mod file;
mod memory;

pub use backend::{StorageBackend, UnavailableStorage};
pub use file::FileStorage;
pub use memory::MemoryStorage;

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::StorageResult;
use crate::token::Token;

// =============================================================================
// TokenStore
// =============================================================================

/// The single persisted credential.
///
/// Cloning a `TokenStore` yields a handle on the same backend slot.
#[derive(Clone)]
pub struct TokenStore {
    backend: Arc<dyn StorageBackend>,
    key: String,
}

impl TokenStore {
    /// Creates a store over `backend` using the default `"token"` key.
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self::with_key(backend, crate::DEFAULT_STORAGE_KEY)
    }

    /// Creates a store over `backend` using a custom key.
    pub fn with_key(backend: Arc<dyn StorageBackend>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// Returns the storage key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the stored token.
    ///
    /// Returns `None` when nothing is stored, when the environment has no
    /// persistent storage, or when the backend fails to read. A read failure
    /// is logged, never propagated.
    pub fn get(&self) -> Option<Token> {
        if !self.backend.is_available() {
            return None;
        }

        match self.backend.get_item(&self.key) {
            Ok(value) => value.map(Token::new),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read token, treating as absent");
                None
            }
        }
    }

    /// Stores `token`, overwriting any existing one.
    ///
    /// A no-op when the environment has no persistent storage.
    pub fn set(&self, token: &Token) -> StorageResult<()> {
        if !self.backend.is_available() {
            debug!(key = %self.key, "Storage unavailable, token not persisted");
            return Ok(());
        }
        self.backend.set_item(&self.key, token.as_str())
    }

    /// Erases the stored token. Succeeds when nothing was stored.
    pub fn remove(&self) -> StorageResult<()> {
        if !self.backend.is_available() {
            return Ok(());
        }
        self.backend.remove_item(&self.key)
    }

    /// Returns `true` iff a non-empty token is stored.
    pub fn exists(&self) -> bool {
        self.get().is_some_and(|token| !token.is_empty())
    }
}

impl fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenStore")
            .field("key", &self.key)
            .field("backend", &self.backend)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;

    #[derive(Debug)]
    struct BrokenBackend;

    impl StorageBackend for BrokenBackend {
        fn get_item(&self, _key: &str) -> StorageResult<Option<String>> {
            Err(StorageError::backend("disk on fire"))
        }

        fn set_item(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::backend("disk on fire"))
        }

        fn remove_item(&self, _key: &str) -> StorageResult<()> {
            Err(StorageError::backend("disk on fire"))
        }
    }

    #[test]
    fn test_set_get_remove() {
        let store = TokenStore::new(Arc::new(MemoryStorage::new()));
        assert!(store.get().is_none());
        assert!(!store.exists());

        store.set(&Token::new("a.b.c")).unwrap();
        assert_eq!(store.get(), Some(Token::new("a.b.c")));
        assert!(store.exists());

        store.set(&Token::new("d.e.f")).unwrap();
        assert_eq!(store.get(), Some(Token::new("d.e.f")));

        store.remove().unwrap();
        assert!(store.get().is_none());
        store.remove().unwrap();
    }

    #[test]
    fn test_empty_token_does_not_exist() {
        let store = TokenStore::new(Arc::new(MemoryStorage::new()));
        store.set(&Token::new("")).unwrap();

        assert_eq!(store.get(), Some(Token::new("")));
        assert!(!store.exists());
    }

    #[test]
    fn test_unavailable_storage_is_absent() {
        let store = TokenStore::new(Arc::new(UnavailableStorage));

        store.set(&Token::new("a.b.c")).unwrap();
        assert!(store.get().is_none());
        assert!(!store.exists());
        store.remove().unwrap();
    }

    #[test]
    fn test_read_failure_is_absent() {
        let store = TokenStore::new(Arc::new(BrokenBackend));
        assert!(store.get().is_none());
        assert!(!store.exists());
        assert!(store.set(&Token::new("x")).is_err());
    }

    #[test]
    fn test_custom_key_is_isolated() {
        let backend = Arc::new(MemoryStorage::new());
        let default = TokenStore::new(backend.clone());
        let other = TokenStore::with_key(backend, "other");

        default.set(&Token::new("a.b.c")).unwrap();
        assert!(other.get().is_none());
        assert_eq!(other.key(), "other");
    }
}
