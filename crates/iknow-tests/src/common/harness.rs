// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 IKnow Team. All rights reserved.

//! # Test Harness
//!
//! [`AuthHarness`] wires a storage backend, a recording navigator and a
//! frozen clock into an [`AuthContext`], the same way a page tree receives
//! them in production.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Duration;
use tempfile::TempDir;

use iknow_auth::{
    AuthConfig, AuthContext, FileStorage, FixedClock, LoggedInRedirector, MemoryStorage,
    RecordingNavigator, RouteGuard, Session, StorageBackend, Token, TokenStore,
};

use super::fixtures::NOW;
use super::init_test_logging;

// =============================================================================
// Harness Configuration
// =============================================================================

/// Which backend the harness stores tokens in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HarnessBackend {
    /// In-process map.
    #[default]
    Memory,
    /// JSON file in a temporary directory.
    File,
}

/// Configuration for [`AuthHarness`].
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Auth configuration handed to the context.
    pub auth: AuthConfig,
    /// Storage backend kind.
    pub backend: HarnessBackend,
    /// Initial clock reading (Unix seconds).
    pub now: i64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            auth: AuthConfig::default(),
            backend: HarnessBackend::Memory,
            now: NOW,
        }
    }
}

// =============================================================================
// AuthHarness
// =============================================================================

/// A fully wired auth context for a single test.
pub struct AuthHarness {
    /// The context under test.
    pub ctx: AuthContext,
    /// Records every replace navigation.
    pub navigator: Arc<RecordingNavigator>,
    /// The clock the context reads.
    pub clock: Arc<FixedClock>,
    backend: Arc<dyn StorageBackend>,
    storage_path: Option<PathBuf>,
    _temp_dir: Option<TempDir>,
}

impl AuthHarness {
    /// Creates a harness with defaults: memory storage, clock at [`NOW`].
    pub fn new() -> Self {
        Self::with_config(HarnessConfig::default())
    }

    /// Creates a harness with a custom auth configuration.
    pub fn with_auth(auth: AuthConfig) -> Self {
        Self::with_config(HarnessConfig {
            auth,
            ..Default::default()
        })
    }

    /// Creates a harness backed by a JSON file in a temporary directory.
    pub fn with_file_storage() -> Self {
        Self::with_config(HarnessConfig {
            backend: HarnessBackend::File,
            ..Default::default()
        })
    }

    /// Creates a harness over an explicit backend.
    pub fn with_backend(backend: Arc<dyn StorageBackend>) -> Self {
        Self::assemble(HarnessConfig::default(), backend, None, None)
    }

    /// Creates a harness from a full configuration.
    pub fn with_config(config: HarnessConfig) -> Self {
        match config.backend {
            HarnessBackend::Memory => {
                Self::assemble(config, Arc::new(MemoryStorage::new()), None, None)
            }
            HarnessBackend::File => {
                let dir = super::temp_test_dir("iknow-harness");
                let path = dir.path().join("storage.json");
                let backend = Arc::new(FileStorage::new(&path));
                Self::assemble(config, backend, Some(path), Some(dir))
            }
        }
    }

    fn assemble(
        config: HarnessConfig,
        backend: Arc<dyn StorageBackend>,
        storage_path: Option<PathBuf>,
        temp_dir: Option<TempDir>,
    ) -> Self {
        init_test_logging();

        let navigator = Arc::new(RecordingNavigator::new());
        let clock = Arc::new(FixedClock::at_timestamp(config.now));
        let ctx = AuthContext::new(config.auth, backend.clone(), navigator.clone())
            .with_clock(clock.clone());

        Self {
            ctx,
            navigator,
            clock,
            backend,
            storage_path,
            _temp_dir: temp_dir,
        }
    }

    /// The token store.
    pub fn store(&self) -> &TokenStore {
        self.ctx.store()
    }

    /// The raw backend.
    pub fn backend(&self) -> &Arc<dyn StorageBackend> {
        &self.backend
    }

    /// Path of the storage file, for file-backed harnesses.
    pub fn storage_path(&self) -> Option<&Path> {
        self.storage_path.as_deref()
    }

    /// Stores `token` directly, as a previous page visit would have.
    pub fn store_token(&self, token: &Token) {
        self.store().set(token).expect("Failed to store token");
    }

    /// Builds a guard.
    pub fn guard(&self, required_role: Option<&str>) -> RouteGuard {
        self.ctx.guard(required_role)
    }

    /// Builds and mounts a guard, returning it.
    pub fn mount_guard(&self, required_role: Option<&str>) -> RouteGuard {
        let mut guard = self.guard(required_role);
        guard.mount();
        guard
    }

    /// Builds a logged-in redirector.
    pub fn redirector(&self) -> LoggedInRedirector {
        self.ctx.redirector()
    }

    /// Builds a session.
    pub fn session(&self) -> Session {
        self.ctx.session()
    }

    /// Moves the clock forward.
    pub fn advance(&self, secs: i64) {
        self.clock.advance(Duration::seconds(secs));
    }

    /// Opens a second context over the same backend, as another tab would.
    pub fn sibling(&self) -> AuthContext {
        AuthContext::new(
            self.ctx.config().clone(),
            self.backend.clone(),
            self.navigator.clone(),
        )
        .with_clock(self.clock.clone())
    }
}

impl Default for AuthHarness {
    fn default() -> Self {
        Self::new()
    }
}
