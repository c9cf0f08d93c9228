// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 IKnow Team. All rights reserved.

//! Auth configuration and the shared context that wires the gates together.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};
use crate::error::{AuthError, AuthResult};
use crate::guard::{RenderPolicy, RouteGuard};
use crate::navigator::Navigator;
use crate::redirector::{LoggedInRedirector, RedirectPolicy};
use crate::routes::RouteTable;
use crate::session::Session;
use crate::store::{StorageBackend, TokenStore};

// =============================================================================
// AuthConfig
// =============================================================================

/// Auth core configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Storage key for the bearer token.
    pub storage_key: String,

    /// Navigation targets.
    pub routes: RouteTable,

    /// When guarded content may render.
    pub render_policy: RenderPolicy,

    /// What the logged-in redirector treats as signed in.
    pub redirect_policy: RedirectPolicy,

    /// Erase malformed, role-less or expired tokens when a guard sees them.
    pub purge_invalid_tokens: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            storage_key: crate::DEFAULT_STORAGE_KEY.to_string(),
            routes: RouteTable::default(),
            render_policy: RenderPolicy::default(),
            redirect_policy: RedirectPolicy::default(),
            purge_invalid_tokens: true,
        }
    }
}

impl AuthConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> AuthResult<()> {
        if self.storage_key.trim().is_empty() {
            return Err(AuthError::invalid_config(
                "storage_key",
                "storage key cannot be empty",
            ));
        }
        self.routes.validate()
    }
}

// =============================================================================
// AuthContext
// =============================================================================

/// Shared collaborators for every gate on a page tree.
#[derive(Clone)]
pub struct AuthContext {
    config: Arc<AuthConfig>,
    store: TokenStore,
    navigator: Arc<dyn Navigator>,
    clock: Arc<dyn Clock>,
}

impl AuthContext {
    /// Creates a context over `backend`, navigating through `navigator`.
    pub fn new(
        config: AuthConfig,
        backend: Arc<dyn StorageBackend>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let store = TokenStore::with_key(backend, config.storage_key.clone());
        Self {
            config: Arc::new(config),
            store,
            navigator,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Returns the token store.
    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    /// Returns the clock.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Builds a guard. `None` or `Some("")` accepts any authenticated role.
    pub fn guard(&self, required_role: Option<&str>) -> RouteGuard {
        let guard = RouteGuard::new(self.store.clone(), self.navigator.clone())
            .with_clock(self.clock.clone())
            .with_routes(self.config.routes.clone())
            .with_render_policy(self.config.render_policy)
            .with_purge_invalid_tokens(self.config.purge_invalid_tokens);

        match required_role {
            Some(role) => guard.require_role(role),
            None => guard,
        }
    }

    /// Builds a logged-in redirector.
    pub fn redirector(&self) -> LoggedInRedirector {
        LoggedInRedirector::new(self.store.clone(), self.navigator.clone())
            .with_clock(self.clock.clone())
            .with_routes(self.config.routes.clone())
            .with_policy(self.config.redirect_policy)
    }

    /// Builds a session.
    pub fn session(&self) -> Session {
        Session::new(self.store.clone(), self.navigator.clone())
            .with_clock(self.clock.clone())
            .with_routes(self.config.routes.clone())
    }
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("config", &self.config)
            .field("store", &self.store)
            .finish()
    }
}
