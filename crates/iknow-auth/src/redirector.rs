// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 IKnow Team. All rights reserved.

//! Logged-in redirector for public-only pages.
//!
//! Placed on pages such as login and signup: when the viewer already appears
//! to be signed in, they are sent away before they can interact.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::decoder::decode;
use crate::navigator::Navigator;
use crate::routes::RouteTable;
use crate::store::TokenStore;

/// What counts as "already signed in".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedirectPolicy {
    /// Any non-empty stored token, valid or not, redirects to the generic
    /// home route.
    #[default]
    Presence,
    /// Only a decodable, role-bearing, unexpired token redirects, to that
    /// role's landing route (falling back to the generic home route).
    Strict,
}

/// Gate that sends authenticated viewers away from public-only pages.
pub struct LoggedInRedirector {
    store: TokenStore,
    navigator: Arc<dyn Navigator>,
    clock: Arc<dyn Clock>,
    routes: RouteTable,
    policy: RedirectPolicy,
}

impl LoggedInRedirector {
    /// Creates a redirector with the [`RedirectPolicy::Presence`] policy.
    pub fn new(store: TokenStore, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            store,
            navigator,
            clock: Arc::new(SystemClock),
            routes: RouteTable::default(),
            policy: RedirectPolicy::default(),
        }
    }

    /// Sets the clock used by the strict policy.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Sets the route table.
    pub fn with_routes(mut self, routes: RouteTable) -> Self {
        self.routes = routes;
        self
    }

    /// Sets the redirect policy.
    pub fn with_policy(mut self, policy: RedirectPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the redirect policy.
    pub fn policy(&self) -> RedirectPolicy {
        self.policy
    }

    /// Returns where the viewer would be sent, without navigating.
    pub fn evaluate(&self) -> Option<String> {
        match self.policy {
            RedirectPolicy::Presence => self
                .store
                .exists()
                .then(|| self.routes.home.clone()),
            RedirectPolicy::Strict => self.evaluate_strict(),
        }
    }

    fn evaluate_strict(&self) -> Option<String> {
        let token = self.store.get().filter(|t| !t.is_empty())?;
        let claims = decode(&token).ok()?;
        let role = claims.role()?;
        if claims.is_expired_at(self.clock.now()) {
            return None;
        }

        let landing = self.routes.landing_for(role).unwrap_or(self.routes.home.as_str());
        Some(landing.to_string())
    }

    /// Runs the check for a freshly mounted page, replace-navigating when the
    /// viewer is signed in. Returns the target, if any.
    pub fn mount(&self) -> Option<String> {
        let target = self.evaluate()?;
        debug!(policy = ?self.policy, target = %target, "Signed-in viewer redirected");
        self.navigator.replace(&target);
        Some(target)
    }
}

impl std::fmt::Debug for LoggedInRedirector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggedInRedirector")
            .field("policy", &self.policy)
            .field("store", &self.store)
            .finish()
    }
}
