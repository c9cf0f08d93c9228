// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 IKnow Team. All rights reserved.

//! Route authorization guard.
//!
//! A [`RouteGuard`] wraps a page subtree and enforces "only viewers with the
//! required role, and only while their claims are not expired, may render
//! this subtree".
//!
//! # Decision table
//!
//! ```text
//! no token                         -> login
//! undecodable / no role / expired  -> login (token erased)
//! role != required, mapped role    -> that role's landing route
//! role != required, unmapped role  -> RouteTable::unmapped_role, or nowhere
//! otherwise                        -> allow
//! ```
//!
//! With no required role the role-match step is skipped, but the viewer must
//! still be authenticated and unexpired.
//!
//! # Rendering
//!
//! The gate is tri-state ([`GateState`]). Under [`RenderPolicy::Blocking`]
//! the protected subtree is withheld until the check has allowed it; under
//! [`RenderPolicy::Eager`] it renders while the check is still pending, which
//! is how the original web client behaved.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::decoder::decode;
use crate::navigator::Navigator;
use crate::routes::RouteTable;
use crate::store::TokenStore;
use crate::token::Token;

// =============================================================================
// Policy & State
// =============================================================================

/// When the protected subtree may render relative to the check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderPolicy {
    /// Verify, then render. Nothing renders while the gate is pending.
    #[default]
    Blocking,
    /// Render, then verify. Content renders while pending and is withdrawn
    /// only once the check denies it.
    Eager,
}

/// The gate's current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Not yet checked (or unmounted).
    Pending,
    /// The viewer may see the subtree.
    Allowed,
    /// The viewer may not see the subtree.
    Denied,
}

// =============================================================================
// Decision
// =============================================================================

/// Why a viewer was turned away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    /// No token is stored.
    MissingToken,
    /// The token could not be decoded.
    Malformed {
        /// Decoder error message.
        message: String,
    },
    /// The token carries no usable role.
    MissingRole,
    /// The token's expiry instant has passed.
    Expired {
        /// Expiration time (Unix seconds).
        exp: i64,
    },
    /// The viewer's role differs from the page's requirement.
    RoleMismatch {
        /// The viewer's role.
        actual: String,
        /// The page's required role.
        required: String,
    },
    /// Role mismatch for a role with no landing route.
    UnmappedRole {
        /// The viewer's role.
        role: String,
    },
}

impl DenyReason {
    /// Returns `true` if the stored token is unusable and should be erased.
    pub fn invalidates_token(&self) -> bool {
        matches!(
            self,
            DenyReason::Malformed { .. } | DenyReason::MissingRole | DenyReason::Expired { .. }
        )
    }

    /// Returns a short label for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            DenyReason::MissingToken => "missing_token",
            DenyReason::Malformed { .. } => "malformed",
            DenyReason::MissingRole => "missing_role",
            DenyReason::Expired { .. } => "expired",
            DenyReason::RoleMismatch { .. } => "role_mismatch",
            DenyReason::UnmappedRole { .. } => "unmapped_role",
        }
    }
}

/// The outcome of evaluating a guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the subtree.
    Allow,
    /// Withhold the subtree, optionally replace-navigating elsewhere.
    Deny {
        /// Why access was denied.
        reason: DenyReason,
        /// Where to send the viewer, if anywhere.
        redirect: Option<String>,
    },
}

impl GuardDecision {
    fn deny(reason: DenyReason, redirect: impl Into<Option<String>>) -> Self {
        GuardDecision::Deny {
            reason,
            redirect: redirect.into(),
        }
    }

    /// Returns `true` for [`GuardDecision::Allow`].
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }

    /// Returns the redirect target, if any.
    pub fn redirect(&self) -> Option<&str> {
        match self {
            GuardDecision::Allow => None,
            GuardDecision::Deny { redirect, .. } => redirect.as_deref(),
        }
    }

    /// Returns the deny reason, if any.
    pub fn reason(&self) -> Option<&DenyReason> {
        match self {
            GuardDecision::Allow => None,
            GuardDecision::Deny { reason, .. } => Some(reason),
        }
    }
}

// =============================================================================
// RouteGuard
// =============================================================================

/// Gate for a page subtree that requires an authenticated viewer.
///
/// `mount` and `set_required_role` are idempotent and safe to re-run; each
/// run re-decodes the token currently in the store.
pub struct RouteGuard {
    store: TokenStore,
    navigator: Arc<dyn Navigator>,
    clock: Arc<dyn Clock>,
    routes: RouteTable,
    required_role: Option<String>,
    render_policy: RenderPolicy,
    purge_invalid_tokens: bool,
    state: GateState,
    mounted: bool,
}

impl RouteGuard {
    /// Creates a guard accepting any authenticated role.
    pub fn new(store: TokenStore, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            store,
            navigator,
            clock: Arc::new(SystemClock),
            routes: RouteTable::default(),
            required_role: None,
            render_policy: RenderPolicy::default(),
            purge_invalid_tokens: true,
            state: GateState::Pending,
            mounted: false,
        }
    }

    /// Sets the required role. An empty string means "any role".
    pub fn require_role(mut self, role: impl Into<String>) -> Self {
        self.required_role = normalize_role(Some(role.into()));
        self
    }

    /// Sets the clock used for expiry checks.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Sets the route table.
    pub fn with_routes(mut self, routes: RouteTable) -> Self {
        self.routes = routes;
        self
    }

    /// Sets the render policy.
    pub fn with_render_policy(mut self, policy: RenderPolicy) -> Self {
        self.render_policy = policy;
        self
    }

    /// Enables or disables erasing unusable tokens on detection.
    pub fn with_purge_invalid_tokens(mut self, enabled: bool) -> Self {
        self.purge_invalid_tokens = enabled;
        self
    }

    /// Returns the required role.
    pub fn required_role(&self) -> Option<&str> {
        self.required_role.as_deref()
    }

    /// Returns the gate state.
    pub fn state(&self) -> GateState {
        self.state
    }

    /// Returns the render policy.
    pub fn render_policy(&self) -> RenderPolicy {
        self.render_policy
    }

    /// Evaluates the guard against the stored token, without navigating or
    /// touching the store.
    pub fn evaluate(&self) -> GuardDecision {
        self.evaluate_token(self.store.get().as_ref(), self.clock.now())
    }

    /// Evaluates the guard against an explicit token and instant.
    pub fn evaluate_token(&self, token: Option<&Token>, now: DateTime<Utc>) -> GuardDecision {
        let login = || Some(self.routes.login.clone());

        let token = match token {
            Some(token) if !token.is_empty() => token,
            _ => return GuardDecision::deny(DenyReason::MissingToken, login()),
        };

        let claims = match decode(token) {
            Ok(claims) => claims,
            Err(e) => {
                return GuardDecision::deny(
                    DenyReason::Malformed {
                        message: e.to_string(),
                    },
                    login(),
                )
            }
        };

        let role = match claims.role() {
            Some(role) => role,
            None => return GuardDecision::deny(DenyReason::MissingRole, login()),
        };

        if claims.is_expired_at(now) {
            let exp = claims.exp.unwrap_or_default();
            return GuardDecision::deny(DenyReason::Expired { exp }, login());
        }

        let required = match self.required_role.as_deref() {
            None => return GuardDecision::Allow,
            Some(required) if required == role => return GuardDecision::Allow,
            Some(required) => required,
        };

        match claims.viewer_role() {
            Some(known) => GuardDecision::deny(
                DenyReason::RoleMismatch {
                    actual: role.to_string(),
                    required: required.to_string(),
                },
                Some(self.routes.home_for(known).to_string()),
            ),
            None => GuardDecision::deny(
                DenyReason::UnmappedRole {
                    role: role.to_string(),
                },
                self.routes.unmapped_role.clone(),
            ),
        }
    }

    /// Runs the check for a freshly mounted page.
    pub fn mount(&mut self) -> GateState {
        self.mounted = true;
        self.run()
    }

    /// Re-runs the check if the guard is mounted.
    pub fn recheck(&mut self) -> GateState {
        if self.mounted {
            self.run()
        } else {
            self.state
        }
    }

    /// Changes the required role, re-running the check when it changed.
    pub fn set_required_role(&mut self, role: Option<&str>) -> GateState {
        let role = normalize_role(role.map(str::to_string));
        if role == self.required_role {
            return self.state;
        }
        self.required_role = role;
        self.recheck()
    }

    /// Detaches the guard. Later re-checks are silent no-ops until the next
    /// [`mount`](Self::mount).
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.state = GateState::Pending;
    }

    /// Renders `children` if the gate and render policy allow it.
    pub fn render<T>(&self, children: impl FnOnce() -> T) -> Option<T> {
        let visible = match self.state {
            GateState::Allowed => true,
            GateState::Pending => self.render_policy == RenderPolicy::Eager,
            GateState::Denied => false,
        };
        visible.then(children)
    }

    fn run(&mut self) -> GateState {
        let decision = self.evaluate();
        self.state = self.apply(&decision);
        self.state
    }

    fn apply(&self, decision: &GuardDecision) -> GateState {
        let (reason, redirect) = match decision {
            GuardDecision::Allow => {
                debug!(required_role = ?self.required_role, "Route guard allowed");
                return GateState::Allowed;
            }
            GuardDecision::Deny { reason, redirect } => (reason, redirect),
        };

        debug!(
            required_role = ?self.required_role,
            reason = reason.as_str(),
            redirect = ?redirect,
            "Route guard denied"
        );

        if self.purge_invalid_tokens && reason.invalidates_token() {
            if let Err(e) = self.store.remove() {
                warn!(error = %e, "Failed to erase unusable token");
            }
        }

        if let Some(path) = redirect {
            self.navigator.replace(path);
        }

        GateState::Denied
    }
}

impl std::fmt::Debug for RouteGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteGuard")
            .field("required_role", &self.required_role)
            .field("render_policy", &self.render_policy)
            .field("state", &self.state)
            .field("mounted", &self.mounted)
            .finish()
    }
}

fn normalize_role(role: Option<String>) -> Option<String> {
    role.map(|r| r.trim().to_string()).filter(|r| !r.is_empty())
}

// =============================================================================
// Tests
// =============================================================================
