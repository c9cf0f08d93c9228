// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 IKnow Team. All rights reserved.

//! Sign-in, sign-out and the outgoing `Authorization` header.

use std::sync::Arc;

use tracing::{info, warn};

use crate::claims::Claims;
use crate::clock::{Clock, SystemClock};
use crate::decoder::decode;
use crate::error::StorageResult;
use crate::navigator::Navigator;
use crate::role::ViewerRole;
use crate::routes::RouteTable;
use crate::store::TokenStore;
use crate::token::Token;

/// Session operations over the token store.
pub struct Session {
    store: TokenStore,
    navigator: Arc<dyn Navigator>,
    clock: Arc<dyn Clock>,
    routes: RouteTable,
}

impl Session {
    /// Creates a session with default routes and the system clock.
    pub fn new(store: TokenStore, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            store,
            navigator,
            clock: Arc::new(SystemClock),
            routes: RouteTable::default(),
        }
    }

    /// Sets the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Sets the route table.
    pub fn with_routes(mut self, routes: RouteTable) -> Self {
        self.routes = routes;
        self
    }

    /// Returns the token store.
    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    /// Returns the route table.
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Persists a freshly issued token, then replace-navigates to the
    /// landing route for its role. Returns the landing route.
    ///
    /// Admins land on the dashboard; everyone else, including holders of an
    /// undecodable token, lands on the student home.
    pub fn sign_in(&self, token: Token) -> StorageResult<String> {
        self.store.set(&token)?;

        let landing = self.landing_after_sign_in(&token).to_string();
        info!(landing = %landing, "Signed in");
        self.navigator.replace(&landing);
        Ok(landing)
    }

    /// Returns the post-sign-in landing route for `token`.
    pub fn landing_after_sign_in(&self, token: &Token) -> &str {
        match decode(token).ok().and_then(|c| c.viewer_role()) {
            Some(ViewerRole::Admin) => &self.routes.admin_dashboard,
            _ => &self.routes.student_home,
        }
    }

    /// Erases the token and replace-navigates to the login page.
    ///
    /// Navigation happens even when erasing fails; the failure is returned.
    pub fn sign_out(&self) -> StorageResult<()> {
        let removed = self.store.remove();
        if let Err(e) = &removed {
            warn!(error = %e, "Failed to erase token on sign-out");
        }

        info!("Signed out");
        self.navigator.replace(&self.routes.login);
        removed
    }

    /// Stores a token handed over by an external flow and replace-navigates
    /// to `path`.
    pub(crate) fn adopt(&self, token: &Token, path: &str) -> StorageResult<()> {
        self.store.set(token)?;
        self.navigator.replace(path);
        Ok(())
    }

    /// Returns the stored token, if any.
    pub fn token(&self) -> Option<Token> {
        self.store.get().filter(|t| !t.is_empty())
    }

    /// Returns `Bearer <token>` for outgoing requests, if a token is stored.
    pub fn authorization_header(&self) -> Option<String> {
        self.token().map(|t| t.authorization_header())
    }

    /// Decodes the stored token's claims.
    pub fn claims(&self) -> Option<Claims> {
        decode(&self.token()?).ok()
    }

    /// Returns `true` if the stored token is decodable, carries a role and
    /// has not expired.
    pub fn is_authenticated(&self) -> bool {
        self.claims()
            .is_some_and(|c| c.role().is_some() && !c.is_expired_at(self.clock.now()))
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("store", &self.store)
            .field("routes", &self.routes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::navigator::RecordingNavigator;
    use crate::store::MemoryStorage;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine as _;

    fn setup() -> (Session, Arc<RecordingNavigator>) {
        let store = TokenStore::new(Arc::new(MemoryStorage::new()));
        let nav = Arc::new(RecordingNavigator::new());
        let session = Session::new(store, nav.clone())
            .with_clock(Arc::new(FixedClock::at_timestamp(1_000)));
        (session, nav)
    }

    fn token(payload: &str) -> Token {
        Token::new(format!("hdr.{}.sig", URL_SAFE_NO_PAD.encode(payload)))
    }

    #[test]
    fn test_sign_in_lands_by_role() {
        let (session, nav) = setup();

        let landing = session.sign_in(token(r#"{"role":"admin"}"#)).unwrap();
        assert_eq!(landing, "/admin/dashboard");

        session.sign_in(token(r#"{"role":"student"}"#)).unwrap();
        session.sign_in(Token::new("opaque")).unwrap();

        assert_eq!(
            nav.history(),
            vec!["/admin/dashboard", "/home/posts", "/home/posts"]
        );
        assert_eq!(session.token(), Some(Token::new("opaque")));
    }

    #[test]
    fn test_sign_out_erases_and_goes_to_login() {
        let (session, nav) = setup();
        session.sign_in(token(r#"{"role":"student"}"#)).unwrap();

        session.sign_out().unwrap();

        assert!(session.token().is_none());
        assert!(session.authorization_header().is_none());
        assert_eq!(nav.last().as_deref(), Some("/auth/login"));
    }

    #[test]
    fn test_authorization_header() {
        let (session, _) = setup();
        session.store().set(&Token::new("a.b.c")).unwrap();

        assert_eq!(session.authorization_header().as_deref(), Some("Bearer a.b.c"));
    }

    #[test]
    fn test_is_authenticated() {
        let (session, _) = setup();
        assert!(!session.is_authenticated());

        session.store().set(&token(r#"{"role":"student","exp":2000}"#)).unwrap();
        assert!(session.is_authenticated());

        session.store().set(&token(r#"{"role":"student","exp":1000}"#)).unwrap();
        assert!(!session.is_authenticated());

        session.store().set(&token(r#"{"exp":2000}"#)).unwrap();
        assert!(!session.is_authenticated());
    }
}
