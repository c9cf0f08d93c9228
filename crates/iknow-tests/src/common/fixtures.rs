// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 IKnow Team. All rights reserved.

//! # Test Fixtures
//!
//! Tokens signed the way the backend signs them (HS256), with claims
//! relative to a fixed instant so expiry checks are deterministic.

use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Map, Value};

use iknow_auth::Token;

/// The instant every harness clock starts at (2025-06-15T15:06:40Z).
pub const NOW: i64 = 1_750_000_000;

/// One hour, in seconds.
pub const HOUR: i64 = 3_600;

/// Secret the fixtures sign with. The client never sees it.
const SECRET: &[u8] = b"iknow-test-secret";

/// Role outside the set the client routes.
pub const UNMAPPED_ROLE: &str = "moderator";

// =============================================================================
// Token Fixtures
// =============================================================================

/// Pre-built tokens.
pub struct TokenFixtures;

impl TokenFixtures {
    /// Signs an arbitrary claim object.
    pub fn sign(claims: &Value) -> Token {
        let raw = encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(SECRET),
        )
        .expect("Failed to sign fixture token");
        Token::new(raw)
    }

    /// A token for `role` that expires `ttl` seconds after [`NOW`].
    pub fn with_role(role: &str, ttl: i64) -> Token {
        Self::sign(&json!({
            "id": format!("{}-1", role),
            "role": role,
            "exp": NOW + ttl,
        }))
    }

    /// A valid student token.
    pub fn student() -> Token {
        Self::with_role("student", HOUR)
    }

    /// A valid admin token.
    pub fn admin() -> Token {
        Self::with_role("admin", HOUR)
    }

    /// A token expiring exactly at `exp`.
    pub fn expiring_at(role: &str, exp: i64) -> Token {
        Self::sign(&json!({ "id": "u-exp", "role": role, "exp": exp }))
    }

    /// A token that expired an hour before [`NOW`].
    pub fn expired(role: &str) -> Token {
        Self::expiring_at(role, NOW - HOUR)
    }

    /// A token without an `exp` claim.
    pub fn without_exp(role: &str) -> Token {
        Self::sign(&json!({ "id": "u-forever", "role": role }))
    }

    /// A token without a `role` claim.
    pub fn without_role() -> Token {
        Self::sign(&json!({ "id": "u-anon", "exp": NOW + HOUR }))
    }

    /// A valid token for a role the client does not route.
    pub fn unmapped() -> Token {
        Self::with_role(UNMAPPED_ROLE, HOUR)
    }

    /// A string that is not a token at all.
    pub fn malformed() -> Token {
        Token::new("definitely-not-a-token")
    }

    /// An email verification token, as handed out by the sign-up flow.
    pub fn verification(email: &str) -> Token {
        let mut claims = Map::new();
        claims.insert("email".to_string(), json!(email));
        claims.insert("purpose".to_string(), json!("verify"));
        claims.insert("exp".to_string(), json!(NOW + HOUR));
        Self::sign(&Value::Object(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_decode() {
        let claims = iknow_auth::decode(&TokenFixtures::student()).unwrap();
        assert_eq!(claims.role(), Some("student"));
        assert_eq!(claims.exp, Some(NOW + HOUR));

        let claims = iknow_auth::decode(&TokenFixtures::verification("a@b.ac.kr")).unwrap();
        assert_eq!(claims.email.as_deref(), Some("a@b.ac.kr"));
        assert!(claims.role().is_none());
    }
}
