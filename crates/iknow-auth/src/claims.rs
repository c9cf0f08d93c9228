// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 IKnow Team. All rights reserved.

//! Decoded token claims.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::role::ViewerRole;

/// Structural view of a token's payload.
///
/// Claims are derived, never stored: they are re-decoded from the current
/// token on every check because the token may have been replaced or removed
/// between checks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Claims {
    /// User ID (`id`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Role claim. Absent when missing, empty, or not a string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Expiration time (whole Unix seconds, rounded down).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Sub-second part of a fractional `exp`.
    #[serde(skip)]
    exp_nanos: u32,

    /// Email, carried by verification tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Every other payload field, untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    /// Builds claims from a decoded payload object.
    pub fn from_map(mut map: Map<String, Value>) -> Self {
        let id = map.remove("id").and_then(non_empty_string);
        let role = map.remove("role").and_then(non_empty_string);
        let (exp, exp_nanos) = match map.remove("exp").and_then(|v| unix_time(&v)) {
            Some((secs, nanos)) => (Some(secs), nanos),
            None => (None, 0),
        };
        let email = map.remove("email").and_then(non_empty_string);

        Self {
            id,
            role,
            exp,
            exp_nanos,
            email,
            extra: map,
        }
    }

    /// Returns the raw role claim.
    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    /// Returns the role if it is one the client knows how to route.
    pub fn viewer_role(&self) -> Option<ViewerRole> {
        self.role().and_then(ViewerRole::parse)
    }

    /// Returns the expiration time as a DateTime, sub-second part included.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp
            .and_then(|exp| DateTime::from_timestamp(exp, self.exp_nanos))
    }

    /// Returns `true` if the expiry instant is at or before `now`.
    ///
    /// Claims without `exp` never expire. An `exp` outside the representable
    /// range is compared in whole seconds.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match (self.expires_at(), self.exp) {
            (Some(at), _) => at <= now,
            (None, Some(exp)) => exp <= now.timestamp(),
            (None, None) => false,
        }
    }

    /// Returns the time remaining until expiration, if any.
    pub fn time_until_expiration(&self, now: DateTime<Utc>) -> Option<std::time::Duration> {
        let at = self.expires_at()?;
        if at > now {
            (at - now).to_std().ok()
        } else {
            None
        }
    }
}

fn non_empty_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s),
        _ => None,
    }
}

/// Splits an integer or float Unix timestamp into seconds and nanoseconds.
fn unix_time(value: &Value) -> Option<(i64, u32)> {
    if let Some(secs) = value.as_i64() {
        return Some((secs, 0));
    }

    let f = value.as_f64().filter(|f| f.is_finite())?;
    let secs = f.floor();
    let nanos = ((f - secs) * 1e9).round().min(999_999_999.0) as u32;
    Some((secs as i64, nanos))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims(value: Value) -> Claims {
        match value {
            Value::Object(map) => Claims::from_map(map),
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn test_claims_from_backend_payload() {
        let c = claims(json!({
            "id": "64f1c0ffee",
            "role": "student",
            "exp": 1_700_000_000
        }));

        assert_eq!(c.id.as_deref(), Some("64f1c0ffee"));
        assert_eq!(c.viewer_role(), Some(ViewerRole::Student));
        assert_eq!(c.exp, Some(1_700_000_000));
        assert!(c.extra.is_empty());
    }

    #[test]
    fn test_non_string_or_empty_role_is_absent() {
        assert_eq!(claims(json!({ "role": 7 })).role(), None);
        assert_eq!(claims(json!({ "role": "" })).role(), None);
        assert_eq!(claims(json!({ "role": null })).role(), None);
    }

    #[test]
    fn test_unknown_role_is_kept_raw() {
        let c = claims(json!({ "role": "moderator" }));
        assert_eq!(c.role(), Some("moderator"));
        assert_eq!(c.viewer_role(), None);
    }

    #[test]
    fn test_float_exp_is_accepted() {
        let c = claims(json!({ "exp": 1_700_000_000.75 }));
        assert_eq!(c.exp, Some(1_700_000_000));
        assert_eq!(
            c.expires_at(),
            DateTime::from_timestamp(1_700_000_000, 750_000_000)
        );
    }

    #[test]
    fn test_fractional_exp_compares_below_one_second() {
        let c = claims(json!({ "exp": 1_000.75 }));

        let before = DateTime::from_timestamp(1_000, 500_000_000).unwrap();
        let at = DateTime::from_timestamp(1_000, 750_000_000).unwrap();
        let after = DateTime::from_timestamp(1_000, 900_000_000).unwrap();

        assert!(!c.is_expired_at(before));
        assert!(c.is_expired_at(at));
        assert!(c.is_expired_at(after));
        assert_eq!(
            c.time_until_expiration(before),
            Some(std::time::Duration::from_millis(250))
        );
    }

    #[test]
    fn test_expiry_is_at_or_before_now() {
        let now = DateTime::from_timestamp(1_000, 500_000_000).unwrap();

        assert!(claims(json!({ "exp": 999 })).is_expired_at(now));
        assert!(claims(json!({ "exp": 1_000 })).is_expired_at(now));
        assert!(!claims(json!({ "exp": 1_001 })).is_expired_at(now));
        assert!(!claims(json!({})).is_expired_at(now));
    }

    #[test]
    fn test_time_until_expiration() {
        let now = DateTime::from_timestamp(1_000, 0).unwrap();

        let c = claims(json!({ "exp": 1_060 }));
        assert_eq!(
            c.time_until_expiration(now),
            Some(std::time::Duration::from_secs(60))
        );
        assert!(claims(json!({ "exp": 900 })).time_until_expiration(now).is_none());
    }

    #[test]
    fn test_extra_fields_are_preserved() {
        let c = claims(json!({ "role": "admin", "iat": 5, "iss": "iknow" }));
        assert_eq!(c.extra.get("iss"), Some(&json!("iknow")));
        assert_eq!(c.extra.get("iat"), Some(&json!(5)));
    }
}
