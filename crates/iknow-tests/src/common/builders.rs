// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 IKnow Team. All rights reserved.

//! # Test Builders
//!
//! Hand-assembled tokens. Unlike the fixtures these are never signed, so
//! they can carry payloads no backend would issue.

use base64::engine::general_purpose::{STANDARD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine as _;
use serde_json::{json, Map, Value};

use iknow_auth::Token;

/// Base64 alphabet used for the payload segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PayloadEncoding {
    /// URL-safe, unpadded (what JWT libraries emit).
    #[default]
    UrlSafe,
    /// URL-safe with `=` padding.
    UrlSafePadded,
    /// Standard alphabet with padding.
    Standard,
}

/// Builder for raw three-segment tokens.
#[derive(Debug, Clone)]
pub struct TokenBuilder {
    payload: Map<String, Value>,
    raw_payload: Option<String>,
    encoding: PayloadEncoding,
    signature: String,
}

impl Default for TokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenBuilder {
    /// Creates a builder with an empty payload.
    pub fn new() -> Self {
        Self {
            payload: Map::new(),
            raw_payload: None,
            encoding: PayloadEncoding::default(),
            signature: "signature".to_string(),
        }
    }

    /// Sets the `role` claim.
    pub fn role(self, role: &str) -> Self {
        self.claim("role", json!(role))
    }

    /// Sets the `exp` claim.
    pub fn exp(self, exp: i64) -> Self {
        self.claim("exp", json!(exp))
    }

    /// Sets the `id` claim.
    pub fn id(self, id: &str) -> Self {
        self.claim("id", json!(id))
    }

    /// Sets any claim to any JSON value.
    pub fn claim(mut self, name: &str, value: Value) -> Self {
        self.payload.insert(name.to_string(), value);
        self
    }

    /// Replaces the payload with raw text, bypassing JSON serialization.
    pub fn raw_payload(mut self, text: &str) -> Self {
        self.raw_payload = Some(text.to_string());
        self
    }

    /// Sets the payload alphabet.
    pub fn encoding(mut self, encoding: PayloadEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Sets the signature segment.
    pub fn signature(mut self, signature: &str) -> Self {
        self.signature = signature.to_string();
        self
    }

    /// Builds the token.
    pub fn build(self) -> Token {
        let text = self
            .raw_payload
            .unwrap_or_else(|| Value::Object(self.payload).to_string());

        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = match self.encoding {
            PayloadEncoding::UrlSafe => URL_SAFE_NO_PAD.encode(&text),
            PayloadEncoding::UrlSafePadded => URL_SAFE.encode(&text),
            PayloadEncoding::Standard => STANDARD.encode(&text),
        };

        Token::new(format!("{}.{}.{}", header, payload, self.signature))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_produces_three_segments() {
        let token = TokenBuilder::new().role("student").exp(10).build();
        assert_eq!(token.segments().len(), 3);
        assert!(token.as_str().ends_with(".signature"));
    }
}
