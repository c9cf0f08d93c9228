// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 IKnow Team. All rights reserved.

//! Bearer token type.

use std::fmt;

/// An opaque bearer credential issued by the backend.
///
/// Structurally a three-part signed token (`header.payload.signature`), but
/// the client treats it as untrusted input beyond the claims it can decode
/// locally. `Debug` output never contains the token itself.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    /// Wraps a raw token string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the raw token string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the token is the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the dot-separated segments of the token.
    pub fn segments(&self) -> Vec<&str> {
        self.0.split('.').collect()
    }

    /// Returns the value for an `Authorization` header.
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.0)
    }

    /// Consumes the token and returns the raw string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("len", &self.0.len())
            .field("segments", &self.0.split('.').count())
            .finish()
    }
}

impl From<String> for Token {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<&str> for Token {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let token = Token::new("aaa.bbb.ccc");
        let debug = format!("{:?}", token);

        assert!(!debug.contains("bbb"));
        assert!(debug.contains("segments: 3"));
    }

    #[test]
    fn test_authorization_header() {
        let token = Token::from("abc.def.ghi");
        assert_eq!(token.authorization_header(), "Bearer abc.def.ghi");
        assert_eq!(token.segments(), vec!["abc", "def", "ghi"]);
    }
}
