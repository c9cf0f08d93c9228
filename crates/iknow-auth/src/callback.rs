// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 IKnow Team. All rights reserved.

//! OAuth callback handling.
//!
//! The backend finishes the provider handshake by redirecting to the client's
//! callback page with the issued token in the `token` query parameter (or,
//! for some providers, in the URL fragment).

use tracing::{debug, info};
use url::Url;

use crate::error::StorageResult;
use crate::session::Session;
use crate::token::Token;

/// Name of the callback parameter carrying the token.
pub const TOKEN_PARAM: &str = "token";

/// Result of processing a callback URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// The token was stored and the viewer sent to the given route.
    Stored {
        /// Route navigated to.
        redirect: String,
    },
    /// The URL carried no token; nothing changed.
    MissingToken,
}

/// Extracts the token from a callback URL.
///
/// The query string is checked first, then the fragment parsed as
/// `key=value` pairs. Empty values count as absent.
pub fn extract_token(url: &Url) -> Option<Token> {
    let from_query = url
        .query_pairs()
        .find(|(key, value)| key == TOKEN_PARAM && !value.is_empty())
        .map(|(_, value)| value.into_owned());

    let token = from_query.or_else(|| {
        let fragment = url.fragment()?;
        url::form_urlencoded::parse(fragment.as_bytes())
            .find(|(key, value)| key == TOKEN_PARAM && !value.is_empty())
            .map(|(_, value)| value.into_owned())
    })?;

    Some(Token::new(token))
}

/// Completes the callback: stores the token and replace-navigates to the
/// site root.
pub fn complete(session: &Session, url: &Url) -> StorageResult<CallbackOutcome> {
    let Some(token) = extract_token(url) else {
        debug!(path = url.path(), "Callback URL carried no token");
        return Ok(CallbackOutcome::MissingToken);
    };

    let redirect = session.routes().root.clone();
    session.adopt(&token, &redirect)?;
    info!(redirect = %redirect, "OAuth callback completed");

    Ok(CallbackOutcome::Stored { redirect })
}
