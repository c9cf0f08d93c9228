// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 IKnow Team. All rights reserved.

//! Unverified claim decoding.
//!
//! [`decode`] reads the payload segment of a token and nothing else. The
//! signature is **not** checked: the result is a UX routing hint, never a
//! security decision. The backend re-validates every protected call.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde_json::Value;

use crate::claims::Claims;
use crate::error::DecodeError;
use crate::token::Token;

/// Decodes the claims carried by a token.
///
/// The token must have exactly three dot-separated segments. The second
/// segment is base64-decoded (URL-safe or standard alphabet, with or without
/// padding) and parsed as a JSON object.
///
/// This function is pure: it performs no I/O and always returns the same
/// result for the same token.
pub fn decode(token: &Token) -> Result<Claims, DecodeError> {
    let segments = token.segments();
    if segments.len() != 3 {
        return Err(DecodeError::SegmentCount {
            found: segments.len(),
        });
    }

    let bytes = decode_segment(segments[1])?;
    match serde_json::from_slice::<Value>(&bytes)? {
        Value::Object(map) => Ok(Claims::from_map(map)),
        _ => Err(DecodeError::NotAnObject),
    }
}

/// Base64-decodes a single token segment.
fn decode_segment(segment: &str) -> Result<Vec<u8>, base64::DecodeError> {
    // Normalise standard-alphabet and padded input to unpadded URL-safe.
    let normalized: String = segment
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();

    URL_SAFE_NO_PAD.decode(normalized.as_bytes())
}

// =============================================================================
// Tests
// =============================================================================
