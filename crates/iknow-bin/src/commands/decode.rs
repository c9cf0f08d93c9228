// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 IKnow Team. All rights reserved.

//! Implementation of the `decode` command.

use chrono::Utc;
use iknow_auth::{decode as decode_token, Token};
use serde_json::json;

use super::print_report;
use crate::cli::{Cli, DecodeArgs};
use crate::error::BinResult;

/// Decodes a token's claims. The signature is not checked.
pub fn decode(cli: &Cli, args: DecodeArgs) -> BinResult<()> {
    let token = Token::new(args.token.trim());
    let claims = decode_token(&token)?;
    let now = Utc::now();

    let report = json!({
        "claims": claims,
        "role": claims.role(),
        "known_role": claims.viewer_role().is_some(),
        "expires_at": claims.expires_at().map(|t| t.to_rfc3339()),
        "expired": claims.is_expired_at(now),
        "verified": false,
    });

    let mut lines = vec![serde_json::to_string_pretty(&claims)?, String::new()];
    lines.push(format!("Role:    {}", claims.role().unwrap_or("(none)")));
    lines.push(match claims.time_until_expiration(now) {
        Some(left) => format!("Expires: in {}s", left.as_secs()),
        None if claims.exp.is_some() => "Expires: expired".to_string(),
        None => "Expires: never".to_string(),
    });
    lines.push("Signature NOT verified".to_string());

    print_report(cli, &report, &lines)
}
