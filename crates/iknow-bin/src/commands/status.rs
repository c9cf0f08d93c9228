// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 IKnow Team. All rights reserved.

//! Implementation of the `status` command.

use iknow_auth::{decode, Clock};
use iknow_config::StorageBackendKind;
use serde_json::json;

use super::{print_report, CommandContext};
use crate::cli::Cli;
use crate::error::BinResult;

/// Shows where the token lives and what the auth core makes of it.
pub fn status(cli: &Cli, ctx: &CommandContext) -> BinResult<()> {
    let storage = &ctx.config.storage;
    let session = ctx.auth.session();
    let now = ctx.auth.clock().now();

    let location = match storage.backend {
        StorageBackendKind::File => format!("file ({})", storage.path.display()),
        other => other.as_str().to_string(),
    };

    let token = session.token();
    let claims = token.as_ref().and_then(|t| decode(t).ok());
    let authenticated = session.is_authenticated();
    let landing = claims
        .as_ref()
        .and_then(|c| c.role())
        .and_then(|role| ctx.auth.config().routes.landing_for(role))
        .filter(|_| authenticated);

    let report = json!({
        "storage": {
            "backend": storage.backend.as_str(),
            "path": storage.path.display().to_string(),
            "key": ctx.auth.store().key(),
        },
        "token_present": token.is_some(),
        "decodable": claims.is_some(),
        "claims": claims,
        "expired": claims.as_ref().map(|c| c.is_expired_at(now)),
        "authenticated": authenticated,
        "landing": landing,
    });

    let mut lines = vec![
        format!("Storage:       {}", location),
        format!("Key:           {}", ctx.auth.store().key()),
    ];

    match (&token, &claims) {
        (None, _) => lines.push("Token:         absent".to_string()),
        (Some(t), None) => {
            lines.push(format!("Token:         present ({} segments, undecodable)", t.segments().len()))
        }
        (Some(_), Some(c)) => {
            lines.push("Token:         present".to_string());
            lines.push(format!("Role:          {}", c.role().unwrap_or("(none)")));
            if let Some(id) = &c.id {
                lines.push(format!("User ID:       {}", id));
            }
            match c.expires_at() {
                Some(at) if c.is_expired_at(now) => {
                    lines.push(format!("Expires:       {} (expired)", at.to_rfc3339()))
                }
                Some(at) => lines.push(format!("Expires:       {}", at.to_rfc3339())),
                None => lines.push("Expires:       never".to_string()),
            }
        }
    }

    lines.push(format!(
        "Authenticated: {}",
        if authenticated { "yes" } else { "no" }
    ));
    if let Some(landing) = landing {
        lines.push(format!("Landing:       {}", landing));
    }

    print_report(cli, &report, &lines)
}
