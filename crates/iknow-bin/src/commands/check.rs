// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 IKnow Team. All rights reserved.

//! Implementation of the `check` command.

use std::sync::Arc;

use iknow_auth::{Clock, FixedClock, GuardDecision};
use serde_json::json;

use super::{print_report, CommandContext};
use crate::cli::{CheckArgs, Cli};
use crate::error::{BinError, BinResult};

/// Runs the route guard for `--role` against the stored token.
pub fn check(cli: &Cli, ctx: &CommandContext, args: CheckArgs) -> BinResult<()> {
    let auth = match args.at {
        Some(at) => ctx.auth.clone().with_clock(Arc::new(FixedClock::new(at))),
        None => ctx.auth.clone(),
    };

    let mut guard = auth.guard(args.role.as_deref());
    let decision = guard.evaluate();
    if !args.dry_run {
        guard.mount();
    }

    let required = guard.required_role().unwrap_or("(any)").to_string();
    let at = auth.clock().now().to_rfc3339();

    let (report, lines) = match &decision {
        GuardDecision::Allow => (
            json!({ "allowed": true, "required_role": guard.required_role(), "at": at }),
            vec![format!("Allowed: role {} at {}", required, at)],
        ),
        GuardDecision::Deny { reason, redirect } => {
            let mut lines = vec![format!("Denied: {} (required role {})", reason.as_str(), required)];
            match redirect {
                Some(to) => lines.push(format!("Redirect: {}", to)),
                None => lines.push("Redirect: none, content withheld".to_string()),
            }
            if reason.invalidates_token() && auth.config().purge_invalid_tokens && !args.dry_run {
                lines.push("Stored token erased".to_string());
            }
            (
                json!({
                    "allowed": false,
                    "required_role": guard.required_role(),
                    "at": at,
                    "reason": reason.as_str(),
                    "redirect": redirect,
                    "navigated_to": ctx.navigated_to(),
                }),
                lines,
            )
        }
    };

    print_report(cli, &report, &lines)?;

    match decision.reason() {
        None => Ok(()),
        Some(reason) => Err(BinError::denied(reason.as_str())),
    }
}
