// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 IKnow Team. All rights reserved.

//! Implementation of the `redirect` command.

use iknow_auth::RedirectPolicy;
use serde_json::json;

use super::{print_report, CommandContext};
use crate::cli::{Cli, RedirectArgs};
use crate::error::BinResult;

/// Runs the logged-in redirector, as a login or signup page would.
pub fn redirect(cli: &Cli, ctx: &CommandContext, args: RedirectArgs) -> BinResult<()> {
    let mut redirector = ctx.auth.redirector();
    if args.strict {
        redirector = redirector.with_policy(RedirectPolicy::Strict);
    }

    let target = redirector.mount();

    let report = json!({
        "policy": redirector.policy(),
        "redirect": target,
    });
    let line = match &target {
        Some(to) => format!("Signed in, redirect to {}", to),
        None => "Not signed in, page stays".to_string(),
    };

    print_report(cli, &report, &[line])
}
