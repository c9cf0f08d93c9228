// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 IKnow Team. All rights reserved.

//! Implementation of the `login`, `logout` and `callback` commands.

use iknow_auth::{complete_callback, CallbackOutcome, Token};
use serde_json::json;

use super::{print_report, CommandContext};
use crate::cli::{CallbackArgs, Cli, LoginArgs};
use crate::error::BinResult;

/// Stores a token as the login form does on success.
pub fn login(cli: &Cli, ctx: &CommandContext, args: LoginArgs) -> BinResult<()> {
    let landing = ctx.auth.session().sign_in(Token::new(args.token.trim()))?;

    let report = json!({ "stored": true, "redirect": landing });
    print_report(cli, &report, &[format!("Token stored, redirect to {}", landing)])
}

/// Erases the stored token.
pub fn logout(cli: &Cli, ctx: &CommandContext) -> BinResult<()> {
    ctx.auth.session().sign_out()?;

    let redirect = ctx.navigated_to();
    let report = json!({ "erased": true, "redirect": redirect });
    print_report(
        cli,
        &report,
        &[format!(
            "Token erased, redirect to {}",
            redirect.as_deref().unwrap_or("(none)")
        )],
    )
}

/// Completes an OAuth callback URL.
pub fn callback(cli: &Cli, ctx: &CommandContext, args: CallbackArgs) -> BinResult<()> {
    let outcome = complete_callback(&ctx.auth.session(), &args.url)?;

    let (report, line) = match outcome {
        CallbackOutcome::Stored { redirect } => (
            json!({ "stored": true, "redirect": redirect }),
            format!("Token stored, redirect to {}", redirect),
        ),
        CallbackOutcome::MissingToken => (
            json!({ "stored": false, "redirect": null }),
            "Callback URL carried no token, nothing stored".to_string(),
        ),
    };

    print_report(cli, &report, &[line])
}
