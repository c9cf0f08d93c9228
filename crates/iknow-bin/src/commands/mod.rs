// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 IKnow Team. All rights reserved.

//! CLI command implementations.
//!
//! Every command that touches the token store runs against the configured
//! backend through a [`RecordingNavigator`], so the navigation the web
//! client would perform is reported instead of executed.

mod check;
mod decode;
mod redirect;
mod session;
mod status;
mod validate;
mod version;

pub use check::check;
pub use decode::decode;
pub use redirect::redirect;
pub use session::{callback, login, logout};
pub use status::status;
pub use validate::validate;
pub use version::version;

use std::sync::Arc;

use iknow_auth::{AuthContext, RecordingNavigator};
use iknow_config::ClientConfig;
use serde_json::Value;

use crate::cli::{Cli, Commands, OutputFormat};
use crate::error::BinResult;

/// Shared state for commands that operate on the token store.
pub struct CommandContext {
    /// Loaded configuration.
    pub config: ClientConfig,
    /// Records where the auth core navigated.
    pub navigator: Arc<RecordingNavigator>,
    /// Auth context over the configured backend.
    pub auth: AuthContext,
}

impl CommandContext {
    /// Opens the configured backend and wires an auth context over it.
    pub fn new(config: ClientConfig) -> Self {
        let navigator = Arc::new(RecordingNavigator::new());
        let auth = config.auth_context(navigator.clone());
        Self {
            config,
            navigator,
            auth,
        }
    }

    /// Returns the last navigation target, if any.
    pub fn navigated_to(&self) -> Option<String> {
        self.navigator.last()
    }
}

/// Executes the appropriate command based on CLI arguments.
pub fn execute(cli: &Cli, config: ClientConfig) -> BinResult<()> {
    let ctx = CommandContext::new(config);

    match cli.effective_command() {
        Commands::Status => status::status(cli, &ctx),
        Commands::Decode(args) => decode::decode(cli, args),
        Commands::Check(args) => check::check(cli, &ctx, args),
        Commands::Redirect(args) => redirect::redirect(cli, &ctx, args),
        Commands::Login(args) => session::login(cli, &ctx, args),
        Commands::Logout => session::logout(cli, &ctx),
        Commands::Callback(args) => session::callback(cli, &ctx, args),
        Commands::Validate(args) => validate::validate(cli, args),
        Commands::Version => version::version(cli),
    }
}

/// Prints a command report as JSON, or as the given text lines.
pub(crate) fn print_report(cli: &Cli, report: &Value, lines: &[String]) -> BinResult<()> {
    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Text => {
            if !cli.quiet {
                for line in lines {
                    println!("{}", line);
                }
            }
        }
    }
    Ok(())
}
