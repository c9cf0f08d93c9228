// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 IKnow Team. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! - `status`: Show the stored token and session state (default)
//! - `decode`: Decode a token's claims without verifying it
//! - `check`: Run the route guard against the stored token
//! - `redirect`: Run the logged-in redirector against the stored token
//! - `login` / `logout`: Sign in with a token, or sign out
//! - `callback`: Complete an OAuth callback URL
//! - `validate`: Validate the configuration file
//! - `version`: Show version information

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use url::Url;

// =============================================================================
// Main CLI Structure
// =============================================================================

/// iknow - IKnow campus client auth tool
///
/// Inspects and exercises the client-side token lifecycle and route
/// authorization against a file-backed token store.
#[derive(Parser, Debug)]
#[command(
    name = "iknow",
    author = "IKnow Team",
    version = iknow_auth::VERSION,
    about = "IKnow campus client auth tool",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        default_value = "iknow.yaml",
        env = "IKNOW_CONFIG",
        global = true
    )]
    pub config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Log format; overrides the config file
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,

    /// Token storage file; overrides the config file
    #[arg(long, global = true)]
    pub storage: Option<PathBuf>,

    /// Output format for command results
    #[arg(short, long, default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Enable quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands for the iknow CLI.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show the stored token and session state
    ///
    /// This is the default command when no subcommand is specified.
    Status,

    /// Decode a token's claims
    ///
    /// The signature is not verified; the output is for inspection only.
    Decode(DecodeArgs),

    /// Run the route guard against the stored token
    ///
    /// Exits non-zero when access is denied.
    Check(CheckArgs),

    /// Run the logged-in redirector against the stored token
    Redirect(RedirectArgs),

    /// Store a token and report the landing route
    Login(LoginArgs),

    /// Erase the stored token
    Logout,

    /// Complete an OAuth callback URL
    Callback(CallbackArgs),

    /// Validate the configuration file
    Validate(ValidateArgs),

    /// Show detailed version information
    Version,
}

// =============================================================================
// Command Arguments
// =============================================================================

/// Arguments for the `decode` command.
#[derive(Args, Debug, Clone)]
pub struct DecodeArgs {
    /// Token to decode
    pub token: String,
}

/// Arguments for the `check` command.
#[derive(Args, Debug, Clone, Default)]
pub struct CheckArgs {
    /// Required role; omit to accept any authenticated role
    #[arg(short, long)]
    pub role: Option<String>,

    /// Evaluate at this instant (RFC 3339) instead of now
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,

    /// Report the decision without erasing unusable tokens
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `redirect` command.
#[derive(Args, Debug, Clone, Default)]
pub struct RedirectArgs {
    /// Only redirect for a decodable, unexpired, role-bearing token
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the `login` command.
#[derive(Args, Debug, Clone)]
pub struct LoginArgs {
    /// Token issued by the backend
    pub token: String,
}

/// Arguments for the `callback` command.
#[derive(Args, Debug, Clone)]
pub struct CallbackArgs {
    /// Full callback URL, e.g. https://iknow.example/auth/callback?token=...
    pub url: Url,
}

/// Arguments for the `validate` command.
#[derive(Args, Debug, Clone, Default)]
pub struct ValidateArgs {
    /// Show parsed configuration after validation
    #[arg(short, long)]
    pub show_config: bool,
}

// =============================================================================
// Enums
// =============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for structured logging
    Json,
    /// Compact format for minimal output
    Compact,
}

impl From<iknow_config::LogFormat> for LogFormat {
    fn from(format: iknow_config::LogFormat) -> Self {
        match format {
            iknow_config::LogFormat::Text => LogFormat::Text,
            iknow_config::LogFormat::Json => LogFormat::Json,
            iknow_config::LogFormat::Compact => LogFormat::Compact,
        }
    }
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for programmatic parsing
    Json,
}

// =============================================================================
// Helper Methods
// =============================================================================

impl Cli {
    /// Parse CLI arguments from the command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective command, defaulting to `Status` if none specified.
    pub fn effective_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Status)
    }

    /// Get the effective log level based on flags, falling back to
    /// `configured`.
    pub fn effective_log_level<'a>(&'a self, configured: &'a str) -> &'a str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            self.log_level.as_deref().unwrap_or(configured)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command() {
        let cli = Cli::parse_from(["iknow"]);
        assert!(cli.command.is_none());
        assert!(matches!(cli.effective_command(), Commands::Status));
    }

    #[test]
    fn test_check_command() {
        let cli = Cli::parse_from([
            "iknow",
            "check",
            "--role",
            "admin",
            "--at",
            "2025-01-01T00:00:00Z",
        ]);
        if let Some(Commands::Check(args)) = cli.command {
            assert_eq!(args.role.as_deref(), Some("admin"));
            assert_eq!(args.at.map(|t| t.timestamp()), Some(1_735_689_600));
            assert!(!args.dry_run);
        } else {
            panic!("Expected Check command");
        }
    }

    #[test]
    fn test_callback_command() {
        let cli = Cli::parse_from(["iknow", "callback", "https://iknow.example/cb?token=a.b.c"]);
        if let Some(Commands::Callback(args)) = cli.command {
            assert_eq!(args.url.query(), Some("token=a.b.c"));
        } else {
            panic!("Expected Callback command");
        }
    }

    #[test]
    fn test_callback_rejects_relative_url() {
        assert!(Cli::try_parse_from(["iknow", "callback", "/cb?token=x"]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from([
            "iknow",
            "status",
            "--storage",
            "/tmp/s.json",
            "--format",
            "json",
            "-c",
            "/etc/iknow/iknow.toml",
        ]);
        assert_eq!(cli.storage, Some(PathBuf::from("/tmp/s.json")));
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.config, PathBuf::from("/etc/iknow/iknow.toml"));
    }

    #[test]
    fn test_log_level_precedence() {
        let cli = Cli::parse_from(["iknow"]);
        assert_eq!(cli.effective_log_level("info"), "info");

        let cli = Cli::parse_from(["iknow", "-l", "trace"]);
        assert_eq!(cli.effective_log_level("info"), "trace");

        let cli = Cli::parse_from(["iknow", "-q", "-l", "trace"]);
        assert_eq!(cli.effective_log_level("info"), "warn");

        let cli = Cli::parse_from(["iknow", "-v"]);
        assert_eq!(cli.effective_log_level("info"), "debug");
    }
}
