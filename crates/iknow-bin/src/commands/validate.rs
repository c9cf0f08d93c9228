// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 IKnow Team. All rights reserved.

//! Implementation of the `validate` command.

use serde_json::json;

use super::print_report;
use crate::cli::{Cli, ValidateArgs};
use crate::error::{BinError, BinResult};

/// Executes the `validate` command to validate configuration.
pub fn validate(cli: &Cli, args: ValidateArgs) -> BinResult<()> {
    let config_path = &cli.config;

    if !config_path.exists() {
        return Err(BinError::Configuration(format!(
            "Configuration file not found: {}",
            config_path.display()
        )));
    }

    let config = iknow_config::load_config(config_path)
        .map_err(|e| BinError::from(e).with_context("Configuration validation failed"))?;

    let mut warnings: Vec<String> = Vec::new();
    if config.auth.routes.unmapped_role.is_none() {
        warnings.push(
            "routes.unmapped_role is unset: viewers with unknown roles are not redirected".to_string(),
        );
    }
    if config.storage.backend != iknow_config::StorageBackendKind::File {
        warnings.push(format!(
            "storage backend '{}' does not persist tokens between runs",
            config.storage.backend.as_str()
        ));
    }

    let routes = &config.auth.routes;
    let report = json!({
        "valid": true,
        "config_path": config_path.display().to_string(),
        "warnings": warnings,
        "config": if args.show_config { Some(&config) } else { None },
    });

    let mut lines = vec![
        format!("✓ Configuration is valid: {}", config_path.display()),
        String::new(),
        "Summary:".to_string(),
        format!("  Storage:         {} ({})", config.storage.backend.as_str(), config.storage.path.display()),
        format!("  Storage key:     {}", config.auth.storage_key),
        format!("  Render policy:   {:?}", config.auth.render_policy),
        format!("  Redirect policy: {:?}", config.auth.redirect_policy),
        format!("  Login route:     {}", routes.login),
        format!("  Student home:    {}", routes.student_home),
        format!("  Admin dashboard: {}", routes.admin_dashboard),
    ];

    if !warnings.is_empty() {
        lines.push(String::new());
        lines.push("Warnings:".to_string());
        lines.extend(warnings.iter().map(|w| format!("  ⚠ {}", w)));
    }

    if args.show_config {
        lines.push(String::new());
        lines.push("Parsed configuration:".to_string());
        lines.push(serde_json::to_string_pretty(&config)?);
    }

    print_report(cli, &report, &lines)
}
