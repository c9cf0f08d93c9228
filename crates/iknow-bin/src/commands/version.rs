// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 IKnow Team. All rights reserved.

//! Implementation of the `version` command.

use crate::cli::Cli;
use crate::error::BinResult;

/// Executes the `version` command to display version information.
pub fn version(_cli: &Cli) -> BinResult<()> {
    println!("iknow - IKnow campus client auth tool");
    println!();
    println!("Version Information:");
    println!("  iknow-bin:    {}", env!("CARGO_PKG_VERSION"));
    println!("  iknow-auth:   {}", iknow_auth::VERSION);
    println!("  iknow-config: {}", iknow_config::VERSION);
    println!();
    println!("Build Information:");
    println!("  Target:       {}", std::env::consts::ARCH);
    println!("  OS:           {}", std::env::consts::OS);
    println!();
    println!("License: PolyForm Noncommercial License 1.0.0");

    Ok(())
}
