// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 IKnow Team. All rights reserved.

//! iknow - IKnow campus client auth tool

use iknow_bin::error::report_error_and_exit;
use iknow_bin::Cli;

fn main() {
    let cli = Cli::parse_args();

    if let Err(e) = iknow_bin::run(cli) {
        report_error_and_exit(e);
    }
}
