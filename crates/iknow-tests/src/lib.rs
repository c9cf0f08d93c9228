// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 IKnow Team. All rights reserved.

//! # IKnow Integration Tests
//!
//! Integration tests and shared test utilities for the IKnow client auth
//! core.
//!
//! ## Module Structure
//!
//! - [`common`]: Shared test utilities, fixtures, and helpers
//!   - `fixtures`: Signed tokens for each viewer kind
//!   - `builders`: Raw payload tokens for decoder edge cases
//!   - `assertions`: Navigation and guard decision assertions
//!   - `mocks`: Storage backends that count calls or fail on demand
//!   - `harness`: A wired-up auth context with a frozen clock
//!
//! ## Running Tests
//!
//! ```bash
//! # Run all integration tests
//! cargo test -p iknow-tests
//!
//! # Run specific test suite
//! cargo test -p iknow-tests --test integration_guard
//! cargo test -p iknow-tests --test integration_redirector
//! cargo test -p iknow-tests --test integration_session
//! cargo test -p iknow-tests --test integration_store
//! cargo test -p iknow-tests --test integration_config
//!
//! # Run with verbose output
//! cargo test -p iknow-tests -- --nocapture
//! ```
//!
//! ## Test Categories
//!
//! ### Guard Tests (`integration_guard.rs`)
//! - Absent, malformed and expired tokens
//! - Role match and role mismatch routing
//! - Render policy and re-checks
//!
//! ### Redirector Tests (`integration_redirector.rs`)
//! - Presence and strict policies
//!
//! ### Session Tests (`integration_session.rs`)
//! - Sign-in landing, sign-out, OAuth callback
//!
//! ### Store Tests (`integration_store.rs`)
//! - Backend swapping, unavailable storage, file persistence
//!
//! ### Config Tests (`integration_config.rs`)
//! - Parsing, environment overrides, context construction

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::assertions::*;
    pub use crate::common::builders::*;
    pub use crate::common::fixtures::*;
    pub use crate::common::harness::*;
    pub use crate::common::mocks::*;
    pub use crate::common::{init_test_logging, temp_test_dir, unique_test_id};
}
