// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 IKnow Team. All rights reserved.

//! # iknow-auth
//!
//! Client-side token lifecycle and route authorization for the IKnow
//! campus web client.
//!
//! This crate provides:
//!
//! - **Token**: the bearer credential issued by the backend
//! - **Decoder**: unverified claim decoding (`role`, `exp`, ...)
//! - **Store**: the single persisted credential behind a swappable backend
//! - **Guard**: "must be authenticated as role R" gate for a page subtree
//! - **Redirector**: "must NOT be authenticated" gate for public-only pages
//! - **Session**: sign-in landing, sign-out and the `Authorization` header
//! - **Callback**: OAuth callback token extraction
//!
//! ## Trust boundary
//!
//! Claims are decoded **without** signature verification. Every decision
//! taken here is UX routing only; the backend re-validates the token on
//! each protected request.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use iknow_auth::{
//!     AuthConfig, AuthContext, GateState, MemoryStorage, RecordingNavigator,
//! };
//!
//! let navigator = Arc::new(RecordingNavigator::new());
//! let ctx = AuthContext::new(
//!     AuthConfig::default(),
//!     Arc::new(MemoryStorage::new()),
//!     navigator.clone(),
//! );
//!
//! // No token stored: the admin dashboard bounces to the login page.
//! let mut guard = ctx.guard(Some("admin"));
//! assert_eq!(guard.mount(), GateState::Denied);
//! assert_eq!(navigator.last().as_deref(), Some("/auth/login"));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod callback;
pub mod claims;
pub mod clock;
pub mod config;
pub mod decoder;
pub mod error;
pub mod guard;
pub mod navigator;
pub mod redirector;
pub mod role;
pub mod routes;
pub mod session;
pub mod store;
pub mod token;

// =============================================================================
// Re-exports
// =============================================================================

pub use callback::{complete as complete_callback, extract_token, CallbackOutcome};
pub use claims::Claims;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AuthConfig, AuthContext};
pub use decoder::decode;
pub use error::{AuthError, AuthResult, DecodeError, StorageError, StorageResult};
pub use guard::{DenyReason, GateState, GuardDecision, RenderPolicy, RouteGuard};
pub use navigator::{Navigator, RecordingNavigator};
pub use redirector::{LoggedInRedirector, RedirectPolicy};
pub use role::ViewerRole;
pub use routes::RouteTable;
pub use session::Session;
pub use store::{FileStorage, MemoryStorage, StorageBackend, TokenStore, UnavailableStorage};
pub use token::Token;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Storage key the web client has always used for the bearer token.
pub const DEFAULT_STORAGE_KEY: &str = "token";
