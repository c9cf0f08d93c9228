// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 IKnow Team. All rights reserved.

//! Router boundary.
//!
//! The auth core talks to the host router through a single primitive:
//! "replace the current location with path P". Replace, not push, so that
//! back-navigation never returns to a gated page.

use std::sync::Arc;

use parking_lot::Mutex;

/// The host router's replace-navigation primitive.
///
/// Implementations must not panic when the hosting environment has already
/// been torn down; a late redirect is dropped silently.
pub trait Navigator: Send + Sync {
    /// Replaces the current location with `path`.
    fn replace(&self, path: &str);
}

impl<N: Navigator + ?Sized> Navigator for Arc<N> {
    fn replace(&self, path: &str) {
        (**self).replace(path)
    }
}

/// A navigator that records every replace call.
///
/// Used by tests and by the CLI, which reports the target instead of
/// actually navigating.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    history: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every path navigated to, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.history.lock().clone()
    }

    /// Returns the most recent path navigated to.
    pub fn last(&self) -> Option<String> {
        self.history.lock().last().cloned()
    }

    /// Returns the number of navigations recorded.
    pub fn count(&self) -> usize {
        self.history.lock().len()
    }

    /// Forgets all recorded navigations.
    pub fn clear(&self) {
        self.history.lock().clear();
    }
}

impl Navigator for RecordingNavigator {
    fn replace(&self, path: &str) {
        tracing::debug!(path, "replace navigation");
        self.history.lock().push(path.to_string());
    }
}
