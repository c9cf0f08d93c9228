// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 IKnow Team. All rights reserved.

//! # Custom Test Assertions
//!
//! Assertion helpers with failure messages that show the recorded
//! navigation history or the full guard decision.

use iknow_auth::{DenyReason, GuardDecision, RecordingNavigator};

// =============================================================================
// Navigator Assertions
// =============================================================================

/// Assertion extensions for [`RecordingNavigator`].
pub trait NavigatorAssertions {
    /// Assert that no navigation happened.
    fn assert_no_navigation(&self);

    /// Assert that the most recent navigation went to `path`.
    fn assert_navigated_to(&self, path: &str);

    /// Assert that exactly these navigations happened, in order.
    fn assert_history(&self, expected: &[&str]);
}

impl NavigatorAssertions for RecordingNavigator {
    fn assert_no_navigation(&self) {
        let history = self.history();
        assert!(
            history.is_empty(),
            "Expected no navigation, got {:?}",
            history
        );
    }

    fn assert_navigated_to(&self, path: &str) {
        assert_eq!(
            self.last().as_deref(),
            Some(path),
            "Expected last navigation to {}, history was {:?}",
            path,
            self.history()
        );
    }

    fn assert_history(&self, expected: &[&str]) {
        let history = self.history();
        assert_eq!(
            history, expected,
            "Navigation history mismatch"
        );
    }
}

// =============================================================================
// Decision Assertions
// =============================================================================

/// Assertion extensions for [`GuardDecision`].
pub trait DecisionAssertions {
    /// Assert that the decision allows rendering.
    fn assert_allowed(&self);

    /// Assert that the decision denies and redirects to `path`.
    fn assert_redirects_to(&self, path: &str);

    /// Assert that the decision denies without redirecting.
    fn assert_denied_in_place(&self);

    /// Assert that the deny reason satisfies `predicate`.
    fn assert_reason(&self, label: &str, predicate: impl FnOnce(&DenyReason) -> bool);
}

impl DecisionAssertions for GuardDecision {
    fn assert_allowed(&self) {
        assert!(self.is_allowed(), "Expected Allow, got {:?}", self);
    }

    fn assert_redirects_to(&self, path: &str) {
        assert!(!self.is_allowed(), "Expected Deny to {}, got Allow", path);
        assert_eq!(
            self.redirect(),
            Some(path),
            "Unexpected redirect in {:?}",
            self
        );
    }

    fn assert_denied_in_place(&self) {
        assert!(
            matches!(self, GuardDecision::Deny { redirect: None, .. }),
            "Expected Deny without redirect, got {:?}",
            self
        );
    }

    fn assert_reason(&self, label: &str, predicate: impl FnOnce(&DenyReason) -> bool) {
        match self.reason() {
            Some(reason) => assert!(
                predicate(reason),
                "Expected deny reason {}, got {:?}",
                label,
                reason
            ),
            None => panic!("Expected deny reason {}, got Allow", label),
        }
    }
}
