// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 IKnow Team. All rights reserved.

//! Viewer roles.

use serde::{Deserialize, Serialize};

/// Classification of an authenticated viewer.
///
/// Only these two roles have a landing page. Any other role value carried
/// by a token is "unmapped" and is routed through
/// [`RouteTable::unmapped_role`](crate::routes::RouteTable::unmapped_role).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewerRole {
    /// A university student.
    Student,
    /// A platform administrator.
    Admin,
}

impl ViewerRole {
    /// Returns the role name as issued by the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewerRole::Student => "student",
            ViewerRole::Admin => "admin",
        }
    }

    /// Parses a role claim.
    ///
    /// Matching is exact: the backend always issues lowercase role names and
    /// the client has always compared them verbatim.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "student" => Some(ViewerRole::Student),
            "admin" => Some(ViewerRole::Admin),
            _ => None,
        }
    }

    /// Returns all known roles.
    pub fn all() -> &'static [ViewerRole] {
        &[ViewerRole::Student, ViewerRole::Admin]
    }
}

impl std::fmt::Display for ViewerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
