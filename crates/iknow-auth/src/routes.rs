// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 IKnow Team. All rights reserved.

//! Client route table.

use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};
use crate::role::ViewerRole;

/// Login page.
pub const LOGIN: &str = "/auth/login";
/// Generic authenticated landing page.
pub const HOME: &str = "/home";
/// Student landing page.
pub const STUDENT_HOME: &str = "/home/posts";
/// Admin landing page.
pub const ADMIN_DASHBOARD: &str = "/admin/dashboard";
/// Site root.
pub const ROOT: &str = "/";

/// The set of paths the auth core may navigate to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteTable {
    /// Where unauthenticated viewers are sent.
    pub login: String,
    /// Generic landing route for already-authenticated viewers.
    pub home: String,
    /// Landing route for students.
    pub student_home: String,
    /// Landing route for admins.
    pub admin_dashboard: String,
    /// Site root, used after the OAuth callback.
    pub root: String,
    /// Landing route for roles outside [`ViewerRole`]. `None` means no
    /// redirect is issued for such roles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unmapped_role: Option<String>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            login: LOGIN.to_string(),
            home: HOME.to_string(),
            student_home: STUDENT_HOME.to_string(),
            admin_dashboard: ADMIN_DASHBOARD.to_string(),
            root: ROOT.to_string(),
            unmapped_role: None,
        }
    }
}

impl RouteTable {
    /// Sets the landing route for unmapped roles.
    pub fn with_unmapped_role(mut self, route: impl Into<String>) -> Self {
        self.unmapped_role = Some(route.into());
        self
    }

    /// Returns the landing route for a known role.
    pub fn home_for(&self, role: ViewerRole) -> &str {
        match role {
            ViewerRole::Student => &self.student_home,
            ViewerRole::Admin => &self.admin_dashboard,
        }
    }

    /// Returns the landing route for a raw role claim.
    ///
    /// Known roles map to their home; anything else maps to
    /// [`unmapped_role`](Self::unmapped_role), which may be `None`.
    pub fn landing_for(&self, role: &str) -> Option<&str> {
        match ViewerRole::parse(role) {
            Some(known) => Some(self.home_for(known)),
            None => self.unmapped_role.as_deref(),
        }
    }

    /// Validates that every route is an absolute path.
    pub fn validate(&self) -> AuthResult<()> {
        let routes = [
            ("routes.login", Some(&self.login)),
            ("routes.home", Some(&self.home)),
            ("routes.student_home", Some(&self.student_home)),
            ("routes.admin_dashboard", Some(&self.admin_dashboard)),
            ("routes.root", Some(&self.root)),
            ("routes.unmapped_role", self.unmapped_role.as_ref()),
        ];

        for (field, route) in routes {
            if let Some(route) = route {
                if !route.starts_with('/') {
                    return Err(AuthError::invalid_config(
                        field,
                        format!("route '{}' must start with '/'", route),
                    ));
                }
            }
        }
        Ok(())
    }
}
