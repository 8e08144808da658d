// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User roles for authorization.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User roles for authorization.
///
/// The role set is closed: anything that is not exactly `admin` or `user`
/// (after trimming, case-insensitive) resolves to [`Role::User`].
///
/// - `Admin` - May mutate products in addition to everything a user can do
/// - `User` - Authenticated read access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full administrative access
    Admin,
    /// Normal authenticated user
    User,
}

impl Role {
    /// Check if this role has at least the privileges of the required role.
    pub fn has_privilege(&self, required: Role) -> bool {
        match (self, required) {
            (Role::Admin, _) => true,
            (Role::User, Role::User) => true,
            _ => false,
        }
    }

    /// Parse a role string (trimmed, case-insensitive).
    ///
    /// Returns `None` for anything outside the closed set.
    pub fn parse(s: &str) -> Option<Role> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "user" => Some(Role::User),
            _ => None,
        }
    }

    /// Normalize an externally supplied role string, falling back to `User`.
    pub fn normalize(s: &str) -> Role {
        Role::parse(s).unwrap_or_default()
    }

    /// Resolve a role list the way the claims builder does: `Admin` wins if
    /// any entry resolves to it, otherwise `User`.
    pub fn resolve<I, S>(roles: I) -> Role
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        roles
            .into_iter()
            .filter_map(|r| Role::parse(r.as_ref()))
            .max_by_key(|r| matches!(r, Role::Admin))
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl Default for Role {
    /// Default role is User (least privilege for authenticated users).
    fn default() -> Self {
        Role::User
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_has_all_privileges() {
        assert!(Role::Admin.has_privilege(Role::Admin));
        assert!(Role::Admin.has_privilege(Role::User));
    }

    #[test]
    fn user_only_has_user_privilege() {
        assert!(!Role::User.has_privilege(Role::Admin));
        assert!(Role::User.has_privilege(Role::User));
    }

    #[test]
    fn parse_is_trimmed_and_case_insensitive() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("  ADMIN "), Some(Role::Admin));
        assert_eq!(Role::parse("User"), Some(Role::User));
        assert_eq!(Role::parse("superuser"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn normalize_defaults_to_user() {
        assert_eq!(Role::normalize("Admin"), Role::Admin);
        assert_eq!(Role::normalize("moderator"), Role::User);
        assert_eq!(Role::normalize("admins"), Role::User);
    }

    #[test]
    fn resolve_prefers_admin_and_defaults_to_user() {
        assert_eq!(Role::resolve(["user", "admin"]), Role::Admin);
        assert_eq!(Role::resolve(["user"]), Role::User);
        assert_eq!(Role::resolve(["owner", "guest"]), Role::User);
        assert_eq!(Role::resolve(Vec::<String>::new()), Role::User);
    }

    #[test]
    fn display_matches_serde() {
        assert_eq!(Role::Admin.to_string(), "admin");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
    }
}
