// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Claim sets and their JWT wire representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::roles::Role;
use crate::identity::Identity;

/// Identity and authorization facts carried by a bearer token.
///
/// This is the primary type used throughout the application to represent
/// the authenticated caller. Handlers receive it from the `Auth` extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ClaimSet {
    /// Canonical subject (identity id)
    pub subject: String,
    pub email: String,
    pub display_name: String,
    pub role: Role,
}

impl ClaimSet {
    /// Build the canonical claim set for a verified identity.
    ///
    /// Total: an identity without a resolvable role gets `user`.
    pub fn for_identity(identity: &Identity) -> Self {
        Self {
            subject: identity.id.clone(),
            email: identity.email.clone(),
            display_name: identity.display_name.clone(),
            role: Role::resolve(&identity.roles),
        }
    }

    /// Check if the caller has the required role.
    pub fn has_role(&self, required: Role) -> bool {
        self.role.has_privilege(required)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// JWT body as signed by the issuer.
///
/// Registered claims use their RFC 7519 names; timestamps are Unix seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct TokenClaims {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl TokenClaims {
    pub(crate) fn into_claim_set(self) -> ClaimSet {
        ClaimSet {
            subject: self.sub,
            email: self.email,
            display_name: self.name,
            role: Role::normalize(&self.role),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_identity(roles: &[&str]) -> Identity {
        Identity {
            id: "user_123".to_string(),
            email: "alice@example.com".to_string(),
            display_name: "Alice".to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn for_identity_maps_fields() {
        let claims = ClaimSet::for_identity(&sample_identity(&["admin"]));
        assert_eq!(claims.subject, "user_123");
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.display_name, "Alice");
        assert_eq!(claims.role, Role::Admin);
    }

    #[test]
    fn for_identity_defaults_to_user_role() {
        let claims = ClaimSet::for_identity(&sample_identity(&[]));
        assert_eq!(claims.role, Role::User);

        let claims = ClaimSet::for_identity(&sample_identity(&["Editor"]));
        assert_eq!(claims.role, Role::User);
    }

    #[test]
    fn has_role_checks_privilege() {
        let admin = ClaimSet::for_identity(&sample_identity(&["admin"]));
        assert!(admin.has_role(Role::Admin));
        assert!(admin.has_role(Role::User));

        let user = ClaimSet::for_identity(&sample_identity(&["user"]));
        assert!(!user.has_role(Role::Admin));
        assert!(!user.is_admin());
    }

    #[test]
    fn wire_claims_normalize_unknown_role() {
        let wire = TokenClaims {
            sub: "user_123".into(),
            email: "a@b.c".into(),
            name: "A".into(),
            role: "root".into(),
            iss: "iss".into(),
            aud: "aud".into(),
            iat: 0,
            exp: 0,
        };
        assert_eq!(wire.into_claim_set().role, Role::User);
    }
}
