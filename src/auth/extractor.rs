// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors that run the authentication gate.
//!
//! Use the `Auth` extractor in handlers to require a live session:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(claims): Auth) -> impl IntoResponse {
//!     // claims is the verified ClaimSet
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::{AuthError, ClaimSet, Role};
use crate::state::AppState;

/// Pull the bearer token out of the `Authorization` header.
fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(AuthError::InvalidAuthHeader)?;

    if token.is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }
    Ok(token)
}

/// Extractor for authenticated callers.
///
/// Runs the full gate: some session must be active, the token must verify,
/// and its subject must still hold the session.
///
/// # Example
///
/// ```rust,ignore
/// async fn list_products(
///     Auth(claims): Auth,
///     State(state): State<AppState>,
/// ) -> Result<Json<Vec<Product>>, ApiError> {
///     // claims.subject is the caller's identity id
///     // claims.role is their role
/// }
/// ```
pub struct Auth(pub ClaimSet);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = state.gate.authenticate(token)?;
        Ok(Auth(claims))
    }
}

/// Extractor that requires the admin role on top of `Auth`.
pub struct AdminOnly(pub ClaimSet);

impl FromRequestParts<AppState> for AdminOnly {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Auth(claims) = Auth::from_request_parts(parts, state).await?;

        if !claims.has_role(Role::Admin) {
            tracing::warn!(subject_id = %claims.subject, role = %claims.role, "admin role required");
            return Err(AuthError::InsufficientPermissions);
        }

        Ok(AdminOnly(claims))
    }
}

/// Extractor that only checks the token itself (signature, issuer,
/// audience, expiry) and ignores the session registry.
///
/// Logout uses this: it acts on the global session, so it must not depend
/// on the caller's own session still being live.
pub struct Verified(pub ClaimSet);

impl FromRequestParts<AppState> for Verified {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = state.gate.verify(token)?;
        Ok(Verified(claims))
    }
}
