// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Registration, login, logout and identity endpoints.

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    auth::{Admission, Auth, ClaimSet, Verified},
    error::ApiError,
    identity::{Identity, NewIdentity},
    models::{AuthResponse, LoginRequest, MessageResponse, RegisterRequest, UserSummary},
    state::AppState,
};

/// Issue a token for `identity` and admit its session.
fn open_session(state: &AppState, identity: &Identity) -> Result<AuthResponse, ApiError> {
    let claims = ClaimSet::for_identity(identity);

    let issued = state
        .issuer
        .issue(&claims)
        .map_err(|e| ApiError::internal(&e.to_string()))?;

    let admission = state
        .sessions
        .add(&claims.subject, issued.token.clone(), issued.expires_at)?;

    Ok(AuthResponse {
        user: claims.into(),
        token: issued.token,
        expires_at: issued.expires_at,
        session_refreshed: admission == Admission::Refreshed,
    })
}

/// Create an account and log in with it.
///
/// The account is kept even if the login part is refused because another
/// user holds the session.
#[utoipa::path(
    post,
    path = "/v1/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created and logged in", body = AuthResponse),
        (status = 400, description = "Invalid email or password"),
        (status = 409, description = "Email taken, or another user is logged in")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let credentials = state.credentials.clone();
    let new = NewIdentity {
        email: request.email,
        password: request.password,
        display_name: request.display_name,
        role: request.role,
    };

    let identity = tokio::task::spawn_blocking(move || credentials.register(new))
        .await
        .map_err(|e| ApiError::internal(&format!("Registration task failed: {e}")))??;

    let response = open_session(&state, &identity)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Log in with email and password.
///
/// Only one session may be active system-wide. Logging in again as the
/// current holder refreshes the session; anyone else gets 409.
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid email or password"),
        (status = 409, description = "Another user is already logged in")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("email and password are required"));
    }

    let credentials = state.credentials.clone();
    let identity = tokio::task::spawn_blocking(move || {
        credentials.verify(&request.email, &request.password)
    })
    .await
    .map_err(|e| ApiError::internal(&format!("Credential check failed: {e}")))?
    .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    Ok(Json(open_session(&state, &identity)?))
}

/// End the active session.
///
/// Acts on the single global session, whoever holds it. The token only has
/// to verify; it need not belong to the current holder.
#[utoipa::path(
    post,
    path = "/v1/auth/logout",
    tag = "Auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Session removed", body = MessageResponse),
        (status = 400, description = "No session was active"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn logout(
    Verified(claims): Verified,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !state.sessions.remove_current() {
        return Err(ApiError::bad_request("No active session"));
    }

    tracing::info!(subject_id = %claims.subject, "logout");
    Ok(Json(MessageResponse::new("Logged out")))
}

/// Get the authenticated caller's identity.
#[utoipa::path(
    get,
    path = "/v1/auth/me",
    tag = "Auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller identity", body = UserSummary),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn me(Auth(claims): Auth) -> Json<UserSummary> {
    Json(claims.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::test_state;

    fn seed(state: &AppState, email: &str) -> Identity {
        state
            .credentials
            .register(NewIdentity {
                email: email.to_string(),
                password: "pw".to_string(),
                display_name: String::new(),
                role: None,
            })
            .unwrap()
    }

    #[test]
    fn open_session_admits_then_refreshes() {
        let state = test_state();
        let alice = seed(&state, "alice@example.com");

        let first = open_session(&state, &alice).unwrap();
        assert!(!first.session_refreshed);
        assert_eq!(first.user.email, "alice@example.com");

        let second = open_session(&state, &alice).unwrap();
        assert!(second.session_refreshed);
        assert_eq!(state.sessions.token_of(&alice.id), Some(second.token));
    }

    #[test]
    fn open_session_conflicts_for_second_subject() {
        let state = test_state();
        let alice = seed(&state, "alice@example.com");
        let bob = seed(&state, "bob@example.com");

        open_session(&state, &alice).unwrap();
        let err = open_session(&state, &bob).unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(state.sessions.current_subject(), Some(alice.id));
    }

    #[tokio::test]
    async fn login_rejects_blank_credentials() {
        let state = test_state();
        let err = login(
            State(state),
            Json(LoginRequest {
                email: " ".into(),
                password: String::new(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let state = test_state();
        seed(&state, "alice@example.com");
        let err = login(
            State(state.clone()),
            Json(LoginRequest {
                email: "alice@example.com".into(),
                password: "nope".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert!(!state.sessions.is_anyone_logged_in());
    }
}
