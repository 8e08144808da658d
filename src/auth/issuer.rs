// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token issuance (HS256).
//!
//! Issuing a token has no side effects. Registering the resulting session is
//! the caller's job (see `SessionRegistry::add`).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use thiserror::Error;

use super::claims::{ClaimSet, TokenClaims};
use crate::config::AuthSettings;

/// A freshly signed token and the validity window embedded in it.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum IssueError {
    #[error("token expiry is out of the representable time range")]
    ExpiryOutOfRange,

    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Signs claim sets into time-bounded bearer tokens.
pub struct TokenIssuer {
    key: EncodingKey,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(settings: &AuthSettings) -> Self {
        Self {
            key: EncodingKey::from_secret(settings.signing_key.as_bytes()),
            issuer: settings.issuer.clone(),
            audience: settings.audience.clone(),
            ttl: settings.ttl,
        }
    }

    /// Sign `claims` with an expiry of now + TTL.
    pub fn issue(&self, claims: &ClaimSet) -> Result<IssuedToken, IssueError> {
        self.issue_at(claims, Utc::now())
    }

    /// Sign `claims` as if issued at `now`.
    pub fn issue_at(
        &self,
        claims: &ClaimSet,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, IssueError> {
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or(IssueError::ExpiryOutOfRange)?;
        let body = TokenClaims {
            sub: claims.subject.clone(),
            email: claims.email.clone(),
            name: claims.display_name.clone(),
            role: claims.role.to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &body, &self.key)?;

        Ok(IssuedToken {
            token,
            issued_at: now,
            expires_at,
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
