// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token verification.
//!
//! Checks run in a fixed order: structure, signature, issuer, audience,
//! expiry. The first failure wins. Verification never panics; every
//! outcome is a value.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::Serialize;
use thiserror::Error;

use super::claims::{ClaimSet, TokenClaims};
use crate::config::AuthSettings;

/// Why a token was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationKind {
    Malformed,
    BadSignature,
    WrongIssuer,
    WrongAudience,
    Expired,
}

impl VerificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationKind::Malformed => "malformed",
            VerificationKind::BadSignature => "bad_signature",
            VerificationKind::WrongIssuer => "wrong_issuer",
            VerificationKind::WrongAudience => "wrong_audience",
            VerificationKind::Expired => "expired",
        }
    }
}

impl std::fmt::Display for VerificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("token verification failed: {kind}")]
pub struct VerificationError {
    pub kind: VerificationKind,
}

impl From<VerificationKind> for VerificationError {
    fn from(kind: VerificationKind) -> Self {
        Self { kind }
    }
}

/// Checks signature, issuer, audience and expiry of bearer tokens.
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
    clock_skew: Duration,
}

impl TokenVerifier {
    pub fn new(settings: &AuthSettings) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&settings.issuer]);
        validation.set_audience(&[&settings.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        // Expiry is checked after issuer/audience, against our own clock.
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            key: DecodingKey::from_secret(settings.signing_key.as_bytes()),
            validation,
            clock_skew: settings.clock_skew,
        }
    }

    pub fn verify(&self, token: &str) -> Result<ClaimSet, VerificationError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify `token` as of `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<ClaimSet, VerificationError> {
        let data = decode::<TokenClaims>(token, &self.key, &self.validation)
            .map_err(|e| VerificationError::from(classify(e.kind())))?;

        let claims = data.claims;
        if now.timestamp() > claims.exp.saturating_add(self.clock_skew.num_seconds()) {
            return Err(VerificationKind::Expired.into());
        }

        Ok(claims.into_claim_set())
    }
}

fn classify(kind: &ErrorKind) -> VerificationKind {
    match kind {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => VerificationKind::BadSignature,
        ErrorKind::InvalidIssuer => VerificationKind::WrongIssuer,
        ErrorKind::InvalidAudience => VerificationKind::WrongAudience,
        ErrorKind::ExpiredSignature => VerificationKind::Expired,
        _ => VerificationKind::Malformed,
    }
}
