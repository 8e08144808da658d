// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-request authentication decision.
//!
//! A request passes only if a session is active, the token verifies, and the
//! registry still considers the token's subject logged in. The registry has
//! the last word: a perfectly valid signature does not survive a logout.

use std::sync::Arc;

use thiserror::Error;

use super::claims::ClaimSet;
use super::session::SessionRegistry;
use super::verifier::{TokenVerifier, VerificationKind};

/// Why the gate turned a request away.
///
/// The caller only ever sees a uniform "unauthenticated"; the variant is for
/// server-side logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GateRejection {
    #[error("no session is active")]
    NoActiveSession,
    #[error("token rejected: {0}")]
    Verification(VerificationKind),
    #[error("session revoked")]
    SessionRevoked,
}

/// Verifier + registry, composed.
#[derive(Clone)]
pub struct AuthGate {
    verifier: Arc<TokenVerifier>,
    sessions: Arc<SessionRegistry>,
}

impl AuthGate {
    pub fn new(verifier: Arc<TokenVerifier>, sessions: Arc<SessionRegistry>) -> Self {
        Self { verifier, sessions }
    }

    /// Full check: active session, valid token, live subject.
    pub fn authenticate(&self, token: &str) -> Result<ClaimSet, GateRejection> {
        if !self.sessions.is_anyone_logged_in() {
            return Err(reject(GateRejection::NoActiveSession));
        }

        let claims = self.verify(token)?;

        if !self.sessions.is_logged_in(&claims.subject) {
            tracing::warn!(subject_id = %claims.subject, "rejected token for revoked session");
            return Err(GateRejection::SessionRevoked);
        }

        Ok(claims)
    }

    /// Cryptographic check only; ignores the registry.
    pub fn verify(&self, token: &str) -> Result<ClaimSet, GateRejection> {
        self.verifier
            .verify(token)
            .map_err(|e| reject(GateRejection::Verification(e.kind)))
    }
}

fn reject(rejection: GateRejection) -> GateRejection {
    tracing::warn!(reason = %rejection, "request not authenticated");
    rejection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Role, TokenIssuer};
    use crate::config::AuthSettings;
    use chrono::{Duration, Utc};

    fn settings() -> AuthSettings {
        AuthSettings {
            signing_key: "gate-test-key".to_string(),
            issuer: "keyward-test".to_string(),
            audience: "keyward-test-clients".to_string(),
            ttl: Duration::minutes(60),
            clock_skew: Duration::seconds(0),
        }
    }

    fn claims_for(subject: &str) -> ClaimSet {
        ClaimSet {
            subject: subject.to_string(),
            email: format!("{subject}@example.com"),
            display_name: subject.to_string(),
            role: Role::User,
        }
    }

    fn gate() -> (AuthGate, TokenIssuer, Arc<SessionRegistry>) {
        let s = settings();
        let sessions = Arc::new(SessionRegistry::new());
        let gate = AuthGate::new(Arc::new(TokenVerifier::new(&s)), sessions.clone());
        (gate, TokenIssuer::new(&s), sessions)
    }

    #[test]
    fn rejects_when_nobody_is_logged_in() {
        let (gate, issuer, _) = gate();
        let token = issuer.issue(&claims_for("alice")).unwrap().token;
        assert_eq!(gate.authenticate(&token), Err(GateRejection::NoActiveSession));
    }

    #[test]
    fn accepts_token_of_live_session() {
        let (gate, issuer, sessions) = gate();
        let issued = issuer.issue(&claims_for("alice")).unwrap();
        sessions.add("alice", issued.token.clone(), issued.expires_at).unwrap();

        let claims = gate.authenticate(&issued.token).unwrap();
        assert_eq!(claims.subject, "alice");
        assert_eq!(claims.role, Role::User);
    }

    #[test]
    fn revocation_beats_a_valid_signature() {
        let (gate, issuer, sessions) = gate();
        let alice = issuer.issue(&claims_for("alice")).unwrap();
        sessions.add("alice", alice.token.clone(), alice.expires_at).unwrap();
        assert!(sessions.remove("alice"));

        let bob = issuer.issue(&claims_for("bob")).unwrap();
        sessions.add("bob", bob.token.clone(), bob.expires_at).unwrap();

        assert_eq!(gate.authenticate(&alice.token), Err(GateRejection::SessionRevoked));
        assert!(gate.authenticate(&bob.token).is_ok());
    }

    #[test]
    fn verification_failure_is_reported_with_kind() {
        let (gate, issuer, sessions) = gate();
        let issued = issuer.issue(&claims_for("alice")).unwrap();
        sessions.add("alice", issued.token, issued.expires_at).unwrap();

        assert_eq!(
            gate.authenticate("garbage"),
            Err(GateRejection::Verification(VerificationKind::Malformed))
        );
    }

    #[test]
    fn expired_registry_entry_means_no_session() {
        let (gate, issuer, sessions) = gate();
        let issued = issuer.issue(&claims_for("alice")).unwrap();
        sessions
            .add("alice", issued.token.clone(), Utc::now() - Duration::seconds(1))
            .unwrap();
        assert_eq!(gate.authenticate(&issued.token), Err(GateRejection::NoActiveSession));
    }

    #[test]
    fn verify_ignores_the_registry() {
        let (gate, issuer, _) = gate();
        let token = issuer.issue(&claims_for("alice")).unwrap().token;
        assert_eq!(gate.verify(&token).unwrap().subject, "alice");
    }
}
