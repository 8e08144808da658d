// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::{AuthGate, SessionRegistry, TokenIssuer, TokenVerifier};
use crate::config::AuthSettings;
use crate::identity::CredentialStore;
use crate::store::ProductStore;

/// Shared application state.
///
/// Built once in `main` and cloned into every request. The session
/// registry inside lives exactly as long as the process.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionRegistry>,
    pub issuer: Arc<TokenIssuer>,
    pub gate: AuthGate,
    pub credentials: Arc<dyn CredentialStore>,
    pub products: Arc<RwLock<ProductStore>>,
}

impl AppState {
    pub fn new(settings: &AuthSettings, credentials: Arc<dyn CredentialStore>) -> Self {
        let sessions = Arc::new(SessionRegistry::new());
        let verifier = Arc::new(TokenVerifier::new(settings));

        Self {
            gate: AuthGate::new(verifier, sessions.clone()),
            sessions,
            issuer: Arc::new(TokenIssuer::new(settings)),
            credentials,
            products: Arc::new(RwLock::new(ProductStore::new())),
        }
    }
}
