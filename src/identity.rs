// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity store: credential verification and registration.
//!
//! The authentication core only consumes [`Identity`] values; how passwords
//! are stored is this module's business. The in-memory store keeps Argon2
//! PHC strings keyed by normalized email.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::Role;

/// A verified user as seen by the authentication core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub display_name: String,
    /// Raw role names; resolved by the claims builder.
    pub roles: Vec<String>,
}

/// Input for creating an identity.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub email: String,
    pub password: String,
    pub display_name: String,
    /// Requested role, normalized to `user`/`admin`.
    pub role: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("an account with this email already exists")]
    EmailTaken,
    #[error("{0}")]
    InvalidInput(String),
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// Credential verification collaborator.
pub trait CredentialStore: Send + Sync {
    /// The identity for `email` if `password` matches, otherwise `None`.
    fn verify(&self, email: &str, password: &str) -> Option<Identity>;

    fn register(&self, new: NewIdentity) -> Result<Identity, IdentityError>;
}

struct StoredIdentity {
    identity: Identity,
    password_hash: String,
}

/// Process-local identity store.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    users: RwLock<HashMap<String, StoredIdentity>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn verify(&self, email: &str, password: &str) -> Option<Identity> {
        let (identity, password_hash) = {
            let users = self.users.read().unwrap_or_else(PoisonError::into_inner);
            let stored = users.get(&normalize_email(email))?;
            (stored.identity.clone(), stored.password_hash.clone())
        };
        verify_password(&password_hash, password).then_some(identity)
    }

    fn register(&self, new: NewIdentity) -> Result<Identity, IdentityError> {
        let email = normalize_email(&new.email);
        validate(&email, &new.password)?;

        // Hash before taking the write lock; Argon2 is slow on purpose.
        let password_hash = hash_password(&new.password)?;

        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        if users.contains_key(&email) {
            return Err(IdentityError::EmailTaken);
        }

        let display_name = match new.display_name.trim() {
            "" => email.clone(),
            name => name.to_string(),
        };
        let role = Role::normalize(new.role.as_deref().unwrap_or_default());

        let identity = Identity {
            id: Uuid::new_v4().to_string(),
            email: email.clone(),
            display_name,
            roles: vec![role.to_string()],
        };

        users.insert(
            email,
            StoredIdentity {
                identity: identity.clone(),
                password_hash,
            },
        );

        tracing::info!(subject_id = %identity.id, %role, "identity registered");
        Ok(identity)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate(email: &str, password: &str) -> Result<(), IdentityError> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
        _ => return Err(IdentityError::InvalidInput("email is not valid".to_string())),
    }
    if password.is_empty() {
        return Err(IdentityError::InvalidInput("password must not be empty".to_string()));
    }
    Ok(())
}

fn hash_password(password: &str) -> Result<String, IdentityError> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| IdentityError::Hashing(e.to_string()))?;
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| IdentityError::Hashing(e.to_string()))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|phc| phc.to_string())
        .map_err(|e| IdentityError::Hashing(e.to_string()))
}

fn verify_password(hash: &str, password: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
