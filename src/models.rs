// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the REST API. All types derive `ToSchema`
//! for the OpenAPI document.
//!
//! ## Model Categories
//!
//! - **Auth**: registration, login and the identity summary
//! - **Products**: the protected resource

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{ClaimSet, Role};

// =============================================================================
// Auth Models
// =============================================================================

/// Request to log in with email and password.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request to create an account (and log in with it).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    /// Shown in token claims; defaults to the email.
    #[serde(default)]
    pub display_name: String,
    /// `user` or `admin`; anything else becomes `user`.
    #[serde(default)]
    pub role: Option<String>,
}

/// Identity summary returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub role: Role,
}

impl From<ClaimSet> for UserSummary {
    fn from(claims: ClaimSet) -> Self {
        Self {
            id: claims.subject,
            email: claims.email,
            display_name: claims.display_name,
            role: claims.role,
        }
    }
}

/// Successful login or registration.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserSummary,
    /// Bearer token for the `Authorization` header.
    pub token: String,
    pub expires_at: DateTime<Utc>,
    /// True when the caller already held the active session.
    pub session_refreshed: bool,
}

/// Plain acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// =============================================================================
// Product Models
// =============================================================================

/// A catalogue product.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Product {
    /// Unique identifier for this product.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Unit price; non-negative.
    pub price: f64,
    /// Units in stock; non-negative.
    pub stock: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a product.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub stock: i64,
}

/// Request to replace a product's fields.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub stock: i64,
}
