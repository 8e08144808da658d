// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Keyward - Session-Guarded Token Authority
//!
//! This crate issues signed bearer tokens and backs them with a server-side
//! session registry, so a token can be revoked before it expires. At most
//! one session is live across the whole system.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Claims, token issuing/verification, session registry, gate
//! - `config` - Environment configuration, validated at startup
//! - `identity` - Credential verification and registration
//! - `store` - In-memory product store (the protected resource)

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod identity;
pub mod models;
pub mod state;
pub mod store;
