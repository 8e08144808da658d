// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Signed bearer tokens with a server-side revocation layer.
//!
//! ## Auth Flow
//!
//! 1. Login: credentials are verified by the identity store
//! 2. `ClaimSet::for_identity` builds the claims
//! 3. `TokenIssuer` signs an HS256 JWT (`iss`, `aud`, `iat`, `exp`)
//! 4. `SessionRegistry::add` admits the session (one live session system-wide)
//! 5. Every protected request presents `Authorization: Bearer <token>`;
//!    the `AuthGate` verifies the token and then asks the registry whether
//!    its subject is still logged in
//!
//! ## Security
//!
//! - Tokens are refused once their session is removed, even before `exp`
//! - Clients get a uniform 401; the precise reason is only logged
//! - Clock skew tolerance is configurable (`JWT_CLOCK_SKEW_SECONDS`)

pub mod claims;
pub mod error;
pub mod extractor;
pub mod gate;
pub mod issuer;
pub mod roles;
pub mod session;
pub mod verifier;

pub use claims::ClaimSet;
pub use error::AuthError;
pub use extractor::{AdminOnly, Auth, Verified};
pub use gate::{AuthGate, GateRejection};
pub use issuer::{IssueError, IssuedToken, TokenIssuer};
pub use roles::Role;
pub use session::{Admission, Session, SessionConflict, SessionRegistry};
pub use verifier::{TokenVerifier, VerificationError, VerificationKind};
