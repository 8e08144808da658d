// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup. Every
//! problem found here is fatal: the server refuses to start rather than
//! failing individual requests later.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SIGNING_KEY` | HMAC-SHA-256 secret used to sign bearer tokens | Required |
//! | `JWT_ISSUER` | Issuer claim emitted and expected | `keyward` |
//! | `JWT_AUDIENCE` | Audience claim emitted and expected | `keyward-clients` |
//! | `JWT_TTL_MINUTES` | Token lifetime in minutes, at most five years | `60` |
//! | `JWT_CLOCK_SKEW_SECONDS` | Expiry tolerance during verification, at most one day | `120` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `SEED_ADMIN_EMAIL` | Optional admin identity created at startup | Unset |
//! | `SEED_ADMIN_PASSWORD` | Password for the seeded admin | Unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::net::SocketAddr;

use chrono::Duration;
use thiserror::Error;

pub const SIGNING_KEY_ENV: &str = "JWT_SIGNING_KEY";
pub const ISSUER_ENV: &str = "JWT_ISSUER";
pub const AUDIENCE_ENV: &str = "JWT_AUDIENCE";
pub const TTL_MINUTES_ENV: &str = "JWT_TTL_MINUTES";
pub const CLOCK_SKEW_ENV: &str = "JWT_CLOCK_SKEW_SECONDS";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const SEED_ADMIN_EMAIL_ENV: &str = "SEED_ADMIN_EMAIL";
pub const SEED_ADMIN_PASSWORD_ENV: &str = "SEED_ADMIN_PASSWORD";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_ISSUER: &str = "keyward";
pub const DEFAULT_AUDIENCE: &str = "keyward-clients";
pub const DEFAULT_TTL_MINUTES: i64 = 60;
pub const DEFAULT_CLOCK_SKEW_SECONDS: i64 = 120;
pub const MAX_TTL_MINUTES: i64 = 5 * 365 * 24 * 60;
pub const MAX_CLOCK_SKEW_SECONDS: i64 = 24 * 60 * 60;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Startup configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT_SIGNING_KEY must be set to a non-empty value")]
    MissingSigningKey,

    #[error("JWT_TTL_MINUTES must be an integer between 1 and 2628000, got {0:?}")]
    InvalidTtl(String),

    #[error("JWT_CLOCK_SKEW_SECONDS must be an integer between 0 and 86400, got {0:?}")]
    InvalidClockSkew(String),

    #[error("invalid bind address {0:?}")]
    InvalidBindAddress(String),
}

/// Token signing and verification settings.
#[derive(Clone)]
pub struct AuthSettings {
    pub signing_key: String,
    pub issuer: String,
    pub audience: String,
    pub ttl: Duration,
    pub clock_skew: Duration,
}

impl AuthSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let signing_key = lookup(SIGNING_KEY_ENV)
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingSigningKey)?;

        let ttl_minutes = match lookup(TTL_MINUTES_ENV) {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(minutes) if (1..=MAX_TTL_MINUTES).contains(&minutes) => minutes,
                _ => return Err(ConfigError::InvalidTtl(raw)),
            },
            None => DEFAULT_TTL_MINUTES,
        };

        let skew_seconds = match lookup(CLOCK_SKEW_ENV) {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(seconds) if (0..=MAX_CLOCK_SKEW_SECONDS).contains(&seconds) => seconds,
                _ => return Err(ConfigError::InvalidClockSkew(raw)),
            },
            None => DEFAULT_CLOCK_SKEW_SECONDS,
        };

        Ok(Self {
            signing_key,
            issuer: lookup(ISSUER_ENV).unwrap_or_else(|| DEFAULT_ISSUER.to_string()),
            audience: lookup(AUDIENCE_ENV).unwrap_or_else(|| DEFAULT_AUDIENCE.to_string()),
            ttl: Duration::minutes(ttl_minutes),
            clock_skew: Duration::seconds(skew_seconds),
        })
    }
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("signing_key", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("ttl_minutes", &self.ttl.num_minutes())
            .field("clock_skew_seconds", &self.clock_skew.num_seconds())
            .finish()
    }
}

/// Listener and bootstrap settings.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub bind_addr: SocketAddr,
    /// Admin identity to create at startup, as `(email, password)`.
    pub seed_admin: Option<(String, String)>,
}

impl ServerSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup(HOST_ENV).unwrap_or_else(|| "0.0.0.0".to_string());
        let port = lookup(PORT_ENV).unwrap_or_else(|| "8080".to_string());
        let raw = format!("{host}:{port}");
        let bind_addr = raw
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddress(raw.clone()))?;

        let seed_admin = match (lookup(SEED_ADMIN_EMAIL_ENV), lookup(SEED_ADMIN_PASSWORD_ENV)) {
            (Some(email), Some(password)) => Some((email, password)),
            _ => None,
        };

        Ok(Self {
            bind_addr,
            seed_admin,
        })
    }
}
