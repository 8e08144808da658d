// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Server-side session registry.
//!
//! ## Policy
//!
//! At most **one** session is live system-wide, not one per user. A login by
//! a different subject while a session exists is refused; a repeat login by
//! the holder refreshes its entry.
//!
//! ## Concurrency
//!
//! The whole map sits behind a single `Mutex`, so every operation (sweep
//! included) is one critical section. The single-session invariant spans the
//! map rather than one key, which per-key atomicity cannot enforce.
//!
//! ## Expiry
//!
//! There is no background timer. Expired entries are dropped lazily by
//! whichever operation touches the registry next.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use thiserror::Error;

/// One registered session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub subject_id: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Outcome of a successful [`SessionRegistry::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The registry was empty; a new session now exists.
    Opened,
    /// The subject already held the session; token and expiry were replaced.
    Refreshed,
}

/// A different subject already holds the active session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("session is held by another subject")]
pub struct SessionConflict {
    /// Current holder. For server-side logs only.
    pub holder: String,
}

type SessionMap = HashMap<String, Session>;

/// Concurrency-safe, self-expiring, single-slot session store.
///
/// One instance lives for the whole process and is shared through
/// `AppState`. The map is private; the methods below are the only way in.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Mutex<SessionMap>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SessionMap> {
        // Every operation leaves the map consistent before it can panic.
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Remove every expired entry.
    pub fn sweep(&self) {
        sweep_expired(&mut self.lock(), Utc::now());
    }

    pub fn is_anyone_logged_in(&self) -> bool {
        let mut sessions = self.lock();
        sweep_expired(&mut sessions, Utc::now());
        !sessions.is_empty()
    }

    /// True iff `subject_id` holds an unexpired session. An expired entry is
    /// evicted on the way.
    pub fn is_logged_in(&self, subject_id: &str) -> bool {
        let mut sessions = self.lock();
        live_entry(&mut sessions, subject_id, Utc::now()).is_some()
    }

    /// The sole occupant, if any.
    pub fn current_subject(&self) -> Option<String> {
        let mut sessions = self.lock();
        sweep_expired(&mut sessions, Utc::now());
        occupant(&sessions).map(str::to_owned)
    }

    /// Register a session for `subject_id`.
    ///
    /// Fails without touching the map if another subject holds the live
    /// session. The holder itself is refreshed rather than refused.
    pub fn add(
        &self,
        subject_id: &str,
        token: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Result<Admission, SessionConflict> {
        let mut sessions = self.lock();
        sweep_expired(&mut sessions, Utc::now());

        let admission = if sessions.contains_key(subject_id) {
            Admission::Refreshed
        } else if let Some(holder) = occupant(&sessions) {
            let conflict = SessionConflict {
                holder: holder.to_owned(),
            };
            tracing::info!(
                subject_id,
                holder = %conflict.holder,
                "session refused: another subject is logged in"
            );
            return Err(conflict);
        } else {
            Admission::Opened
        };

        sessions.insert(
            subject_id.to_owned(),
            Session {
                subject_id: subject_id.to_owned(),
                token: token.into(),
                expires_at,
            },
        );

        tracing::info!(subject_id, %expires_at, ?admission, "session registered");
        Ok(admission)
    }

    /// Remove the session of `subject_id`.
    ///
    /// Returns false when there was no live session to remove; an expired
    /// entry counts as "not logged in" and is only evicted.
    pub fn remove(&self, subject_id: &str) -> bool {
        let mut sessions = self.lock();
        if live_entry(&mut sessions, subject_id, Utc::now()).is_none() {
            return false;
        }
        sessions.remove(subject_id);
        tracing::info!(subject_id, "session closed");
        true
    }

    /// Remove whichever session is active.
    pub fn remove_current(&self) -> bool {
        let mut sessions = self.lock();
        sweep_expired(&mut sessions, Utc::now());

        let Some(subject_id) = occupant(&sessions).map(str::to_owned) else {
            return false;
        };
        sessions.remove(&subject_id);
        tracing::info!(subject_id = %subject_id, "current session closed");
        true
    }

    /// The live token held by `subject_id`, if any.
    pub fn token_of(&self, subject_id: &str) -> Option<String> {
        let mut sessions = self.lock();
        live_entry(&mut sessions, subject_id, Utc::now()).map(|s| s.token.clone())
    }

    /// True iff some unexpired session holds exactly `token`.
    pub fn is_token_live(&self, token: &str) -> bool {
        let mut sessions = self.lock();
        sweep_expired(&mut sessions, Utc::now());
        sessions.values().any(|s| s.token == token)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.lock().len()
    }

    #[cfg(test)]
    fn insert_unchecked(&self, session: Session) {
        self.lock().insert(session.subject_id.clone(), session);
    }
}

fn sweep_expired(sessions: &mut SessionMap, now: DateTime<Utc>) {
    sessions.retain(|subject_id, session| {
        let live = session.is_live(now);
        if !live {
            tracing::debug!(subject_id = %subject_id, "expired session evicted");
        }
        live
    });
}

/// Look up a live entry, evicting it if it has expired.
fn live_entry<'a>(
    sessions: &'a mut SessionMap,
    subject_id: &str,
    now: DateTime<Utc>,
) -> Option<&'a Session> {
    let expired = sessions.get(subject_id).map(|s| !s.is_live(now))?;
    if expired {
        sessions.remove(subject_id);
        tracing::debug!(subject_id, "expired session evicted");
        return None;
    }
    sessions.get(subject_id)
}

/// The single occupant. Should the map ever hold more than one entry, the
/// lexicographically smallest subject is reported and the anomaly logged.
fn occupant(sessions: &SessionMap) -> Option<&str> {
    if sessions.len() > 1 {
        tracing::error!(
            occupants = sessions.len(),
            "session registry holds more than one session"
        );
    }
    sessions.keys().min().map(String::as_str)
}
