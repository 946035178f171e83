// SPDX-FileCopyrightText: 2026 Storyloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session gate: tracks which tokens belong to authenticated identities.
//!
//! The gate has exactly two states per caller: anonymous (no resolvable
//! token) and authenticated (token maps to a session). Login transitions
//! anonymous to authenticated by minting a token; logout transitions back
//! by removing it. Sessions never expire on their own.

use dashmap::DashMap;
use tracing::info;

use storyloom_core::types::{Session, SessionToken};

/// Registry of authenticated sessions, keyed by opaque token.
///
/// Only authenticated sessions are stored, so holding a `Session` value is
/// proof of authentication. Independent user sessions share nothing beyond
/// this map.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: DashMap<String, Session>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Establishes a session for a verified identity and returns it.
    pub fn login(&self, identity: &str) -> Session {
        let token = SessionToken(uuid::Uuid::new_v4().to_string());
        let session = Session {
            identity: identity.to_string(),
            token: token.clone(),
            created_at: chrono::Utc::now(),
        };
        self.sessions.insert(token.0.clone(), session.clone());
        info!(identity, "session established");
        session
    }

    /// Resolves a bearer token to its session, if authenticated.
    pub fn resolve(&self, token: &str) -> Option<Session> {
        self.sessions.get(token).map(|s| s.value().clone())
    }

    /// Ends the session for the given token. Returns false when the token
    /// was not authenticated to begin with.
    pub fn logout(&self, token: &str) -> bool {
        let removed = self.sessions.remove(token).is_some();
        if removed {
            info!("session ended");
        }
        removed
    }

    /// Number of currently authenticated sessions.
    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }
}
