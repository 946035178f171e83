// SPDX-FileCopyrightText: 2026 Storyloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory identity backend.
//!
//! Each instance owns an isolated credential map, so tests and
//! single-process deployments get no hidden shared state. Passwords are
//! stored as Argon2id PHC hashes, never as plaintext.

use argon2::password_hash::{PasswordHash, SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use storyloom_core::types::{AdapterType, CreateOutcome, HealthStatus, VerifyOutcome};
use storyloom_core::{IdentityBackend, ServiceAdapter, StoryloomError};

/// An isolated, in-process credential map keyed by identity.
#[derive(Debug, Default)]
pub struct MemoryIdentityBackend {
    /// identity -> Argon2id PHC hash string.
    records: DashMap<String, String>,
}

impl MemoryIdentityBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored credential records.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

#[async_trait]
impl ServiceAdapter for MemoryIdentityBackend {
    fn name(&self) -> &str {
        "memory-identity"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Identity
    }

    async fn health_check(&self) -> Result<HealthStatus, StoryloomError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl IdentityBackend for MemoryIdentityBackend {
    async fn create_account(
        &self,
        identity: &str,
        password: &str,
    ) -> Result<CreateOutcome, StoryloomError> {
        match self.records.entry(identity.to_string()) {
            Entry::Occupied(_) => Ok(CreateOutcome::Conflict),
            Entry::Vacant(slot) => {
                let salt = SaltString::generate(&mut OsRng);
                let hash = Argon2::default()
                    .hash_password(password.as_bytes(), &salt)
                    .map_err(|e| {
                        StoryloomError::Internal(format!("password hashing failed: {e}"))
                    })?
                    .to_string();
                slot.insert(hash);
                Ok(CreateOutcome::Created)
            }
        }
    }

    async fn verify_credentials(
        &self,
        identity: &str,
        password: &str,
    ) -> Result<VerifyOutcome, StoryloomError> {
        let Some(stored) = self.records.get(identity) else {
            return Ok(VerifyOutcome::Invalid);
        };
        let parsed = PasswordHash::new(stored.value())
            .map_err(|e| StoryloomError::Internal(format!("stored hash is malformed: {e}")))?;
        Ok(
            match Argon2::default().verify_password(password.as_bytes(), &parsed) {
                Ok(()) => VerifyOutcome::Verified,
                Err(_) => VerifyOutcome::Invalid,
            },
        )
    }
}
