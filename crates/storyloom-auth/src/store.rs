// SPDX-FileCopyrightText: 2026 Storyloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential store: password policy plus the injected identity backend.
//!
//! The store owns the signup/login contract; the backend only persists and
//! verifies records. Weak passwords never reach the backend.

use std::sync::Arc;

use tracing::{debug, info};

use storyloom_core::types::{CreateOutcome, VerifyOutcome};
use storyloom_core::{IdentityBackend, StoryloomError};

use crate::policy::password_meets_policy;

/// Outcome of a signup attempt. Backend transport failures surface
/// separately as `Err(StoryloomError::Identity)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupOutcome {
    /// A credential record was created.
    Created,
    /// The password failed the strength policy; nothing was created.
    WeakPassword,
    /// The identity already has a record; nothing was created.
    AlreadyExists,
}

/// Outcome of a login attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Credentials verified; the caller may establish a session.
    Authenticated,
    /// Unknown identity or wrong password.
    Invalid,
}

/// Validates and persists user credentials through an injected backend.
pub struct CredentialStore {
    backend: Arc<dyn IdentityBackend>,
}

impl CredentialStore {
    /// Creates a store over the given identity backend.
    pub fn new(backend: Arc<dyn IdentityBackend>) -> Self {
        Self { backend }
    }

    /// Registers a new identity.
    ///
    /// The password policy is checked first; only policy-passing passwords
    /// reach the backend.
    pub async fn signup(
        &self,
        identity: &str,
        password: &str,
    ) -> Result<SignupOutcome, StoryloomError> {
        if !password_meets_policy(password) {
            debug!(identity, "signup rejected: weak password");
            return Ok(SignupOutcome::WeakPassword);
        }

        match self.backend.create_account(identity, password).await? {
            CreateOutcome::Created => {
                info!(identity, "credential record created");
                Ok(SignupOutcome::Created)
            }
            CreateOutcome::Conflict => {
                debug!(identity, "signup rejected: identity already exists");
                Ok(SignupOutcome::AlreadyExists)
            }
        }
    }

    /// Verifies credentials for an existing identity.
    pub async fn login(
        &self,
        identity: &str,
        password: &str,
    ) -> Result<LoginOutcome, StoryloomError> {
        match self.backend.verify_credentials(identity, password).await? {
            VerifyOutcome::Verified => {
                info!(identity, "login verified");
                Ok(LoginOutcome::Authenticated)
            }
            VerifyOutcome::Invalid => {
                debug!(identity, "login rejected: invalid credentials");
                Ok(LoginOutcome::Invalid)
            }
        }
    }
}
