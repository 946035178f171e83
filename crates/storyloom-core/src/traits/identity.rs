// SPDX-FileCopyrightText: 2026 Storyloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity backend trait for credential creation and verification.

use async_trait::async_trait;

use crate::error::StoryloomError;
use crate::traits::adapter::ServiceAdapter;
use crate::types::{CreateOutcome, VerifyOutcome};

/// Backend that persists and verifies credential records.
///
/// Backed in production by a remote identity provider and by an isolated
/// in-memory implementation in tests and single-process deployments.
/// Password policy is NOT enforced here; the credential store checks it
/// before the backend is touched.
#[async_trait]
pub trait IdentityBackend: ServiceAdapter {
    /// Creates a credential record for `identity`.
    async fn create_account(
        &self,
        identity: &str,
        password: &str,
    ) -> Result<CreateOutcome, StoryloomError>;

    /// Verifies that `password` matches the record stored for `identity`.
    async fn verify_credentials(
        &self,
        identity: &str,
        password: &str,
    ) -> Result<VerifyOutcome, StoryloomError>;
}
