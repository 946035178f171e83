// SPDX-FileCopyrightText: 2026 Storyloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base trait implemented by every external-service adapter.

use async_trait::async_trait;

use crate::error::StoryloomError;
use crate::types::{AdapterType, HealthStatus};

/// The base trait for Storyloom external-service adapters.
///
/// Every adapter (captioner, generator, identity backend) implements this
/// trait, which provides identity and health check capabilities used by the
/// `doctor` command and startup wiring.
#[async_trait]
pub trait ServiceAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this adapter.
    fn version(&self) -> semver::Version;

    /// Returns the type of adapter (captioner, generator, identity).
    fn adapter_type(&self) -> AdapterType;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, StoryloomError>;
}
