// SPDX-FileCopyrightText: 2026 Storyloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generator adapter trait for text-generation service integrations.

use async_trait::async_trait;

use crate::error::StoryloomError;
use crate::traits::adapter::ServiceAdapter;
use crate::types::{GenerationRequest, GenerationResult};

/// Adapter for text-generation service integrations.
///
/// Returns the generated text together with the provider-reported finish
/// reason; callers decide how to treat safety blocks and length truncation.
/// Transport-level failures (including timeouts) surface as
/// `StoryloomError::Provider`.
#[async_trait]
pub trait StoryProvider: ServiceAdapter {
    /// Sends a generation request and returns the full result.
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResult, StoryloomError>;
}
