// SPDX-FileCopyrightText: 2026 Storyloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Captioning adapter trait for vision-captioning service integrations.

use async_trait::async_trait;

use crate::error::StoryloomError;
use crate::traits::adapter::ServiceAdapter;
use crate::types::DecodedImage;

/// Adapter for image-captioning service integrations.
///
/// Treated as a pure, stateless boundary: one decoded image in, one short
/// descriptive sentence out. Implementations apply their own transport
/// timeout and surface failures as `StoryloomError::Captioner`.
#[async_trait]
pub trait CaptionProvider: ServiceAdapter {
    /// Produces a single descriptive caption for the given image.
    async fn caption(&self, image: &DecodedImage) -> Result<String, StoryloomError>;
}
