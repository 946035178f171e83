// SPDX-FileCopyrightText: 2026 Storyloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the hosted captioning inference API.

use serde::Deserialize;

/// One entry of the inference response array.
///
/// The endpoint returns `[{"generated_text": "..."}]` with a single element
/// for single-image input.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptionOutput {
    /// The generated caption text.
    pub generated_text: String,
}

/// Error body returned by the inference API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    /// Human-readable error message.
    pub error: String,
    /// Seconds until the model is expected to be loaded, when warming up.
    #[serde(default)]
    pub estimated_time: Option<f64>,
}
