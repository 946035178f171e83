// SPDX-FileCopyrightText: 2026 Storyloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types shared across the Storyloom workspace.

use thiserror::Error;

/// The primary error type used across Storyloom adapter traits and core operations.
#[derive(Debug, Error)]
pub enum StoryloomError {
    /// Configuration errors (missing API key, invalid TOML, bad field values).
    /// Fatal to the affected feature, never to the process.
    #[error("configuration error: {0}")]
    Config(String),

    /// Identity backend errors (account creation/verification transport failures).
    #[error("identity provider error: {message}")]
    Identity {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Captioning service errors (API failure, malformed response).
    #[error("captioning error: {message}")]
    Captioner {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Text-generation service errors (API failure, token limits, model not found).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An uploaded image could not be decoded. Per-image and recoverable:
    /// the batch continues with the remaining images.
    #[error("failed to decode image `{name}`: {detail}")]
    ImageDecode { name: String, detail: String },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
