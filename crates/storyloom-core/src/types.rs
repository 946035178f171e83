// SPDX-FileCopyrightText: 2026 Storyloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Storyloom pipeline.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Opaque session token issued at login and presented as a bearer credential.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionToken(pub String);

impl std::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An authenticated session.
///
/// A `Session` value only exists for authenticated identities; anonymous
/// callers simply have none. This makes the invariant "identity and token
/// are present only when authenticated" unrepresentable rather than checked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// The identity (e.g. email) this session is attached to.
    pub identity: String,
    /// The opaque token the session is keyed by.
    pub token: SessionToken,
    /// When the session was established.
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of external-service adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Captioner,
    Generator,
    Identity,
}

// --- Upload types ---

/// Declared format of an uploaded image. Only raster formats the pipeline
/// accepts are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UploadFormat {
    Png,
    Jpeg,
}

impl UploadFormat {
    /// Map a MIME type from an upload's `Content-Type` to a supported format.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    /// Guess the format from a file name extension.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = name.rsplit('.').next()?;
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }
}

/// One uploaded image, owned by a single pipeline invocation. Never persisted.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    /// Client-supplied file name, used in per-image error reporting.
    pub name: String,
    /// Declared raster format.
    pub format: UploadFormat,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

/// A decoded image normalized to 8-bit RGB, the fixed channel order the
/// captioning boundary expects.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// Interleaved RGB8 pixel data, `width * height * 3` bytes.
    pub pixels: Vec<u8>,
}

// --- Story types ---

/// Narrative genre selected by the user. A closed set: strings that do not
/// parse to a variant are rejected at the API boundary.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
pub enum Genre {
    Fantasy,
    #[strum(serialize = "Science-fiction")]
    #[serde(rename = "Science-fiction")]
    ScienceFiction,
    Horror,
    Mystery,
    Historical,
}

/// A request to the text-generation service boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Optional system/instruction message.
    pub system: Option<String>,
    /// The full user prompt.
    pub prompt: String,
    /// Output token bound.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

/// Why the text-generation service stopped producing output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    /// Generation completed naturally.
    Stop,
    /// Generation hit the output token bound.
    Length,
    /// Output was withheld by the provider's safety filter.
    ContentFilter,
    /// Any other provider-reported reason.
    Other,
}

/// Token usage reported by the text-generation service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Result from the text-generation service boundary: the generated text (or
/// whatever partial text exists), the finish reason, and usage counters.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub text: Option<String>,
    pub finish: FinishReason,
    pub usage: TokenUsage,
}

// --- Identity backend outcomes ---

/// Outcome of `IdentityBackend::create_account`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// A new credential record was created.
    Created,
    /// The identity already has a record; nothing was created.
    Conflict,
}

/// Outcome of `IdentityBackend::verify_credentials`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// Identity exists and the password matches.
    Verified,
    /// Unknown identity or wrong password (indistinguishable by design).
    Invalid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn genre_round_trips_through_display_and_from_str() {
        for genre in Genre::iter() {
            let s = genre.to_string();
            let parsed = Genre::from_str(&s).expect("display form should parse back");
            assert_eq!(genre, parsed);
        }
    }

    #[test]
    fn science_fiction_uses_hyphenated_wire_name() {
        assert_eq!(Genre::ScienceFiction.to_string(), "Science-fiction");
        assert_eq!(
            Genre::from_str("Science-fiction").unwrap(),
            Genre::ScienceFiction
        );
        let json = serde_json::to_string(&Genre::ScienceFiction).unwrap();
        assert_eq!(json, "\"Science-fiction\"");
    }

    #[test]
    fn unknown_genre_is_rejected() {
        assert!(Genre::from_str("Romance").is_err());
        assert!(Genre::from_str("").is_err());
    }

    #[test]
    fn upload_format_from_mime() {
        assert_eq!(UploadFormat::from_mime("image/png"), Some(UploadFormat::Png));
        assert_eq!(UploadFormat::from_mime("image/jpeg"), Some(UploadFormat::Jpeg));
        assert_eq!(UploadFormat::from_mime("image/jpg"), Some(UploadFormat::Jpeg));
        assert_eq!(UploadFormat::from_mime("image/gif"), None);
        assert_eq!(UploadFormat::from_mime("text/plain"), None);
    }

    #[test]
    fn upload_format_from_file_name() {
        assert_eq!(
            UploadFormat::from_file_name("photo.PNG"),
            Some(UploadFormat::Png)
        );
        assert_eq!(
            UploadFormat::from_file_name("photo.jpeg"),
            Some(UploadFormat::Jpeg)
        );
        assert_eq!(UploadFormat::from_file_name("photo.webp"), None);
        assert_eq!(UploadFormat::from_file_name("noextension"), None);
    }

    #[test]
    fn session_serializes_with_identity_and_token() {
        let session = Session {
            identity: "a@x.com".into(),
            token: SessionToken("tok-1".into()),
            created_at: chrono::Utc::now(),
        };
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["identity"], "a@x.com");
        assert_eq!(json["token"], "tok-1");
    }

    #[test]
    fn adapter_type_display_round_trips() {
        for t in [
            AdapterType::Captioner,
            AdapterType::Generator,
            AdapterType::Identity,
        ] {
            let s = t.to_string();
            assert_eq!(AdapterType::from_str(&s).unwrap(), t);
        }
    }
}
