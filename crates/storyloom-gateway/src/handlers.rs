// SPDX-FileCopyrightText: 2026 Storyloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.
//!
//! Every pipeline failure maps to a distinct user-visible message and
//! machine-readable code; nothing is silently swallowed.

use std::str::FromStr;

use axum::{
    Extension, Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::warn;

use storyloom_auth::{LoginOutcome, SignupOutcome};
use storyloom_core::StoryloomError;
use storyloom_core::types::{Genre, Session, UploadFormat, UploadedImage};
use storyloom_pipeline::{CaptionAttempt, ComposeError, StoryError};

use crate::server::AppState;

/// Cosmetic background choices surfaced to the UI. No functional effect.
const BACKGROUND_COLORS: &[&str] = &["White", "Pink", "Blue", "Yellow"];

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// User-visible error description.
    pub error: String,
    /// Machine-readable error code.
    pub code: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
        }
    }
}

fn error_response(status: StatusCode, error: impl Into<String>, code: &str) -> Response {
    (status, Json(ErrorBody::new(error, code))).into_response()
}

/// Map a backend transport failure onto a 502 with a distinct code.
fn identity_error_response(err: StoryloomError) -> Response {
    warn!(error = %err, "identity backend failure");
    error_response(StatusCode::BAD_GATEWAY, err.to_string(), "provider_error")
}

// --- Auth endpoints ---

/// Request body for POST /v1/auth/signup and /v1/auth/login.
#[derive(Debug, Deserialize)]
pub struct CredentialRequest {
    /// Identity, e.g. an email address.
    pub identity: String,
    /// Plaintext password (hashed or delegated by the backend).
    pub password: String,
}

/// Response body for a successful signup.
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub identity: String,
    pub status: String,
}

/// Response body for a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Opaque bearer token for subsequent requests.
    pub token: String,
    pub identity: String,
}

/// POST /v1/auth/signup
pub async fn post_signup(
    State(state): State<AppState>,
    Json(body): Json<CredentialRequest>,
) -> Response {
    match state.credentials.signup(&body.identity, &body.password).await {
        Ok(SignupOutcome::Created) => (
            StatusCode::CREATED,
            Json(SignupResponse {
                identity: body.identity,
                status: "created".to_string(),
            }),
        )
            .into_response(),
        Ok(SignupOutcome::WeakPassword) => error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "weak password: use at least 8 characters including at least one symbol",
            "weak_password",
        ),
        Ok(SignupOutcome::AlreadyExists) => error_response(
            StatusCode::CONFLICT,
            "this identity already exists, try logging in",
            "already_exists",
        ),
        Err(err) => identity_error_response(err),
    }
}

/// POST /v1/auth/login
pub async fn post_login(
    State(state): State<AppState>,
    Json(body): Json<CredentialRequest>,
) -> Response {
    match state.credentials.login(&body.identity, &body.password).await {
        Ok(LoginOutcome::Authenticated) => {
            let session = state.sessions.login(&body.identity);
            (
                StatusCode::OK,
                Json(LoginResponse {
                    token: session.token.0,
                    identity: session.identity,
                }),
            )
                .into_response()
        }
        Ok(LoginOutcome::Invalid) => error_response(
            StatusCode::UNAUTHORIZED,
            "invalid credentials",
            "invalid_credentials",
        ),
        Err(err) => identity_error_response(err),
    }
}

/// POST /v1/auth/logout
pub async fn post_logout(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> StatusCode {
    state.sessions.logout(&session.token.0);
    StatusCode::NO_CONTENT
}

// --- Pipeline endpoints ---

/// One per-upload entry of the captions response, in upload order.
#[derive(Debug, Serialize)]
pub struct CaptionItem {
    /// Zero-based upload position.
    pub index: usize,
    /// Client-supplied file name.
    pub name: String,
    /// Generated caption, when the image was processed successfully.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// User-visible failure message, when the image was skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response body for POST /v1/captions.
#[derive(Debug, Serialize)]
pub struct CaptionsResponse {
    pub items: Vec<CaptionItem>,
}

/// POST /v1/captions
///
/// Multipart upload of one or more png/jpeg images. Each image is captioned
/// in upload order; a failing image yields a per-image error entry and the
/// batch continues.
pub async fn post_captions(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    mut multipart: Multipart,
) -> Response {
    let mut items: Vec<CaptionItem> = Vec::new();
    let mut uploads: Vec<UploadedImage> = Vec::new();
    // items index for each entry of `uploads`, to merge reports back in.
    let mut upload_slots: Vec<usize> = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("malformed multipart upload: {err}"),
                    "bad_upload",
                );
            }
        };

        let name = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("upload-{}", items.len() + 1));
        let format = field
            .content_type()
            .and_then(UploadFormat::from_mime)
            .or_else(|| UploadFormat::from_file_name(&name));

        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(err) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("failed to read upload `{name}`: {err}"),
                    "bad_upload",
                );
            }
        };

        let index = items.len();
        match format {
            Some(format) => {
                uploads.push(UploadedImage {
                    name: name.clone(),
                    format,
                    bytes: bytes.to_vec(),
                });
                upload_slots.push(index);
                items.push(CaptionItem {
                    index,
                    name,
                    caption: None,
                    error: None,
                });
            }
            None => items.push(CaptionItem {
                index,
                name,
                caption: None,
                error: Some("unsupported image type: only png and jpeg are accepted".to_string()),
            }),
        }
    }

    if items.is_empty() {
        return error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "no image files in upload",
            "no_images",
        );
    }

    let batch = match state.pipeline.caption_batch(&session, &uploads).await {
        Ok(batch) => batch,
        Err(StoryloomError::Config(message)) => {
            return error_response(StatusCode::SERVICE_UNAVAILABLE, message, "captioning_disabled");
        }
        Err(err) => {
            warn!(error = %err, "caption batch failed");
            return error_response(StatusCode::BAD_GATEWAY, err.to_string(), "provider_error");
        }
    };

    for (report, slot) in batch.reports.into_iter().zip(upload_slots) {
        match report.attempt {
            CaptionAttempt::Captioned(caption) => items[slot].caption = Some(caption),
            CaptionAttempt::Failed(error) => items[slot].error = Some(error),
        }
    }

    (StatusCode::OK, Json(CaptionsResponse { items })).into_response()
}

/// Request body for POST /v1/stories.
#[derive(Debug, Deserialize)]
pub struct StoryRequest {
    /// Captions in upload order.
    pub captions: Vec<String>,
    /// Genre name from the fixed set.
    pub genre: String,
    /// Output token bound, from the configured length options.
    pub max_tokens: u32,
}

/// Response body for POST /v1/stories.
#[derive(Debug, Serialize)]
pub struct StoryResponse {
    /// The composed story, or whatever partial text exists when truncated.
    pub story: Option<String>,
    /// True when generation stopped at the length bound.
    pub truncated: bool,
    /// User-visible notice accompanying a truncated story.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// POST /v1/stories
pub async fn post_stories(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(body): Json<StoryRequest>,
) -> Response {
    let Ok(genre) = Genre::from_str(&body.genre) else {
        let valid = Genre::iter().map(|g| g.to_string()).collect::<Vec<_>>();
        return error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!(
                "unrecognized genre `{}`; valid genres: {}",
                body.genre,
                valid.join(", ")
            ),
            "invalid_genre",
        );
    };

    if !state.story_lengths.contains(&body.max_tokens) {
        let valid = state
            .story_lengths
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>();
        return error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!(
                "unsupported story length {}; valid lengths: {}",
                body.max_tokens,
                valid.join(", ")
            ),
            "invalid_length",
        );
    }

    match state
        .pipeline
        .compose_story(&session, &body.captions, genre, body.max_tokens)
        .await
    {
        Ok(story) => (
            StatusCode::OK,
            Json(StoryResponse {
                story: Some(story),
                truncated: false,
                warning: None,
            }),
        )
            .into_response(),
        Err(StoryError::Unavailable(message)) => {
            error_response(StatusCode::SERVICE_UNAVAILABLE, message, "generation_disabled")
        }
        Err(StoryError::Compose(ComposeError::NoInput)) => error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "no captions available: upload valid images first",
            "no_captions",
        ),
        Err(StoryError::Compose(ComposeError::SafetyBlocked)) => error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "the story was withheld by the provider's safety filter",
            "safety_blocked",
        ),
        Err(StoryError::Compose(ComposeError::LengthTruncated { partial })) => (
            StatusCode::OK,
            Json(StoryResponse {
                story: partial,
                truncated: true,
                warning: Some("the story was cut off at the selected length limit".to_string()),
            }),
        )
            .into_response(),
        Err(StoryError::Compose(ComposeError::Provider { message })) => {
            warn!(error = %message, "story generation failed");
            error_response(StatusCode::BAD_GATEWAY, message, "provider_error")
        }
    }
}

// --- UI options and health ---

/// Response body for GET /v1/options.
#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    /// Valid genre names.
    pub genres: Vec<String>,
    /// Valid story length bounds in tokens.
    pub story_lengths: Vec<u32>,
    /// Cosmetic background color choices.
    pub backgrounds: Vec<String>,
}

/// GET /v1/options
pub async fn get_options(State(state): State<AppState>) -> Json<OptionsResponse> {
    Json(OptionsResponse {
        genres: Genre::iter().map(|g| g.to_string()).collect(),
        story_lengths: state.story_lengths.clone(),
        backgrounds: BACKGROUND_COLORS.iter().map(|c| c.to_string()).collect(),
    })
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    /// Whether image captioning is configured and enabled.
    pub captioning: bool,
    /// Whether story generation is configured and enabled.
    pub generation: bool,
}

/// GET /health
///
/// Unauthenticated liveness plus feature availability.
pub async fn get_public_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        captioning: state.pipeline.captioning_enabled(),
        generation: state.pipeline.generation_enabled(),
    })
}
