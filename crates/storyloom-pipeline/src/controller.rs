// SPDX-FileCopyrightText: 2026 Storyloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pipeline controller: drives captioning batches and story composition
//! for one authenticated session at a time.
//!
//! The controller receives its adapters at construction. A `None` adapter
//! means the feature's API key is not configured; the affected operation
//! reports a configuration failure instead of crashing, and the other
//! feature keeps working.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use storyloom_captioner::decode_upload;
use storyloom_core::types::{Genre, Session, UploadedImage};
use storyloom_core::{CaptionProvider, StoryloomError};

use crate::composer::{ComposeError, StoryComposer};

/// Failure set for a story request routed through the controller.
#[derive(Debug, Error)]
pub enum StoryError {
    /// Story generation is disabled by configuration.
    #[error("{0}")]
    Unavailable(String),

    /// Composition-level failure.
    #[error(transparent)]
    Compose(#[from] ComposeError),
}

/// Result of one image within a caption batch.
#[derive(Debug, Clone)]
pub enum CaptionAttempt {
    /// The image decoded and the captioner produced text.
    Captioned(String),
    /// The image was skipped; the message is user-visible.
    Failed(String),
}

/// Per-image report, in upload order.
#[derive(Debug, Clone)]
pub struct CaptionReport {
    /// Zero-based upload position.
    pub index: usize,
    /// Client-supplied file name.
    pub name: String,
    /// What happened to this image.
    pub attempt: CaptionAttempt,
}

/// Ordered results of a caption batch.
#[derive(Debug, Clone, Default)]
pub struct CaptionBatch {
    pub reports: Vec<CaptionReport>,
}

impl CaptionBatch {
    /// Successful captions in upload order, ready for composition.
    pub fn captions(&self) -> Vec<String> {
        self.reports
            .iter()
            .filter_map(|r| match &r.attempt {
                CaptionAttempt::Captioned(text) => Some(text.clone()),
                CaptionAttempt::Failed(_) => None,
            })
            .collect()
    }

    /// Number of images that were skipped.
    pub fn failure_count(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r.attempt, CaptionAttempt::Failed(_)))
            .count()
    }
}

/// Orchestrates gate-checked captioning and story composition.
///
/// All state is per-invocation; the controller itself holds only the
/// injected adapters and is shared freely across sessions.
pub struct PipelineController {
    captioner: Option<Arc<dyn CaptionProvider>>,
    composer: Option<StoryComposer>,
}

impl PipelineController {
    /// Creates a controller. `None` adapters disable the matching feature.
    pub fn new(
        captioner: Option<Arc<dyn CaptionProvider>>,
        composer: Option<StoryComposer>,
    ) -> Self {
        Self {
            captioner,
            composer,
        }
    }

    /// Whether image captioning is configured.
    pub fn captioning_enabled(&self) -> bool {
        self.captioner.is_some()
    }

    /// Whether story generation is configured.
    pub fn generation_enabled(&self) -> bool {
        self.composer.is_some()
    }

    /// Caption every uploaded image, in upload order.
    ///
    /// A failing image (decode or captioning) is reported individually and
    /// never aborts the batch.
    pub async fn caption_batch(
        &self,
        session: &Session,
        uploads: &[UploadedImage],
    ) -> Result<CaptionBatch, StoryloomError> {
        let Some(captioner) = &self.captioner else {
            return Err(StoryloomError::Config(
                "captioning is disabled: captioner.api_key is not configured".to_string(),
            ));
        };

        debug!(
            identity = %session.identity,
            uploads = uploads.len(),
            "captioning batch"
        );

        let mut reports = Vec::with_capacity(uploads.len());
        for (index, upload) in uploads.iter().enumerate() {
            let attempt = match decode_upload(upload) {
                Ok(decoded) => match captioner.caption(&decoded).await {
                    Ok(caption) => {
                        debug!(index, name = %upload.name, "image captioned");
                        CaptionAttempt::Captioned(caption)
                    }
                    Err(e) => {
                        warn!(index, name = %upload.name, error = %e, "captioning failed");
                        CaptionAttempt::Failed(e.to_string())
                    }
                },
                Err(e) => {
                    warn!(index, name = %upload.name, error = %e, "image skipped");
                    CaptionAttempt::Failed(e.to_string())
                }
            };
            reports.push(CaptionReport {
                index,
                name: upload.name.clone(),
                attempt,
            });
        }

        let batch = CaptionBatch { reports };
        info!(
            identity = %session.identity,
            captioned = batch.captions().len(),
            failed = batch.failure_count(),
            "caption batch finished"
        );
        Ok(batch)
    }

    /// Compose a story from ordered captions with the selected genre and
    /// length bound.
    pub async fn compose_story(
        &self,
        session: &Session,
        captions: &[String],
        genre: Genre,
        max_tokens: u32,
    ) -> Result<String, StoryError> {
        let Some(composer) = &self.composer else {
            return Err(StoryError::Unavailable(
                "story generation is disabled: generator.api_key is not configured".to_string(),
            ));
        };

        debug!(identity = %session.identity, genre = %genre, "story requested");
        let story = composer.compose(captions, genre, max_tokens).await?;
        info!(identity = %session.identity, chars = story.len(), "story composed");
        Ok(story)
    }
}
