// SPDX-FileCopyrightText: 2026 Storyloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Story composition: genre preamble selection, prompt assembly, and
//! finish-reason mapping.
//!
//! The composer never calls the provider with empty input, and it maps the
//! provider's finish reason onto the typed failure set the gateway renders.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use storyloom_core::types::{FinishReason, GenerationRequest, Genre};
use storyloom_core::{StoryProvider, StoryloomError};

/// System message sent with every generation request.
pub const STORYTELLER_SYSTEM_PROMPT: &str = "You are a creative storyteller.";

/// Typed failure set for story composition.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// No captions were available; the provider was not called.
    #[error("no captions available")]
    NoInput,

    /// The provider withheld the story for safety reasons.
    #[error("the story was withheld by the provider's safety filter")]
    SafetyBlocked,

    /// Generation stopped at the output length bound. Whatever partial
    /// text exists is carried along.
    #[error("story generation stopped at the length limit")]
    LengthTruncated { partial: Option<String> },

    /// Transport-level or API failure from the provider.
    #[error("story generation failed: {message}")]
    Provider { message: String },
}

/// The fixed instructional preamble for each genre.
fn genre_preamble(genre: Genre) -> &'static str {
    match genre {
        Genre::Fantasy => {
            "Write a magical and imaginative fantasy story. Include fantastical elements and creatures."
        }
        Genre::ScienceFiction => {
            "Write a futuristic and imaginative science-fiction story. Incorporate advanced technology or space exploration."
        }
        Genre::Horror => {
            "Write a spine-chilling horror story. Create an atmosphere of fear, suspense, and the supernatural."
        }
        Genre::Mystery => {
            "Write a gripping mystery story. Include clues, detective work, and an unexpected twist."
        }
        Genre::Historical => {
            "Write a historically accurate story, set in a specific historical period with authentic events and characters."
        }
    }
}

/// Assemble the full prompt: genre preamble plus the captions joined in
/// upload order, one per line.
pub fn build_prompt(captions: &[String], genre: Genre) -> String {
    format!(
        "{} Based on the following captions:\n\n{}",
        genre_preamble(genre),
        captions.join("\n")
    )
}

/// Builds genre-conditioned prompts and requests generated text from the
/// injected story provider.
pub struct StoryComposer {
    provider: Arc<dyn StoryProvider>,
    temperature: f32,
}

impl StoryComposer {
    /// Creates a composer over the given provider with a fixed temperature.
    pub fn new(provider: Arc<dyn StoryProvider>, temperature: f32) -> Self {
        Self {
            provider,
            temperature,
        }
    }

    /// Compose a story from ordered captions.
    ///
    /// Empty `captions` is rejected before any provider call. The returned
    /// text is trimmed of surrounding whitespace.
    pub async fn compose(
        &self,
        captions: &[String],
        genre: Genre,
        max_tokens: u32,
    ) -> Result<String, ComposeError> {
        if captions.is_empty() {
            return Err(ComposeError::NoInput);
        }

        let prompt = build_prompt(captions, genre);
        debug!(genre = %genre, captions = captions.len(), max_tokens, "composing story");

        let request = GenerationRequest {
            system: Some(STORYTELLER_SYSTEM_PROMPT.to_string()),
            prompt,
            max_tokens,
            temperature: self.temperature,
        };

        let result = self
            .provider
            .generate(request)
            .await
            .map_err(|e| match e {
                StoryloomError::Timeout { duration } => ComposeError::Provider {
                    message: format!("generation timed out after {duration:?}"),
                },
                other => ComposeError::Provider {
                    message: other.to_string(),
                },
            })?;

        let text = result
            .text
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        match result.finish {
            FinishReason::ContentFilter => Err(ComposeError::SafetyBlocked),
            FinishReason::Length => Err(ComposeError::LengthTruncated { partial: text }),
            FinishReason::Stop | FinishReason::Other => text.ok_or(ComposeError::Provider {
                message: "provider returned no story text".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyloom_test_utils::{MockStoryProvider, completed, safety_blocked, truncated};

    fn captions(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn prompt_includes_preamble_and_ordered_captions() {
        let prompt = build_prompt(
            &captions(&["a dog on a beach", "a storm rolling in"]),
            Genre::Horror,
        );
        assert!(prompt.starts_with("Write a spine-chilling horror story."));
        assert!(prompt.contains("Based on the following captions:"));
        let dog = prompt.find("a dog on a beach").unwrap();
        let storm = prompt.find("a storm rolling in").unwrap();
        assert!(dog < storm, "captions must keep upload order");
    }

    #[test]
    fn every_genre_has_a_distinct_preamble() {
        use strum::IntoEnumIterator;
        let preambles: std::collections::HashSet<String> = Genre::iter()
            .map(|g| build_prompt(&captions(&["x"]), g))
            .collect();
        assert_eq!(preambles.len(), Genre::iter().count());
    }

    #[tokio::test]
    async fn empty_captions_return_no_input_without_provider_call() {
        let provider = Arc::new(MockStoryProvider::new());
        let composer = StoryComposer::new(provider.clone(), 0.7);

        let err = composer.compose(&[], Genre::Fantasy, 500).await.unwrap_err();
        assert!(matches!(err, ComposeError::NoInput));
        assert_eq!(provider.calls(), 0, "no external call may be made");
    }

    #[tokio::test]
    async fn completed_story_is_trimmed() {
        let provider = Arc::new(MockStoryProvider::with_results(vec![completed(
            "  Once upon a time, the end.  ",
        )]));
        let composer = StoryComposer::new(provider, 0.7);

        let story = composer
            .compose(&captions(&["a castle"]), Genre::Fantasy, 500)
            .await
            .unwrap();
        assert_eq!(story, "Once upon a time, the end.");
    }

    #[tokio::test]
    async fn content_filter_maps_to_safety_blocked() {
        let provider = Arc::new(MockStoryProvider::with_results(vec![safety_blocked()]));
        let composer = StoryComposer::new(provider, 0.7);

        let err = composer
            .compose(&captions(&["something grim"]), Genre::Horror, 500)
            .await
            .unwrap_err();
        assert!(matches!(err, ComposeError::SafetyBlocked));
    }

    #[tokio::test]
    async fn length_finish_maps_to_truncated_with_partial() {
        let provider = Arc::new(MockStoryProvider::with_results(vec![truncated(Some(
            "The story begins but",
        ))]));
        let composer = StoryComposer::new(provider, 0.7);

        let err = composer
            .compose(&captions(&["a city"]), Genre::Mystery, 500)
            .await
            .unwrap_err();
        match err {
            ComposeError::LengthTruncated { partial } => {
                assert_eq!(partial.as_deref(), Some("The story begins but"));
            }
            other => panic!("expected LengthTruncated, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn provider_error_maps_to_provider_failure() {
        let provider = Arc::new(MockStoryProvider::new());
        provider.push_error("connection refused").await;
        let composer = StoryComposer::new(provider, 0.7);

        let err = composer
            .compose(&captions(&["a caption"]), Genre::Historical, 500)
            .await
            .unwrap_err();
        match err {
            ComposeError::Provider { message } => {
                assert!(message.contains("connection refused"), "got: {message}");
            }
            other => panic!("expected Provider, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn request_carries_system_prompt_and_bounds() {
        let provider = Arc::new(MockStoryProvider::new());
        let composer = StoryComposer::new(provider.clone(), 0.7);

        composer
            .compose(&captions(&["a lake"]), Genre::ScienceFiction, 750)
            .await
            .unwrap();

        let request = provider.last_request().await.expect("request recorded");
        assert_eq!(request.system.as_deref(), Some(STORYTELLER_SYSTEM_PROMPT));
        assert_eq!(request.max_tokens, 750);
        assert_eq!(request.temperature, 0.7);
        assert!(request.prompt.contains("science-fiction"));
        assert!(request.prompt.contains("a lake"));
    }
}
