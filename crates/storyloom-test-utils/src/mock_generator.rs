// SPDX-FileCopyrightText: 2026 Storyloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock text-generation adapter for deterministic testing.
//!
//! `MockStoryProvider` implements `StoryProvider` with pre-configured
//! results, including safety-blocked and length-truncated finishes.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use storyloom_core::types::{
    AdapterType, FinishReason, GenerationRequest, GenerationResult, HealthStatus, TokenUsage,
};
use storyloom_core::{ServiceAdapter, StoryProvider, StoryloomError};

/// Builds a completed generation result.
pub fn completed(text: &str) -> GenerationResult {
    GenerationResult {
        text: Some(text.to_string()),
        finish: FinishReason::Stop,
        usage: TokenUsage {
            input_tokens: 10,
            output_tokens: 20,
        },
    }
}

/// Builds a result that hit the output length bound, with optional partial text.
pub fn truncated(partial: Option<&str>) -> GenerationResult {
    GenerationResult {
        text: partial.map(str::to_string),
        finish: FinishReason::Length,
        usage: TokenUsage {
            input_tokens: 10,
            output_tokens: 500,
        },
    }
}

/// Builds a result withheld by the provider's safety filter.
pub fn safety_blocked() -> GenerationResult {
    GenerationResult {
        text: None,
        finish: FinishReason::ContentFilter,
        usage: TokenUsage::default(),
    }
}

/// A mock story provider that returns pre-configured results.
///
/// Results are popped from a FIFO queue; an `Err` entry makes that call
/// fail with a provider error. When the queue is empty, a default
/// completed "a mock story" result is returned.
pub struct MockStoryProvider {
    results: Arc<Mutex<VecDeque<Result<GenerationResult, String>>>>,
    calls: AtomicUsize,
    last_request: Arc<Mutex<Option<GenerationRequest>>>,
}

impl MockStoryProvider {
    /// Creates a mock provider with an empty result queue.
    pub fn new() -> Self {
        Self {
            results: Arc::new(Mutex::new(VecDeque::new())),
            calls: AtomicUsize::new(0),
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    /// Creates a mock provider pre-loaded with the given results.
    pub fn with_results(results: Vec<GenerationResult>) -> Self {
        let queue = results.into_iter().map(Ok).collect::<VecDeque<_>>();
        Self {
            results: Arc::new(Mutex::new(queue)),
            calls: AtomicUsize::new(0),
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    /// Queues a provider-error outcome with the given message.
    pub async fn push_error(&self, message: &str) {
        self.results.lock().await.push_back(Err(message.to_string()));
    }

    /// Number of `generate` calls made against this mock.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent request, for prompt-shape assertions.
    pub async fn last_request(&self) -> Option<GenerationRequest> {
        self.last_request.lock().await.clone()
    }
}

impl Default for MockStoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServiceAdapter for MockStoryProvider {
    fn name(&self) -> &str {
        "mock-generator"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Generator
    }

    async fn health_check(&self) -> Result<HealthStatus, StoryloomError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl StoryProvider for MockStoryProvider {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResult, StoryloomError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().await = Some(request);

        self.results
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(completed("a mock story")))
            .map_err(|message| StoryloomError::Provider {
                message,
                source: None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerationRequest {
        GenerationRequest {
            system: None,
            prompt: "a prompt".into(),
            max_tokens: 500,
            temperature: 0.7,
        }
    }

    #[tokio::test]
    async fn returns_queued_results_in_order() {
        let mock = MockStoryProvider::with_results(vec![
            completed("first story"),
            truncated(Some("cut off")),
            safety_blocked(),
        ]);

        let first = mock.generate(request()).await.unwrap();
        assert_eq!(first.text.as_deref(), Some("first story"));
        assert_eq!(first.finish, FinishReason::Stop);

        let second = mock.generate(request()).await.unwrap();
        assert_eq!(second.finish, FinishReason::Length);

        let third = mock.generate(request()).await.unwrap();
        assert_eq!(third.finish, FinishReason::ContentFilter);
        assert!(third.text.is_none());

        // Queue exhausted, falls back to default.
        let fourth = mock.generate(request()).await.unwrap();
        assert_eq!(fourth.text.as_deref(), Some("a mock story"));
        assert_eq!(mock.calls(), 4);
    }

    #[tokio::test]
    async fn records_last_request() {
        let mock = MockStoryProvider::new();
        mock.generate(request()).await.unwrap();
        let seen = mock.last_request().await.expect("request recorded");
        assert_eq!(seen.prompt, "a prompt");
        assert_eq!(seen.max_tokens, 500);
    }

    #[tokio::test]
    async fn queued_error_becomes_provider_error() {
        let mock = MockStoryProvider::new();
        mock.push_error("gateway exploded").await;
        let err = mock.generate(request()).await.unwrap_err();
        assert!(err.to_string().contains("gateway exploded"));
    }
}
