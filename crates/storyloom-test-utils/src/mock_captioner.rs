// SPDX-FileCopyrightText: 2026 Storyloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock captioning adapter for deterministic testing.
//!
//! `MockCaptioner` implements `CaptionProvider` with pre-configured
//! outcomes, enabling fast, CI-runnable tests without external API calls.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use storyloom_core::types::{AdapterType, DecodedImage, HealthStatus};
use storyloom_core::{CaptionProvider, ServiceAdapter, StoryloomError};

/// A mock captioner that returns pre-configured captions.
///
/// Outcomes are popped from a FIFO queue; an `Err` entry makes that call
/// fail with a captioner error. When the queue is empty, a default
/// "a mock caption" text is returned.
pub struct MockCaptioner {
    outcomes: Arc<Mutex<VecDeque<Result<String, String>>>>,
    calls: AtomicUsize,
}

impl MockCaptioner {
    /// Creates a mock captioner with an empty outcome queue.
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(VecDeque::new())),
            calls: AtomicUsize::new(0),
        }
    }

    /// Creates a mock captioner pre-loaded with successful captions.
    pub fn with_captions(captions: Vec<&str>) -> Self {
        let queue = captions
            .into_iter()
            .map(|c| Ok(c.to_string()))
            .collect::<VecDeque<_>>();
        Self {
            outcomes: Arc::new(Mutex::new(queue)),
            calls: AtomicUsize::new(0),
        }
    }

    /// Queues a successful caption.
    pub async fn push_caption(&self, caption: &str) {
        self.outcomes.lock().await.push_back(Ok(caption.to_string()));
    }

    /// Queues a failing call with the given error message.
    pub async fn push_failure(&self, message: &str) {
        self.outcomes.lock().await.push_back(Err(message.to_string()));
    }

    /// Number of `caption` calls made against this mock.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn next_outcome(&self) -> Result<String, String> {
        self.outcomes
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok("a mock caption".to_string()))
    }
}

impl Default for MockCaptioner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServiceAdapter for MockCaptioner {
    fn name(&self) -> &str {
        "mock-captioner"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Captioner
    }

    async fn health_check(&self) -> Result<HealthStatus, StoryloomError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl CaptionProvider for MockCaptioner {
    async fn caption(&self, _image: &DecodedImage) -> Result<String, StoryloomError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.next_outcome()
            .await
            .map_err(|message| StoryloomError::Captioner {
                message,
                source: None,
            })
    }
}
