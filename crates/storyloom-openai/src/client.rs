// SPDX-FileCopyrightText: 2026 Storyloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for an OpenAI-compatible chat-completions API.
//!
//! Provides [`OpenAiClient`] which handles request construction,
//! authentication, finish-reason mapping, and transient error retry.
//! Requests are idempotent (the same prompt may be resubmitted safely),
//! which is what makes the single retry sound.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, warn};

use storyloom_core::types::{
    AdapterType, GenerationRequest, GenerationResult, HealthStatus, TokenUsage,
};
use storyloom_core::{ServiceAdapter, StoryProvider, StoryloomError};

use crate::types::{
    ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse, ChatMessage,
    map_finish_reason,
};

/// HTTP client for chat-completions API communication.
///
/// Manages authentication headers, connection pooling, and retry logic
/// for transient errors (429, 500, 503, 529).
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    api_base: String,
    model: String,
    timeout: Duration,
    max_retries: u32,
}

impl OpenAiClient {
    /// Creates a new chat-completions client.
    ///
    /// # Arguments
    /// * `api_key` - API key for bearer authentication
    /// * `api_base` - base URL, e.g. "https://api.openai.com/v1"
    /// * `model` - model identifier used for all requests
    pub fn new(
        api_key: &str,
        api_base: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, StoryloomError> {
        let mut headers = HeaderMap::new();
        let bearer = format!("Bearer {api_key}");
        headers.insert(
            "authorization",
            HeaderValue::from_str(&bearer).map_err(|e| {
                StoryloomError::Config(format!("invalid generator API key header value: {e}"))
            })?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| StoryloomError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            model,
            timeout,
            max_retries: 1,
        })
    }

    /// Returns the model identifier used for requests.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends a chat-completion request and returns the full response.
    ///
    /// On transient errors (429, 500, 503, 529), retries once after a
    /// 1-second delay.
    pub async fn complete_chat(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, StoryloomError> {
        let url = format!("{}/chat/completions", self.api_base);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying completion request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .post(&url)
                .json(request)
                .send()
                .await
                .map_err(|e| self.transport_error(e))?;

            let status = response.status();
            debug!(status = %status, attempt, "completion response received");

            if status.is_success() {
                let body = response.text().await.map_err(|e| StoryloomError::Provider {
                    message: format!("failed to read response body: {e}"),
                    source: Some(Box::new(e)),
                })?;
                let completion: ChatCompletionResponse = serde_json::from_str(&body)
                    .map_err(|e| StoryloomError::Provider {
                        message: format!("failed to parse API response: {e}"),
                        source: Some(Box::new(e)),
                    })?;
                return Ok(completion);
            }

            let body = response.text().await.unwrap_or_default();
            if is_transient_error(status) && attempt < self.max_retries {
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(StoryloomError::Provider {
                    message: format!("API returned {status}: {body}"),
                    source: None,
                });
                continue;
            }

            // Non-transient error or exhausted retries.
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => format!(
                    "chat-completions API error ({}): {}",
                    api_err.error.type_.as_deref().unwrap_or("unknown"),
                    api_err.error.message
                ),
                Err(_) => format!("API returned {status}: {body}"),
            };
            return Err(StoryloomError::Provider {
                message,
                source: None,
            });
        }

        Err(last_error.unwrap_or_else(|| StoryloomError::Provider {
            message: "completion request failed after retries".into(),
            source: None,
        }))
    }

    fn transport_error(&self, e: reqwest::Error) -> StoryloomError {
        if e.is_timeout() {
            StoryloomError::Timeout {
                duration: self.timeout,
            }
        } else {
            StoryloomError::Provider {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            }
        }
    }

    /// Overrides the API base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_api_base(mut self, api_base: String) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl ServiceAdapter for OpenAiClient {
    fn name(&self) -> &str {
        "openai-generator"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Generator
    }

    async fn health_check(&self) -> Result<HealthStatus, StoryloomError> {
        let url = format!("{}/models", self.api_base);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        Ok(match response.status() {
            StatusCode::OK => HealthStatus::Healthy,
            StatusCode::TOO_MANY_REQUESTS => {
                HealthStatus::Degraded("generation API is rate limiting".to_string())
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                HealthStatus::Unhealthy("generation API rejected the API key".to_string())
            }
            other => HealthStatus::Unhealthy(format!("generation API returned {other}")),
        })
    }
}

#[async_trait]
impl StoryProvider for OpenAiClient {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResult, StoryloomError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request.system {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::user(request.prompt));

        let chat_request = ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self.complete_chat(&chat_request).await?;
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| StoryloomError::Provider {
                message: "API response contained no choices".to_string(),
                source: None,
            })?;

        let finish = map_finish_reason(choice.finish_reason.as_deref());
        debug!(?finish, "generation finished");

        Ok(GenerationResult {
            text: choice.message.content,
            finish,
            usage: TokenUsage {
                input_tokens: response.usage.prompt_tokens,
                output_tokens: response.usage.completion_tokens,
            },
        })
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503 | 529)
}
