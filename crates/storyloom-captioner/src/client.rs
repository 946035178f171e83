// SPDX-FileCopyrightText: 2026 Storyloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the hosted image-captioning inference API.
//!
//! Provides [`HostedCaptioner`] which submits JPEG-encoded pixels and parses
//! the generated caption, with transient error retry. The endpoint is treated
//! as a pure, stateless function: image in, one sentence out.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, warn};

use storyloom_core::types::{AdapterType, DecodedImage, HealthStatus};
use storyloom_core::{CaptionProvider, ServiceAdapter, StoryloomError};

use crate::decode::encode_jpeg;
use crate::types::{ApiErrorResponse, CaptionOutput};

/// HTTP client for the captioning inference endpoint.
///
/// Manages the authorization header, connection pooling, and retry for
/// transient errors (429, 500, 503 -- the inference API answers 503 while
/// the model is still loading).
#[derive(Debug, Clone)]
pub struct HostedCaptioner {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
    max_retries: u32,
}

impl HostedCaptioner {
    /// Creates a new captioning client.
    ///
    /// # Arguments
    /// * `api_key` - bearer token for the inference API
    /// * `endpoint` - full model inference URL
    /// * `timeout` - per-request bound; expiry is reported as a timeout error
    pub fn new(
        api_key: &str,
        endpoint: String,
        timeout: Duration,
    ) -> Result<Self, StoryloomError> {
        let mut headers = HeaderMap::new();
        let bearer = format!("Bearer {api_key}");
        headers.insert(
            "authorization",
            HeaderValue::from_str(&bearer).map_err(|e| {
                StoryloomError::Config(format!("invalid captioner API key header value: {e}"))
            })?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| StoryloomError::Captioner {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            endpoint,
            timeout,
            max_retries: 1,
        })
    }

    /// Submits JPEG bytes and returns the raw generated caption.
    ///
    /// On transient errors (429, 500, 503), retries once after a 1-second delay.
    async fn request_caption(&self, jpeg: Vec<u8>) -> Result<String, StoryloomError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying caption request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .post(&self.endpoint)
                .header("content-type", "image/jpeg")
                .body(jpeg.clone())
                .send()
                .await
                .map_err(|e| self.transport_error(e))?;

            let status = response.status();
            debug!(status = %status, attempt, "caption response received");

            if status.is_success() {
                let body = response.text().await.map_err(|e| StoryloomError::Captioner {
                    message: format!("failed to read response body: {e}"),
                    source: Some(Box::new(e)),
                })?;
                let outputs: Vec<CaptionOutput> =
                    serde_json::from_str(&body).map_err(|e| StoryloomError::Captioner {
                        message: format!("failed to parse caption response: {e}"),
                        source: Some(Box::new(e)),
                    })?;
                let caption = outputs
                    .into_iter()
                    .next()
                    .map(|o| o.generated_text.trim().to_string())
                    .filter(|c| !c.is_empty())
                    .ok_or_else(|| StoryloomError::Captioner {
                        message: "caption response contained no text".to_string(),
                        source: None,
                    })?;
                return Ok(caption);
            }

            let body = response.text().await.unwrap_or_default();
            if is_transient_error(status) && attempt < self.max_retries {
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(StoryloomError::Captioner {
                    message: format!("API returned {status}: {body}"),
                    source: None,
                });
                continue;
            }

            // Non-transient error or exhausted retries.
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => format!("captioning API error: {}", api_err.error),
                Err(_) => format!("API returned {status}: {body}"),
            };
            return Err(StoryloomError::Captioner {
                message,
                source: None,
            });
        }

        Err(last_error.unwrap_or_else(|| StoryloomError::Captioner {
            message: "caption request failed after retries".into(),
            source: None,
        }))
    }

    fn transport_error(&self, e: reqwest::Error) -> StoryloomError {
        if e.is_timeout() {
            StoryloomError::Timeout {
                duration: self.timeout,
            }
        } else {
            StoryloomError::Captioner {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            }
        }
    }

    /// Overrides the endpoint (for testing with wiremock).
    #[cfg(test)]
    pub fn with_endpoint(mut self, endpoint: String) -> Self {
        self.endpoint = endpoint;
        self
    }
}

#[async_trait]
impl ServiceAdapter for HostedCaptioner {
    fn name(&self) -> &str {
        "hosted-captioner"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Captioner
    }

    async fn health_check(&self) -> Result<HealthStatus, StoryloomError> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        Ok(match response.status() {
            StatusCode::OK => HealthStatus::Healthy,
            StatusCode::SERVICE_UNAVAILABLE => {
                HealthStatus::Degraded("captioning model is loading".to_string())
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                HealthStatus::Unhealthy("captioning API rejected the API key".to_string())
            }
            other => HealthStatus::Unhealthy(format!("captioning API returned {other}")),
        })
    }
}

#[async_trait]
impl CaptionProvider for HostedCaptioner {
    async fn caption(&self, image: &DecodedImage) -> Result<String, StoryloomError> {
        let jpeg = encode_jpeg(image)?;
        self.request_caption(jpeg).await
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(endpoint: &str) -> HostedCaptioner {
        HostedCaptioner::new(
            "hf_test_key",
            "https://unused.example.com".into(),
            Duration::from_secs(5),
        )
        .unwrap()
        .with_endpoint(endpoint.to_string())
    }

    fn test_image() -> DecodedImage {
        DecodedImage {
            width: 2,
            height: 2,
            pixels: vec![200; 2 * 2 * 3],
        }
    }

    #[tokio::test]
    async fn caption_success_trims_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"generated_text": "  a red square on a table  "}
            ])))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let caption = client.caption(&test_image()).await.unwrap();
        assert_eq!(caption, "a red square on a table");
    }

    #[tokio::test]
    async fn caption_sends_bearer_and_content_type() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/"))
            .and(header("authorization", "Bearer hf_test_key"))
            .and(header("content-type", "image/jpeg"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"generated_text": "ok"}
            ])))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client.caption(&test_image()).await;
        assert!(result.is_ok(), "headers should match: {result:?}");
    }

    #[tokio::test]
    async fn caption_retries_while_model_loads() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
                "error": "Model is currently loading", "estimated_time": 10.0
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"generated_text": "after warmup"}
            ])))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let caption = client.caption(&test_image()).await.unwrap();
        assert_eq!(caption, "after warmup");
    }

    #[tokio::test]
    async fn caption_fails_on_auth_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": "Authorization header is invalid"
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.caption(&test_image()).await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Authorization header is invalid"), "got: {msg}");
    }

    #[tokio::test]
    async fn caption_exhausts_retries_on_500() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(2)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        assert!(client.caption(&test_image()).await.is_err());
    }

    #[tokio::test]
    async fn empty_caption_array_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.caption(&test_image()).await.unwrap_err();
        assert!(err.to_string().contains("no text"), "got: {err}");
    }

    #[tokio::test]
    async fn health_check_maps_statuses() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let status = client.health_check().await.unwrap();
        assert!(matches!(status, HealthStatus::Degraded(_)));
    }
}
