// SPDX-FileCopyrightText: 2026 Storyloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote identity provider backend.
//!
//! Delegates account creation and credential verification to an external
//! identity service over HTTP. Status codes carry the outcome: 409 means
//! the identity already exists, 401 means the credentials do not verify.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Serialize;
use tracing::debug;

use storyloom_core::types::{AdapterType, CreateOutcome, HealthStatus, VerifyOutcome};
use storyloom_core::{IdentityBackend, ServiceAdapter, StoryloomError};

/// Request body for account creation and verification.
#[derive(Debug, Serialize)]
struct CredentialBody<'a> {
    identity: &'a str,
    password: &'a str,
}

/// HTTP client for a remote identity provider.
#[derive(Debug, Clone)]
pub struct RemoteIdentityBackend {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl RemoteIdentityBackend {
    /// Creates a new remote identity backend client.
    ///
    /// `api_key` is attached as a bearer token when present.
    pub fn new(
        base_url: String,
        api_key: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, StoryloomError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = api_key {
            let bearer = format!("Bearer {key}");
            headers.insert(
                "authorization",
                HeaderValue::from_str(&bearer).map_err(|e| {
                    StoryloomError::Config(format!("invalid identity API key header value: {e}"))
                })?,
            );
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| StoryloomError::Identity {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> StoryloomError {
        if e.is_timeout() {
            StoryloomError::Timeout {
                duration: self.timeout,
            }
        } else {
            StoryloomError::Identity {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            }
        }
    }
}

#[async_trait]
impl ServiceAdapter for RemoteIdentityBackend {
    fn name(&self) -> &str {
        "remote-identity"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Identity
    }

    async fn health_check(&self) -> Result<HealthStatus, StoryloomError> {
        let url = format!("{}/v1/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        Ok(if response.status().is_success() {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy(format!("identity provider returned {}", response.status()))
        })
    }
}

#[async_trait]
impl IdentityBackend for RemoteIdentityBackend {
    async fn create_account(
        &self,
        identity: &str,
        password: &str,
    ) -> Result<CreateOutcome, StoryloomError> {
        let url = format!("{}/v1/accounts", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&CredentialBody { identity, password })
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        debug!(status = %status, "account creation response received");

        match status {
            StatusCode::CREATED | StatusCode::OK => Ok(CreateOutcome::Created),
            StatusCode::CONFLICT => Ok(CreateOutcome::Conflict),
            other => {
                let body = response.text().await.unwrap_or_default();
                Err(StoryloomError::Identity {
                    message: format!("account creation returned {other}: {body}"),
                    source: None,
                })
            }
        }
    }

    async fn verify_credentials(
        &self,
        identity: &str,
        password: &str,
    ) -> Result<VerifyOutcome, StoryloomError> {
        let url = format!("{}/v1/accounts/verify", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&CredentialBody { identity, password })
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        debug!(status = %status, "credential verification response received");

        match status {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(VerifyOutcome::Verified),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(VerifyOutcome::Invalid),
            other => {
                let body = response.text().await.unwrap_or_default();
                Err(StoryloomError::Identity {
                    message: format!("credential verification returned {other}: {body}"),
                    source: None,
                })
            }
        }
    }
}
