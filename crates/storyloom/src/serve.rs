// SPDX-FileCopyrightText: 2026 Storyloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Startup wiring: build adapters from configuration and serve the gateway.
//!
//! A missing API key disables the affected feature with a startup warning;
//! the process keeps running and serves everything else.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use storyloom_auth::{
    CredentialStore, MemoryIdentityBackend, RemoteIdentityBackend, SessionRegistry,
};
use storyloom_captioner::HostedCaptioner;
use storyloom_config::StoryloomConfig;
use storyloom_core::{CaptionProvider, IdentityBackend, StoryProvider, StoryloomError};
use storyloom_gateway::{AppState, ServerConfig, start_server};
use storyloom_openai::OpenAiClient;
use storyloom_pipeline::{PipelineController, StoryComposer};

/// Build the identity backend selected by `auth.backend`.
pub fn build_identity_backend(
    config: &StoryloomConfig,
) -> Result<Arc<dyn IdentityBackend>, StoryloomError> {
    match config.auth.backend.as_str() {
        "remote" => {
            let url = config.auth.provider_url.clone().ok_or_else(|| {
                StoryloomError::Config(
                    "auth.provider_url is required when auth.backend = \"remote\"".to_string(),
                )
            })?;
            let backend = RemoteIdentityBackend::new(
                url,
                config.auth.provider_api_key.as_deref(),
                Duration::from_secs(config.auth.timeout_secs),
            )?;
            Ok(Arc::new(backend))
        }
        _ => Ok(Arc::new(MemoryIdentityBackend::new())),
    }
}

/// Build the captioning adapter, or `None` when no API key is configured.
pub fn build_captioner(
    config: &StoryloomConfig,
) -> Result<Option<Arc<dyn CaptionProvider>>, StoryloomError> {
    match &config.captioner.api_key {
        Some(key) => {
            let client = HostedCaptioner::new(
                key,
                config.captioner.endpoint.clone(),
                Duration::from_secs(config.captioner.timeout_secs),
            )?;
            Ok(Some(Arc::new(client)))
        }
        None => {
            warn!("captioning disabled: captioner.api_key is not configured");
            Ok(None)
        }
    }
}

/// Build the generation adapter, or `None` when no API key is configured.
pub fn build_generator(
    config: &StoryloomConfig,
) -> Result<Option<Arc<dyn StoryProvider>>, StoryloomError> {
    match &config.generator.api_key {
        Some(key) => {
            let client = OpenAiClient::new(
                key,
                config.generator.api_base.clone(),
                config.generator.model.clone(),
                Duration::from_secs(config.generator.timeout_secs),
            )?;
            Ok(Some(Arc::new(client)))
        }
        None => {
            warn!("story generation disabled: generator.api_key is not configured");
            Ok(None)
        }
    }
}

/// Wire everything together and serve until the process exits.
pub async fn run(config: StoryloomConfig) -> Result<(), StoryloomError> {
    let backend = build_identity_backend(&config)?;
    let captioner = build_captioner(&config)?;
    let generator = build_generator(&config)?;
    let composer = generator.map(|g| StoryComposer::new(g, config.generator.temperature));

    let pipeline = PipelineController::new(captioner, composer);
    info!(
        captioning = pipeline.captioning_enabled(),
        generation = pipeline.generation_enabled(),
        auth_backend = %config.auth.backend,
        "storyloom starting"
    );

    let state = AppState {
        credentials: Arc::new(CredentialStore::new(backend)),
        sessions: Arc::new(SessionRegistry::new()),
        pipeline: Arc::new(pipeline),
        story_lengths: config.generator.length_options.clone(),
        start_time: std::time::Instant::now(),
    };

    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };
    start_server(&server_config, state).await
}
