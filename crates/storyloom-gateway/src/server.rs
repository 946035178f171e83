// SPDX-FileCopyrightText: 2026 Storyloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, the session-gate middleware, and shared state. Signup,
//! login, and the public health endpoint sit outside the gate; every
//! pipeline route sits behind it.

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use storyloom_auth::{CredentialStore, SessionRegistry};
use storyloom_core::StoryloomError;
use storyloom_pipeline::PipelineController;

use crate::auth::session_middleware;
use crate::handlers;

/// Uploads are images; 25 MiB covers several full-size photos.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Credential store over the configured identity backend.
    pub credentials: Arc<CredentialStore>,
    /// Session gate registry.
    pub sessions: Arc<SessionRegistry>,
    /// Pipeline controller with the configured adapters.
    pub pipeline: Arc<PipelineController>,
    /// Valid story length bounds, from configuration.
    pub story_lengths: Vec<u32>,
    /// Process start time for uptime reporting.
    pub start_time: std::time::Instant,
}

/// Gateway server bind configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Build the gateway router over the given state.
pub fn build_router(state: AppState) -> Router {
    // Unauthenticated public route (liveness + feature availability).
    let public_routes = Router::new()
        .route("/health", get(handlers::get_public_health))
        .with_state(state.clone());

    // Credential routes: reachable while anonymous by design.
    let credential_routes = Router::new()
        .route("/v1/auth/signup", post(handlers::post_signup))
        .route("/v1/auth/login", post(handlers::post_login))
        .with_state(state.clone());

    // Pipeline routes behind the session gate.
    let gated_routes = Router::new()
        .route("/v1/auth/logout", post(handlers::post_logout))
        .route("/v1/captions", post(handlers::post_captions))
        .route("/v1/stories", post(handlers::post_stories))
        .route("/v1/options", get(handlers::get_options))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(credential_routes)
        .merge(gated_routes)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Start the gateway HTTP server and serve until the process exits.
pub async fn start_server(config: &ServerConfig, state: AppState) -> Result<(), StoryloomError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        StoryloomError::Internal(format!("failed to bind gateway to {addr}: {e}"))
    })?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| StoryloomError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
