// SPDX-FileCopyrightText: 2026 Storyloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session-gate middleware for the gateway.
//!
//! Pipeline routes are unreachable while anonymous: a request must carry a
//! bearer token that resolves to an authenticated session. On success the
//! session value is inserted into request extensions for the handler.

use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

use crate::handlers::ErrorBody;
use crate::server::AppState;

/// Middleware that resolves the bearer token to an authenticated session.
///
/// Requests without a resolvable token are rejected with 401; the only
/// operations reachable without one are signup, login, and the public
/// health endpoint, which are routed outside this layer.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<ErrorBody>)> {
    let token = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let session = token.and_then(|t| state.sessions.resolve(t));
    match session {
        Some(session) => {
            request.extensions_mut().insert(session);
            Ok(next.run(request).await)
        }
        None => {
            tracing::debug!("request rejected: no authenticated session");
            Err((
                StatusCode::UNAUTHORIZED,
                Json(ErrorBody::new(
                    "authentication required: sign up or log in first",
                    "unauthenticated",
                )),
            ))
        }
    }
}
