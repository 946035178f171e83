// SPDX-FileCopyrightText: 2026 Storyloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router-level tests for the gateway: session gating, input validation,
//! and feature gating, all against mock adapters.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt;

use storyloom_auth::{CredentialStore, MemoryIdentityBackend, SessionRegistry};
use storyloom_core::{CaptionProvider, StoryProvider};
use storyloom_gateway::{AppState, build_router};
use storyloom_pipeline::{PipelineController, StoryComposer};
use storyloom_test_utils::{MockCaptioner, MockStoryProvider, truncated};

fn router_with(
    captioner: Option<Arc<MockCaptioner>>,
    provider: Option<Arc<MockStoryProvider>>,
) -> (Router, AppState) {
    let captioner = captioner.map(|c| c as Arc<dyn CaptionProvider>);
    let composer = provider.map(|p| StoryComposer::new(p as Arc<dyn StoryProvider>, 0.7));
    let state = AppState {
        credentials: Arc::new(CredentialStore::new(Arc::new(MemoryIdentityBackend::new()))),
        sessions: Arc::new(SessionRegistry::new()),
        pipeline: Arc::new(PipelineController::new(captioner, composer)),
        story_lengths: vec![500, 750],
        start_time: std::time::Instant::now(),
    };
    (build_router(state.clone()), state)
}

fn json_request(uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn login(router: &Router) -> String {
    let response = router
        .clone()
        .oneshot(json_request(
            "/v1/auth/signup",
            None,
            serde_json::json!({"identity": "a@x.com", "password": "Passw0rd!"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = router
        .clone()
        .oneshot(json_request(
            "/v1/auth/login",
            None,
            serde_json::json!({"identity": "a@x.com", "password": "Passw0rd!"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn pipeline_routes_are_unreachable_while_anonymous() {
    let (router, _) = router_with(None, None);

    for uri in ["/v1/stories", "/v1/captions", "/v1/auth/logout"] {
        let response = router
            .clone()
            .oneshot(json_request(uri, None, serde_json::json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "uri: {uri}");
        let body = body_json(response).await;
        assert_eq!(body["code"], "unauthenticated");
    }
}

#[tokio::test]
async fn stale_token_is_rejected_after_logout() {
    let (router, _) = router_with(None, Some(Arc::new(MockStoryProvider::new())));
    let token = login(&router).await;

    let response = router
        .clone()
        .oneshot(json_request(
            "/v1/auth/logout",
            Some(&token),
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The token no longer resolves.
    let response = router
        .clone()
        .oneshot(json_request(
            "/v1/stories",
            Some(&token),
            serde_json::json!({"captions": ["a dog"], "genre": "Horror", "max_tokens": 500}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_genre_is_rejected_before_any_provider_call() {
    let provider = Arc::new(MockStoryProvider::new());
    let (router, _) = router_with(None, Some(provider.clone()));
    let token = login(&router).await;

    let response = router
        .clone()
        .oneshot(json_request(
            "/v1/stories",
            Some(&token),
            serde_json::json!({"captions": ["a dog"], "genre": "Romance", "max_tokens": 500}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["code"], "invalid_genre");
    assert!(body["error"].as_str().unwrap().contains("Science-fiction"));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn unsupported_story_length_is_rejected() {
    let (router, _) = router_with(None, Some(Arc::new(MockStoryProvider::new())));
    let token = login(&router).await;

    let response = router
        .clone()
        .oneshot(json_request(
            "/v1/stories",
            Some(&token),
            serde_json::json!({"captions": ["a dog"], "genre": "Horror", "max_tokens": 9999}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["code"], "invalid_length");
}

#[tokio::test]
async fn empty_captions_report_no_captions() {
    let (router, _) = router_with(None, Some(Arc::new(MockStoryProvider::new())));
    let token = login(&router).await;

    let response = router
        .clone()
        .oneshot(json_request(
            "/v1/stories",
            Some(&token),
            serde_json::json!({"captions": [], "genre": "Horror", "max_tokens": 500}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["code"], "no_captions");
}

#[tokio::test]
async fn truncated_story_surfaces_partial_text_with_warning() {
    let provider = Arc::new(MockStoryProvider::with_results(vec![truncated(Some(
        "The night was",
    ))]));
    let (router, _) = router_with(None, Some(provider));
    let token = login(&router).await;

    let response = router
        .clone()
        .oneshot(json_request(
            "/v1/stories",
            Some(&token),
            serde_json::json!({"captions": ["a dark road"], "genre": "Horror", "max_tokens": 500}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["story"], "The night was");
    assert_eq!(body["truncated"], true);
    assert!(body["warning"].as_str().unwrap().contains("length limit"));
}

#[tokio::test]
async fn generation_disabled_maps_to_service_unavailable() {
    let (router, _) = router_with(None, None);
    let token = login(&router).await;

    let response = router
        .clone()
        .oneshot(json_request(
            "/v1/stories",
            Some(&token),
            serde_json::json!({"captions": ["a dog"], "genre": "Horror", "max_tokens": 500}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["code"], "generation_disabled");
}

#[tokio::test]
async fn options_lists_genres_lengths_and_backgrounds() {
    let (router, _) = router_with(None, None);
    let token = login(&router).await;

    let request = Request::builder()
        .method("GET")
        .uri("/v1/options")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let genres: Vec<&str> = body["genres"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g.as_str().unwrap())
        .collect();
    assert_eq!(
        genres,
        vec!["Fantasy", "Science-fiction", "Horror", "Mystery", "Historical"]
    );
    assert_eq!(body["story_lengths"], serde_json::json!([500, 750]));
    assert_eq!(
        body["backgrounds"],
        serde_json::json!(["White", "Pink", "Blue", "Yellow"])
    );
}

#[tokio::test]
async fn health_is_public_and_reports_feature_availability() {
    let (router, _) = router_with(Some(Arc::new(MockCaptioner::new())), None);

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["captioning"], true);
    assert_eq!(body["generation"], false);
}

#[tokio::test]
async fn duplicate_signup_conflicts() {
    let (router, _) = router_with(None, None);

    let first = router
        .clone()
        .oneshot(json_request(
            "/v1/auth/signup",
            None,
            serde_json::json!({"identity": "a@x.com", "password": "Passw0rd!"}),
        ))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = router
        .clone()
        .oneshot(json_request(
            "/v1/auth/signup",
            None,
            serde_json::json!({"identity": "a@x.com", "password": "Passw0rd!"}),
        ))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body = body_json(second).await;
    assert_eq!(body["code"], "already_exists");
}

#[tokio::test]
async fn weak_password_signup_is_rejected() {
    let (router, _) = router_with(None, None);

    let response = router
        .clone()
        .oneshot(json_request(
            "/v1/auth/signup",
            None,
            serde_json::json!({"identity": "a@x.com", "password": "weak"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["code"], "weak_password");
}
