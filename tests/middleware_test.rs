// ABOUTME: Integration tests for the access gate over a real router
// ABOUTME: Validates public-path pass-through and protected-path rejection before handlers run
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use axum::body::Body;
use axum::Router;
use http::{header, Request, StatusCode};
use panel_identity_service::{
    database_plugins::DatabaseProvider,
    routes::LoginResponse,
    server::{self, ServerResources},
};
use std::sync::Arc;
use tower::ServiceExt;

async fn create_test_router() -> (Router, Arc<ServerResources>) {
    let database = common::create_test_database().await.unwrap();
    common::seed_user(&database, "admin", "123456", true)
        .await
        .unwrap();
    let resources = common::create_test_resources(database).unwrap();
    (server::router(&resources), resources)
}

fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_public_path_passes_without_authorization_header() {
    let (router, _) = create_test_router().await;

    let response = router
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_protected_path_without_header_is_rejected_before_routing() {
    let (router, _) = create_test_router().await;

    // No such route exists; the gate still rejects before any handler runs
    let response = router
        .oneshot(
            Request::builder()
                .uri("/users/123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "AUTH_HEADER_INVALID");
}

#[tokio::test]
async fn test_protected_path_with_invalid_token_is_unauthorized() {
    let (router, _) = create_test_router().await;

    let response = router
        .oneshot(
            Request::builder()
                .uri("/users/me")
                .header(header::AUTHORIZATION, "Bearer not.a.token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"]["message"], "unauthorized");
}

#[tokio::test]
async fn test_protected_path_with_short_bearer_value_is_rejected() {
    let (router, _) = create_test_router().await;

    for value in ["Bearer", "Bearer ", "Basic dXNlcjpwYXNz"] {
        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/users/me")
                    .header(header::AUTHORIZATION, value)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "value {value:?} should fail extraction"
        );
    }
}

#[tokio::test]
async fn test_login_then_access_protected_route() {
    let (router, _) = create_test_router().await;

    let response = router
        .clone()
        .oneshot(json_post(
            "/auth/login",
            serde_json::json!({ "username": "admin", "password": "123456" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let login: LoginResponse = serde_json::from_slice(&bytes).unwrap();
    assert!(login.refresh_token.is_none());

    let response = router
        .oneshot(
            Request::builder()
                .uri("/users/me")
                .header(header::AUTHORIZATION, format!("Bearer {}", login.token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["sub"], "admin");
}

#[tokio::test]
async fn test_login_with_wrong_password_is_unauthorized_over_http() {
    let (router, _) = create_test_router().await;

    let response = router
        .oneshot(json_post(
            "/auth/login",
            serde_json::json!({ "username": "admin", "password": "wrong" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "AUTH_INVALID");
    assert_eq!(body["error"]["message"], "invalid username or password");
}

#[tokio::test]
async fn test_check_endpoint_is_public_and_reports_validity() {
    let (router, resources) = create_test_router().await;

    // Invalid token: still a 200, validity reported in the body
    let response = router
        .clone()
        .oneshot(json_post(
            "/auth/check",
            serde_json::json!({ "token": "garbage" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["valid"], false);

    // Valid token round trip
    let user = resources
        .database
        .get_user_by_username("admin")
        .await
        .unwrap()
        .unwrap();
    let token = resources
        .token_signer
        .generate_token(&user, &["PANEL_READ".to_owned()])
        .unwrap();

    let response = router
        .oneshot(json_post("/auth/check", serde_json::json!({ "token": token })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["valid"], true);
    assert_eq!(body["claims"]["sub"], "admin");
}

#[tokio::test]
async fn test_expired_token_is_unauthorized_at_the_gate() {
    let (router, _) = create_test_router().await;

    let now = chrono::Utc::now().timestamp();
    let claims = panel_identity_service::auth::Claims {
        sub: "admin".into(),
        first_name: "Test".into(),
        last_name: "User".into(),
        authorities: vec![],
        iat: now - 3900,
        exp: now - 300,
    };
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::RS512),
        &claims,
        common::get_shared_key_material().encoding_key(),
    )
    .unwrap();

    let response = router
        .oneshot(
            Request::builder()
                .uri("/users/me")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
