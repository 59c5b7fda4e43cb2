// Copyright (c) 2026 Egyfood
// SPDX-License-Identifier: MIT

//! Tests for GET /health

use axum::body::Body;
use axum::http::{Request, StatusCode};
use egyfood_node::api::{build_router, AppState};
use http_body_util::BodyExt;
use tower::ServiceExt;

#[tokio::test]
async fn test_health_returns_ok() {
    let static_dir = tempfile::tempdir().unwrap();
    let app = build_router(AppState::new_for_test(), static_dir.path());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_payload_shape() {
    let static_dir = tempfile::tempdir().unwrap();
    let app = build_router(AppState::new_for_test(), static_dir.path());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["status"], "healthy");
    // Test state has no model loaded.
    assert_eq!(json["model_loaded"], false);
}
