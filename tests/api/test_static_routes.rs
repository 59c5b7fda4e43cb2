// Copyright (c) 2026 Egyfood
// SPDX-License-Identifier: MIT

//! Tests for the static front-end routes

use axum::body::Body;
use axum::http::{Request, StatusCode};
use egyfood_node::api::{build_router, AppState};
use http_body_util::BodyExt;
use tower::ServiceExt;

const INDEX_HTML: &str = "<html><body>egyfood test page</body></html>";

fn static_dir_with_index() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), INDEX_HTML).unwrap();
    dir
}

#[tokio::test]
async fn test_root_serves_index() {
    let static_dir = static_dir_with_index();
    let app = build_router(AppState::new_for_test(), static_dir.path());

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(body.as_ref(), INDEX_HTML.as_bytes());
}

#[tokio::test]
async fn test_static_mount_serves_files() {
    let static_dir = static_dir_with_index();
    let app = build_router(AppState::new_for_test(), static_dir.path());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/static/index.html")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let static_dir = static_dir_with_index();
    let app = build_router(AppState::new_for_test(), static_dir.path());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/no-such-route")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
