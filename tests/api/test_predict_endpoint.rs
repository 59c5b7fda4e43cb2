// Copyright (c) 2026 Egyfood
// SPDX-License-Identifier: MIT

//! Tests for POST /predict
//!
//! The non-ignored tests exercise the request-validation paths, which do
//! not need a loaded model. The end-to-end inference test needs the real
//! ONNX artifact and is marked `#[ignore]`; run it with
//! `MODEL_PATH=./models/best.onnx cargo test -- --ignored`.

use std::io::Cursor;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use egyfood_node::api::{build_router, AppState};
use egyfood_node::detection::{DetectorConfig, YoloDetector};
use http_body_util::BodyExt;
use image::{ImageFormat, RgbImage};
use tower::ServiceExt;

const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

fn test_app() -> (Router, tempfile::TempDir) {
    let static_dir = tempfile::tempdir().unwrap();
    let app = build_router(AppState::new_for_test(), static_dir.path());
    (app, static_dir)
}

/// Builds a multipart body with a single field.
fn multipart_body(field_name: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field_name}\"; \
             filename=\"upload.png\"\r\nContent-Type: image/png\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn predict_request(field_name: &str, data: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(field_name, data)))
        .unwrap()
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = RgbImage::new(width, height);
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png).unwrap();
    buffer.into_inner()
}

#[tokio::test]
async fn test_undecodable_upload_is_rejected() {
    let (app, _static_dir) = test_app();

    let response = app
        .oneshot(predict_request("file", b"definitely not an image"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error_type"], "invalid_image");
    assert_eq!(json["message"], "Invalid image file");
}

#[tokio::test]
async fn test_missing_file_field_is_rejected() {
    let (app, _static_dir) = test_app();

    let response = app
        .oneshot(predict_request("not_file", &png_bytes(2, 2)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error_type"], "invalid_request");
}

#[tokio::test]
async fn test_empty_upload_is_rejected() {
    let (app, _static_dir) = test_app();

    let response = app.oneshot(predict_request("file", &[])).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_valid_image_without_model_is_unavailable() {
    let (app, _static_dir) = test_app();

    let response = app
        .oneshot(predict_request("file", &png_bytes(4, 4)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error_type"], "service_unavailable");
}

#[tokio::test]
async fn test_get_predict_is_not_allowed() {
    let (app, _static_dir) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/predict")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_non_multipart_body_is_rejected() {
    let (app, _static_dir) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/predict")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore] // Needs the real ONNX artifact; set MODEL_PATH and run with --ignored
async fn test_predict_end_to_end_with_real_model() {
    let model_path =
        std::env::var("MODEL_PATH").unwrap_or_else(|_| "./models/best.onnx".to_string());
    let detector = YoloDetector::new(DetectorConfig {
        model_path: model_path.into(),
        ..DetectorConfig::default()
    })
    .expect("Failed to load detection model");

    let static_dir = tempfile::tempdir().unwrap();
    let app = build_router(AppState::new(Arc::new(detector)), static_dir.path());

    let response = app
        .oneshot(predict_request("file", &png_bytes(640, 640)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["success"], true);
    let detections = json["detections"].as_array().unwrap();
    assert_eq!(json["count"].as_u64().unwrap() as usize, detections.len());
    assert!(json["annotated_image"]
        .as_str()
        .unwrap()
        .starts_with("data:image/jpeg;base64,"));
}
