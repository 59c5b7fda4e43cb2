// Copyright (c) 2026 Egyfood
// SPDX-License-Identifier: MIT
//! Predict endpoint handler

use std::time::Instant;

use axum::extract::{Multipart, State};
use axum::Json;
use tracing::{debug, info, warn};

use super::response::{DetectionRecord, PredictResponse};
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::vision::{annotate_image, decode_image_bytes, encode_jpeg_data_uri};

/// POST /predict - Detect Egyptian food in an uploaded image
///
/// Accepts a multipart upload with a `file` field and returns the detected
/// dishes plus an annotated copy of the image.
///
/// # Response
/// - `success`: always `true` on 2xx
/// - `detections`: `class`, `confidence` (3 decimals), `bbox` corners (2 decimals)
/// - `count`: number of detections
/// - `annotated_image`: base64 JPEG data URI with boxes and labels drawn
///
/// # Errors
/// - 400 Bad Request: malformed multipart body, missing `file` field, or
///   bytes that do not decode as an image
/// - 503 Service Unavailable: detection model not loaded
/// - 500 Internal Server Error: inference or encoding failed
pub async fn predict_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<PredictResponse>, ApiError> {
    let started = Instant::now();

    let image_bytes = read_file_field(&mut multipart).await?;
    debug!("Received upload: {} bytes", image_bytes.len());

    let (image, image_info) = decode_image_bytes(&image_bytes).map_err(|e| {
        warn!("Failed to decode uploaded image: {}", e);
        ApiError::InvalidImage("Invalid image file".to_string())
    })?;
    debug!(
        "Decoded image: {}x{} ({:?})",
        image_info.width, image_info.height, image_info.format
    );

    let detector = {
        let guard = state.detector.read().await;
        guard.clone().ok_or_else(|| {
            warn!("Detection model not loaded");
            ApiError::ServiceUnavailable("Detection model not loaded".to_string())
        })?
    };

    let detections = detector.detect(&image).map_err(|e| {
        warn!("Inference failed: {}", e);
        ApiError::InternalError(e.to_string())
    })?;

    let annotated = annotate_image(&image, &detections);
    let annotated_image =
        encode_jpeg_data_uri(&annotated).map_err(|e| ApiError::InternalError(e.to_string()))?;

    info!(
        "Prediction complete: {} detections in {}ms",
        detections.len(),
        started.elapsed().as_millis()
    );

    let records: Vec<DetectionRecord> = detections
        .iter()
        .map(DetectionRecord::from_detection)
        .collect();

    Ok(Json(PredictResponse::new(records, annotated_image)))
}

/// Pulls the bytes of the `file` field out of the multipart body.
async fn read_file_field(multipart: &mut Multipart) -> Result<Vec<u8>, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::InvalidRequest(format!("Malformed multipart body: {}", e))
    })? {
        if field.name() == Some("file") {
            let bytes = field.bytes().await.map_err(|e| {
                ApiError::InvalidRequest(format!("Failed to read upload: {}", e))
            })?;
            if bytes.is_empty() {
                return Err(ApiError::InvalidRequest("Uploaded file is empty".to_string()));
            }
            return Ok(bytes.to_vec());
        }
    }

    Err(ApiError::InvalidRequest(
        "Missing multipart field 'file'".to_string(),
    ))
}
