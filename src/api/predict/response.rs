// Copyright (c) 2026 Egyfood
// SPDX-License-Identifier: MIT
//! Predict response types.

use serde::{Deserialize, Serialize};

use crate::detection::Detection;

/// Corner-format bounding box in original-image pixels, rounded to 2 decimals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// One detection as reported to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionRecord {
    #[serde(rename = "class")]
    pub class_name: String,
    /// Confidence rounded to 3 decimals.
    pub confidence: f64,
    pub bbox: BoundingBox,
}

impl DetectionRecord {
    pub fn from_detection(detection: &Detection) -> Self {
        Self {
            class_name: detection.class_name.clone(),
            confidence: round_to(detection.confidence, 3),
            bbox: BoundingBox {
                x1: round_to(detection.x1, 2),
                y1: round_to(detection.y1, 2),
                x2: round_to(detection.x2, 2),
                y2: round_to(detection.y2, 2),
            },
        }
    }
}

/// Response from POST /predict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub success: bool,
    pub detections: Vec<DetectionRecord>,
    /// Always equals `detections.len()`.
    pub count: usize,
    /// Annotated input as a `data:image/jpeg;base64,...` URI.
    pub annotated_image: String,
}

impl PredictResponse {
    pub fn new(detections: Vec<DetectionRecord>, annotated_image: String) -> Self {
        let count = detections.len();
        Self {
            success: true,
            detections,
            count,
            annotated_image,
        }
    }
}

fn round_to(value: f32, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value as f64 * factor).round() / factor
}
