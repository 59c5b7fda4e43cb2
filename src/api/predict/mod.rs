// Copyright (c) 2026 Egyfood
// SPDX-License-Identifier: MIT
//! Predict API endpoint module
//!
//! Provides POST /predict for detecting Egyptian food in an uploaded image.

pub mod handler;
pub mod response;

pub use handler::predict_handler;
pub use response::{BoundingBox, DetectionRecord, PredictResponse};
