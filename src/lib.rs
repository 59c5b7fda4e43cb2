// Copyright (c) 2026 Egyfood
// SPDX-License-Identifier: MIT
pub mod api;
pub mod config;
pub mod detection;
pub mod version;
pub mod vision;

// Re-export main types
pub use api::{ApiError, ErrorResponse};
pub use config::NodeConfig;
pub use detection::{Detection, DetectorConfig, YoloDetector, CLASS_NAMES};
pub use vision::{decode_image_bytes, ImageError, ImageInfo};
