// Copyright (c) 2026 Egyfood
// SPDX-License-Identifier: MIT
pub mod errors;
pub mod http_server;
pub mod predict;

pub use errors::{ApiError, ErrorResponse};
pub use http_server::{build_router, start_server, AppState, HealthResponse};
pub use predict::{predict_handler, BoundingBox, DetectionRecord, PredictResponse};
