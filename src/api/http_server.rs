// Copyright (c) 2026 Egyfood
// SPDX-License-Identifier: MIT
//! Router assembly and server startup.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{DefaultBodyLimit, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use super::predict::predict_handler;
use crate::detection::YoloDetector;
use crate::vision::image_utils::MAX_IMAGE_SIZE;

/// Shared per-request state.
///
/// The detector slot is `None` only in tests; production startup always
/// loads the model before the server binds.
#[derive(Clone)]
pub struct AppState {
    pub detector: Arc<RwLock<Option<Arc<YoloDetector>>>>,
}

impl AppState {
    pub fn new(detector: Arc<YoloDetector>) -> Self {
        Self {
            detector: Arc::new(RwLock::new(Some(detector))),
        }
    }

    /// State with no model loaded, for exercising the API surface in tests.
    pub fn new_for_test() -> Self {
        Self {
            detector: Arc::new(RwLock::new(None)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
}

/// Builds the application router: API routes, static front-end, CORS.
pub fn build_router(state: AppState, static_dir: &Path) -> Router {
    let index = ServeFile::new(static_dir.join("index.html"));

    Router::new()
        .route_service("/", index)
        .nest_service("/static", ServeDir::new(static_dir))
        .route("/health", get(health_handler))
        .route("/predict", post(predict_handler))
        .layer(DefaultBodyLimit::max(MAX_IMAGE_SIZE))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Binds the listener and serves until ctrl-c.
pub async fn start_server(state: AppState, addr: SocketAddr, static_dir: &Path) -> Result<()> {
    let app = build_router(state, static_dir);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutdown signal received");
}

/// GET /health - liveness probe.
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let model_loaded = state.detector.read().await.is_some();
    Json(HealthResponse {
        status: "healthy".to_string(),
        model_loaded,
    })
}
