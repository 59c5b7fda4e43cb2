// Copyright (c) 2026 Egyfood
// SPDX-License-Identifier: MIT
use std::env;
use std::sync::Arc;

use anyhow::Result;
use egyfood_node::{
    api::{start_server, AppState},
    config::NodeConfig,
    detection::{DetectorConfig, YoloDetector},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    println!("🚀 Starting Egyfood Detection Node...");
    println!("📦 Version: {}", egyfood_node::version::VERSION);

    let config = NodeConfig::from_env();
    tracing::info!("Model path: {}", config.model_path.display());
    tracing::info!("Static dir: {}", config.static_dir.display());

    // Load the detection model before binding; a node without a model
    // should never come up.
    let detector = YoloDetector::new(DetectorConfig {
        model_path: config.model_path.clone(),
        confidence_threshold: config.confidence_threshold,
        iou_threshold: config.iou_threshold,
        ..DetectorConfig::default()
    })?;

    let state = AppState::new(Arc::new(detector));
    let addr = config.socket_addr()?;

    start_server(state, addr, &config.static_dir).await
}
