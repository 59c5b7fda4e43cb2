// Copyright (c) 2026 Egyfood
// SPDX-License-Identifier: MIT
//! Node configuration resolved from environment variables at startup.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Runtime configuration for the detection node.
///
/// Every field has a default so the node starts with no environment at all,
/// matching the hard-coded configuration of the original deployment. The
/// model path still has to point at a real ONNX artifact or startup fails.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Bind address for the HTTP server (`HOST`).
    pub host: String,
    /// HTTP port (`API_PORT`).
    pub api_port: u16,
    /// Path to the exported ONNX detection model (`MODEL_PATH`).
    pub model_path: PathBuf,
    /// Directory holding the prebuilt front-end (`STATIC_DIR`).
    pub static_dir: PathBuf,
    /// Minimum confidence for a detection to be reported (`CONFIDENCE_THRESHOLD`).
    pub confidence_threshold: f32,
    /// IoU threshold for non-maximum suppression (`IOU_THRESHOLD`).
    pub iou_threshold: f32,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            api_port: 8000,
            model_path: PathBuf::from("./models/best.onnx"),
            static_dir: PathBuf::from("./static"),
            confidence_threshold: 0.25,
            iou_threshold: 0.45,
        }
    }
}

impl NodeConfig {
    /// Builds the configuration from environment variables, falling back to
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            api_port: env::var("API_PORT")
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(defaults.api_port),
            model_path: env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            static_dir: env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            confidence_threshold: env::var("CONFIDENCE_THRESHOLD")
                .ok()
                .and_then(|v| v.parse::<f32>().ok())
                .unwrap_or(defaults.confidence_threshold),
            iou_threshold: env::var("IOU_THRESHOLD")
                .ok()
                .and_then(|v| v.parse::<f32>().ok())
                .unwrap_or(defaults.iou_threshold),
        }
    }

    /// Resolves the configured host and port into a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.api_port)
            .parse::<SocketAddr>()
            .with_context(|| format!("Invalid bind address {}:{}", self.host, self.api_port))
    }
}
