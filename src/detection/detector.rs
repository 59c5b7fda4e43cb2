// Copyright (c) 2026 Egyfood
// SPDX-License-Identifier: MIT
//! YOLO detector backed by ONNX Runtime.
//!
//! The model is an ultralytics YOLOv8 export: input `[1, 3, S, S]` f32 RGB
//! in 0..1, output `[1, 4 + num_classes, num_anchors]` where the first four
//! rows are cx/cy/w/h at model scale and the rest are per-class scores.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::DynamicImage;
use ndarray::{Array4, ArrayViewD};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use tracing::{debug, info};

use super::classes::CLASS_NAMES;

/// Pixel value used for letterbox padding (ultralytics convention).
const PAD_VALUE: f32 = 114.0 / 255.0;

/// Detector tuning knobs.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Path to the ONNX model file.
    pub model_path: PathBuf,
    /// Square model input size in pixels.
    pub input_size: u32,
    /// Minimum confidence for a detection to be kept.
    pub confidence_threshold: f32,
    /// IoU threshold for non-maximum suppression.
    pub iou_threshold: f32,
    /// Hard cap on reported detections per image.
    pub max_detections: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("./models/best.onnx"),
            input_size: 640,
            confidence_threshold: 0.25,
            iou_threshold: 0.45,
            max_detections: 100,
        }
    }
}

/// One detection in original-image pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub class_id: usize,
    pub class_name: String,
    pub confidence: f32,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl Detection {
    pub fn area(&self) -> f32 {
        (self.x2 - self.x1) * (self.y2 - self.y1)
    }

    /// Intersection-over-union with another box.
    pub fn iou(&self, other: &Detection) -> f32 {
        let x1 = self.x1.max(other.x1);
        let y1 = self.y1.max(other.y1);
        let x2 = self.x2.min(other.x2);
        let y2 = self.y2.min(other.y2);

        let intersection = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
        let union = self.area() + other.area() - intersection;

        if union > 0.0 {
            intersection / union
        } else {
            0.0
        }
    }
}

/// Letterbox transform between original image and model input coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Letterbox {
    scale: f32,
    pad_x: f32,
    pad_y: f32,
}

impl Letterbox {
    /// Computes the scale and padding that center-fit an image into a
    /// `target`-sized square while preserving aspect ratio.
    fn fit(width: u32, height: u32, target: u32) -> Self {
        let scale = (target as f32 / width as f32).min(target as f32 / height as f32);
        let scaled_w = (width as f32 * scale).round();
        let scaled_h = (height as f32 * scale).round();

        Self {
            scale,
            pad_x: ((target as f32 - scaled_w) / 2.0).floor(),
            pad_y: ((target as f32 - scaled_h) / 2.0).floor(),
        }
    }
}

/// YOLO object detector.
///
/// Holds the ONNX Runtime session behind `Arc<Mutex>` so clones share one
/// loaded model and inference stays thread-safe.
#[derive(Clone)]
pub struct YoloDetector {
    session: Arc<Mutex<Session>>,
    config: DetectorConfig,
    class_names: Vec<String>,
}

impl std::fmt::Debug for YoloDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YoloDetector")
            .field("config", &self.config)
            .field("num_classes", &self.class_names.len())
            .finish_non_exhaustive()
    }
}

impl YoloDetector {
    /// Loads the ONNX model and prepares an inference session.
    ///
    /// Fails fast if the model artifact is missing so the node never starts
    /// without a usable model.
    pub fn new(config: DetectorConfig) -> Result<Self> {
        if !config.model_path.exists() {
            anyhow::bail!(
                "ONNX model file not found: {}",
                config.model_path.display()
            );
        }

        info!(
            "Loading detection model from {}",
            config.model_path.display()
        );

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(4)
            .context("Failed to set intra threads")?
            .commit_from_file(&config.model_path)
            .with_context(|| {
                format!(
                    "Failed to load ONNX model from {}",
                    config.model_path.display()
                )
            })?;

        info!(
            "✅ Detection model loaded ({} classes, input {}x{})",
            CLASS_NAMES.len(),
            config.input_size,
            config.input_size
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            config,
            class_names: CLASS_NAMES.iter().map(|s| s.to_string()).collect(),
        })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn class_names(&self) -> &[String] {
        &self.class_names
    }

    /// Runs detection on a decoded image.
    ///
    /// Returns boxes in original-image pixel coordinates, clamped to the
    /// image bounds, sorted by descending confidence, NMS applied.
    pub fn detect(&self, image: &DynamicImage) -> Result<Vec<Detection>> {
        let (orig_w, orig_h) = (image.width(), image.height());
        let letterbox = Letterbox::fit(orig_w, orig_h, self.config.input_size);
        let input = preprocess(image, letterbox, self.config.input_size);

        // Outputs borrow the session, so decode before releasing the lock.
        let mut session = self.session.lock().unwrap();
        let outputs = session.run(ort::inputs!["images" => Value::from_array(input)?])?;

        let output = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;

        let candidates = decode_predictions(
            &output.view(),
            &self.class_names,
            self.config.confidence_threshold,
            letterbox,
            orig_w as f32,
            orig_h as f32,
        );
        debug!("{} candidates above threshold", candidates.len());

        Ok(non_max_suppression(
            candidates,
            self.config.iou_threshold,
            self.config.max_detections,
        ))
    }
}

/// Letterbox-resizes the image into a normalized NCHW tensor.
fn preprocess(image: &DynamicImage, letterbox: Letterbox, input_size: u32) -> Array4<f32> {
    let rgb = image.to_rgb8();
    let scaled_w = ((rgb.width() as f32 * letterbox.scale).round() as u32).max(1);
    let scaled_h = ((rgb.height() as f32 * letterbox.scale).round() as u32).max(1);
    let resized = image::imageops::resize(&rgb, scaled_w, scaled_h, FilterType::Triangle);

    let size = input_size as usize;
    let mut input = Array4::from_elem((1, 3, size, size), PAD_VALUE);

    let offset_x = letterbox.pad_x as usize;
    let offset_y = letterbox.pad_y as usize;
    for (x, y, pixel) in resized.enumerate_pixels() {
        let tx = x as usize + offset_x;
        let ty = y as usize + offset_y;
        if tx >= size || ty >= size {
            continue;
        }
        input[[0, 0, ty, tx]] = pixel[0] as f32 / 255.0;
        input[[0, 1, ty, tx]] = pixel[1] as f32 / 255.0;
        input[[0, 2, ty, tx]] = pixel[2] as f32 / 255.0;
    }

    input
}

/// Decodes the raw `[1, 4 + nc, anchors]` output into thresholded boxes in
/// original-image coordinates. Degenerate and out-of-range boxes are dropped.
fn decode_predictions(
    output: &ArrayViewD<'_, f32>,
    class_names: &[String],
    confidence_threshold: f32,
    letterbox: Letterbox,
    orig_w: f32,
    orig_h: f32,
) -> Vec<Detection> {
    let mut detections = Vec::new();

    let shape = output.shape();
    if shape.len() != 3 || shape[1] < 5 {
        return detections;
    }
    let num_classes = (shape[1] - 4).min(class_names.len());
    let num_anchors = shape[2];

    for anchor in 0..num_anchors {
        let mut best_score = 0.0f32;
        let mut best_class = 0usize;
        for class_id in 0..num_classes {
            let score = output[[0, 4 + class_id, anchor]];
            if score > best_score {
                best_score = score;
                best_class = class_id;
            }
        }

        if best_score < confidence_threshold {
            continue;
        }

        let cx = output[[0, 0, anchor]];
        let cy = output[[0, 1, anchor]];
        let w = output[[0, 2, anchor]];
        let h = output[[0, 3, anchor]];

        // Undo the letterbox transform back into original-image pixels.
        let x1 = ((cx - w / 2.0 - letterbox.pad_x) / letterbox.scale).clamp(0.0, orig_w);
        let y1 = ((cy - h / 2.0 - letterbox.pad_y) / letterbox.scale).clamp(0.0, orig_h);
        let x2 = ((cx + w / 2.0 - letterbox.pad_x) / letterbox.scale).clamp(0.0, orig_w);
        let y2 = ((cy + h / 2.0 - letterbox.pad_y) / letterbox.scale).clamp(0.0, orig_h);

        if x2 <= x1 || y2 <= y1 {
            continue;
        }

        detections.push(Detection {
            class_id: best_class,
            class_name: class_names[best_class].clone(),
            confidence: best_score,
            x1,
            y1,
            x2,
            y2,
        });
    }

    detections
}

/// Greedy class-aware non-maximum suppression, capped at `max_detections`.
///
/// Output is sorted by descending confidence, so the cap keeps the
/// strongest surviving boxes.
fn non_max_suppression(
    mut detections: Vec<Detection>,
    iou_threshold: f32,
    max_detections: usize,
) -> Vec<Detection> {
    detections.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut kept: Vec<Detection> = Vec::new();
    for candidate in detections {
        if kept.len() == max_detections {
            break;
        }
        let suppressed = kept
            .iter()
            .any(|k| k.class_id == candidate.class_id && k.iou(&candidate) >= iou_threshold);
        if !suppressed {
            kept.push(candidate);
        }
    }

    kept
}
