// Copyright (c) 2026 Egyfood
// SPDX-License-Identifier: MIT
//! Detection layer: ONNX Runtime session wrapper and YOLO postprocessing.

pub mod classes;
pub mod detector;

pub use classes::CLASS_NAMES;
pub use detector::{Detection, DetectorConfig, YoloDetector};
