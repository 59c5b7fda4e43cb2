// Copyright (c) 2026 Egyfood
// SPDX-License-Identifier: MIT
//! Image decode/encode and annotation for the detection pipeline.

pub mod annotate;
pub mod image_utils;

pub use annotate::annotate_image;
pub use image_utils::{
    decode_image_bytes, detect_format, encode_jpeg_data_uri, ImageError, ImageInfo,
};
