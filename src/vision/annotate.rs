// Copyright (c) 2026 Egyfood
// SPDX-License-Identifier: MIT
//! Drawing detection boxes and labels onto the uploaded image.

use ab_glyph::{FontRef, PxScale};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

use crate::detection::Detection;

const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const TEXT_COLOR: Rgb<u8> = Rgb([0, 0, 0]);
const BOX_THICKNESS: i32 = 2;
const LABEL_FONT_SIZE: f32 = 16.0;
const LABEL_HEIGHT: i32 = 18;
// Average glyph width at the label font size, for sizing the background.
const LABEL_CHAR_WIDTH: f32 = 8.0;

static FONT_DATA: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

/// Draws every detection onto a copy of the image.
///
/// Boxes are 2px green outlines with a `"{class}: {conf}"` label on a
/// filled background above the box (or tucked inside it at the top edge).
/// The output always has the input's dimensions.
pub fn annotate_image(image: &DynamicImage, detections: &[Detection]) -> RgbImage {
    let mut canvas = image.to_rgb8();
    let font = FontRef::try_from_slice(FONT_DATA).expect("embedded font is valid");

    for detection in detections {
        draw_detection(&mut canvas, &font, detection);
    }

    canvas
}

fn draw_detection(canvas: &mut RgbImage, font: &FontRef<'_>, detection: &Detection) {
    let (width, height) = (canvas.width() as i32, canvas.height() as i32);

    let x1 = (detection.x1.floor() as i32).clamp(0, width - 1);
    let y1 = (detection.y1.floor() as i32).clamp(0, height - 1);
    let x2 = (detection.x2.ceil() as i32).clamp(0, width - 1);
    let y2 = (detection.y2.ceil() as i32).clamp(0, height - 1);

    if x1 >= x2 || y1 >= y2 {
        return;
    }

    for inset in 0..BOX_THICKNESS {
        let w = (x2 - x1 - 2 * inset).max(1) as u32;
        let h = (y2 - y1 - 2 * inset).max(1) as u32;
        let rect = Rect::at(x1 + inset, y1 + inset).of_size(w, h);
        draw_hollow_rect_mut(canvas, rect, BOX_COLOR);
    }

    let label = format!("{}: {:.2}", detection.class_name, detection.confidence);

    // Place the label above the box, or inside it when the box touches the
    // top of the image.
    let label_x = x1;
    let label_y = if y1 >= LABEL_HEIGHT {
        y1 - LABEL_HEIGHT
    } else {
        y1
    };

    let text_width = (label.len() as f32 * LABEL_CHAR_WIDTH) as i32;
    let label_width = text_width.min(width - label_x);
    if label_width <= 0 {
        return;
    }

    let background = Rect::at(label_x, label_y).of_size(label_width as u32, LABEL_HEIGHT as u32);
    draw_filled_rect_mut(canvas, background, BOX_COLOR);
    draw_text_mut(
        canvas,
        TEXT_COLOR,
        label_x + 1,
        label_y + 1,
        PxScale::from(LABEL_FONT_SIZE),
        font,
        &label,
    );
}
