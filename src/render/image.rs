//! Image rendering for annotations using tiny-skia
//!
//! These functions burn markup into an RgbaImage. The drawing surface overlay
//! and the compositor both go through this module, so the geometry of what the
//! user sees while drawing and what gets transmitted is identical.

use font8x8::{BASIC_FONTS, UnicodeFonts};
use image::RgbaImage;
use tiny_skia::{LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use super::geometry::{arrow, note};
use crate::domain::{Annotation, Shape};

/// Convert RgbaImage to Pixmap, apply drawing function, and copy back
fn with_pixmap(img: &mut RgbaImage, f: impl FnOnce(&mut Pixmap)) {
    let (w, h) = (img.width(), img.height());
    let Some(size) = tiny_skia::IntSize::from_wh(w, h) else {
        return;
    };
    let Some(mut pixmap) = Pixmap::from_vec(img.as_raw().clone(), size) else {
        return;
    };

    f(&mut pixmap);

    // Copy back
    img.copy_from_slice(pixmap.data());
}

fn stroke_paint(color: [u8; 4]) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
    paint.anti_alias = true;
    paint
}

fn round_stroke(thickness: f32) -> Stroke {
    Stroke {
        width: thickness.max(1.0),
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    }
}

/// Build a rectangle outline path from its drag origin and signed extents.
///
/// Negative width/height trace the path in the drag direction rather than
/// being normalized to a top-left origin; the stroked result honors the
/// gesture exactly.
fn build_rect_path(x: f32, y: f32, width: f32, height: f32) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(x, y);
    pb.line_to(x + width, y);
    pb.line_to(x + width, y + height);
    pb.line_to(x, y + height);
    pb.close();
    pb.finish()
}

/// Build an arrow path as stroked lines (shaft + two chevron head strokes)
fn build_arrow_path(points: &[f32; 4]) -> Option<tiny_skia::Path> {
    let [x1, y1, x2, y2] = *points;
    let mut pb = PathBuilder::new();

    // Shaft line from start to end
    pb.move_to(x1, y1);
    pb.line_to(x2, y2);

    if let Some((h1x, h1y, h2x, h2y)) = arrow::head_points(x1, y1, x2, y2) {
        // First chevron stroke
        pb.move_to(x2, y2);
        pb.line_to(h1x, h1y);

        // Second chevron stroke
        pb.move_to(x2, y2);
        pb.line_to(h2x, h2y);
    }

    pb.finish()
}

/// Build a freehand polyline path; needs at least two points
fn build_freehand_path(points: &[f32]) -> Option<tiny_skia::Path> {
    if points.len() < 4 {
        return None;
    }
    let mut pb = PathBuilder::new();
    pb.move_to(points[0], points[1]);
    for pair in points[2..].chunks_exact(2) {
        pb.line_to(pair[0], pair[1]);
    }
    pb.finish()
}

/// Draw note text as double-struck 8x8 bitmap glyphs, offset below the anchor
fn draw_note_text(img: &mut RgbaImage, x: f32, y: f32, text: &str, color: [u8; 4]) {
    let pixel = image::Rgba(color);
    let scale = note::GLYPH_SCALE as i32;
    let origin_x = x.round() as i32;
    let origin_y = (y + note::OFFSET_Y).round() as i32;

    let mut cursor_x = origin_x;
    for ch in text.chars() {
        let Some(glyph) = BASIC_FONTS.get(ch).or_else(|| BASIC_FONTS.get('?')) else {
            cursor_x += 8 * scale;
            continue;
        };
        for (row_idx, row) in glyph.iter().enumerate() {
            let row_bits = *row;
            for col_idx in 0..8 {
                if (row_bits >> col_idx) & 1 == 0 {
                    continue;
                }
                let gx = cursor_x + col_idx * scale;
                let gy = origin_y + row_idx as i32 * scale;
                for sy in 0..scale {
                    for sx in 0..scale {
                        // Second strike one pixel right gives the bold weight
                        for bold_dx in 0..2 {
                            let tx = gx + sx + bold_dx;
                            let ty = gy + sy;
                            if tx >= 0
                                && ty >= 0
                                && (tx as u32) < img.width()
                                && (ty as u32) < img.height()
                            {
                                img.put_pixel(tx as u32, ty as u32, pixel);
                            }
                        }
                    }
                }
            }
        }
        cursor_x += 8 * scale;
    }
}

/// Draw a single annotation onto the image using its own color and thickness
pub fn draw_annotation(img: &mut RgbaImage, ann: &Annotation) {
    if !ann.is_renderable() {
        return;
    }
    let color = ann.color.to_rgba_u8();

    match &ann.shape {
        Shape::Rect {
            x,
            y,
            width,
            height,
        } => {
            with_pixmap(img, |pixmap| {
                if let Some(path) = build_rect_path(*x, *y, *width, *height) {
                    pixmap.stroke_path(
                        &path,
                        &stroke_paint(color),
                        &round_stroke(ann.thickness),
                        Transform::identity(),
                        None,
                    );
                }
            });
        }
        Shape::Arrow { points } => {
            with_pixmap(img, |pixmap| {
                if let Some(path) = build_arrow_path(points) {
                    pixmap.stroke_path(
                        &path,
                        &stroke_paint(color),
                        &round_stroke(ann.thickness),
                        Transform::identity(),
                        None,
                    );
                }
            });
        }
        Shape::Freehand { points } => {
            with_pixmap(img, |pixmap| {
                if let Some(path) = build_freehand_path(points) {
                    pixmap.stroke_path(
                        &path,
                        &stroke_paint(color),
                        &round_stroke(ann.thickness),
                        Transform::identity(),
                        None,
                    );
                }
            });
        }
        Shape::Text { x, y, text } => {
            draw_note_text(img, *x, *y, text, color);
        }
    }
}

/// Draw annotations in array order, earlier entries underneath later ones
pub fn draw_annotations(img: &mut RgbaImage, annotations: &[Annotation]) {
    for ann in annotations {
        draw_annotation(img, ann);
    }
}
