//! Annotation types for marking up screenshots
//!
//! All annotation coordinates are stored in the intrinsic pixel space of the
//! source image, never in on-screen display pixels. This is what keeps the
//! on-screen overlay and the burned-in composite in agreement at any zoom.

use serde::{Deserialize, Serialize};

use crate::config::ShapeColor;

/// Kind-specific annotation geometry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Shape {
    /// Rectangle outline anchored at its drag origin.
    ///
    /// Width and height carry the signed drag delta; a drag toward the
    /// upper-left stores negative extents, which rendering must honor rather
    /// than normalize away.
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    /// Single line segment stored flat as [x1, y1, x2, y2]
    Arrow { points: [f32; 4] },
    /// Ordered, append-only stroke flattened as [x1, y1, x2, y2, ...];
    /// needs at least two points (four numbers) to render
    Freehand { points: Vec<f32> },
    /// Note anchored at (x, y), rendered offset below the anchor
    Text { x: f32, y: f32, text: String },
}

/// A single markup element on a screen
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Unique within the owning screen's drawing session
    pub id: u64,
    pub color: ShapeColor,
    /// Stroke thickness in intrinsic pixels
    pub thickness: f32,
    pub shape: Shape,
}

impl Annotation {
    pub fn rect(id: u64, color: ShapeColor, thickness: f32, x: f32, y: f32) -> Self {
        Self {
            id,
            color,
            thickness,
            shape: Shape::Rect {
                x,
                y,
                width: 0.0,
                height: 0.0,
            },
        }
    }

    pub fn arrow(id: u64, color: ShapeColor, thickness: f32, x: f32, y: f32) -> Self {
        Self {
            id,
            color,
            thickness,
            shape: Shape::Arrow {
                points: [x, y, x, y],
            },
        }
    }

    pub fn freehand(id: u64, color: ShapeColor, thickness: f32, x: f32, y: f32) -> Self {
        Self {
            id,
            color,
            thickness,
            shape: Shape::Freehand {
                points: vec![x, y],
            },
        }
    }

    pub fn text(id: u64, color: ShapeColor, thickness: f32, x: f32, y: f32, text: String) -> Self {
        Self {
            id,
            color,
            thickness,
            shape: Shape::Text { x, y, text },
        }
    }

    /// Whether the annotation has enough geometry to be drawn at all
    pub fn is_renderable(&self) -> bool {
        match &self.shape {
            Shape::Rect { .. } | Shape::Arrow { .. } => true,
            Shape::Freehand { points } => points.len() >= 4,
            Shape::Text { text, .. } => !text.trim().is_empty(),
        }
    }
}
