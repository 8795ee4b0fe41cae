//! Drawing tool settings

use serde::{Deserialize, Serialize};

/// Serializable color representation for annotations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Default for ShapeColor {
    fn default() -> Self {
        // Default red color for markup
        Self {
            r: 0.9,
            g: 0.1,
            b: 0.1,
        }
    }
}

impl ShapeColor {
    /// Convert to image crate RGBA format (0-255)
    pub fn to_rgba_u8(self) -> [u8; 4] {
        [
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            255,
        ]
    }
}

/// Active annotation tool on the drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tool {
    /// No drawing; pointer events pass through
    #[default]
    Select,
    Rect,
    Arrow,
    Freehand,
    Text,
}

impl Tool {
    /// Whether pointer-down on this tool starts a drag gesture
    pub fn is_drag_tool(self) -> bool {
        matches!(self, Tool::Rect | Tool::Arrow | Tool::Freehand)
    }

    /// Short label for UI display
    pub fn label(self) -> &'static str {
        match self {
            Tool::Select => "select",
            Tool::Rect => "rectangle",
            Tool::Arrow => "arrow",
            Tool::Freehand => "freehand",
            Tool::Text => "note",
        }
    }
}

/// Settings applied to newly drawn annotations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawSettings {
    /// Color for new annotations
    pub color: ShapeColor,
    /// Stroke thickness in intrinsic pixels
    #[serde(default = "default_thickness")]
    pub thickness: f32,
}

fn default_thickness() -> f32 {
    3.0
}

impl Default for DrawSettings {
    fn default() -> Self {
        Self {
            color: ShapeColor::default(),
            thickness: default_thickness(),
        }
    }
}
