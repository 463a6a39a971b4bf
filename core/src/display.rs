//! Display list handed to the renderer
//!
//! The scene describes a frame as an ordered list of primitives, painted
//! back to front. Coordinates are window-local pixels.

use crate::geometry::Point;
use crate::metrics::FontSpec;
use crate::style::Rgba;

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x < self.x + self.width
            && point.y < self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed {
        dash: f32,
        gap: f32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    FillRect {
        rect: Rect,
        color: Rgba,
    },
    RoundedRect {
        rect: Rect,
        radius: f32,
        color: Rgba,
    },
    Line {
        from: Point,
        to: Point,
        width: f32,
        color: Rgba,
        style: StrokeStyle,
    },
    /// Text with its layout box's top-left corner at (`x`, `y`)
    Text {
        text: String,
        x: f64,
        y: f64,
        font: FontSpec,
        color: Rgba,
    },
}

impl Primitive {
    pub fn solid_line(from: Point, to: Point, width: f32, color: Rgba) -> Self {
        Primitive::Line {
            from,
            to,
            width,
            color,
            style: StrokeStyle::Solid,
        }
    }

    /// Text content, if this is a text primitive
    pub fn text(&self) -> Option<&str> {
        match self {
            Primitive::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}
