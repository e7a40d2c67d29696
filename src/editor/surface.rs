//! Rendering contract shared by elements, tool previews and the export path.

use crate::geometry::{Color, ToolBounds, ToolPoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pen {
    pub color: Color,
    pub width: u32,
}

impl Pen {
    pub const fn new(color: Color, width: u32) -> Self {
        Self { color, width }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    pub color: Color,
    pub font_size: u32,
    pub bold: bool,
    pub italic: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextExtent {
    pub width: f64,
    pub height: f64,
}

/// Measures rendered text so text elements can be hit-tested outside a paint pass.
pub trait TextMetrics {
    fn measure(&self, content: &str, style: &TextStyle) -> TextExtent;
}

/// Font-agnostic estimate used until a real font backend is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimatedTextMetrics;

const ESTIMATED_ADVANCE_RATIO: f64 = 0.6;
const ESTIMATED_BOLD_ADVANCE_RATIO: f64 = 0.66;
const ESTIMATED_LINE_HEIGHT_RATIO: f64 = 1.2;

impl TextMetrics for EstimatedTextMetrics {
    fn measure(&self, content: &str, style: &TextStyle) -> TextExtent {
        let size = f64::from(style.font_size.max(1));
        let ratio = if style.bold {
            ESTIMATED_BOLD_ADVANCE_RATIO
        } else {
            ESTIMATED_ADVANCE_RATIO
        };
        TextExtent {
            width: content.chars().count() as f64 * size * ratio,
            height: size * ESTIMATED_LINE_HEIGHT_RATIO,
        }
    }
}

/// Paint target for elements and previews.
///
/// Implementations decide cap/join styles; callers only describe geometry.
pub trait Surface {
    fn stroke_path(&mut self, points: &[ToolPoint], pen: Pen);
    fn stroke_line(&mut self, start: ToolPoint, end: ToolPoint, pen: Pen);
    fn draw_rectangle(&mut self, bounds: ToolBounds, pen: Pen, fill: Option<Color>);
    fn draw_circle(&mut self, center: ToolPoint, radius: u32, pen: Pen, fill: Option<Color>);
    fn draw_text(&mut self, position: ToolPoint, content: &str, style: &TextStyle);
}
