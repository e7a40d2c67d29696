use crate::geometry::{Color, ToolBounds, ToolPoint};

use super::surface::{Pen, Surface, TextMetrics, TextStyle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrokeElement {
    pub points: Vec<ToolPoint>,
    pub pen: Pen,
}

impl StrokeElement {
    pub fn new(points: Vec<ToolPoint>, pen: Pen) -> Self {
        Self { points, pen }
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        if self.points.len() < 2 {
            return;
        }
        surface.stroke_path(&self.points, self.pen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineElement {
    pub start: ToolPoint,
    pub end: ToolPoint,
    pub pen: Pen,
}

impl LineElement {
    pub const fn new(start: ToolPoint, end: ToolPoint, pen: Pen) -> Self {
        Self { start, end, pen }
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        surface.stroke_line(self.start, self.end, self.pen);
    }
}

/// Rectangle stored as the two corners the user dragged between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RectangleElement {
    pub start: ToolPoint,
    pub end: ToolPoint,
    pub pen: Pen,
    pub fill: Option<Color>,
}

impl RectangleElement {
    pub const fn new(start: ToolPoint, end: ToolPoint, pen: Pen, fill: Option<Color>) -> Self {
        Self {
            start,
            end,
            pen,
            fill,
        }
    }

    pub fn bounds(&self) -> ToolBounds {
        ToolBounds::from_corners(self.start, self.end)
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        surface.draw_rectangle(self.bounds(), self.pen, self.fill);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircleElement {
    pub center: ToolPoint,
    pub radius: u32,
    pub pen: Pen,
    pub fill: Option<Color>,
}

impl CircleElement {
    pub const fn new(center: ToolPoint, radius: u32, pen: Pen, fill: Option<Color>) -> Self {
        Self {
            center,
            radius,
            pen,
            fill,
        }
    }

    /// Radius spanned by dragging from `center` to `edge`, truncated to whole pixels.
    pub fn radius_between(center: ToolPoint, edge: ToolPoint) -> u32 {
        let distance = center.distance_to(edge);
        if distance.is_finite() && distance > 0.0 {
            distance.min(f64::from(u32::MAX)) as u32
        } else {
            0
        }
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        surface.draw_circle(self.center, self.radius, self.pen, self.fill);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextElement {
    pub position: ToolPoint,
    pub content: String,
    pub style: TextStyle,
}

impl TextElement {
    pub fn new(position: ToolPoint, content: impl Into<String>, style: TextStyle) -> Self {
        Self {
            position,
            content: content.into(),
            style,
        }
    }

    pub fn update_text(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Rendered box whose bottom-left corner sits on `position` (the baseline anchor).
    pub fn bounds(&self, metrics: &dyn TextMetrics) -> ToolBounds {
        let extent = metrics.measure(&self.content, &self.style);
        let width = extent.width.max(0.0).ceil().min(f64::from(u32::MAX)) as u32;
        let height = extent.height.max(0.0).ceil().min(f64::from(u32::MAX)) as u32;
        let top = i64::from(self.position.y) - i64::from(height);
        ToolBounds::new(
            self.position.x,
            i32::try_from(top).unwrap_or(i32::MIN),
            width,
            height,
        )
    }

    pub fn contains_point(&self, point: ToolPoint, metrics: &dyn TextMetrics) -> bool {
        self.bounds(metrics).contains(point)
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        surface.draw_text(self.position, &self.content, &self.style);
    }
}

/// Trace left by an eraser pass. Kept in history, never painted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EraserMark {
    pub points: Vec<ToolPoint>,
    pub size: u32,
}

impl EraserMark {
    pub fn new(points: Vec<ToolPoint>, size: u32) -> Self {
        Self { points, size }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawingElement {
    Stroke(StrokeElement),
    Line(LineElement),
    Rectangle(RectangleElement),
    Circle(CircleElement),
    Text(TextElement),
    EraserMark(EraserMark),
}

impl DrawingElement {
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Stroke(_) => "stroke",
            Self::Line(_) => "line",
            Self::Rectangle(_) => "rectangle",
            Self::Circle(_) => "circle",
            Self::Text(_) => "text",
            Self::EraserMark(_) => "eraser_mark",
        }
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        match self {
            Self::Stroke(stroke) => stroke.render(surface),
            Self::Line(line) => line.render(surface),
            Self::Rectangle(rectangle) => rectangle.render(surface),
            Self::Circle(circle) => circle.render(surface),
            Self::Text(text) => text.render(surface),
            Self::EraserMark(_) => {}
        }
    }

    pub fn as_text(&self) -> Option<&TextElement> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextElement> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}
