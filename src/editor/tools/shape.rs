use crate::editor::element::{CircleElement, DrawingElement, LineElement, RectangleElement};
use crate::editor::surface::{Pen, Surface};
use crate::geometry::{Color, ToolBounds, ToolPoint};

use super::style::{clamp_line_width, ToolStyle};
use super::{Tool, ToolContext, ToolResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Line,
    Rectangle,
    Circle,
}

/// Anchor-and-drag tool shared by lines, rectangles and circles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeTool {
    shape: ShapeKind,
    pen: Pen,
    fill: Option<Color>,
    anchor: Option<ToolPoint>,
    current: Option<ToolPoint>,
}

impl ShapeTool {
    pub fn new(shape: ShapeKind, style: &ToolStyle) -> Self {
        Self {
            shape,
            pen: style.pen(),
            fill: style.fill(),
            anchor: None,
            current: None,
        }
    }

    pub const fn shape(&self) -> ShapeKind {
        self.shape
    }

    pub const fn pen(&self) -> Pen {
        self.pen
    }

    fn element_between(&self, anchor: ToolPoint, end: ToolPoint) -> DrawingElement {
        match self.shape {
            ShapeKind::Line => DrawingElement::Line(LineElement::new(anchor, end, self.pen)),
            ShapeKind::Rectangle => DrawingElement::Rectangle(RectangleElement::new(
                anchor, end, self.pen, self.fill,
            )),
            ShapeKind::Circle => DrawingElement::Circle(CircleElement::new(
                anchor,
                CircleElement::radius_between(anchor, end),
                self.pen,
                self.fill,
            )),
        }
    }
}

impl Tool for ShapeTool {
    fn on_press(&mut self, point: ToolPoint, _ctx: &mut ToolContext<'_>) -> ToolResponse {
        self.anchor = Some(point);
        self.current = Some(point);
        ToolResponse::none()
    }

    fn on_move(&mut self, point: ToolPoint, _ctx: &mut ToolContext<'_>) -> ToolResponse {
        if self.anchor.is_none() {
            return ToolResponse::none();
        }
        self.current = Some(point);
        ToolResponse::redraw()
    }

    fn on_release(&mut self, point: ToolPoint, ctx: &mut ToolContext<'_>) -> ToolResponse {
        let Some(anchor) = self.anchor.take() else {
            return ToolResponse::none();
        };
        self.current = None;
        ctx.elements.push(self.element_between(anchor, point));
        ToolResponse::committed()
    }

    fn draw_preview(&self, surface: &mut dyn Surface) {
        let (Some(anchor), Some(current)) = (self.anchor, self.current) else {
            return;
        };
        match self.shape {
            ShapeKind::Line => surface.stroke_line(anchor, current, self.pen),
            ShapeKind::Rectangle => surface.draw_rectangle(
                ToolBounds::from_corners(anchor, current),
                self.pen,
                self.fill,
            ),
            ShapeKind::Circle => surface.draw_circle(
                anchor,
                CircleElement::radius_between(anchor, current),
                self.pen,
                self.fill,
            ),
        }
    }

    fn cancel(&mut self, _ctx: &mut ToolContext<'_>) -> ToolResponse {
        self.anchor = None;
        self.current = None;
        ToolResponse::redraw()
    }

    fn width(&self) -> Option<u32> {
        Some(self.pen.width)
    }

    fn set_width(&mut self, width: u32) {
        self.pen.width = clamp_line_width(width);
    }

    fn apply_style(&mut self, style: &ToolStyle) {
        self.pen = style.pen();
        self.fill = style.fill();
    }
}
