use crate::editor::element::{DrawingElement, StrokeElement};
use crate::editor::surface::{Pen, Surface};
use crate::geometry::ToolPoint;

use super::style::{clamp_line_width, ToolStyle};
use super::{Tool, ToolContext, ToolResponse};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreehandTool {
    pen: Pen,
    points: Vec<ToolPoint>,
    drawing: bool,
}

impl FreehandTool {
    pub fn new(style: &ToolStyle) -> Self {
        Self {
            pen: style.pen(),
            points: Vec::new(),
            drawing: false,
        }
    }

    pub fn pen(&self) -> Pen {
        self.pen
    }

    pub fn buffered_points(&self) -> &[ToolPoint] {
        &self.points
    }
}

impl Tool for FreehandTool {
    fn on_press(&mut self, point: ToolPoint, _ctx: &mut ToolContext<'_>) -> ToolResponse {
        self.points.clear();
        self.points.push(point);
        self.drawing = true;
        ToolResponse::redraw()
    }

    fn on_move(&mut self, point: ToolPoint, _ctx: &mut ToolContext<'_>) -> ToolResponse {
        if !self.drawing {
            return ToolResponse::none();
        }
        self.points.push(point);
        ToolResponse::redraw()
    }

    fn on_release(&mut self, _point: ToolPoint, ctx: &mut ToolContext<'_>) -> ToolResponse {
        if !self.drawing {
            return ToolResponse::none();
        }
        self.drawing = false;
        let points = std::mem::take(&mut self.points);
        ctx.elements
            .push(DrawingElement::Stroke(StrokeElement::new(points, self.pen)));
        ToolResponse::committed()
    }

    fn draw_preview(&self, surface: &mut dyn Surface) {
        if self.points.len() < 2 {
            return;
        }
        surface.stroke_path(&self.points, self.pen);
    }

    fn cancel(&mut self, _ctx: &mut ToolContext<'_>) -> ToolResponse {
        self.points.clear();
        self.drawing = false;
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
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::surface::recording::{DrawCall, RecordingSurface};
    use crate::editor::tools::test_support::Harness;
    use crate::geometry::Color;

    fn green_style() -> ToolStyle {
        let mut style = ToolStyle::default();
        style.set_color(Color::new(0, 0xFF, 0));
        style.set_line_width(4);
        style
    }

    #[test]
    fn press_move_release_commits_buffered_points() {
        let mut harness = Harness::default();
        let mut tool = FreehandTool::new(&green_style());

        tool.on_press(ToolPoint::new(10, 10), &mut harness.ctx());
        tool.on_move(ToolPoint::new(20, 10), &mut harness.ctx());
        tool.on_move(ToolPoint::new(30, 10), &mut harness.ctx());
        let response = tool.on_release(ToolPoint::new(30, 10), &mut harness.ctx());

        assert!(response.committed);
        assert_eq!(
            harness.elements,
            vec![DrawingElement::Stroke(StrokeElement::new(
                vec![
                    ToolPoint::new(10, 10),
                    ToolPoint::new(20, 10),
                    ToolPoint::new(30, 10),
                ],
                Pen::new(Color::new(0, 0xFF, 0), 4),
            ))]
        );
        assert!(tool.buffered_points().is_empty());
    }

    #[test]
    fn move_and_release_without_press_are_ignored() {
        let mut harness = Harness::default();
        let mut tool = FreehandTool::new(&ToolStyle::default());

        assert_eq!(
            tool.on_move(ToolPoint::new(1, 1), &mut harness.ctx()),
            ToolResponse::none()
        );
        assert_eq!(
            tool.on_release(ToolPoint::new(1, 1), &mut harness.ctx()),
            ToolResponse::none()
        );
        assert!(harness.elements.is_empty());
    }

    #[test]
    fn preview_draws_buffer_once_two_points_exist() {
        let mut harness = Harness::default();
        let mut tool = FreehandTool::new(&ToolStyle::default());
        let mut surface = RecordingSurface::default();

        tool.on_press(ToolPoint::new(0, 0), &mut harness.ctx());
        tool.draw_preview(&mut surface);
        assert!(surface.calls.is_empty());

        tool.on_move(ToolPoint::new(5, 5), &mut harness.ctx());
        tool.draw_preview(&mut surface);
        assert_eq!(
            surface.calls,
            vec![DrawCall::Path(
                vec![ToolPoint::new(0, 0), ToolPoint::new(5, 5)],
                tool.pen()
            )]
        );
    }

    #[test]
    fn cancel_discards_dangling_press() {
        let mut harness = Harness::default();
        let mut tool = FreehandTool::new(&ToolStyle::default());
        tool.on_press(ToolPoint::new(0, 0), &mut harness.ctx());
        tool.on_move(ToolPoint::new(3, 3), &mut harness.ctx());

        tool.cancel(&mut harness.ctx());
        tool.on_release(ToolPoint::new(4, 4), &mut harness.ctx());

        assert!(harness.elements.is_empty());
        assert!(tool.buffered_points().is_empty());
    }
}
