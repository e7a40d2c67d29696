use crate::editor::element::{DrawingElement, EraserMark};
use crate::editor::eraser::{erase_at, EraserFootprint};
use crate::geometry::ToolPoint;

use super::style::{clamp_eraser_size, ERASER_SIZE_DEFAULT};
use super::{Tool, ToolContext, ToolResponse};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EraserTool {
    size: u32,
    points: Vec<ToolPoint>,
    erasing: bool,
    removed: usize,
}

impl Default for EraserTool {
    fn default() -> Self {
        Self::new(ERASER_SIZE_DEFAULT)
    }
}

impl EraserTool {
    pub fn new(size: u32) -> Self {
        Self {
            size: clamp_eraser_size(size),
            points: Vec::new(),
            erasing: false,
            removed: 0,
        }
    }

    pub const fn size(&self) -> u32 {
        self.size
    }

    fn erase(&mut self, point: ToolPoint, ctx: &mut ToolContext<'_>) -> ToolResponse {
        self.points.push(point);
        self.removed += erase_at(ctx.elements, &EraserFootprint::centered_at(point, self.size));
        ToolResponse::redraw()
    }

    fn commit_mark(&mut self, ctx: &mut ToolContext<'_>) -> ToolResponse {
        self.erasing = false;
        self.removed = 0;
        let points = std::mem::take(&mut self.points);
        ctx.elements
            .push(DrawingElement::EraserMark(EraserMark::new(points, self.size)));
        ToolResponse::committed()
    }
}

impl Tool for EraserTool {
    fn on_press(&mut self, point: ToolPoint, ctx: &mut ToolContext<'_>) -> ToolResponse {
        self.points.clear();
        self.erasing = true;
        self.removed = 0;
        self.erase(point, ctx)
    }

    fn on_move(&mut self, point: ToolPoint, ctx: &mut ToolContext<'_>) -> ToolResponse {
        if !self.erasing {
            return ToolResponse::none();
        }
        self.erase(point, ctx)
    }

    fn on_release(&mut self, _point: ToolPoint, ctx: &mut ToolContext<'_>) -> ToolResponse {
        if !self.erasing {
            return ToolResponse::none();
        }
        self.commit_mark(ctx)
    }

    /// Erasure is applied live, so an interrupted pass that removed anything
    /// still ends as a mark the history can record.
    fn cancel(&mut self, ctx: &mut ToolContext<'_>) -> ToolResponse {
        if self.erasing && self.removed > 0 {
            return self.commit_mark(ctx);
        }
        self.points.clear();
        self.erasing = false;
        self.removed = 0;
        ToolResponse::none()
    }

    fn width(&self) -> Option<u32> {
        Some(self.size)
    }

    fn set_width(&mut self, width: u32) {
        self.size = clamp_eraser_size(width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::element::{LineElement, RectangleElement};
    use crate::editor::surface::Pen;
    use crate::editor::tools::test_support::Harness;
    use crate::geometry::Color;

    fn pen() -> Pen {
        Pen::new(Color::RED, 3)
    }

    #[test]
    fn each_press_and_move_runs_an_erase_pass() {
        let mut harness = Harness::default();
        harness.elements = vec![
            DrawingElement::Line(LineElement::new(
                ToolPoint::new(0, 100),
                ToolPoint::new(200, 100),
                pen(),
            )),
            DrawingElement::Rectangle(RectangleElement::new(
                ToolPoint::new(500, 500),
                ToolPoint::new(600, 600),
                pen(),
                None,
            )),
        ];
        let mut tool = EraserTool::default();

        let response = tool.on_press(ToolPoint::new(50, 105), &mut harness.ctx());
        assert!(response.redraw);
        assert_eq!(harness.elements.len(), 1);

        tool.on_move(ToolPoint::new(495, 495), &mut harness.ctx());
        assert!(harness.elements.is_empty());
    }

    #[test]
    fn release_commits_eraser_mark_with_visited_points() {
        let mut harness = Harness::default();
        let mut tool = EraserTool::new(30);

        tool.on_press(ToolPoint::new(1, 1), &mut harness.ctx());
        tool.on_move(ToolPoint::new(2, 2), &mut harness.ctx());
        let response = tool.on_release(ToolPoint::new(3, 3), &mut harness.ctx());

        assert!(response.committed);
        assert_eq!(
            harness.elements,
            vec![DrawingElement::EraserMark(EraserMark::new(
                vec![ToolPoint::new(1, 1), ToolPoint::new(2, 2)],
                30
            ))]
        );
    }

    #[test]
    fn cancel_after_erasing_commits_mark() {
        let mut harness = Harness::default();
        harness.elements = vec![DrawingElement::Line(LineElement::new(
            ToolPoint::new(0, 100),
            ToolPoint::new(200, 100),
            pen(),
        ))];
        let mut tool = EraserTool::new(20);

        tool.on_press(ToolPoint::new(50, 100), &mut harness.ctx());
        let response = tool.cancel(&mut harness.ctx());

        assert!(response.committed);
        assert_eq!(
            harness.elements,
            vec![DrawingElement::EraserMark(EraserMark::new(
                vec![ToolPoint::new(50, 100)],
                20
            ))]
        );
        assert_eq!(
            tool.on_release(ToolPoint::new(60, 100), &mut harness.ctx()),
            ToolResponse::none()
        );
    }

    #[test]
    fn cancel_without_erasing_leaves_elements_alone() {
        let mut harness = Harness::default();
        let mut tool = EraserTool::default();

        tool.on_press(ToolPoint::new(5, 5), &mut harness.ctx());
        let response = tool.cancel(&mut harness.ctx());

        assert!(!response.committed);
        assert!(harness.elements.is_empty());
    }

    #[test]
    fn size_is_clamped_at_construction() {
        assert_eq!(EraserTool::new(1).size(), 5);
        assert_eq!(EraserTool::new(1000).size(), 100);
    }
}
