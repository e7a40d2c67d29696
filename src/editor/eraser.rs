//! Geometry deciding which elements an eraser pass removes.

use crate::geometry::{ToolBounds, ToolPoint};

use super::element::{CircleElement, DrawingElement};

/// Closed axis-aligned rectangle in canvas space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn from_bounds(bounds: ToolBounds) -> Self {
        Self {
            left: f64::from(bounds.x),
            top: f64::from(bounds.y),
            right: f64::from(bounds.x) + f64::from(bounds.width),
            bottom: f64::from(bounds.y) + f64::from(bounds.height),
        }
    }

    /// Bounding box of the segment `a`-`b`; zero-area for axis-parallel segments.
    pub fn spanning(a: ToolPoint, b: ToolPoint) -> Self {
        Self::from_bounds(ToolBounds::from_corners(a, b))
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.left <= other.right
            && other.left <= self.right
            && self.top <= other.bottom
            && other.top <= self.bottom
    }
}

/// Square of side `size` centered on the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EraserFootprint {
    rect: Rect,
}

impl EraserFootprint {
    pub fn centered_at(point: ToolPoint, size: u32) -> Self {
        let half = i64::from(size / 2);
        let left = i64::from(point.x) - half;
        let top = i64::from(point.y) - half;
        let size = f64::from(size);
        Self {
            rect: Rect {
                left: left as f64,
                top: top as f64,
                right: left as f64 + size,
                bottom: top as f64 + size,
            },
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }
}

/// Bounding-box approximation of segment/rect intersection.
///
/// Long diagonal segments can match a footprint they never cross.
pub fn segment_hits_rect(a: ToolPoint, b: ToolPoint, rect: &Rect) -> bool {
    Rect::spanning(a, b).intersects(rect)
}

pub fn circle_hits_rect(circle: &CircleElement, rect: &Rect) -> bool {
    let center_x = f64::from(circle.center.x);
    let center_y = f64::from(circle.center.y);
    let closest_x = center_x.clamp(rect.left, rect.right);
    let closest_y = center_y.clamp(rect.top, rect.bottom);
    let dx = center_x - closest_x;
    let dy = center_y - closest_y;
    let radius = f64::from(circle.radius);
    dx * dx + dy * dy <= radius * radius
}

pub fn element_hit_by(element: &DrawingElement, footprint: &EraserFootprint) -> bool {
    let rect = footprint.rect();
    match element {
        DrawingElement::Stroke(stroke) => stroke
            .points
            .windows(2)
            .any(|pair| segment_hits_rect(pair[0], pair[1], &rect)),
        DrawingElement::Line(line) => segment_hits_rect(line.start, line.end, &rect),
        DrawingElement::Rectangle(rectangle) => {
            Rect::from_bounds(rectangle.bounds()).intersects(&rect)
        }
        DrawingElement::Circle(circle) => circle_hits_rect(circle, &rect),
        DrawingElement::Text(_) | DrawingElement::EraserMark(_) => false,
    }
}

/// Removes every element under the footprint and returns how many were removed.
pub fn erase_at(elements: &mut Vec<DrawingElement>, footprint: &EraserFootprint) -> usize {
    let before = elements.len();
    elements.retain(|element| !element_hit_by(element, footprint));
    let removed = before - elements.len();
    if removed > 0 {
        tracing::debug!(removed, remaining = elements.len(), "eraser pass removed elements");
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::element::{
        EraserMark, LineElement, RectangleElement, StrokeElement, TextElement,
    };
    use crate::editor::surface::{Pen, TextStyle};
    use crate::geometry::Color;

    fn pen() -> Pen {
        Pen::new(Color::RED, 3)
    }

    fn circle(x: i32, y: i32, radius: u32) -> CircleElement {
        CircleElement::new(ToolPoint::new(x, y), radius, pen(), None)
    }

    #[test]
    fn footprint_is_centered_with_integer_half_size() {
        let rect = EraserFootprint::centered_at(ToolPoint::new(50, 50), 21).rect();
        assert_eq!(rect.left, 40.0);
        assert_eq!(rect.top, 40.0);
        assert_eq!(rect.right, 61.0);
        assert_eq!(rect.bottom, 61.0);
    }

    #[test]
    fn circle_touching_footprint_edge_counts_as_hit() {
        // Footprint spans x 60..70, exactly radius away from the center.
        let footprint = EraserFootprint::centered_at(ToolPoint::new(65, 50), 10);
        assert!(circle_hits_rect(&circle(50, 50, 10), &footprint.rect()));

        let clear = EraserFootprint::centered_at(ToolPoint::new(66, 50), 10);
        assert!(!circle_hits_rect(&circle(50, 50, 10), &clear.rect()));
    }

    #[test]
    fn zero_radius_circle_is_hit_only_when_center_is_inside() {
        let footprint = EraserFootprint::centered_at(ToolPoint::new(0, 0), 10);
        assert!(circle_hits_rect(&circle(3, 3, 0), &footprint.rect()));
        assert!(!circle_hits_rect(&circle(30, 30, 0), &footprint.rect()));
    }

    #[test]
    fn axis_parallel_and_degenerate_segments_are_erasable() {
        let footprint = EraserFootprint::centered_at(ToolPoint::new(20, 10), 10);
        let rect = footprint.rect();
        assert!(segment_hits_rect(
            ToolPoint::new(0, 10),
            ToolPoint::new(40, 10),
            &rect
        ));
        assert!(segment_hits_rect(
            ToolPoint::new(20, 10),
            ToolPoint::new(20, 10),
            &rect
        ));
    }

    #[test]
    fn diagonal_segment_bounding_box_over_erases() {
        // The segment passes far from the footprint, but its bbox covers it.
        let footprint = EraserFootprint::centered_at(ToolPoint::new(90, 10), 10);
        assert!(segment_hits_rect(
            ToolPoint::new(0, 0),
            ToolPoint::new(100, 100),
            &footprint.rect()
        ));
    }

    #[test]
    fn erase_pass_removes_all_hits_and_keeps_text_and_marks() {
        let style = TextStyle {
            color: Color::RED,
            font_size: 24,
            bold: false,
            italic: false,
        };
        let mut elements = vec![
            DrawingElement::Stroke(StrokeElement::new(
                vec![ToolPoint::new(0, 50), ToolPoint::new(100, 50)],
                pen(),
            )),
            DrawingElement::Line(LineElement::new(
                ToolPoint::new(50, 0),
                ToolPoint::new(50, 100),
                pen(),
            )),
            DrawingElement::Rectangle(RectangleElement::new(
                ToolPoint::new(300, 300),
                ToolPoint::new(400, 400),
                pen(),
                None,
            )),
            DrawingElement::Circle(circle(60, 60, 20)),
            DrawingElement::Text(TextElement::new(ToolPoint::new(45, 55), "note", style)),
            DrawingElement::EraserMark(EraserMark::new(vec![ToolPoint::new(50, 50)], 20)),
        ];

        let footprint = EraserFootprint::centered_at(ToolPoint::new(50, 50), 20);
        let removed = erase_at(&mut elements, &footprint);

        assert_eq!(removed, 3);
        let kinds = elements
            .iter()
            .map(DrawingElement::kind_name)
            .collect::<Vec<_>>();
        assert_eq!(kinds, vec!["rectangle", "text", "eraser_mark"]);
    }

    #[test]
    fn erase_pass_without_hits_is_a_no_op() {
        let mut elements = vec![DrawingElement::Circle(circle(500, 500, 5))];
        let footprint = EraserFootprint::centered_at(ToolPoint::new(0, 0), 20);
        assert_eq!(erase_at(&mut elements, &footprint), 0);
        assert_eq!(elements.len(), 1);
    }
}
