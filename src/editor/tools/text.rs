use crate::editor::surface::TextStyle;
use crate::geometry::ToolPoint;

use super::style::ToolStyle;
use super::{TextPrompt, Tool, ToolContext, ToolResponse};

/// Places new text or re-opens existing text for editing.
///
/// The tool never mutates the canvas itself; it asks the host for a string via
/// [`TextPrompt`] and the canvas applies the answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextTool {
    style: TextStyle,
}

impl TextTool {
    pub fn new(style: &ToolStyle) -> Self {
        Self {
            style: style.text_style(),
        }
    }

    pub const fn style(&self) -> TextStyle {
        self.style
    }
}

impl Tool for TextTool {
    fn on_press(&mut self, point: ToolPoint, ctx: &mut ToolContext<'_>) -> ToolResponse {
        let hit = ctx.elements.iter().enumerate().rev().find_map(|(index, element)| {
            element
                .as_text()
                .filter(|text| text.contains_point(point, ctx.text_metrics))
                .map(|text| (index, text.content.clone()))
        });

        let prompt = match hit {
            Some((index, seed)) => TextPrompt::Edit { index, seed },
            None => TextPrompt::Create {
                position: point,
                style: self.style,
            },
        };
        ToolResponse::prompt(prompt)
    }

    fn on_move(&mut self, _point: ToolPoint, _ctx: &mut ToolContext<'_>) -> ToolResponse {
        ToolResponse::none()
    }

    fn on_release(&mut self, _point: ToolPoint, _ctx: &mut ToolContext<'_>) -> ToolResponse {
        ToolResponse::none()
    }

    fn apply_style(&mut self, style: &ToolStyle) {
        self.style = style.text_style();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::element::{DrawingElement, TextElement};
    use crate::editor::tools::test_support::Harness;

    fn text_at(x: i32, y: i32, content: &str) -> DrawingElement {
        DrawingElement::Text(TextElement::new(
            ToolPoint::new(x, y),
            content,
            ToolStyle::default().text_style(),
        ))
    }

    #[test]
    fn press_on_empty_space_requests_create_prompt() {
        let mut harness = Harness::default();
        let mut tool = TextTool::new(&ToolStyle::default());

        let response = tool.on_press(ToolPoint::new(40, 40), &mut harness.ctx());

        assert_eq!(
            response.prompt,
            Some(TextPrompt::Create {
                position: ToolPoint::new(40, 40),
                style: tool.style(),
            })
        );
    }

    #[test]
    fn press_on_overlapping_text_edits_top_most() {
        let mut harness = Harness::default();
        harness.elements = vec![text_at(10, 50, "bottom"), text_at(12, 52, "top")];
        let mut tool = TextTool::new(&ToolStyle::default());

        let response = tool.on_press(ToolPoint::new(20, 40), &mut harness.ctx());

        assert_eq!(
            response.prompt,
            Some(TextPrompt::Edit {
                index: 1,
                seed: "top".to_string(),
            })
        );
    }

    #[test]
    fn press_below_baseline_misses_text() {
        let mut harness = Harness::default();
        harness.elements = vec![text_at(10, 50, "label")];
        let mut tool = TextTool::new(&ToolStyle::default());

        let response = tool.on_press(ToolPoint::new(20, 60), &mut harness.ctx());

        assert!(matches!(response.prompt, Some(TextPrompt::Create { .. })));
    }
}
