mod eraser;
mod freehand;
mod magnifier;
mod shape;
mod style;
mod text;

use crate::editor::element::DrawingElement;
use crate::editor::surface::{Surface, TextMetrics, TextStyle};
use crate::geometry::{ToolBounds, ToolPoint};

pub use eraser::EraserTool;
pub use freehand::FreehandTool;
pub use magnifier::{
    MagnifierSettings, MagnifierSurface, MagnifierTool, MagnifierView, NoMagnifier,
    MAGNIFIER_BORDER, MAGNIFIER_OFFSET,
};
pub use shape::{ShapeKind, ShapeTool};
pub use style::{
    clamp_eraser_size, clamp_font_size, clamp_line_width, RecentColors, ToolStyle,
    ERASER_SIZE_DEFAULT, ERASER_SIZE_MAX, ERASER_SIZE_MIN, FONT_SIZE_DEFAULT, FONT_SIZE_MAX,
    FONT_SIZE_MIN, LINE_WIDTH_MAX, LINE_WIDTH_MIN, RECENT_COLORS_MAX,
};
pub use text::TextTool;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Brush,
    Eraser,
    Line,
    Rectangle,
    Circle,
    Text,
    Magnifier,
}

impl ToolKind {
    pub const ALL: [ToolKind; 7] = [
        Self::Brush,
        Self::Eraser,
        Self::Line,
        Self::Rectangle,
        Self::Circle,
        Self::Text,
        Self::Magnifier,
    ];

    pub const fn tag(self) -> &'static str {
        match self {
            Self::Brush => "brush",
            Self::Eraser => "eraser",
            Self::Line => "line",
            Self::Rectangle => "rectangle",
            Self::Circle => "circle",
            Self::Text => "text",
            Self::Magnifier => "magnifier",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag().eq_ignore_ascii_case(tag.trim()))
    }

    pub const fn has_width(self) -> bool {
        matches!(
            self,
            Self::Brush | Self::Eraser | Self::Line | Self::Rectangle | Self::Circle
        )
    }
}

/// Request for the host to collect text from the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextPrompt {
    Create { position: ToolPoint, style: TextStyle },
    Edit { index: usize, seed: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToolResponse {
    pub redraw: bool,
    pub committed: bool,
    pub prompt: Option<TextPrompt>,
}

impl ToolResponse {
    pub const fn none() -> Self {
        Self {
            redraw: false,
            committed: false,
            prompt: None,
        }
    }

    pub const fn redraw() -> Self {
        Self {
            redraw: true,
            committed: false,
            prompt: None,
        }
    }

    pub const fn committed() -> Self {
        Self {
            redraw: true,
            committed: true,
            prompt: None,
        }
    }

    pub fn prompt(prompt: TextPrompt) -> Self {
        Self {
            redraw: false,
            committed: false,
            prompt: Some(prompt),
        }
    }
}

/// Canvas state a tool may read or mutate during one pointer event.
pub struct ToolContext<'a> {
    pub elements: &'a mut Vec<DrawingElement>,
    pub text_metrics: &'a dyn TextMetrics,
    pub magnifier: &'a mut dyn MagnifierSurface,
    pub screen: ToolBounds,
}

pub trait Tool {
    fn on_press(&mut self, point: ToolPoint, ctx: &mut ToolContext<'_>) -> ToolResponse;

    fn on_move(&mut self, point: ToolPoint, ctx: &mut ToolContext<'_>) -> ToolResponse;

    fn on_release(&mut self, point: ToolPoint, ctx: &mut ToolContext<'_>) -> ToolResponse;

    fn draw_preview(&self, _surface: &mut dyn Surface) {}

    /// Ends any in-progress gesture. Work already applied to the element list is
    /// reported as `committed` so the canvas can snapshot it.
    fn cancel(&mut self, _ctx: &mut ToolContext<'_>) -> ToolResponse {
        ToolResponse::none()
    }

    fn width(&self) -> Option<u32> {
        None
    }

    fn set_width(&mut self, _width: u32) {}

    fn apply_style(&mut self, _style: &ToolStyle) {}

    fn increase_width(&mut self, delta: u32) -> Option<u32> {
        let width = self.width()?;
        self.set_width(width.saturating_add(delta));
        self.width()
    }

    fn decrease_width(&mut self, delta: u32) -> Option<u32> {
        let width = self.width()?;
        self.set_width(width.saturating_sub(delta));
        self.width()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActiveTool {
    Freehand(FreehandTool),
    Shape(ShapeTool),
    Eraser(EraserTool),
    Text(TextTool),
    Magnifier(MagnifierTool),
}

impl ActiveTool {
    pub fn build(kind: ToolKind, style: &ToolStyle, magnifier: MagnifierSettings) -> Self {
        match kind {
            ToolKind::Brush => Self::Freehand(FreehandTool::new(style)),
            ToolKind::Line => Self::Shape(ShapeTool::new(ShapeKind::Line, style)),
            ToolKind::Rectangle => Self::Shape(ShapeTool::new(ShapeKind::Rectangle, style)),
            ToolKind::Circle => Self::Shape(ShapeTool::new(ShapeKind::Circle, style)),
            ToolKind::Eraser => Self::Eraser(EraserTool::default()),
            ToolKind::Text => Self::Text(TextTool::new(style)),
            ToolKind::Magnifier => Self::Magnifier(MagnifierTool::new(magnifier)),
        }
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            Self::Freehand(_) => ToolKind::Brush,
            Self::Shape(shape) => match shape.shape() {
                ShapeKind::Line => ToolKind::Line,
                ShapeKind::Rectangle => ToolKind::Rectangle,
                ShapeKind::Circle => ToolKind::Circle,
            },
            Self::Eraser(_) => ToolKind::Eraser,
            Self::Text(_) => ToolKind::Text,
            Self::Magnifier(_) => ToolKind::Magnifier,
        }
    }

    pub fn as_tool(&self) -> &dyn Tool {
        match self {
            Self::Freehand(tool) => tool,
            Self::Shape(tool) => tool,
            Self::Eraser(tool) => tool,
            Self::Text(tool) => tool,
            Self::Magnifier(tool) => tool,
        }
    }

    pub fn as_tool_mut(&mut self) -> &mut dyn Tool {
        match self {
            Self::Freehand(tool) => tool,
            Self::Shape(tool) => tool,
            Self::Eraser(tool) => tool,
            Self::Text(tool) => tool,
            Self::Magnifier(tool) => tool,
        }
    }

    pub fn as_magnifier_mut(&mut self) -> Option<&mut MagnifierTool> {
        match self {
            Self::Magnifier(tool) => Some(tool),
            _ => None,
        }
    }
}
