//! Annotation engine: elements, tools, eraser geometry and undo history.

pub mod canvas;
pub mod element;
pub mod eraser;
pub mod history;
pub mod surface;
pub mod tools;

pub use canvas::{Canvas, CanvasResponse, PointerEvent};
pub use element::{
    CircleElement, DrawingElement, EraserMark, LineElement, RectangleElement, StrokeElement,
    TextElement,
};
pub use history::{HistoryManager, DEFAULT_MAX_HISTORY};
pub use surface::{EstimatedTextMetrics, Pen, Surface, TextExtent, TextMetrics, TextStyle};
pub use tools::{
    MagnifierSettings, MagnifierSurface, MagnifierView, TextPrompt, ToolKind, ToolStyle,
};
