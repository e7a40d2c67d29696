use crate::geometry::{Color, ToolBounds, ToolPoint};

use super::element::{DrawingElement, TextElement};
use super::history::HistoryManager;
use super::surface::{EstimatedTextMetrics, Surface, TextMetrics};
use super::tools::{
    ActiveTool, MagnifierSettings, MagnifierSurface, NoMagnifier,
    RecentColors, TextPrompt, Tool, ToolContext, ToolKind, ToolResponse, ToolStyle,
};

/// Pointer sample in canvas space plus the same point in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub position: ToolPoint,
    pub screen_position: ToolPoint,
}

impl PointerEvent {
    pub const fn new(position: ToolPoint, screen_position: ToolPoint) -> Self {
        Self {
            position,
            screen_position,
        }
    }

    /// For a full-screen overlay canvas and screen coordinates coincide.
    pub const fn at(x: i32, y: i32) -> Self {
        let point = ToolPoint::new(x, y);
        Self::new(point, point)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CanvasResponse {
    pub redraw: bool,
    pub prompt: Option<TextPrompt>,
}

impl From<ToolResponse> for CanvasResponse {
    fn from(response: ToolResponse) -> Self {
        Self {
            redraw: response.redraw || response.committed,
            prompt: response.prompt,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum PointerPhase {
    Press,
    Move,
    Release,
}

/// Annotation document plus the active tool and its undo history.
pub struct Canvas {
    elements: Vec<DrawingElement>,
    drawing_mode: bool,
    toolbar_region: Option<ToolBounds>,
    active_tool: ActiveTool,
    style: ToolStyle,
    recent_colors: RecentColors,
    magnifier_settings: MagnifierSettings,
    history: HistoryManager,
    screen: ToolBounds,
    text_metrics: Box<dyn TextMetrics>,
    magnifier: Box<dyn MagnifierSurface>,
}

impl Canvas {
    pub fn new(screen: ToolBounds, style: ToolStyle) -> Self {
        let magnifier_settings = MagnifierSettings::default();
        let mut history = HistoryManager::new();
        history.save_state(&[]);
        Self {
            elements: Vec::new(),
            drawing_mode: true,
            toolbar_region: None,
            active_tool: ActiveTool::build(ToolKind::Brush, &style, magnifier_settings),
            style,
            recent_colors: RecentColors::default(),
            magnifier_settings,
            history,
            screen,
            text_metrics: Box::new(EstimatedTextMetrics),
            magnifier: Box::new(NoMagnifier),
        }
    }

    pub fn with_text_metrics(mut self, metrics: Box<dyn TextMetrics>) -> Self {
        self.text_metrics = metrics;
        self
    }

    pub fn with_magnifier(mut self, magnifier: Box<dyn MagnifierSurface>) -> Self {
        self.magnifier = magnifier;
        self
    }

    pub fn elements(&self) -> &[DrawingElement] {
        &self.elements
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub const fn style(&self) -> &ToolStyle {
        &self.style
    }

    pub fn recent_colors(&self) -> &RecentColors {
        &self.recent_colors
    }

    pub const fn magnifier_settings(&self) -> MagnifierSettings {
        self.magnifier_settings
    }

    pub fn active_tool_kind(&self) -> ToolKind {
        self.active_tool.kind()
    }

    pub fn active_tool_width(&self) -> Option<u32> {
        self.active_tool.as_tool().width()
    }

    pub const fn drawing_mode(&self) -> bool {
        self.drawing_mode
    }

    pub fn set_screen(&mut self, screen: ToolBounds) {
        self.screen = screen;
    }

    pub fn set_toolbar_region(&mut self, region: Option<ToolBounds>) {
        self.toolbar_region = region;
    }

    /// Leaving drawing mode drops any half-finished gesture.
    pub fn set_drawing_mode(&mut self, enabled: bool) {
        if self.drawing_mode && !enabled {
            self.cancel_gesture();
        }
        self.drawing_mode = enabled;
    }

    fn accepts_pointer(&self, event: &PointerEvent) -> bool {
        if !self.drawing_mode {
            return false;
        }
        !self
            .toolbar_region
            .is_some_and(|region| region.contains(event.screen_position))
    }

    fn dispatch(&mut self, phase: PointerPhase, point: ToolPoint) -> ToolResponse {
        let Self {
            elements,
            active_tool,
            text_metrics,
            magnifier,
            screen,
            ..
        } = self;
        let mut ctx = ToolContext {
            elements,
            text_metrics: &**text_metrics,
            magnifier: &mut **magnifier,
            screen: *screen,
        };
        let tool = active_tool.as_tool_mut();
        match phase {
            PointerPhase::Press => tool.on_press(point, &mut ctx),
            PointerPhase::Move => tool.on_move(point, &mut ctx),
            PointerPhase::Release => tool.on_release(point, &mut ctx),
        }
    }

    fn handle_pointer(&mut self, phase: PointerPhase, event: PointerEvent) -> CanvasResponse {
        if !self.accepts_pointer(&event) {
            return CanvasResponse::default();
        }
        let response = self.dispatch(phase, event.position);
        if response.committed {
            self.history.save_state(&self.elements);
            tracing::debug!(
                tool = self.active_tool.kind().tag(),
                elements = self.elements.len(),
                "tool committed element"
            );
        }
        response.into()
    }

    pub fn pointer_press(&mut self, event: PointerEvent) -> CanvasResponse {
        self.handle_pointer(PointerPhase::Press, event)
    }

    pub fn pointer_move(&mut self, event: PointerEvent) -> CanvasResponse {
        self.handle_pointer(PointerPhase::Move, event)
    }

    pub fn pointer_release(&mut self, event: PointerEvent) -> CanvasResponse {
        self.handle_pointer(PointerPhase::Release, event)
    }

    pub fn cancel_gesture(&mut self) {
        let Self {
            elements,
            active_tool,
            text_metrics,
            magnifier,
            screen,
            ..
        } = self;
        let mut ctx = ToolContext {
            elements,
            text_metrics: &**text_metrics,
            magnifier: &mut **magnifier,
            screen: *screen,
        };
        let response = active_tool.as_tool_mut().cancel(&mut ctx);
        if response.committed {
            self.history.save_state(&self.elements);
            tracing::debug!(
                tool = self.active_tool.kind().tag(),
                elements = self.elements.len(),
                "interrupted gesture committed"
            );
        }
    }

    /// Applies the host's answer to a [`TextPrompt`]. `None` means the dialog was cancelled.
    pub fn complete_text_prompt(&mut self, prompt: TextPrompt, answer: Option<String>) -> bool {
        let Some(content) = answer else {
            return false;
        };
        match prompt {
            TextPrompt::Create { position, style } => {
                if content.is_empty() {
                    return false;
                }
                self.elements.push(DrawingElement::Text(TextElement::new(
                    position, content, style,
                )));
            }
            TextPrompt::Edit { index, seed } => {
                let Some(text) = self.elements.get_mut(index).and_then(DrawingElement::as_text_mut)
                else {
                    tracing::warn!(index, "text edit target no longer exists");
                    return false;
                };
                if text.content != seed {
                    tracing::warn!(index, "text edit target changed while prompting");
                    return false;
                }
                text.update_text(content);
            }
        }
        self.history.save_state(&self.elements);
        true
    }

    pub fn undo(&mut self) {
        self.cancel_gesture();
        self.elements = self.history.undo();
        tracing::debug!(elements = self.elements.len(), "undo");
    }

    pub fn redo(&mut self) {
        self.cancel_gesture();
        self.elements = self.history.redo();
        tracing::debug!(elements = self.elements.len(), "redo");
    }

    pub fn clear(&mut self) {
        self.cancel_gesture();
        self.elements.clear();
        self.history.save_state(&self.elements);
    }

    pub fn select_tool(&mut self, kind: ToolKind) {
        self.cancel_gesture();
        self.active_tool = ActiveTool::build(kind, &self.style, self.magnifier_settings);
        tracing::debug!(tool = kind.tag(), "tool selected");
    }

    /// Selects a tool by its toolbar tag; unknown tags are ignored.
    pub fn select_tool_tag(&mut self, tag: &str) -> bool {
        match ToolKind::from_tag(tag) {
            Some(kind) => {
                self.select_tool(kind);
                true
            }
            None => {
                tracing::warn!(tag, "unknown tool tag");
                false
            }
        }
    }

    fn push_style(&mut self) {
        let style = self.style;
        self.active_tool.as_tool_mut().apply_style(&style);
    }

    pub fn set_style(&mut self, style: ToolStyle) {
        self.style = style;
        self.push_style();
    }

    pub fn set_color(&mut self, color: Color) {
        self.style.set_color(color);
        self.recent_colors.push(color);
        self.push_style();
    }

    pub fn set_fill_color(&mut self, fill: Option<Color>) {
        self.style.set_fill_color(fill);
        self.push_style();
    }

    pub fn set_opacity(&mut self, opacity: u8) {
        self.style.set_opacity(opacity);
        self.push_style();
    }

    pub fn set_line_width(&mut self, width: u32) {
        self.style.set_line_width(width);
        self.push_style();
    }

    pub fn set_font_size(&mut self, size: u32) {
        self.style.set_font_size(size);
        self.push_style();
    }

    /// Scroll-driven width change for the active tool; `None` when it has no size.
    pub fn adjust_width(&mut self, steps: i32) -> Option<u32> {
        if !self.drawing_mode || steps == 0 {
            return None;
        }
        let tool = self.active_tool.as_tool_mut();
        let width = if steps > 0 {
            tool.increase_width(steps.unsigned_abs())
        } else {
            tool.decrease_width(steps.unsigned_abs())
        }?;
        if self.active_tool.kind() != ToolKind::Eraser {
            self.style.set_line_width(width);
        }
        Some(width)
    }

    pub fn set_zoom_factor(&mut self, zoom_factor: f64) {
        self.magnifier_settings.set_zoom_factor(zoom_factor);
        self.sync_magnifier();
    }

    pub fn set_magnifier_size(&mut self, window_size: u32) {
        self.magnifier_settings.set_window_size(window_size);
        self.sync_magnifier();
    }

    fn sync_magnifier(&mut self) {
        let settings = self.magnifier_settings;
        if let Some(tool) = self.active_tool.as_magnifier_mut() {
            tool.set_settings(settings);
        }
    }

    /// Paints committed elements, then the active tool's preview while drawing.
    pub fn draw(&self, surface: &mut dyn Surface) {
        for element in &self.elements {
            element.render(surface);
        }
        if self.drawing_mode {
            self.active_tool.as_tool().draw_preview(surface);
        }
    }

    /// Paints committed elements only.
    pub fn draw_elements(&self, surface: &mut dyn Surface) {
        for element in &self.elements {
            element.render(surface);
        }
    }
}
