use std::path::PathBuf;

use crate::config::{save_settings, Settings};
use crate::editor::{Canvas, CanvasResponse, PointerEvent, TextPrompt, ToolKind};
use crate::export::{ExportResult, ScreenshotExporter};
use crate::geometry::{Color, ToolBounds};
use crate::input::{InputContext, ShortcutAction, ShortcutBindings, ShortcutKey, ShortcutModifiers};
use crate::state::{OverlayMode, OverlayModeController, OverlayWindowHost, ReshowTicket};

/// Requests raised by the toolbar window.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum ToolbarEvent {
    Tool(String),
    Color(String),
    Width(u32),
    FontSize(u32),
    DrawingMode(bool),
    Clear,
    Undo,
    Redo,
    Screenshot,
    Zoom(f64),
    MagnifierSize(u32),
    Close,
}

impl ToolbarEvent {
    /// Events that rewrite the element list or drop the active tool.
    fn edits_elements(&self) -> bool {
        matches!(self, Self::Tool(_) | Self::Clear | Self::Undo | Self::Redo)
    }
}

/// What the window layer must do after the session handled an input.
#[derive(Debug, Clone, Default, PartialEq)]
pub(super) struct SessionOutcome {
    pub(super) redraw: bool,
    pub(super) sync_toolbar: bool,
    pub(super) export: bool,
    pub(super) quit: bool,
    pub(super) prompt: Option<TextPrompt>,
}

impl SessionOutcome {
    fn redraw() -> Self {
        Self {
            redraw: true,
            ..Self::default()
        }
    }

    fn synced() -> Self {
        Self {
            redraw: true,
            sync_toolbar: true,
            ..Self::default()
        }
    }
}

impl From<CanvasResponse> for SessionOutcome {
    fn from(response: CanvasResponse) -> Self {
        Self {
            redraw: response.redraw,
            prompt: response.prompt,
            ..Self::default()
        }
    }
}

/// Everything the overlay owns on the UI thread.
pub(super) struct OverlaySession {
    canvas: Canvas,
    controller: OverlayModeController,
    settings: Settings,
    bindings: ShortcutBindings,
    dialog_open: bool,
}

impl OverlaySession {
    pub(super) fn new(canvas: Canvas, settings: Settings) -> Self {
        Self {
            canvas,
            controller: OverlayModeController::new(),
            settings,
            bindings: ShortcutBindings::default(),
            dialog_open: false,
        }
    }

    pub(super) fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub(super) fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub(super) fn mode(&self) -> OverlayMode {
        self.controller.mode()
    }

    pub(super) fn settings(&self) -> &Settings {
        &self.settings
    }

    pub(super) fn dialog_open(&self) -> bool {
        self.dialog_open
    }

    pub(super) fn set_dialog_open(&mut self, open: bool) {
        self.dialog_open = open;
    }

    pub(super) fn pointer_press(&mut self, event: PointerEvent) -> SessionOutcome {
        if self.dialog_open {
            return SessionOutcome::default();
        }
        self.canvas.pointer_press(event).into()
    }

    pub(super) fn pointer_move(&mut self, event: PointerEvent) -> SessionOutcome {
        self.canvas.pointer_move(event).into()
    }

    pub(super) fn pointer_release(&mut self, event: PointerEvent) -> SessionOutcome {
        self.canvas.pointer_release(event).into()
    }

    pub(super) fn scroll(&mut self, steps: i32) -> SessionOutcome {
        match self.canvas.adjust_width(steps) {
            Some(width) => {
                tracing::debug!(width, tool = ?self.canvas.active_tool_kind(), "adjusted tool width");
                self.settings.remember_style(self.canvas.style());
                SessionOutcome::synced()
            }
            None => SessionOutcome::default(),
        }
    }

    pub(super) fn complete_text_prompt(
        &mut self,
        prompt: TextPrompt,
        answer: Option<String>,
    ) -> SessionOutcome {
        self.dialog_open = false;
        if self.canvas.complete_text_prompt(prompt, answer) {
            SessionOutcome::redraw()
        } else {
            SessionOutcome::default()
        }
    }

    pub(super) fn toggle_mode(&mut self, host: &mut dyn OverlayWindowHost) -> SessionOutcome {
        let change = self.controller.toggle_with(&mut self.canvas, host);
        tracing::info!(mode = ?change.mode, generation = change.ticket.generation(), "toggled overlay mode");
        SessionOutcome::synced()
    }

    pub(super) fn set_drawing_mode(
        &mut self,
        drawing: bool,
        host: &mut dyn OverlayWindowHost,
    ) -> SessionOutcome {
        let mode = if drawing {
            OverlayMode::Drawing
        } else {
            OverlayMode::ClickThrough
        };
        self.controller
            .apply_with(crate::state::ModeEvent::Set(mode), &mut self.canvas, host);
        SessionOutcome::synced()
    }

    pub(super) fn complete_reshow(
        &self,
        ticket: ReshowTicket,
        host: &mut dyn OverlayWindowHost,
    ) -> bool {
        self.controller.complete_reshow(ticket, host)
    }

    pub(super) fn set_toolbar_region(&mut self, region: Option<ToolBounds>) {
        tracing::debug!(?region, "toolbar exclusion region updated");
        self.canvas.set_toolbar_region(region);
    }

    pub(super) fn handle_shortcut(
        &mut self,
        key: ShortcutKey,
        modifiers: ShortcutModifiers,
        host: &mut dyn OverlayWindowHost,
    ) -> Option<SessionOutcome> {
        let context = InputContext {
            dialog_open: self.dialog_open,
        };
        let action = self.bindings.resolve(key, modifiers, context)?;
        tracing::debug!(?action, "shortcut triggered");
        Some(self.run_action(action, host))
    }

    fn run_action(
        &mut self,
        action: ShortcutAction,
        host: &mut dyn OverlayWindowHost,
    ) -> SessionOutcome {
        match action {
            ShortcutAction::SelectTool(kind) => self.select_tool(kind),
            ShortcutAction::Undo => {
                self.canvas.undo();
                SessionOutcome::redraw()
            }
            ShortcutAction::Redo => {
                self.canvas.redo();
                SessionOutcome::redraw()
            }
            ShortcutAction::Clear => {
                self.canvas.clear();
                SessionOutcome::redraw()
            }
            ShortcutAction::Save => SessionOutcome {
                export: true,
                ..SessionOutcome::default()
            },
            ShortcutAction::Exit => SessionOutcome {
                quit: true,
                ..SessionOutcome::default()
            },
            ShortcutAction::ToggleMode => self.toggle_mode(host),
        }
    }

    fn select_tool(&mut self, kind: ToolKind) -> SessionOutcome {
        self.canvas.select_tool(kind);
        SessionOutcome::synced()
    }

    pub(super) fn handle_toolbar(
        &mut self,
        event: ToolbarEvent,
        host: &mut dyn OverlayWindowHost,
    ) -> SessionOutcome {
        tracing::debug!(?event, "toolbar event");
        if self.dialog_open && event.edits_elements() {
            tracing::debug!(?event, "toolbar edit ignored while text dialog is open");
            return SessionOutcome::default();
        }
        match event {
            ToolbarEvent::Tool(tag) => {
                if self.canvas.select_tool_tag(&tag) {
                    SessionOutcome::synced()
                } else {
                    tracing::warn!(tag, "unknown tool tag from toolbar");
                    SessionOutcome::default()
                }
            }
            ToolbarEvent::Color(hex) => {
                let Some(color) = Color::from_hex(&hex) else {
                    tracing::warn!(hex, "ignoring invalid color");
                    return SessionOutcome::default();
                };
                self.canvas.set_color(color);
                self.settings.remember_style(self.canvas.style());
                SessionOutcome::synced()
            }
            ToolbarEvent::Width(width) => {
                self.canvas.set_line_width(width);
                self.settings.remember_style(self.canvas.style());
                SessionOutcome::redraw()
            }
            ToolbarEvent::FontSize(size) => {
                self.canvas.set_font_size(size);
                SessionOutcome::redraw()
            }
            ToolbarEvent::DrawingMode(drawing) => {
                if drawing == self.mode().is_drawing() {
                    return SessionOutcome::default();
                }
                self.set_drawing_mode(drawing, host)
            }
            ToolbarEvent::Clear => self.run_action(ShortcutAction::Clear, host),
            ToolbarEvent::Undo => self.run_action(ShortcutAction::Undo, host),
            ToolbarEvent::Redo => self.run_action(ShortcutAction::Redo, host),
            ToolbarEvent::Screenshot => self.run_action(ShortcutAction::Save, host),
            ToolbarEvent::Zoom(zoom) => {
                self.canvas.set_zoom_factor(zoom);
                SessionOutcome::default()
            }
            ToolbarEvent::MagnifierSize(size) => {
                self.canvas.set_magnifier_size(size);
                SessionOutcome::default()
            }
            ToolbarEvent::Close => self.run_action(ShortcutAction::Exit, host),
        }
    }

    pub(super) fn export_screenshot(&self, width: u32, height: u32) -> ExportResult<PathBuf> {
        ScreenshotExporter::new(self.settings.screenshot_dir()).export(&self.canvas, width, height)
    }

    pub(super) fn persist_settings(&mut self) {
        self.settings.remember_style(self.canvas.style());
        match save_settings(&self.settings) {
            Ok(path) => tracing::info!(path = %path.display(), "settings saved"),
            Err(err) => tracing::warn!(error = %err, "failed to save settings"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::ToolStyle;
    use crate::state::WindowAttributes;
    use std::time::Duration;

    #[derive(Debug, Default)]
    struct RecordingHost {
        attributes: Vec<WindowAttributes>,
        scheduled: Vec<ReshowTicket>,
        reshows: usize,
        raises: usize,
    }

    impl OverlayWindowHost for RecordingHost {
        fn apply_attributes(&mut self, attributes: WindowAttributes) {
            self.attributes.push(attributes);
        }

        fn schedule_reshow(&mut self, ticket: ReshowTicket, _delay: Duration) {
            self.scheduled.push(ticket);
        }

        fn reassert_fullscreen(&mut self) {
            self.reshows += 1;
        }

        fn raise_toolbar(&mut self) {
            self.raises += 1;
        }
    }

    fn session() -> OverlaySession {
        let canvas = Canvas::new(ToolBounds::new(0, 0, 800, 600), ToolStyle::default());
        OverlaySession::new(canvas, Settings::default())
    }

    fn draw_line(session: &mut OverlaySession) {
        session.pointer_press(PointerEvent::at(10, 10));
        session.pointer_move(PointerEvent::at(40, 40));
        session.pointer_release(PointerEvent::at(40, 40));
    }

    #[test]
    fn f9_toggles_click_through_and_schedules_reshow() {
        let mut session = session();
        let mut host = RecordingHost::default();

        let outcome = session
            .handle_shortcut(ShortcutKey::Function(9), ShortcutModifiers::default(), &mut host)
            .expect("bound");

        assert!(outcome.sync_toolbar);
        assert_eq!(session.mode(), OverlayMode::ClickThrough);
        assert!(!session.canvas().drawing_mode());
        assert_eq!(host.attributes.len(), 1);
        assert!(host.attributes[0].input_transparent);
        assert_eq!(host.scheduled.len(), 1);
    }

    #[test]
    fn only_latest_reshow_ticket_reasserts_geometry() {
        let mut session = session();
        let mut host = RecordingHost::default();
        session.toggle_mode(&mut host);
        session.toggle_mode(&mut host);

        let stale = host.scheduled[0];
        let current = host.scheduled[1];
        assert!(!session.complete_reshow(stale, &mut host));
        assert!(session.complete_reshow(current, &mut host));
        assert_eq!(host.reshows, 1);
        assert_eq!(host.raises, 1);
        assert_eq!(session.mode(), OverlayMode::Drawing);
    }

    #[test]
    fn toolbar_drawing_mode_ignores_current_mode() {
        let mut session = session();
        let mut host = RecordingHost::default();

        let outcome = session.handle_toolbar(ToolbarEvent::DrawingMode(true), &mut host);
        assert_eq!(outcome, SessionOutcome::default());
        assert!(host.attributes.is_empty());

        session.handle_toolbar(ToolbarEvent::DrawingMode(false), &mut host);
        assert_eq!(session.mode(), OverlayMode::ClickThrough);
    }

    #[test]
    fn toolbar_tool_and_color_update_canvas_and_settings() {
        let mut session = session();
        let mut host = RecordingHost::default();

        let outcome = session.handle_toolbar(ToolbarEvent::Tool("line".to_string()), &mut host);
        assert!(outcome.sync_toolbar);
        assert_eq!(session.canvas().active_tool_kind(), ToolKind::Line);

        session.handle_toolbar(ToolbarEvent::Color("#00ff00".to_string()), &mut host);
        assert_eq!(session.canvas().style().color, Color::new(0, 255, 0));
        assert_eq!(session.settings().color, "#00FF00");

        let ignored = session.handle_toolbar(ToolbarEvent::Color("green".to_string()), &mut host);
        assert_eq!(ignored, SessionOutcome::default());
        let unknown = session.handle_toolbar(ToolbarEvent::Tool("laser".to_string()), &mut host);
        assert!(!unknown.sync_toolbar);
        assert_eq!(session.canvas().active_tool_kind(), ToolKind::Line);
    }

    #[test]
    fn shortcuts_undo_clear_and_exit() {
        let mut session = session();
        let mut host = RecordingHost::default();
        draw_line(&mut session);
        assert_eq!(session.canvas().elements().len(), 1);

        session.handle_shortcut(
            ShortcutKey::Character('z'),
            ShortcutModifiers::new(true, false),
            &mut host,
        );
        assert!(session.canvas().elements().is_empty());

        session.handle_shortcut(
            ShortcutKey::Character('y'),
            ShortcutModifiers::new(true, false),
            &mut host,
        );
        assert_eq!(session.canvas().elements().len(), 1);

        session.handle_shortcut(ShortcutKey::Delete, ShortcutModifiers::default(), &mut host);
        assert!(session.canvas().elements().is_empty());

        let exit = session
            .handle_shortcut(ShortcutKey::Escape, ShortcutModifiers::default(), &mut host)
            .expect("bound");
        assert!(exit.quit);
        let save = session
            .handle_shortcut(
                ShortcutKey::Character('s'),
                ShortcutModifiers::new(true, false),
                &mut host,
            )
            .expect("bound");
        assert!(save.export);
    }

    #[test]
    fn open_dialog_swallows_shortcuts_and_presses() {
        let mut session = session();
        let mut host = RecordingHost::default();
        session.set_dialog_open(true);

        assert_eq!(
            session.handle_shortcut(ShortcutKey::Delete, ShortcutModifiers::default(), &mut host),
            None
        );
        assert_eq!(
            session.pointer_press(PointerEvent::at(5, 5)),
            SessionOutcome::default()
        );
    }

    #[test]
    fn open_dialog_blocks_toolbar_edits_but_not_styling() {
        let mut session = session();
        let mut host = RecordingHost::default();
        draw_line(&mut session);
        session.set_dialog_open(true);

        for event in [
            ToolbarEvent::Undo,
            ToolbarEvent::Clear,
            ToolbarEvent::Redo,
            ToolbarEvent::Tool("eraser".to_string()),
        ] {
            assert_eq!(
                session.handle_toolbar(event, &mut host),
                SessionOutcome::default()
            );
        }
        assert_eq!(session.canvas().elements().len(), 1);
        assert_eq!(session.canvas().active_tool_kind(), ToolKind::Brush);

        let outcome = session.handle_toolbar(ToolbarEvent::Width(7), &mut host);
        assert!(outcome.redraw);
        assert_eq!(session.canvas().active_tool_width(), Some(7));

        session.set_dialog_open(false);
        session.handle_toolbar(ToolbarEvent::Undo, &mut host);
        assert!(session.canvas().elements().is_empty());
    }

    #[test]
    fn text_prompt_round_trip_closes_dialog() {
        let mut session = session();
        session.canvas_mut().select_tool(ToolKind::Text);

        let outcome = session.pointer_press(PointerEvent::at(100, 100));
        let prompt = outcome.prompt.expect("text prompt");
        session.set_dialog_open(true);

        let done = session.complete_text_prompt(prompt, Some("hello".to_string()));
        assert!(done.redraw);
        assert!(!session.dialog_open());
        assert_eq!(
            session.canvas().elements()[0]
                .as_text()
                .map(|text| text.content.as_str()),
            Some("hello")
        );
    }

    #[test]
    fn scroll_adjusts_width_and_remembers_it() {
        let mut session = session();
        let outcome = session.scroll(2);
        assert!(outcome.sync_toolbar);
        assert_eq!(session.canvas().active_tool_width(), Some(5));
        assert_eq!(session.settings().line_width, 5);

        session.canvas_mut().select_tool(ToolKind::Text);
        assert_eq!(session.scroll(1), SessionOutcome::default());
    }
}
