use std::collections::VecDeque;
use std::time::Duration;

use crate::editor::Canvas;

use super::error::{StateError, StateResult};
use super::event::{ModeEvent, ModeTransition};
use super::model::{OverlayMode, WindowAttributes};

/// Delay before the host re-asserts full-screen geometry after a mode change.
pub const RESHOW_DELAY: Duration = Duration::from_millis(10);

const TRANSITION_LOG_CAPACITY: usize = 32;

/// Handle for one scheduled re-show; only the newest ticket is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReshowTicket {
    generation: u64,
}

impl ReshowTicket {
    pub const fn generation(self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeChange {
    pub mode: OverlayMode,
    pub attributes: WindowAttributes,
    pub ticket: ReshowTicket,
}

/// Window-system operations the controller drives.
pub trait OverlayWindowHost {
    fn apply_attributes(&mut self, attributes: WindowAttributes);
    fn schedule_reshow(&mut self, ticket: ReshowTicket, delay: Duration);
    fn reassert_fullscreen(&mut self);
    fn raise_toolbar(&mut self);
}

#[derive(Debug)]
pub struct OverlayModeController {
    mode: OverlayMode,
    generation: u64,
    transition_history: VecDeque<ModeTransition>,
}

impl OverlayModeController {
    pub fn new() -> Self {
        Self {
            mode: OverlayMode::default(),
            generation: 0,
            transition_history: VecDeque::new(),
        }
    }

    pub fn mode(&self) -> OverlayMode {
        self.mode
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn transitions(&self) -> impl Iterator<Item = &ModeTransition> {
        self.transition_history.iter()
    }

    /// Applies `event`, syncs the canvas input gate and hands out a fresh re-show ticket.
    ///
    /// Setting the current mode again still re-applies attributes and reschedules.
    pub fn apply(&mut self, event: ModeEvent, canvas: &mut Canvas) -> ModeChange {
        let from = self.mode;
        let to = match event {
            ModeEvent::Toggle => from.toggled(),
            ModeEvent::Set(mode) => mode,
        };
        tracing::debug!(from = ?from, event = ?event, to = ?to, "overlay mode transition");

        self.mode = to;
        self.generation = self.generation.wrapping_add(1);
        canvas.set_drawing_mode(to.is_drawing());

        self.transition_history
            .push_back(ModeTransition::new(from, event, to, self.generation));
        while self.transition_history.len() > TRANSITION_LOG_CAPACITY {
            self.transition_history.pop_front();
        }

        ModeChange {
            mode: to,
            attributes: to.window_attributes(),
            ticket: ReshowTicket {
                generation: self.generation,
            },
        }
    }

    pub fn toggle(&mut self, canvas: &mut Canvas) -> ModeChange {
        self.apply(ModeEvent::Toggle, canvas)
    }

    pub fn set_mode(&mut self, mode: OverlayMode, canvas: &mut Canvas) -> ModeChange {
        self.apply(ModeEvent::Set(mode), canvas)
    }

    /// Validates a fired ticket; a ticket superseded by a later transition is rejected.
    pub fn reshow(&self, ticket: ReshowTicket) -> StateResult<OverlayMode> {
        if ticket.generation != self.generation {
            return Err(StateError::StaleReshow {
                ticket: ticket.generation,
                current: self.generation,
            });
        }
        Ok(self.mode)
    }

    pub fn apply_with(
        &mut self,
        event: ModeEvent,
        canvas: &mut Canvas,
        host: &mut dyn OverlayWindowHost,
    ) -> ModeChange {
        let change = self.apply(event, canvas);
        host.apply_attributes(change.attributes);
        host.schedule_reshow(change.ticket, RESHOW_DELAY);
        change
    }

    pub fn toggle_with(
        &mut self,
        canvas: &mut Canvas,
        host: &mut dyn OverlayWindowHost,
    ) -> ModeChange {
        self.apply_with(ModeEvent::Toggle, canvas, host)
    }

    /// Runs the deferred step for `ticket`; returns `false` when the ticket was stale.
    pub fn complete_reshow(&self, ticket: ReshowTicket, host: &mut dyn OverlayWindowHost) -> bool {
        match self.reshow(ticket) {
            Ok(mode) => {
                tracing::debug!(mode = ?mode, generation = ticket.generation, "reshow overlay");
                host.reassert_fullscreen();
                host.raise_toolbar();
                true
            }
            Err(err) => {
                tracing::debug!(error = %err, "skipping stale reshow");
                false
            }
        }
    }
}

impl Default for OverlayModeController {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OverlayModeController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OverlayMode::{:?}", self.mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{PointerEvent, ToolStyle};
    use crate::geometry::ToolBounds;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum HostCall {
        Attributes(WindowAttributes),
        Schedule(ReshowTicket),
        Fullscreen,
        RaiseToolbar,
    }

    #[derive(Debug, Default)]
    struct RecordingHost {
        calls: Vec<HostCall>,
    }

    impl OverlayWindowHost for RecordingHost {
        fn apply_attributes(&mut self, attributes: WindowAttributes) {
            self.calls.push(HostCall::Attributes(attributes));
        }

        fn schedule_reshow(&mut self, ticket: ReshowTicket, delay: Duration) {
            assert_eq!(delay, RESHOW_DELAY);
            self.calls.push(HostCall::Schedule(ticket));
        }

        fn reassert_fullscreen(&mut self) {
            self.calls.push(HostCall::Fullscreen);
        }

        fn raise_toolbar(&mut self) {
            self.calls.push(HostCall::RaiseToolbar);
        }
    }

    fn canvas() -> Canvas {
        Canvas::new(ToolBounds::new(0, 0, 800, 600), ToolStyle::default())
    }

    #[test]
    fn toggle_flips_mode_and_window_attributes() {
        let mut canvas = canvas();
        let mut controller = OverlayModeController::new();
        assert_eq!(controller.mode(), OverlayMode::Drawing);

        let change = controller.toggle(&mut canvas);
        assert_eq!(change.mode, OverlayMode::ClickThrough);
        assert!(change.attributes.input_transparent);
        assert!(!change.attributes.intercept_pointer);
        assert!(change.attributes.frameless && change.attributes.always_on_top);
        assert!(!canvas.drawing_mode());

        let change = controller.toggle(&mut canvas);
        assert_eq!(change.mode, OverlayMode::Drawing);
        assert!(!change.attributes.input_transparent);
        assert!(canvas.drawing_mode());
    }

    #[test]
    fn double_toggle_leaves_only_latest_ticket_live() {
        let mut canvas = canvas();
        let mut controller = OverlayModeController::new();
        let mut host = RecordingHost::default();

        let first = controller.toggle_with(&mut canvas, &mut host);
        let second = controller.toggle_with(&mut canvas, &mut host);

        assert!(!controller.complete_reshow(first.ticket, &mut host));
        assert_eq!(
            controller.reshow(first.ticket),
            Err(StateError::StaleReshow {
                ticket: 1,
                current: 2
            })
        );
        assert!(controller.complete_reshow(second.ticket, &mut host));
        assert_eq!(
            host.calls,
            vec![
                HostCall::Attributes(OverlayMode::ClickThrough.window_attributes()),
                HostCall::Schedule(first.ticket),
                HostCall::Attributes(OverlayMode::Drawing.window_attributes()),
                HostCall::Schedule(second.ticket),
                HostCall::Fullscreen,
                HostCall::RaiseToolbar,
            ]
        );
    }

    #[test]
    fn click_through_blocks_canvas_mutation() {
        let mut canvas = canvas();
        let mut controller = OverlayModeController::new();
        controller.set_mode(OverlayMode::ClickThrough, &mut canvas);

        canvas.pointer_press(PointerEvent::at(1, 1));
        canvas.pointer_move(PointerEvent::at(9, 9));
        canvas.pointer_release(PointerEvent::at(9, 9));
        assert!(canvas.elements().is_empty());

        controller.set_mode(OverlayMode::Drawing, &mut canvas);
        canvas.pointer_press(PointerEvent::at(1, 1));
        canvas.pointer_move(PointerEvent::at(9, 9));
        canvas.pointer_release(PointerEvent::at(9, 9));
        assert_eq!(canvas.elements().len(), 1);
    }

    #[test]
    fn transition_log_is_ordered_and_bounded() {
        let mut canvas = canvas();
        let mut controller = OverlayModeController::new();
        controller.set_mode(OverlayMode::Drawing, &mut canvas);
        controller.toggle(&mut canvas);

        let log: Vec<_> = controller.transitions().copied().collect();
        assert_eq!(
            log,
            vec![
                ModeTransition::new(
                    OverlayMode::Drawing,
                    ModeEvent::Set(OverlayMode::Drawing),
                    OverlayMode::Drawing,
                    1
                ),
                ModeTransition::new(
                    OverlayMode::Drawing,
                    ModeEvent::Toggle,
                    OverlayMode::ClickThrough,
                    2
                ),
            ]
        );

        for _ in 0..100 {
            controller.toggle(&mut canvas);
        }
        assert_eq!(controller.transitions().count(), TRANSITION_LOG_CAPACITY);
        assert_eq!(controller.generation(), 102);
    }
}
