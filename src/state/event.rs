use super::model::OverlayMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeEvent {
    Toggle,
    Set(OverlayMode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeTransition {
    pub from: OverlayMode,
    pub event: ModeEvent,
    pub to: OverlayMode,
    pub generation: u64,
}

impl ModeTransition {
    pub const fn new(from: OverlayMode, event: ModeEvent, to: OverlayMode, generation: u64) -> Self {
        Self {
            from,
            event,
            to,
            generation,
        }
    }
}
