//! Drawing / click-through input mode of the overlay window.

pub mod error;
pub mod event;
pub mod machine;
pub mod model;

pub use error::{StateError, StateResult};
pub use event::{ModeEvent, ModeTransition};
pub use machine::{ModeChange, OverlayModeController, OverlayWindowHost, ReshowTicket, RESHOW_DELAY};
pub use model::{OverlayMode, WindowAttributes};
