use crate::config::SettingsError;
use crate::export::ExportError;
use crate::hotkey::HotkeyError;
use crate::state::StateError;
use thiserror::Error;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Hotkey(#[from] HotkeyError),
    #[error("gtk initialization failed: {0}")]
    GtkInit(String),
}
