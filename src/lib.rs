pub mod app;
pub mod capture;
pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod geometry;
pub mod hotkey;
pub mod input;
pub mod logging;
pub mod notification;
pub mod render;
pub mod state;
pub use error::{AppError, AppResult};

/// Entrypoint used by higher-level integrations and CLI bindings.
pub fn run() -> AppResult<()> {
    logging::init();
    tracing::info!("starting glasspen");

    let mut app = app::App::new();
    app.start()?;

    tracing::info!("overlay closed");
    Ok(())
}
