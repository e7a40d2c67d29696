use crate::geometry::{ToolBounds, ToolPoint};

use super::{Tool, ToolContext, ToolResponse};

pub const ZOOM_FACTOR_MIN: f64 = 2.0;
pub const ZOOM_FACTOR_MAX: f64 = 8.0;
pub const WINDOW_SIZE_MIN: u32 = 100;
pub const WINDOW_SIZE_MAX: u32 = 400;
pub const MAGNIFIER_OFFSET: i32 = 20;
pub const MAGNIFIER_BORDER: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagnifierSettings {
    zoom_factor: f64,
    window_size: u32,
}

impl Default for MagnifierSettings {
    fn default() -> Self {
        Self {
            zoom_factor: 2.0,
            window_size: 200,
        }
    }
}

impl MagnifierSettings {
    pub fn new(zoom_factor: f64, window_size: u32) -> Self {
        let mut settings = Self::default();
        settings.set_zoom_factor(zoom_factor);
        settings.set_window_size(window_size);
        settings
    }

    pub const fn zoom_factor(&self) -> f64 {
        self.zoom_factor
    }

    pub const fn window_size(&self) -> u32 {
        self.window_size
    }

    pub fn set_zoom_factor(&mut self, zoom_factor: f64) {
        self.zoom_factor = if zoom_factor.is_finite() {
            zoom_factor.clamp(ZOOM_FACTOR_MIN, ZOOM_FACTOR_MAX)
        } else {
            ZOOM_FACTOR_MIN
        };
    }

    pub fn set_window_size(&mut self, window_size: u32) {
        self.window_size = window_size.clamp(WINDOW_SIZE_MIN, WINDOW_SIZE_MAX);
    }

    /// Side of the square screen region sampled under the pointer.
    pub fn capture_side(&self) -> u32 {
        (f64::from(self.window_size) / self.zoom_factor) as u32
    }

    pub fn outer_size(&self) -> u32 {
        self.window_size + MAGNIFIER_BORDER * 2
    }

    pub fn view_at(&self, pointer: ToolPoint, screen: ToolBounds) -> MagnifierView {
        let side = self.capture_side();
        let half = i32::try_from(side / 2).unwrap_or(i32::MAX);
        let capture = ToolBounds::new(
            pointer.x.saturating_sub(half),
            pointer.y.saturating_sub(half),
            side,
            side,
        );

        let outer = self.outer_size();
        let outer_i32 = i32::try_from(outer).unwrap_or(i32::MAX);
        let mut window = pointer.offset(MAGNIFIER_OFFSET, MAGNIFIER_OFFSET);
        // Edges are exclusive: a lens ending exactly on the screen edge still fits.
        if i64::from(window.x) + i64::from(outer) > screen.right() {
            window.x = pointer.x.saturating_sub(outer_i32 + MAGNIFIER_OFFSET);
        }
        if i64::from(window.y) + i64::from(outer) > screen.bottom() {
            window.y = pointer.y.saturating_sub(outer_i32 + MAGNIFIER_OFFSET);
        }

        MagnifierView {
            pointer,
            capture,
            window: ToolBounds::new(window.x, window.y, outer, outer),
            zoom_factor: self.zoom_factor,
        }
    }
}

/// Where the lens samples from and where it is drawn, in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagnifierView {
    pub pointer: ToolPoint,
    pub capture: ToolBounds,
    pub window: ToolBounds,
    pub zoom_factor: f64,
}

/// Presentation side of the magnifier; owned by the host.
pub trait MagnifierSurface {
    fn show(&mut self, view: &MagnifierView);
    fn update(&mut self, view: &MagnifierView);
    fn hide(&mut self);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoMagnifier;

impl MagnifierSurface for NoMagnifier {
    fn show(&mut self, _view: &MagnifierView) {}

    fn update(&mut self, _view: &MagnifierView) {}

    fn hide(&mut self) {}
}

#[derive(Debug, Clone, PartialEq)]
pub struct MagnifierTool {
    settings: MagnifierSettings,
    active: bool,
}

impl MagnifierTool {
    pub fn new(settings: MagnifierSettings) -> Self {
        Self {
            settings,
            active: false,
        }
    }

    pub const fn settings(&self) -> MagnifierSettings {
        self.settings
    }

    pub const fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_settings(&mut self, settings: MagnifierSettings) {
        self.settings = settings;
    }
}

impl Tool for MagnifierTool {
    fn on_press(&mut self, point: ToolPoint, ctx: &mut ToolContext<'_>) -> ToolResponse {
        self.active = true;
        ctx.magnifier.show(&self.settings.view_at(point, ctx.screen));
        ToolResponse::none()
    }

    fn on_move(&mut self, point: ToolPoint, ctx: &mut ToolContext<'_>) -> ToolResponse {
        if self.active {
            ctx.magnifier.update(&self.settings.view_at(point, ctx.screen));
        }
        ToolResponse::none()
    }

    fn on_release(&mut self, _point: ToolPoint, ctx: &mut ToolContext<'_>) -> ToolResponse {
        if self.active {
            self.active = false;
            ctx.magnifier.hide();
        }
        ToolResponse::none()
    }

    fn cancel(&mut self, ctx: &mut ToolContext<'_>) -> ToolResponse {
        if self.active {
            self.active = false;
            ctx.magnifier.hide();
        }
        ToolResponse::none()
    }
}
