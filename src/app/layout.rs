use gtk4::prelude::*;

use crate::geometry::ToolBounds;

pub(super) const TOOLBAR_WIDTH: u32 = 112;
pub(super) const TOOLBAR_HEIGHT: u32 = 860;
const TOOLBAR_MARGIN: i32 = 20;

/// Logical geometry of the first monitor, in global layout coordinates.
pub(super) fn primary_monitor_bounds() -> Option<ToolBounds> {
    let display = gtk4::gdk::Display::default()?;
    let monitors = display.monitors();
    (0..monitors.n_items()).find_map(|index| {
        let monitor = monitors.item(index)?.downcast::<gtk4::gdk::Monitor>().ok()?;
        let geometry = monitor.geometry();
        Some(ToolBounds::new(
            geometry.x(),
            geometry.y(),
            u32::try_from(geometry.width().max(1)).ok()?,
            u32::try_from(geometry.height().max(1)).ok()?,
        ))
    })
}

/// Toolbar starts at the left edge, vertically centred and shrunk to fit short monitors.
pub(super) fn toolbar_initial_geometry(monitor: ToolBounds) -> ToolBounds {
    let margin = TOOLBAR_MARGIN.unsigned_abs();
    let height = TOOLBAR_HEIGHT.min(monitor.height.saturating_sub(margin * 2).max(1));
    let free = monitor.height.saturating_sub(height) / 2;
    ToolBounds::new(
        monitor.x.saturating_add(TOOLBAR_MARGIN),
        monitor
            .y
            .saturating_add(i32::try_from(free).unwrap_or(TOOLBAR_MARGIN)),
        TOOLBAR_WIDTH,
        height,
    )
}

pub(super) fn widget_size(width: i32, height: i32) -> Option<(u32, u32)> {
    let width = u32::try_from(width).ok().filter(|value| *value > 0)?;
    let height = u32::try_from(height).ok().filter(|value| *value > 0)?;
    Some((width, height))
}
