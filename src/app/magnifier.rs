use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gtk4::cairo;
use gtk4::prelude::*;
use gtk4::DrawingArea;

use crate::capture;
use crate::editor::{MagnifierSurface, MagnifierView};
use crate::geometry::{ToolBounds, ToolPoint};
use crate::render::{draw_magnifier_lens, rgba_image_to_cairo_surface};

use super::worker::spawn_worker_action;

#[derive(Default)]
struct LensState {
    view: Option<MagnifierView>,
    frame: Option<cairo::ImageSurface>,
    request: u64,
}

/// Lens drawn on top of the overlay from a frame grabbed when the lens opens.
///
/// The frame is grabbed once per press so pointer motion only re-samples it.
#[derive(Clone)]
pub(super) struct LensPresenter {
    state: Rc<RefCell<LensState>>,
    area: DrawingArea,
    overlay_origin: Rc<Cell<ToolPoint>>,
    overlay_size: Rc<Cell<(u32, u32)>>,
}

impl LensPresenter {
    pub(super) fn new(area: &DrawingArea) -> Self {
        Self {
            state: Rc::new(RefCell::new(LensState::default())),
            area: area.clone(),
            overlay_origin: Rc::new(Cell::new(ToolPoint::default())),
            overlay_size: Rc::new(Cell::new((0, 0))),
        }
    }

    /// Global layout position and size of the overlay the lens samples.
    pub(super) fn set_overlay_geometry(&self, bounds: ToolBounds) {
        self.overlay_origin.set(ToolPoint::new(bounds.x, bounds.y));
        self.overlay_size.set((bounds.width, bounds.height));
    }

    pub(super) fn draw(&self, context: &cairo::Context) {
        let state = self.state.borrow();
        if let (Some(view), Some(frame)) = (state.view.as_ref(), state.frame.as_ref()) {
            draw_magnifier_lens(context, view, Some(frame));
        }
    }

    fn request_frame(&self) {
        let (width, height) = self.overlay_size.get();
        let origin = self.overlay_origin.get();
        let region = ToolBounds::new(origin.x, origin.y, width, height);
        let request = {
            let mut state = self.state.borrow_mut();
            state.request = state.request.wrapping_add(1);
            state.frame = None;
            state.request
        };

        let state = self.state.clone();
        let area = self.area.clone();
        spawn_worker_action(
            move || capture::capture_region(region),
            move |result| {
                let mut state = state.borrow_mut();
                if state.request != request || state.view.is_none() {
                    tracing::debug!(request, "dropping stale magnifier frame");
                    return;
                }
                match result {
                    Ok(image) => {
                        state.frame = rgba_image_to_cairo_surface(&image);
                        if state.frame.is_none() {
                            tracing::warn!("failed to convert magnifier frame");
                        }
                    }
                    Err(err) => tracing::warn!(error = %err, "magnifier screen grab failed"),
                }
                area.queue_draw();
            },
        );
    }
}

impl MagnifierSurface for LensPresenter {
    fn show(&mut self, view: &MagnifierView) {
        self.state.borrow_mut().view = Some(*view);
        self.request_frame();
    }

    fn update(&mut self, view: &MagnifierView) {
        let mut state = self.state.borrow_mut();
        if state.view.is_some() {
            state.view = Some(*view);
            drop(state);
            self.area.queue_draw();
        }
    }

    fn hide(&mut self) {
        {
            let mut state = self.state.borrow_mut();
            state.view = None;
            state.frame = None;
            state.request = state.request.wrapping_add(1);
        }
        self.area.queue_draw();
    }
}
