use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use gtk4::cairo;
use gtk4::prelude::*;
use gtk4::{Application, ApplicationWindow, DrawingArea};

use crate::config::{load_settings, Settings};
use crate::editor::{Canvas, PointerEvent, TextPrompt};
use crate::error::{AppError, AppResult};
use crate::geometry::{ToolBounds, ToolPoint};
use crate::hotkey::{HotkeyError, HotkeyListener, HotkeyTrigger};
use crate::render::{CairoSurface, CairoTextMetrics};
use crate::state::{OverlayWindowHost, ReshowTicket, WindowAttributes};

mod hypr;
mod input_bridge;
mod layout;
mod magnifier;
mod runtime_css;
mod session;
mod text_prompt;
mod toolbar;
mod worker;

use self::input_bridge::{normalize_shortcut_key, shortcut_modifiers};
use self::layout::{primary_monitor_bounds, toolbar_initial_geometry, widget_size};
use self::magnifier::LensPresenter;
use self::session::{OverlaySession, SessionOutcome, ToolbarEvent};
use self::toolbar::{build_toolbar_ui, ToolbarUi, TOOLBAR_TITLE};
use self::worker::{poll_channel, spawn_worker_action, HOTKEY_POLL_INTERVAL};

const APPLICATION_ID: &str = "io.github.glasspen";
const OVERLAY_TITLE: &str = "Glasspen";
const FALLBACK_MONITOR: ToolBounds = ToolBounds::new(0, 0, 1920, 1080);

fn apply_input_region(window: &ApplicationWindow, transparent: bool) {
    let Some(surface) = window.surface() else {
        tracing::debug!("overlay surface not realized; input region deferred");
        return;
    };
    if transparent {
        surface.set_input_region(&cairo::Region::create());
    } else {
        let full = cairo::RectangleInt::new(0, 0, window.width().max(1), window.height().max(1));
        surface.set_input_region(&cairo::Region::create_rectangle(&full));
    }
}

fn scroll_steps(dy: f64) -> i32 {
    if dy < 0.0 {
        1
    } else if dy > 0.0 {
        -1
    } else {
        0
    }
}

/// Shared handles of the running overlay; cheap to clone into signal handlers.
#[derive(Clone)]
struct OverlayRuntime {
    app: Application,
    session: Rc<RefCell<OverlaySession>>,
    window: ApplicationWindow,
    area: DrawingArea,
    toolbar: Rc<ToolbarUi>,
    lens: LensPresenter,
    monitor: ToolBounds,
}

/// [`OverlayWindowHost`] backed by the gtk overlay and toolbar windows.
struct WindowHost {
    runtime: OverlayRuntime,
}

impl OverlayWindowHost for WindowHost {
    fn apply_attributes(&mut self, attributes: WindowAttributes) {
        let runtime = &self.runtime;
        runtime.window.set_decorated(!attributes.frameless);
        runtime.area.set_can_target(attributes.intercept_pointer);
        apply_input_region(&runtime.window, attributes.input_transparent);
        tracing::debug!(?attributes, "applied overlay window attributes");
    }

    fn schedule_reshow(&mut self, ticket: ReshowTicket, delay: Duration) {
        let runtime = self.runtime.clone();
        gtk4::glib::timeout_add_local_once(delay, move || runtime.complete_reshow(ticket));
    }

    fn reassert_fullscreen(&mut self) {
        self.runtime.reassert_geometry();
    }

    fn raise_toolbar(&mut self) {
        let toolbar = &self.runtime.toolbar.window;
        if hypr::in_hyprland() {
            hypr::request_window_raise("toolbar", TOOLBAR_TITLE);
        } else {
            toolbar.present();
        }
        self.runtime.refresh_toolbar_region();
    }
}

impl OverlayRuntime {
    fn build(app: &Application, settings: Settings) -> Self {
        runtime_css::install_runtime_css();
        let monitor = primary_monitor_bounds().unwrap_or_else(|| {
            tracing::warn!("no monitor reported; using fallback geometry");
            FALLBACK_MONITOR
        });

        let window = ApplicationWindow::new(app);
        window.set_title(Some(OVERLAY_TITLE));
        window.set_decorated(false);
        window.add_css_class("glasspen-overlay");
        window.set_default_size(
            i32::try_from(monitor.width).unwrap_or(i32::MAX),
            i32::try_from(monitor.height).unwrap_or(i32::MAX),
        );

        let area = DrawingArea::new();
        area.set_hexpand(true);
        area.set_vexpand(true);
        area.set_focusable(true);
        window.set_child(Some(&area));

        let lens = LensPresenter::new(&area);
        lens.set_overlay_geometry(monitor);

        let screen = ToolBounds::new(0, 0, monitor.width, monitor.height);
        let mut canvas =
            Canvas::new(screen, settings.tool_style()).with_magnifier(Box::new(lens.clone()));
        match CairoTextMetrics::new() {
            Some(metrics) => canvas = canvas.with_text_metrics(Box::new(metrics)),
            None => tracing::warn!("cairo text metrics unavailable; using estimates"),
        }

        let toolbar = Rc::new(build_toolbar_ui(app, &canvas));
        let session = Rc::new(RefCell::new(OverlaySession::new(canvas, settings)));

        Self {
            app: app.clone(),
            session,
            window,
            area,
            toolbar,
            lens,
            monitor,
        }
    }

    fn host(&self) -> WindowHost {
        WindowHost {
            runtime: self.clone(),
        }
    }

    fn pointer_event(&self, x: f64, y: f64) -> PointerEvent {
        let position = ToolPoint::new(x.round() as i32, y.round() as i32);
        PointerEvent::new(position, position.offset(self.monitor.x, self.monitor.y))
    }

    fn install(&self) {
        self.connect_draw();
        self.connect_pointer();
        self.connect_scroll();
        self.connect_shortcuts(&self.window);
        self.connect_shortcuts(&self.toolbar.window);
        self.connect_toolbar();
        self.connect_lifecycle();
    }

    fn connect_draw(&self) {
        let runtime = self.clone();
        self.area.set_draw_func(move |_, context, _, _| {
            let session = runtime.session.borrow();
            let mut surface = CairoSurface::new(context);
            session.canvas().draw(&mut surface);
            runtime.lens.draw(context);
        });

        let runtime = self.clone();
        self.area.connect_resize(move |_, width, height| {
            let Some((width, height)) = widget_size(width, height) else {
                return;
            };
            runtime
                .lens
                .set_overlay_geometry(ToolBounds::new(runtime.monitor.x, runtime.monitor.y, width, height));
            let drawing = {
                let mut session = runtime.session.borrow_mut();
                session
                    .canvas_mut()
                    .set_screen(ToolBounds::new(0, 0, width, height));
                session.mode().is_drawing()
            };
            apply_input_region(&runtime.window, !drawing);
        });
    }

    fn connect_pointer(&self) {
        let gesture = gtk4::GestureDrag::new();
        gesture.set_button(gtk4::gdk::BUTTON_PRIMARY);
        let start = Rc::new(Cell::new((0.0_f64, 0.0_f64)));

        {
            let runtime = self.clone();
            let start = start.clone();
            gesture.connect_drag_begin(move |_, start_x, start_y| {
                start.set((start_x, start_y));
                runtime.area.grab_focus();
                let event = runtime.pointer_event(start_x, start_y);
                let outcome = runtime.session.borrow_mut().pointer_press(event);
                runtime.apply_outcome(outcome);
            });
        }
        {
            let runtime = self.clone();
            let start = start.clone();
            gesture.connect_drag_update(move |_, offset_x, offset_y| {
                let (start_x, start_y) = start.get();
                let event = runtime.pointer_event(start_x + offset_x, start_y + offset_y);
                let outcome = runtime.session.borrow_mut().pointer_move(event);
                if outcome.redraw {
                    runtime.area.queue_draw();
                }
            });
        }
        {
            let runtime = self.clone();
            gesture.connect_drag_end(move |_, offset_x, offset_y| {
                let (start_x, start_y) = start.get();
                let event = runtime.pointer_event(start_x + offset_x, start_y + offset_y);
                let outcome = runtime.session.borrow_mut().pointer_release(event);
                runtime.apply_outcome(outcome);
            });
        }
        self.area.add_controller(gesture);
    }

    fn connect_scroll(&self) {
        let scroll = gtk4::EventControllerScroll::new(
            gtk4::EventControllerScrollFlags::VERTICAL | gtk4::EventControllerScrollFlags::DISCRETE,
        );
        let runtime = self.clone();
        scroll.connect_scroll(move |_, _, dy| {
            let steps = scroll_steps(dy);
            if steps == 0 {
                return gtk4::glib::Propagation::Proceed;
            }
            let outcome = runtime.session.borrow_mut().scroll(steps);
            runtime.apply_outcome(outcome);
            gtk4::glib::Propagation::Stop
        });
        self.area.add_controller(scroll);
    }

    fn connect_shortcuts(&self, window: &ApplicationWindow) {
        let key_controller = gtk4::EventControllerKey::new();
        let runtime = self.clone();
        key_controller.connect_key_pressed(move |_, key, keycode, modifier| {
            let Some(shortcut_key) = normalize_shortcut_key(key, keycode) else {
                return gtk4::glib::Propagation::Proceed;
            };
            let outcome = {
                let mut host = runtime.host();
                runtime.session.borrow_mut().handle_shortcut(
                    shortcut_key,
                    shortcut_modifiers(modifier),
                    &mut host,
                )
            };
            match outcome {
                Some(outcome) => {
                    runtime.apply_outcome(outcome);
                    gtk4::glib::Propagation::Stop
                }
                None => gtk4::glib::Propagation::Proceed,
            }
        });
        window.add_controller(key_controller);
    }

    fn connect_toolbar(&self) {
        let runtime = self.clone();
        self.toolbar.connect(Rc::new(move |event: ToolbarEvent| {
            let outcome = {
                let mut host = runtime.host();
                runtime.session.borrow_mut().handle_toolbar(event, &mut host)
            };
            runtime.apply_outcome(outcome);
        }));

        let (auto_hide, delay_ms) = {
            let session = self.session.borrow();
            let settings = session.settings();
            (settings.auto_hide_toolbar, settings.toolbar_hide_delay_ms)
        };
        let runtime = self.clone();
        let refresh = move || runtime.refresh_toolbar_region();
        if auto_hide {
            self.toolbar
                .install_auto_hide(Duration::from_millis(delay_ms), refresh);
        } else {
            self.toolbar.connect_leave(refresh);
        }
    }

    fn connect_lifecycle(&self) {
        {
            let runtime = self.clone();
            self.window.connect_is_active_notify(move |window| {
                if window.is_active() {
                    return;
                }
                if let Ok(mut session) = runtime.session.try_borrow_mut() {
                    session.canvas_mut().cancel_gesture();
                    runtime.area.queue_draw();
                }
            });
        }
        for window in [&self.window, &self.toolbar.window] {
            let runtime = self.clone();
            window.connect_close_request(move |_| {
                runtime.quit();
                gtk4::glib::Propagation::Proceed
            });
        }
    }

    fn present(&self) {
        self.window.present();
        self.toolbar.window.present();
        if hypr::in_hyprland() {
            hypr::request_overlay_window("overlay", OVERLAY_TITLE, Some(self.monitor));
            hypr::request_overlay_window(
                "toolbar",
                TOOLBAR_TITLE,
                Some(toolbar_initial_geometry(self.monitor)),
            );
        } else {
            self.window.fullscreen();
        }
        let attributes = self.session.borrow().mode().window_attributes();
        self.host().apply_attributes(attributes);
        self.refresh_toolbar_region();
        tracing::info!(monitor = ?self.monitor, "overlay presented");
    }

    fn apply_outcome(&self, outcome: SessionOutcome) {
        if outcome.redraw || outcome.sync_toolbar {
            self.area.queue_draw();
            let session = self.session.borrow();
            self.toolbar.sync(session.canvas(), session.mode());
        }
        if let Some(prompt) = outcome.prompt {
            self.open_prompt(prompt);
        }
        if outcome.export {
            self.export_screenshot();
        }
        if outcome.quit {
            self.quit();
        }
    }

    fn open_prompt(&self, prompt: TextPrompt) {
        self.session.borrow_mut().set_dialog_open(true);
        let runtime = self.clone();
        text_prompt::open_text_prompt(&self.window, prompt, move |prompt, answer| {
            let outcome = runtime
                .session
                .borrow_mut()
                .complete_text_prompt(prompt, answer);
            runtime.apply_outcome(outcome);
        });
    }

    fn export_screenshot(&self) {
        let (width, height) = widget_size(self.area.width(), self.area.height())
            .unwrap_or((self.monitor.width, self.monitor.height));
        let result = self.session.borrow().export_screenshot(width, height);
        match result {
            Ok(path) => {
                tracing::info!(path = %path.display(), "screenshot saved");
                crate::notification::screenshot_saved(&path);
            }
            Err(err) => {
                tracing::warn!(error = %err, "screenshot export failed");
                crate::notification::screenshot_failed(&err);
            }
        }
    }

    fn toggle_mode(&self) {
        let outcome = {
            let mut host = self.host();
            self.session.borrow_mut().toggle_mode(&mut host)
        };
        self.apply_outcome(outcome);
    }

    fn complete_reshow(&self, ticket: ReshowTicket) {
        let mut host = self.host();
        self.session.borrow().complete_reshow(ticket, &mut host);
    }

    fn reassert_geometry(&self) {
        if hypr::in_hyprland() {
            hypr::request_overlay_window("overlay", OVERLAY_TITLE, Some(self.monitor));
        } else {
            self.window.fullscreen();
        }
        let attributes = self.session.borrow().mode().window_attributes();
        apply_input_region(&self.window, attributes.input_transparent);
        self.window.set_visible(true);
    }

    fn refresh_toolbar_region(&self) {
        let session = self.session.clone();
        spawn_worker_action(
            || hypr::window_geometry(TOOLBAR_TITLE),
            move |region| {
                if region.is_some() {
                    session.borrow_mut().set_toolbar_region(region);
                }
            },
        );
    }

    fn listen_for_hotkeys(&self, listener: HotkeyListener) {
        tracing::info!(path = %listener.path().display(), "global toggle ready");
        let runtime = self.clone();
        poll_channel(
            HOTKEY_POLL_INTERVAL,
            move || listener.try_recv(),
            move |trigger| match trigger {
                HotkeyTrigger::ToggleMode => runtime.toggle_mode(),
                HotkeyTrigger::Quit => runtime.quit(),
            },
        );
    }

    fn quit(&self) {
        if let Ok(mut session) = self.session.try_borrow_mut() {
            session.persist_settings();
        }
        self.app.quit();
    }
}

pub struct App {
    settings: Settings,
}

impl App {
    pub fn new() -> Self {
        Self {
            settings: load_settings(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn start(&mut self) -> AppResult<()> {
        let hotkey = match HotkeyListener::bind_default() {
            Ok(listener) => Some(listener),
            Err(err @ HotkeyError::AlreadyRunning { .. }) => return Err(err.into()),
            Err(err) => {
                tracing::warn!(error = %err, "global toggle unavailable");
                None
            }
        };

        gtk4::init().map_err(|err| AppError::GtkInit(err.to_string()))?;

        tracing::info!("starting gtk runtime");
        let application = Application::new(
            Some(APPLICATION_ID),
            gtk4::gio::ApplicationFlags::NON_UNIQUE,
        );

        let settings = self.settings.clone();
        let hotkey = RefCell::new(hotkey);
        let activate_once = Cell::new(false);
        application.connect_activate(move |app| {
            if activate_once.replace(true) {
                tracing::debug!("ignoring duplicate gtk activate signal");
                return;
            }
            let runtime = OverlayRuntime::build(app, settings.clone());
            runtime.install();
            runtime.present();
            if let Some(listener) = hotkey.borrow_mut().take() {
                runtime.listen_for_hotkeys(listener);
            }
        });

        // Only argv[0] goes to GTK; our own flags are handled by the binary.
        let gtk_args: Vec<String> = std::env::args().take(1).collect();
        application.run_with_args(&gtk_args);
        tracing::info!("gtk runtime finished");
        Ok(())
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_up_grows_and_down_shrinks() {
        assert_eq!(scroll_steps(-1.0), 1);
        assert_eq!(scroll_steps(1.0), -1);
        assert_eq!(scroll_steps(0.0), 0);
    }
}
