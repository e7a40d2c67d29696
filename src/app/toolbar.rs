use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use gtk4::prelude::*;
use gtk4::{
    Align, Application, ApplicationWindow, Box as GtkBox, Button, DrawingArea, Entry, Grid, Label,
    Orientation, Revealer, RevealerTransitionType, Scale, Separator, SpinButton, ToggleButton,
};

use crate::editor::tools::{
    FONT_SIZE_MAX, FONT_SIZE_MIN, LINE_WIDTH_MAX, LINE_WIDTH_MIN, RECENT_COLORS_MAX,
};
use crate::editor::{Canvas, ToolKind};
use crate::geometry::Color;
use crate::state::OverlayMode;

use super::layout::{TOOLBAR_HEIGHT, TOOLBAR_WIDTH};
use super::session::ToolbarEvent;

pub(super) const TOOLBAR_TITLE: &str = "Glasspen Toolbar";

const PRESET_COLORS: [&str; 16] = [
    "#FF0000", "#FF4500", "#FF8C00", "#FFD700", "#00FF00", "#00FF7F", "#00CED1", "#00BFFF",
    "#0000FF", "#8A2BE2", "#FF00FF", "#FF1493", "#000000", "#404040", "#808080", "#FFFFFF",
];
const COLOR_GRID_COLUMNS: i32 = 4;

pub(super) type ToolbarHandler = Rc<dyn Fn(ToolbarEvent)>;

fn tool_label(kind: ToolKind) -> &'static str {
    match kind {
        ToolKind::Brush => "Brush",
        ToolKind::Eraser => "Eraser",
        ToolKind::Line => "Line",
        ToolKind::Rectangle => "Rect",
        ToolKind::Circle => "Circle",
        ToolKind::Text => "Text",
        ToolKind::Magnifier => "Lens",
    }
}

fn mode_label(mode: OverlayMode) -> &'static str {
    match mode {
        OverlayMode::Drawing => "Drawing",
        OverlayMode::ClickThrough => "Pass-through",
    }
}

fn color_chip(color: Rc<Cell<Option<Color>>>) -> Button {
    let chip = Button::new();
    chip.set_focus_on_click(false);
    chip.add_css_class("flat");
    chip.add_css_class("color-chip");
    let swatch = DrawingArea::new();
    swatch.set_content_width(16);
    swatch.set_content_height(16);
    swatch.set_can_target(false);
    swatch.set_draw_func(move |_, context, width, height| {
        let Some(color) = color.get() else {
            return;
        };
        let (red, green, blue, _) = color.to_cairo_rgba();
        let radius = (f64::from(width.min(height)) / 2.0) - 1.0;
        context.arc(
            f64::from(width) / 2.0,
            f64::from(height) / 2.0,
            radius.max(1.0),
            0.0,
            std::f64::consts::TAU,
        );
        context.set_source_rgb(red, green, blue);
        let _ = context.fill_preserve();
        context.set_source_rgba(0.0, 0.0, 0.0, 0.35);
        context.set_line_width(1.0);
        let _ = context.stroke();
    });
    chip.set_child(Some(&swatch));
    chip
}

fn caption(text: &str) -> Label {
    let label = Label::new(Some(text));
    label.add_css_class("toolbar-caption");
    label.set_halign(Align::Center);
    label
}

struct ColorChip {
    color: Rc<Cell<Option<Color>>>,
    button: Button,
}

pub(super) struct ToolbarUi {
    pub(super) window: ApplicationWindow,
    content: Revealer,
    tool_buttons: Vec<(ToolKind, ToggleButton)>,
    mode_button: ToggleButton,
    preset_chips: Vec<ColorChip>,
    recent_chips: Vec<ColorChip>,
    hex_entry: Entry,
    width_spin: SpinButton,
    font_spin: SpinButton,
    zoom_spin: SpinButton,
    lens_scale: Scale,
    undo_button: Button,
    redo_button: Button,
    clear_button: Button,
    screenshot_button: Button,
    close_button: Button,
    syncing: Rc<Cell<bool>>,
    hide_generation: Rc<Cell<u64>>,
}

pub(super) fn build_toolbar_ui(app: &Application, canvas: &Canvas) -> ToolbarUi {
    let window = ApplicationWindow::new(app);
    window.set_title(Some(TOOLBAR_TITLE));
    window.set_decorated(false);
    window.set_resizable(false);
    window.add_css_class("glasspen-toolbar");
    window.set_default_size(
        i32::try_from(TOOLBAR_WIDTH).unwrap_or(112),
        i32::try_from(TOOLBAR_HEIGHT).unwrap_or(860),
    );

    let root = GtkBox::new(Orientation::Vertical, 4);
    root.set_margin_top(8);
    root.set_margin_bottom(8);
    root.set_margin_start(6);
    root.set_margin_end(6);

    let handle = Label::new(Some("⋮⋮"));
    handle.add_css_class("toolbar-caption");
    root.append(&handle);

    let column = GtkBox::new(Orientation::Vertical, 4);
    column.add_css_class("toolbar-section");

    let mode_button = ToggleButton::with_label(mode_label(OverlayMode::Drawing));
    mode_button.set_active(true);
    mode_button.set_tooltip_text(Some("Toggle drawing / pass-through (F9)"));
    column.append(&mode_button);
    column.append(&Separator::new(Orientation::Horizontal));

    let mut tool_buttons: Vec<(ToolKind, ToggleButton)> = Vec::new();
    for kind in ToolKind::ALL {
        let button = ToggleButton::with_label(tool_label(kind));
        button.add_css_class("tool-button");
        button.set_focus_on_click(false);
        if let Some((_, first)) = tool_buttons.first() {
            button.set_group(Some(first));
        }
        column.append(&button);
        tool_buttons.push((kind, button));
    }
    column.append(&Separator::new(Orientation::Horizontal));

    column.append(&caption("Color"));
    let preset_grid = Grid::new();
    preset_grid.set_row_spacing(2);
    preset_grid.set_column_spacing(2);
    let mut preset_chips = Vec::with_capacity(PRESET_COLORS.len());
    for (index, hex) in (0_i32..).zip(PRESET_COLORS) {
        let color = Rc::new(Cell::new(Color::from_hex(hex)));
        let button = color_chip(color.clone());
        button.set_tooltip_text(Some(hex));
        preset_grid.attach(
            &button,
            index % COLOR_GRID_COLUMNS,
            index / COLOR_GRID_COLUMNS,
            1,
            1,
        );
        preset_chips.push(ColorChip { color, button });
    }
    column.append(&preset_grid);

    column.append(&caption("Recent"));
    let recent_grid = Grid::new();
    recent_grid.set_row_spacing(2);
    recent_grid.set_column_spacing(2);
    let mut recent_chips = Vec::with_capacity(RECENT_COLORS_MAX);
    for index in (0_i32..).take(RECENT_COLORS_MAX) {
        let color = Rc::new(Cell::new(None));
        let button = color_chip(color.clone());
        recent_grid.attach(
            &button,
            index % COLOR_GRID_COLUMNS,
            index / COLOR_GRID_COLUMNS,
            1,
            1,
        );
        recent_chips.push(ColorChip { color, button });
    }
    column.append(&recent_grid);

    let hex_entry = Entry::new();
    hex_entry.set_max_length(7);
    hex_entry.set_width_chars(7);
    hex_entry.set_placeholder_text(Some("#RRGGBB"));
    column.append(&hex_entry);
    column.append(&Separator::new(Orientation::Horizontal));

    column.append(&caption("Width"));
    let width_spin = SpinButton::with_range(
        f64::from(LINE_WIDTH_MIN),
        f64::from(LINE_WIDTH_MAX),
        1.0,
    );
    column.append(&width_spin);

    column.append(&caption("Font"));
    let font_spin =
        SpinButton::with_range(f64::from(FONT_SIZE_MIN), f64::from(FONT_SIZE_MAX), 1.0);
    column.append(&font_spin);

    column.append(&caption("Zoom"));
    let zoom_spin = SpinButton::with_range(2.0, 8.0, 0.5);
    zoom_spin.set_digits(1);
    column.append(&zoom_spin);

    column.append(&caption("Lens"));
    let lens_scale = Scale::with_range(Orientation::Horizontal, 100.0, 400.0, 10.0);
    lens_scale.set_draw_value(false);
    column.append(&lens_scale);
    column.append(&Separator::new(Orientation::Horizontal));

    let undo_button = Button::with_label("Undo");
    let redo_button = Button::with_label("Redo");
    let clear_button = Button::with_label("Clear");
    let screenshot_button = Button::with_label("Save");
    screenshot_button.set_tooltip_text(Some("Save annotations as PNG (Ctrl+S)"));
    let close_button = Button::with_label("Close");
    for button in [
        &undo_button,
        &redo_button,
        &clear_button,
        &screenshot_button,
        &close_button,
    ] {
        button.set_focus_on_click(false);
        column.append(button);
    }

    let content = Revealer::new();
    content.set_transition_type(RevealerTransitionType::SlideDown);
    content.set_reveal_child(true);
    content.set_child(Some(&column));
    root.append(&content);
    window.set_child(Some(&root));

    let toolbar = ToolbarUi {
        window,
        content,
        tool_buttons,
        mode_button,
        preset_chips,
        recent_chips,
        hex_entry,
        width_spin,
        font_spin,
        zoom_spin,
        lens_scale,
        undo_button,
        redo_button,
        clear_button,
        screenshot_button,
        close_button,
        syncing: Rc::new(Cell::new(false)),
        hide_generation: Rc::new(Cell::new(0)),
    };
    toolbar.sync(canvas, OverlayMode::Drawing);
    toolbar
}

impl ToolbarUi {
    /// Wires every control to `handler`; programmatic syncs are not echoed back.
    pub(super) fn connect(&self, handler: ToolbarHandler) {
        let emit = {
            let syncing = self.syncing.clone();
            move |event: ToolbarEvent| {
                if !syncing.get() {
                    handler(event);
                }
            }
        };
        let emit: Rc<dyn Fn(ToolbarEvent)> = Rc::new(emit);

        for (kind, button) in &self.tool_buttons {
            let emit = emit.clone();
            let tag = kind.tag().to_string();
            button.connect_toggled(move |button| {
                if button.is_active() {
                    emit(ToolbarEvent::Tool(tag.clone()));
                }
            });
        }

        {
            let emit = emit.clone();
            self.mode_button.connect_toggled(move |button| {
                emit(ToolbarEvent::DrawingMode(button.is_active()));
            });
        }

        for chip in self.preset_chips.iter().chain(&self.recent_chips) {
            let emit = emit.clone();
            let color = chip.color.clone();
            chip.button.connect_clicked(move |_| {
                if let Some(color) = color.get() {
                    emit(ToolbarEvent::Color(color.to_hex()));
                }
            });
        }

        {
            let emit = emit.clone();
            self.hex_entry.connect_activate(move |entry| {
                emit(ToolbarEvent::Color(entry.text().to_string()));
            });
        }

        {
            let emit = emit.clone();
            self.width_spin.connect_value_changed(move |spin| {
                emit(ToolbarEvent::Width(spin.value_as_int().unsigned_abs()));
            });
        }
        {
            let emit = emit.clone();
            self.font_spin.connect_value_changed(move |spin| {
                emit(ToolbarEvent::FontSize(spin.value_as_int().unsigned_abs()));
            });
        }
        {
            let emit = emit.clone();
            self.zoom_spin.connect_value_changed(move |spin| {
                emit(ToolbarEvent::Zoom(spin.value()));
            });
        }
        {
            let emit = emit.clone();
            self.lens_scale.connect_value_changed(move |scale| {
                emit(ToolbarEvent::MagnifierSize(scale.value().round().max(0.0) as u32));
            });
        }

        for (button, event) in [
            (&self.undo_button, ToolbarEvent::Undo),
            (&self.redo_button, ToolbarEvent::Redo),
            (&self.clear_button, ToolbarEvent::Clear),
            (&self.screenshot_button, ToolbarEvent::Screenshot),
            (&self.close_button, ToolbarEvent::Close),
        ] {
            let emit = emit.clone();
            button.connect_clicked(move |_| emit(event.clone()));
        }
    }

    /// Reflects canvas state into the controls.
    pub(super) fn sync(&self, canvas: &Canvas, mode: OverlayMode) {
        self.syncing.set(true);

        let active = canvas.active_tool_kind();
        for (kind, button) in &self.tool_buttons {
            if *kind == active {
                button.set_active(true);
            }
        }

        self.mode_button.set_active(mode.is_drawing());
        self.mode_button.set_label(mode_label(mode));

        let style = canvas.style();
        for chip in &self.preset_chips {
            if chip.color.get() == Some(style.color) {
                chip.button.add_css_class("active");
            } else {
                chip.button.remove_css_class("active");
            }
        }
        let mut recent = canvas.recent_colors().iter().copied();
        for chip in &self.recent_chips {
            let color = recent.next();
            chip.color.set(color);
            chip.button.set_visible(color.is_some());
            if let Some(color) = color {
                chip.button.set_tooltip_text(Some(&color.to_hex()));
            }
            if let Some(swatch) = chip.button.child() {
                swatch.queue_draw();
            }
        }
        self.hex_entry.set_text(&style.color.to_hex());

        let width = canvas.active_tool_width().unwrap_or(style.line_width);
        if active == ToolKind::Eraser {
            self.width_spin.set_sensitive(false);
        } else {
            self.width_spin.set_sensitive(true);
            self.width_spin.set_value(f64::from(width));
        }
        self.font_spin.set_value(f64::from(style.font_size));

        let magnifier = canvas.magnifier_settings();
        self.zoom_spin.set_value(magnifier.zoom_factor());
        self.lens_scale.set_value(f64::from(magnifier.window_size()));

        let history = canvas.history();
        self.undo_button.set_sensitive(history.can_undo());
        self.redo_button.set_sensitive(history.can_redo());

        self.syncing.set(false);
    }

    /// Collapses the controls `delay` after the pointer leaves; hovering reveals them again.
    pub(super) fn install_auto_hide(&self, delay: Duration, on_leave: impl Fn() + 'static) {
        let motion = gtk4::EventControllerMotion::new();
        {
            let content = self.content.clone();
            let hide_generation = self.hide_generation.clone();
            motion.connect_enter(move |_, _, _| {
                hide_generation.set(hide_generation.get().wrapping_add(1));
                content.set_reveal_child(true);
            });
        }
        {
            let content = self.content.clone();
            let hide_generation = self.hide_generation.clone();
            motion.connect_leave(move |_| {
                let generation = hide_generation.get().wrapping_add(1);
                hide_generation.set(generation);
                let content = content.clone();
                let hide_generation = hide_generation.clone();
                gtk4::glib::timeout_add_local_once(delay, move || {
                    if hide_generation.get() == generation {
                        content.set_reveal_child(false);
                    }
                });
                on_leave();
            });
        }
        self.window.add_controller(motion);
    }

    /// Runs `on_leave` whenever the pointer leaves the toolbar, without auto-hide.
    pub(super) fn connect_leave(&self, on_leave: impl Fn() + 'static) {
        let motion = gtk4::EventControllerMotion::new();
        motion.connect_leave(move |_| on_leave());
        self.window.add_controller(motion);
    }
}
