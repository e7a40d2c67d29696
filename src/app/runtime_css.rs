use gtk4::CssProvider;

const RUNTIME_CSS: &str = "
window.glasspen-overlay,
window.glasspen-overlay > * {
  background: transparent;
  box-shadow: none;
}
window.glasspen-toolbar {
  background: rgba(250, 250, 252, 0.96);
  border-radius: 14px;
  border: 1px solid rgba(200, 200, 210, 0.7);
}
.glasspen-toolbar .toolbar-section {
  padding: 4px 6px;
}
.glasspen-toolbar .toolbar-caption {
  color: #666666;
  font-size: 11px;
  font-weight: bold;
}
.glasspen-toolbar button.color-chip {
  min-width: 18px;
  min-height: 18px;
  padding: 2px;
  border-radius: 9px;
}
.glasspen-toolbar button.color-chip.active {
  box-shadow: 0 0 0 2px #3584e4;
}
.glasspen-toolbar togglebutton.tool-button:checked {
  background: #3584e4;
  color: #ffffff;
}
";

pub(super) fn install_runtime_css() {
    let provider = CssProvider::new();
    provider.load_from_data(RUNTIME_CSS);
    if let Some(display) = gtk4::gdk::Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    } else {
        tracing::warn!("no default display; runtime css not installed");
    }
}
