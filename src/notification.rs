const APP_NAME: &str = "Glasspen";

pub fn send(body: impl Into<String>) {
    let body = body.into();
    if let Err(err) = notify_rust::Notification::new()
        .appname(APP_NAME)
        .summary(APP_NAME)
        .body(&body)
        .show()
    {
        tracing::warn!("system notification failed: {err}");
    }
}

pub fn screenshot_saved(path: &std::path::Path) {
    send(format!("Screenshot saved to {}", path.display()));
}

pub fn screenshot_failed(reason: impl std::fmt::Display) {
    send(format!("Screenshot failed: {reason}"));
}
