use std::process::Command;
use std::time::Duration;

use crate::geometry::ToolBounds;

const HYPR_LOOKUP_RETRY_COUNT: u8 = 40;
const HYPR_LOOKUP_RETRY_DELAY: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct HyprClientMatch {
    pub(super) address: String,
    pub(super) pinned: bool,
    pub(super) geometry: Option<ToolBounds>,
}

pub(super) fn in_hyprland() -> bool {
    std::env::var_os("HYPRLAND_INSTANCE_SIGNATURE").is_some()
}

fn parse_client_geometry(client: &serde_json::Value) -> Option<ToolBounds> {
    let at = client.get("at")?.as_array()?;
    let size = client.get("size")?.as_array()?;
    if at.len() != 2 || size.len() != 2 {
        return None;
    }
    let x = i32::try_from(at[0].as_i64()?).ok()?;
    let y = i32::try_from(at[1].as_i64()?).ok()?;
    let width = u32::try_from(size[0].as_i64()?).ok()?;
    let height = u32::try_from(size[1].as_i64()?).ok()?;
    if width == 0 || height == 0 {
        return None;
    }
    Some(ToolBounds::new(x, y, width, height))
}

pub(super) fn hypr_client_match_from_json(
    stdout: &[u8],
    expected_title: &str,
) -> Option<HyprClientMatch> {
    let parsed: serde_json::Value = serde_json::from_slice(stdout).ok()?;
    parsed.as_array()?.iter().find_map(|client| {
        let title = client.get("title").and_then(serde_json::Value::as_str)?;
        if title != expected_title {
            return None;
        }
        let address = client.get("address").and_then(serde_json::Value::as_str)?;
        Some(HyprClientMatch {
            address: address.to_string(),
            pinned: client
                .get("pinned")
                .and_then(serde_json::Value::as_bool)
                .unwrap_or(false),
            geometry: parse_client_geometry(client),
        })
    })
}

fn find_hypr_window_match(expected_title: &str) -> Option<HyprClientMatch> {
    let outcome = Command::new("hyprctl")
        .args(["-j", "clients"])
        .output()
        .ok()?;
    if !outcome.status.success() {
        return None;
    }
    hypr_client_match_from_json(&outcome.stdout, expected_title)
}

fn retry_until_some<T, F, S>(
    retry_count: u8,
    retry_delay: Duration,
    mut action: F,
    mut sleep: S,
) -> Option<T>
where
    F: FnMut(u8) -> Option<T>,
    S: FnMut(Duration),
{
    for attempt in 1..=retry_count {
        if let Some(value) = action(attempt) {
            return Some(value);
        }
        if attempt < retry_count {
            sleep(retry_delay);
        }
    }
    None
}

fn dispatch(window_name: &str, args: &[&str]) -> bool {
    match Command::new("hyprctl").arg("dispatch").args(args).output() {
        Ok(result) if result.status.success() => {
            tracing::debug!(window = window_name, ?args, "hyprctl dispatch applied");
            true
        }
        Ok(result) => {
            let stderr = String::from_utf8_lossy(&result.stderr);
            tracing::warn!(
                window = window_name,
                ?args,
                status = result.status.code(),
                stderr = stderr.trim(),
                "hyprctl dispatch returned non-zero status"
            );
            false
        }
        Err(err) => {
            tracing::debug!(window = window_name, ?args, ?err, "hyprctl dispatch failed");
            false
        }
    }
}

fn overlay_dispatch_plan(selector: &str, geometry: Option<ToolBounds>, pinned: bool) -> Vec<Vec<String>> {
    let mut plan = vec![vec!["setfloating".to_string(), selector.to_string()]];
    for (property, value) in [
        ("decorate", "off"),
        ("border_size", "0"),
        ("rounding", "0"),
        ("no_blur", "on"),
        ("no_shadow", "on"),
    ] {
        plan.push(
            ["setprop", selector, property, value]
                .map(str::to_string)
                .to_vec(),
        );
    }
    if let Some(bounds) = geometry {
        plan.push(vec![
            "resizewindowpixel".to_string(),
            format!("exact {} {},{selector}", bounds.width.max(1), bounds.height.max(1)),
        ]);
        plan.push(vec![
            "movewindowpixel".to_string(),
            format!("exact {} {},{selector}", bounds.x, bounds.y),
        ]);
    }
    if !pinned {
        plan.push(vec!["pin".to_string(), selector.to_string()]);
    }
    plan
}

/// Floats, strips and pins the window titled `expected_title` on a background thread.
///
/// Pinning keeps the window above tiled clients on every workspace. Outside Hyprland this is a no-op.
pub(super) fn request_overlay_window(
    window_name: &str,
    expected_title: &str,
    geometry: Option<ToolBounds>,
) {
    if !in_hyprland() {
        tracing::debug!(window = window_name, "skipping overlay dispatch outside Hyprland");
        return;
    }

    let window_name = window_name.to_string();
    let expected_title = expected_title.to_string();
    std::thread::spawn(move || {
        let Some(matched) = retry_until_some(
            HYPR_LOOKUP_RETRY_COUNT,
            HYPR_LOOKUP_RETRY_DELAY,
            |_| find_hypr_window_match(&expected_title),
            std::thread::sleep,
        ) else {
            tracing::warn!(
                window = window_name,
                title = expected_title,
                "hypr window lookup failed for overlay request"
            );
            return;
        };

        let selector = format!("address:{}", matched.address);
        for args in overlay_dispatch_plan(&selector, geometry, matched.pinned) {
            let args: Vec<&str> = args.iter().map(String::as_str).collect();
            dispatch(&window_name, &args);
        }
    });
}

/// Moves the window titled `expected_title` to the top of the floating z-order.
pub(super) fn request_window_raise(window_name: &str, expected_title: &str) {
    if !in_hyprland() {
        return;
    }
    let window_name = window_name.to_string();
    let expected_title = expected_title.to_string();
    std::thread::spawn(move || {
        let Some(matched) = find_hypr_window_match(&expected_title) else {
            tracing::debug!(window = window_name, "raise skipped; window not mapped");
            return;
        };
        dispatch(&window_name, &["alterzorder", &raise_argument(&matched.address)]);
    });
}

fn raise_argument(address: &str) -> String {
    format!("top,address:{address}")
}

/// Global layout geometry of the window titled `expected_title`, polled until it is mapped.
pub(super) fn window_geometry(expected_title: &str) -> Option<ToolBounds> {
    if !in_hyprland() {
        return None;
    }
    retry_until_some(
        HYPR_LOOKUP_RETRY_COUNT,
        HYPR_LOOKUP_RETRY_DELAY,
        |_| find_hypr_window_match(expected_title).and_then(|matched| matched.geometry),
        std::thread::sleep,
    )
}
