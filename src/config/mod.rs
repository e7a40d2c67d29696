use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::editor::ToolStyle;
use crate::geometry::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfigPathError {
    MissingHomeDirectory,
}

const APP_DIR: &str = "glasspen";
const SETTINGS_FILE: &str = "settings.json";
const DEFAULT_SCREENSHOT_DIR: &str = "~/Desktop/Screenshots";

pub type SettingsResult<T> = std::result::Result<T, SettingsError>;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("missing HOME environment variable")]
    MissingHomeDirectory,
    #[error("failed to write settings: {path}")]
    WriteConfig { path: PathBuf, source: io::Error },
    #[error("failed to serialize settings")]
    Serialize(#[from] serde_json::Error),
}

/// Style preferences and overlay behavior persisted in `settings.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub line_width: u32,
    pub color: String,
    /// Empty string means shapes are not filled.
    pub fill_color: String,
    pub opacity: u8,
    pub screenshot_path: String,
    pub auto_hide_toolbar: bool,
    pub toolbar_hide_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            line_width: 3,
            color: "#FF0000".to_string(),
            fill_color: String::new(),
            opacity: 255,
            screenshot_path: DEFAULT_SCREENSHOT_DIR.to_string(),
            auto_hide_toolbar: false,
            toolbar_hide_delay_ms: 3000,
        }
    }
}

impl Settings {
    /// Builds the initial tool style; unparseable colors fall back to defaults.
    pub fn tool_style(&self) -> ToolStyle {
        let mut style = ToolStyle::default();
        match Color::from_hex(&self.color) {
            Some(color) => style.set_color(color),
            None => tracing::warn!(color = %self.color, "invalid color in settings; using default"),
        }
        if !self.fill_color.trim().is_empty() {
            match Color::from_hex(&self.fill_color) {
                Some(fill) => style.set_fill_color(Some(fill)),
                None => tracing::warn!(
                    fill_color = %self.fill_color,
                    "invalid fill color in settings; leaving shapes unfilled"
                ),
            }
        }
        style.set_line_width(self.line_width);
        style.set_opacity(self.opacity);
        style
    }

    /// Copies the persisted parts of `style` back into the record.
    pub fn remember_style(&mut self, style: &ToolStyle) {
        self.line_width = style.line_width;
        self.color = style.color.to_hex();
        self.fill_color = style.fill_color.map(Color::to_hex).unwrap_or_default();
        self.opacity = style.opacity;
    }

    pub fn screenshot_dir(&self) -> PathBuf {
        let (_, home) = config_env_dirs();
        expand_home(&self.screenshot_path, home.as_deref())
    }
}

fn expand_home(path: &str, home: Option<&Path>) -> PathBuf {
    match (path.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => home.join(rest),
        _ if path == "~" => home.map_or_else(|| PathBuf::from(path), Path::to_path_buf),
        _ => PathBuf::from(path),
    }
}

/// Loads settings, falling back to defaults on any missing or unreadable file.
pub fn load_settings() -> Settings {
    let (xdg_config_home, home) = config_env_dirs();
    load_settings_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_settings_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> Settings {
    let path = match app_config_path(APP_DIR, SETTINGS_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(_) => return Settings::default(),
    };
    if !path.exists() {
        return Settings::default();
    }
    match fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, ?path, "failed to parse settings.json; using defaults");
            Settings::default()
        }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read settings.json; using defaults");
            Settings::default()
        }
    }
}

pub fn save_settings(settings: &Settings) -> SettingsResult<PathBuf> {
    let (xdg_config_home, home) = config_env_dirs();
    save_settings_with(settings, xdg_config_home.as_deref(), home.as_deref())
}

fn save_settings_with(
    settings: &Settings,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> SettingsResult<PathBuf> {
    let path = app_config_path(APP_DIR, SETTINGS_FILE, xdg_config_home, home).map_err(
        |error| match error {
            ConfigPathError::MissingHomeDirectory => SettingsError::MissingHomeDirectory,
        },
    )?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| SettingsError::WriteConfig {
            path: path.clone(),
            source,
        })?;
    }
    let serialized = serde_json::to_string_pretty(settings)?;
    fs::write(&path, serialized).map_err(|source| SettingsError::WriteConfig {
        path: path.clone(),
        source,
    })?;
    tracing::debug!(?path, "settings saved");
    Ok(path)
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub(crate) fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}
