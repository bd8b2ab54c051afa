use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::history;
use crate::interaction::HitThresholds;
use crate::model::{Rgba, ShapeStyle};
use crate::units::Unit;
use crate::view::ZoomLimits;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("could not access settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid TOML settings: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("could not write TOML settings: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("invalid JSON settings: {0}")]
    Json(#[from] serde_json::Error),
}

/// User-tunable defaults. Every field falls back to its default when missing
/// from the file. Pixel thresholds are in screen pixels unless noted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub default_color: String,
    pub default_opacity: f32,
    pub default_stroke_width: f32,
    pub default_unit: Unit,
    pub vertex_selection_threshold: f64,
    pub line_selection_threshold: f64,
    pub polygon_close_threshold: f64,
    /// Canvas pixels.
    pub drag_detection_threshold: f64,
    pub rotation_handle_distance: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_factor: f64,
    pub max_history: usize,
    pub show_side_lengths: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_color: "#ff0000".to_string(),
            default_opacity: 0.3,
            default_stroke_width: 2.0,
            default_unit: Unit::Feet,
            vertex_selection_threshold: 8.0,
            line_selection_threshold: 5.0,
            polygon_close_threshold: 12.0,
            drag_detection_threshold: 5.0,
            rotation_handle_distance: 30.0,
            min_zoom: 0.1,
            max_zoom: 5.0,
            zoom_factor: 0.1,
            max_history: history::DEFAULT_LIMIT,
            show_side_lengths: false,
        }
    }
}

impl Settings {
    pub fn zoom_limits(&self) -> ZoomLimits {
        let defaults = ZoomLimits::default();
        let min = if self.min_zoom > 0.0 { self.min_zoom } else { defaults.min };
        ZoomLimits {
            min,
            max: self.max_zoom.max(min),
            factor: self.zoom_factor.clamp(0.0, 0.9),
        }
    }

    pub fn thresholds(&self) -> HitThresholds {
        HitThresholds {
            vertex: self.vertex_selection_threshold,
            line: self.line_selection_threshold,
            polygon_close: self.polygon_close_threshold,
            drag_detection: self.drag_detection_threshold,
            rotation_handle_distance: self.rotation_handle_distance,
        }
    }

    /// Style for new shapes. An unparseable color falls back to red.
    pub fn style(&self) -> ShapeStyle {
        let fallback = ShapeStyle::default();
        ShapeStyle {
            color: Rgba::from_hex(&self.default_color).unwrap_or(fallback.color),
            opacity: self.default_opacity.clamp(0.0, 1.0),
            stroke_width: if self.default_stroke_width > 0.0 {
                self.default_stroke_width
            } else {
                fallback.stroke_width
            },
        }
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "toml")
}

/// Reads settings, trying the format named by the extension first and the
/// other one second.
pub fn read_settings(path: impl AsRef<Path>) -> Result<Settings, SettingsError> {
    let path = path.as_ref();
    let s = std::fs::read_to_string(path)?;
    if is_toml(path) {
        match toml::from_str::<Settings>(&s) {
            Ok(settings) => Ok(settings),
            Err(err) => serde_json::from_str::<Settings>(&s).map_err(|_| err.into()),
        }
    } else {
        match serde_json::from_str::<Settings>(&s) {
            Ok(settings) => Ok(settings),
            Err(err) => toml::from_str::<Settings>(&s).map_err(|_| err.into()),
        }
    }
}

pub fn load_settings(path: impl AsRef<Path>) -> Option<Settings> {
    let path = path.as_ref();
    match read_settings(path) {
        Ok(settings) => {
            log::info!("loaded settings from {}", path.display());
            Some(settings)
        }
        Err(SettingsError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => None,
        Err(err) => {
            log::warn!("ignoring {}: {err}", path.display());
            None
        }
    }
}

pub fn save_settings(path: impl AsRef<Path>, settings: &Settings) -> Result<(), SettingsError> {
    let path = path.as_ref();
    let text = if is_toml(path) {
        toml::to_string_pretty(settings)?
    } else {
        serde_json::to_string_pretty(settings)?
    };
    std::fs::write(path, text)?;
    Ok(())
}

/// `~/.config/takeoff.toml` if it exists, else `./settings.toml` if it exists.
pub fn config_path() -> Option<PathBuf> {
    if let Some(home) = std::env::var_os("HOME") {
        let path = PathBuf::from(home).join(".config").join("takeoff.toml");
        if path.exists() {
            return Some(path);
        }
    }
    let local = PathBuf::from("settings.toml");
    if local.exists() {
        return Some(local);
    }
    None
}

/// Settings from the config path, then `settings.json`, then defaults.
pub fn load_or_default() -> Settings {
    config_path()
        .and_then(load_settings)
        .or_else(|| load_settings("settings.json"))
        .unwrap_or_default()
}
