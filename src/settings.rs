//! Viewer Settings
//!
//! Construction-time configuration for [`Viewer`](crate::viewer::Viewer).
//! Every field has a default matching the stock viewer, so a settings file only
//! needs to name the values it overrides.
//!
//! # Example
//!
//! ```rust,ignore
//! use solidview::settings::ViewerSettings;
//!
//! let settings = ViewerSettings {
//!     fov: 45.0,
//!     ..Default::default()
//! };
//!
//! let from_file = ViewerSettings::from_json(r#"{ "grid_step": 5.0 }"#)?;
//! ```

use serde::Deserialize;

use crate::errors::{Result, ViewerError};

// ---------------------------------------------------------------------------
// ControlSettings
// ---------------------------------------------------------------------------

/// Tuning for the interactive camera controls.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControlSettings {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    /// When `true`, motion stops as soon as the pointer stops (no inertia).
    pub static_moving: bool,
    /// Fraction of the remaining motion removed per frame when `static_moving` is off.
    pub dynamic_damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for ControlSettings {
    fn default() -> Self {
        let radius = 1.0;
        Self {
            rotate_speed: 1.0,
            zoom_speed: 1.2,
            pan_speed: 0.8,
            static_moving: true,
            dynamic_damping_factor: 0.3,
            min_distance: radius * 1.1,
            max_distance: radius * 10000.0,
        }
    }
}

// ---------------------------------------------------------------------------
// ViewerSettings
// ---------------------------------------------------------------------------

/// Global configuration consumed once by [`Viewer::new`](crate::viewer::Viewer::new).
///
/// | Field                      | Description                                   | Default  |
/// |----------------------------|-----------------------------------------------|----------|
/// | `fov`                      | Vertical field of view, degrees               | `35`     |
/// | `near` / `far`             | Clip planes                                   | `1` / `100000` |
/// | `initial_distance`         | Camera distance on +Z at start-up             | `100`    |
/// | `default_view_distance`    | Preset-view distance when the camera sits on its target | `100` |
/// | `min_view_distance`        | Lower clamp for any computed camera distance  | `1e-3`   |
/// | `grid_size` / `grid_step`  | Half extent and spacing of the ground grid    | `200` / `10` |
/// | `line_pick_threshold`      | Ray-to-edge distance that still counts as a hit | `1.0`  |
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    // === Camera ===
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub initial_distance: f32,
    pub default_view_distance: f32,
    pub min_view_distance: f32,

    // === Helpers ===
    pub grid_size: f32,
    pub grid_step: f32,
    /// Colour of the two centre lines of the grid (0xRRGGBB).
    pub grid_center_color: u32,
    pub grid_color: u32,
    pub axis_length: f32,
    pub selection_color: u32,
    pub show_grid: bool,

    // === Picking ===
    pub line_pick_threshold: f32,

    // === Background ===
    /// Image requested for the full-screen background layer, if any.
    pub background_url: Option<String>,

    pub controls: ControlSettings,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            fov: 35.0,
            near: 1.0,
            far: 100_000.0,
            initial_distance: 100.0,
            default_view_distance: 100.0,
            min_view_distance: 1e-3,

            grid_size: 200.0,
            grid_step: 10.0,
            grid_center_color: 0x0044_4444,
            grid_color: 0x0088_8888,
            axis_length: 100.0,
            selection_color: 0x00ff_ff00,
            show_grid: true,

            line_pick_threshold: 1.0,

            background_url: Some("/images/backgrounds/Graduated_Blue_Background.png".to_string()),

            controls: ControlSettings::default(),
        }
    }
}

impl ViewerSettings {
    /// Parses settings from JSON; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(ViewerError::Settings)
    }
}
