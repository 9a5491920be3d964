//! Camera Framing
//!
//! Pose changes issued by commands rather than by the pointer: panning onto a
//! point, zooming a subtree to fill the view, and the preset axis views.
//!
//! Every operation writes a complete [`CameraPose`] in one step and refreshes
//! the projection, so the camera is consistent before the next frame.

use std::str::FromStr;

use glam::Vec3;

use crate::errors::ViewerError;
use crate::geom::{self, BoundingBox};
use crate::scene::{Camera, CameraPose, NodeHandle, Scene};

/// Below this, `sin(fov / 2)` is treated as a zero field of view.
const MIN_HALF_FOV_SIN: f32 = 1e-6;

/// Below this, camera and target are considered coincident.
const COINCIDENT_DISTANCE: f32 = 1e-6;

// ============================================================================
// Preset views
// ============================================================================

/// The six axis-aligned views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresetView {
    Top,
    Bottom,
    Front,
    Back,
    Left,
    Right,
}

impl PresetView {
    pub const ALL: [PresetView; 6] = [
        Self::Top,
        Self::Bottom,
        Self::Front,
        Self::Back,
        Self::Left,
        Self::Right,
    ];

    /// Case-insensitive lookup. Also accepts `Z+` for top and `Z-` for bottom.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "TOP" | "Z+" => Some(Self::Top),
            "BOTTOM" | "Z-" => Some(Self::Bottom),
            "FRONT" => Some(Self::Front),
            "BACK" => Some(Self::Back),
            "LEFT" => Some(Self::Left),
            "RIGHT" => Some(Self::Right),
            _ => None,
        }
    }

    /// Direction from the target towards the camera, and the up vector.
    #[must_use]
    pub fn direction_and_up(self) -> (Vec3, Vec3) {
        match self {
            Self::Top => (Vec3::Z, Vec3::Y),
            Self::Bottom => (Vec3::NEG_Z, Vec3::Y),
            Self::Front => (Vec3::NEG_Y, Vec3::Z),
            Self::Back => (Vec3::Y, Vec3::Z),
            Self::Left => (Vec3::X, Vec3::Z),
            Self::Right => (Vec3::NEG_X, Vec3::Z),
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Top => "TOP",
            Self::Bottom => "BOTTOM",
            Self::Front => "FRONT",
            Self::Back => "BACK",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
        }
    }
}

impl FromStr for PresetView {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ViewerError::UnknownPresetView(s.to_string()))
    }
}

// ============================================================================
// Controller
// ============================================================================

#[derive(Debug, Clone)]
pub struct CameraFramingController {
    /// Lower clamp for any computed camera distance.
    pub min_distance: f32,
    /// Preset distance used when the camera sits on its target.
    pub default_view_distance: f32,
}

impl Default for CameraFramingController {
    fn default() -> Self {
        Self {
            min_distance: 1e-3,
            default_view_distance: 100.0,
        }
    }
}

impl CameraFramingController {
    #[must_use]
    pub fn new(min_distance: f32, default_view_distance: f32) -> Self {
        Self {
            min_distance,
            default_view_distance,
        }
    }

    /// Pans the camera so it looks at `target`, keeping the camera-to-target
    /// offset (and with it direction and distance) unchanged.
    pub fn point_camera_to(&self, camera: &mut Camera, target: Vec3) {
        let pose = *camera.pose();
        let offset = pose.position - pose.target;
        camera.set_pose(CameraPose {
            position: target + offset,
            target,
            up: pose.up,
        });
        camera.update_projection_matrix();
    }

    /// Distance at which a sphere of `radius` exactly fills the vertical
    /// field of view.
    #[must_use]
    pub fn fit_distance(&self, radius: f32, fov: f32) -> f32 {
        let half_sin = (fov * 0.5).sin();
        if half_sin.is_nan() || half_sin <= MIN_HALF_FOV_SIN {
            return self.min_distance;
        }
        let d = radius / half_sin;
        if d.is_finite() && d > self.min_distance {
            d
        } else {
            self.min_distance
        }
    }

    /// Frames `bbox`. Returns `false` without touching the camera when the
    /// box is empty.
    pub fn zoom_to_box(&self, camera: &mut Camera, bbox: &BoundingBox) -> bool {
        if bbox.is_empty() {
            log::debug!("Zoom to an empty box ignored");
            return false;
        }

        let center = bbox.center();
        self.point_camera_to(camera, center);

        let distance = self.fit_distance(bbox.bounding_radius(), camera.fov);
        let pose = *camera.pose();
        let direction = (pose.position - pose.target).try_normalize().unwrap_or(Vec3::Z);

        camera.set_pose(CameraPose {
            position: pose.target + direction * distance,
            ..pose
        });
        camera.update_projection_matrix();
        true
    }

    /// Frames the subtree of `node` so its bounding sphere fills the
    /// vertical field of view. No-op for empty geometry.
    pub fn zoom_to_fit(&self, camera: &mut Camera, scene: &Scene, node: NodeHandle) -> bool {
        self.zoom_to_box(camera, &geom::bounding_box(scene, node))
    }

    /// Moves the camera onto the `direction` axis through the current target,
    /// keeping its distance. Returns `false` for a zero direction.
    pub fn to_preset_view(&self, camera: &mut Camera, direction: Vec3, up: Vec3) -> bool {
        let Some(direction) = direction.try_normalize() else {
            log::warn!("Preset view with a zero direction ignored");
            return false;
        };

        let pose = *camera.pose();
        let mut distance = pose.distance();
        if distance < COINCIDENT_DISTANCE || !distance.is_finite() {
            distance = self.default_view_distance.max(self.min_distance);
        }

        camera.set_pose(CameraPose {
            position: pose.target + direction * distance,
            target: pose.target,
            up,
        });
        camera.update_projection_matrix();
        true
    }

    /// Applies a named preset. Unknown names leave the camera unchanged and
    /// return `false`.
    pub fn apply_preset(&self, camera: &mut Camera, name: &str) -> bool {
        match PresetView::parse(name) {
            Some(view) => {
                let (direction, up) = view.direction_and_up();
                log::debug!("Preset view {}", view.name());
                self.to_preset_view(camera, direction, up)
            }
            None => {
                log::warn!("Unknown preset view '{name}' ignored");
                false
            }
        }
    }
}
