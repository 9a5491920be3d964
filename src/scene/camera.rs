use std::borrow::Cow;

use glam::{Mat4, Vec3};
use uuid::Uuid;

/// Smallest field of view the projection accepts, in radians.
const MIN_FOV: f32 = 1e-4;

/// Position, look-at target and up vector of a camera.
///
/// The three are always written together through [`Camera::set_pose`], so a
/// half-applied framing never reaches the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 100.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
        }
    }
}

impl CameraPose {
    /// Distance between position and target.
    #[inline]
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }
}

#[derive(Debug, Clone)]
pub struct Camera {
    pub uuid: Uuid,
    pub name: Cow<'static, str>,

    // === Projection ===
    /// Vertical field of view in radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,

    pose: CameraPose,

    // Cached matrices, read-only for the renderer
    pub(crate) view_matrix: Mat4,
    pub(crate) projection_matrix: Mat4,
    pub(crate) view_projection_matrix: Mat4,
}

impl Camera {
    /// `fov` is given in degrees.
    #[must_use]
    pub fn new_perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut cam = Self {
            uuid: Uuid::new_v4(),
            name: Cow::Owned("Camera".to_string()),
            fov: fov.to_radians(),
            aspect,
            near,
            far,
            pose: CameraPose::default(),
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            view_projection_matrix: Mat4::IDENTITY,
        };

        cam.update_view_matrix();
        cam.update_projection_matrix();
        cam
    }

    pub fn update_projection_matrix(&mut self) {
        let aspect = if self.aspect > 0.0 { self.aspect } else { 1.0 };
        let fov = self.fov.clamp(MIN_FOV, std::f32::consts::PI - MIN_FOV);
        self.projection_matrix = Mat4::perspective_rh(fov, aspect, self.near, self.far);
        self.view_projection_matrix = self.projection_matrix * self.view_matrix;
    }

    fn update_view_matrix(&mut self) {
        let CameraPose { position, target, up } = self.pose;
        let forward = target - position;
        if forward.length_squared() < f32::EPSILON * f32::EPSILON {
            // Degenerate look-at; keep the previous orientation.
            return;
        }

        let up = if forward.normalize().cross(up).length_squared() < 1e-8 {
            forward.normalize().any_orthonormal_vector()
        } else {
            up
        };

        self.view_matrix = Mat4::look_at_rh(position, target, up);
        self.view_projection_matrix = self.projection_matrix * self.view_matrix;
    }

    #[inline]
    #[must_use]
    pub fn pose(&self) -> &CameraPose {
        &self.pose
    }

    /// Replaces position, target and up in one step.
    pub fn set_pose(&mut self, pose: CameraPose) {
        self.pose = pose;
        self.update_view_matrix();
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.pose.position
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> Vec3 {
        self.pose.target
    }

    #[inline]
    #[must_use]
    pub fn up(&self) -> Vec3 {
        self.pose.up
    }

    #[inline]
    #[must_use]
    pub fn distance_to_target(&self) -> f32 {
        self.pose.distance()
    }

    #[must_use]
    pub fn fov_degrees(&self) -> f32 {
        self.fov.to_degrees()
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_projection_matrix();
    }

    #[inline]
    #[must_use]
    pub fn view_matrix(&self) -> &Mat4 {
        &self.view_matrix
    }

    #[inline]
    #[must_use]
    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    #[inline]
    #[must_use]
    pub fn view_projection_matrix(&self) -> &Mat4 {
        &self.view_projection_matrix
    }

    /// World point to normalized device coordinates.
    #[must_use]
    pub fn project(&self, world: Vec3) -> Vec3 {
        self.view_projection_matrix.project_point3(world)
    }

    /// Normalized device coordinates to a world point. `ndc.z` runs from 0 at
    /// the near plane to 1 at the far plane.
    #[must_use]
    pub fn unproject(&self, ndc: Vec3) -> Vec3 {
        self.view_projection_matrix.inverse().project_point3(ndc)
    }
}
