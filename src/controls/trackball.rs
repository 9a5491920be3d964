use glam::{Quat, Vec2, Vec3};

use crate::controls::input::{Input, MouseButton};
use crate::scene::{Camera, CameraPose};
use crate::settings::ControlSettings;

/// Trackball camera controls.
///
/// Works directly on the camera pose, so framing commands and the controls
/// never disagree about the target. Primary button rotates around the
/// target, the wheel zooms, middle or secondary button pans.
pub struct TrackballControls {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub static_moving: bool,
    pub dynamic_damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Disabled while a drag owns the pointer.
    pub enabled: bool,

    rotate_delta: Vec2,
    pan_delta: Vec2,
}

/// Pending motion below this is dropped.
const REST_EPSILON: f32 = 1e-5;

impl TrackballControls {
    #[must_use]
    pub fn new(settings: &ControlSettings) -> Self {
        Self {
            rotate_speed: settings.rotate_speed,
            zoom_speed: settings.zoom_speed,
            pan_speed: settings.pan_speed,
            static_moving: settings.static_moving,
            dynamic_damping_factor: settings.dynamic_damping_factor,
            min_distance: settings.min_distance,
            max_distance: settings.max_distance,
            enabled: true,
            rotate_delta: Vec2::ZERO,
            pan_delta: Vec2::ZERO,
        }
    }

    /// Drops any pending inertia.
    pub fn stop(&mut self) {
        self.rotate_delta = Vec2::ZERO;
        self.pan_delta = Vec2::ZERO;
    }

    /// Advances the controls by one frame. Returns `true` when the camera
    /// moved, which is the change event that schedules a redraw.
    pub fn update(&mut self, camera: &mut Camera, input: &Input, dt: f32) -> bool {
        if !self.enabled {
            self.stop();
            return false;
        }

        let screen_height = input.screen_size.y.max(1.0);

        if input.is_button_pressed(MouseButton::Primary) {
            self.rotate_delta += input.cursor_delta / screen_height;
        }
        if input.is_button_pressed(MouseButton::Middle) || input.is_button_pressed(MouseButton::Secondary) {
            self.pan_delta += input.cursor_delta / screen_height;
        }

        let (rotate, pan) = if self.static_moving {
            let step = (self.rotate_delta, self.pan_delta);
            self.stop();
            step
        } else {
            let retention = (1.0 - self.dynamic_damping_factor.clamp(0.0, 1.0)).powf(dt * 60.0);
            let step = (self.rotate_delta * (1.0 - retention), self.pan_delta * (1.0 - retention));
            self.rotate_delta *= retention;
            self.pan_delta *= retention;
            if self.rotate_delta.length_squared() < REST_EPSILON * REST_EPSILON {
                self.rotate_delta = Vec2::ZERO;
            }
            if self.pan_delta.length_squared() < REST_EPSILON * REST_EPSILON {
                self.pan_delta = Vec2::ZERO;
            }
            step
        };

        let mut pose = *camera.pose();
        let mut changed = false;

        if rotate != Vec2::ZERO {
            changed |= Self::rotate(&mut pose, rotate * std::f32::consts::PI * self.rotate_speed);
        }

        if input.scroll_delta.y != 0.0 {
            changed |= self.zoom(&mut pose, input.scroll_delta.y);
        }

        if pan != Vec2::ZERO {
            changed |= self.pan(&mut pose, pan, camera.fov);
        }

        if changed {
            camera.set_pose(pose);
        }
        changed
    }

    fn rotate(pose: &mut CameraPose, delta: Vec2) -> bool {
        let eye = pose.position - pose.target;
        let angle = delta.length();
        let (Some(eye_dir), Some(up_dir)) = (eye.try_normalize(), pose.up.try_normalize()) else {
            return false;
        };
        let Some(side_dir) = up_dir.cross(eye_dir).try_normalize() else {
            return false;
        };

        // Screen Y grows downwards.
        let move_dir = up_dir * -delta.y + side_dir * delta.x;
        let Some(axis) = move_dir.cross(eye).try_normalize() else {
            return false;
        };

        let q = Quat::from_axis_angle(axis, angle);
        pose.position = pose.target + q * eye;
        pose.up = q * pose.up;
        true
    }

    fn zoom(&self, pose: &mut CameraPose, amount: f32) -> bool {
        let eye = pose.position - pose.target;
        let distance = eye.length();
        let Some(eye_dir) = eye.try_normalize() else {
            return false;
        };

        let factor = 0.95f32.powf(amount * self.zoom_speed);
        let new_distance = (distance * factor).clamp(self.min_distance, self.max_distance);
        if (new_distance - distance).abs() < f32::EPSILON {
            return false;
        }
        pose.position = pose.target + eye_dir * new_distance;
        true
    }

    fn pan(&self, pose: &mut CameraPose, delta: Vec2, fov: f32) -> bool {
        let eye = pose.position - pose.target;
        let (Some(eye_dir), Some(up_dir)) = (eye.try_normalize(), pose.up.try_normalize()) else {
            return false;
        };
        let Some(side_dir) = up_dir.cross(eye_dir).try_normalize() else {
            return false;
        };
        let screen_up = eye_dir.cross(side_dir);

        // World height of the view at the target distance.
        let view_height = 2.0 * eye.length() * (fov * 0.5).tan();
        let offset: Vec3 = (side_dir * -delta.x + screen_up * delta.y) * view_height * self.pan_speed;

        pose.position += offset;
        pose.target += offset;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pressed(button: MouseButton, delta: Vec2) -> Input {
        let mut input = Input::new();
        input.handle_resize(800, 600);
        input.mouse_buttons.insert(button);
        input.cursor_delta = delta;
        input
    }

    #[test]
    fn rotate_keeps_distance() {
        let mut camera = Camera::new_perspective(35.0, 1.0, 1.0, 1000.0);
        let mut controls = TrackballControls::new(&ControlSettings::default());
        let before = camera.distance_to_target();

        let input = pressed(MouseButton::Primary, Vec2::new(40.0, 25.0));
        assert!(controls.update(&mut camera, &input, 1.0 / 60.0));
        assert!((camera.distance_to_target() - before).abs() < 1e-3);
    }

    #[test]
    fn pan_moves_target_and_position_together() {
        let mut camera = Camera::new_perspective(35.0, 1.0, 1.0, 1000.0);
        let mut controls = TrackballControls::new(&ControlSettings::default());
        let offset = camera.position() - camera.target();

        let input = pressed(MouseButton::Secondary, Vec2::new(30.0, 0.0));
        assert!(controls.update(&mut camera, &input, 1.0 / 60.0));
        assert!(camera.target().length() > 1e-3);
        assert!((camera.position() - camera.target() - offset).length() < 1e-3);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut camera = Camera::new_perspective(35.0, 1.0, 1.0, 1000.0);
        let mut controls = TrackballControls::new(&ControlSettings::default());

        let mut input = Input::new();
        input.scroll_delta.y = 10_000.0;
        controls.update(&mut camera, &input, 1.0 / 60.0);
        assert!((camera.distance_to_target() - controls.min_distance).abs() < 1e-3);
    }

    #[test]
    fn disabled_controls_ignore_input() {
        let mut camera = Camera::new_perspective(35.0, 1.0, 1.0, 1000.0);
        let mut controls = TrackballControls::new(&ControlSettings::default());
        controls.enabled = false;

        let input = pressed(MouseButton::Primary, Vec2::new(40.0, 25.0));
        assert!(!controls.update(&mut camera, &input, 1.0 / 60.0));
    }
}
