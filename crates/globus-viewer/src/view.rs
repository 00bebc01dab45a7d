//! Orbit/zoom state of the globe and the fixed camera.

use glam::{Mat4, Vec3};

use globus_engine::scene::Camera;

/// Degrees of rotation per logical pixel of drag.
pub const DRAG_DEGREES_PER_PIXEL: f32 = 0.5;
/// Multiplicative zoom step.
pub const ZOOM_STEP: f32 = 1.1;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewState {
    pub rotation_x_deg: f32,
    pub rotation_y_deg: f32,
    pub zoom: f32,
}

impl Default for ViewState {
    fn default() -> Self {
        Self { rotation_x_deg: 0.0, rotation_y_deg: 0.0, zoom: 1.0 }
    }
}

impl ViewState {
    /// Applies a pointer drag: horizontal motion spins about Y, vertical about X.
    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.rotation_y_deg += dx * DRAG_DEGREES_PER_PIXEL;
        self.rotation_x_deg += dy * DRAG_DEGREES_PER_PIXEL;
    }

    pub fn zoom_in(&mut self) {
        self.zoom *= ZOOM_STEP;
    }

    pub fn zoom_out(&mut self) {
        self.zoom /= ZOOM_STEP;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// `scale(zoom) * rot_x * rot_y`.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale(Vec3::splat(self.zoom))
            * Mat4::from_rotation_x(self.rotation_x_deg.to_radians())
            * Mat4::from_rotation_y(self.rotation_y_deg.to_radians())
    }
}

/// Camera at `(0, 0, 5)` looking at the origin.
pub fn camera() -> Camera {
    Camera {
        eye: Vec3::new(0.0, 0.0, 5.0),
        target: Vec3::ZERO,
        up: Vec3::Y,
        fovy: 45.0,
        znear: 0.1,
        zfar: 100.0,
    }
}
