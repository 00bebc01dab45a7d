use glam::{Mat4, Vec3};

use crate::paint::Color;

/// Perspective camera defined by eye position, target, and projection
/// parameters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Combined view-projection matrix for the given aspect ratio.
    ///
    /// `perspective_rh` already produces the `[0, 1]` depth range wgpu uses.
    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye, self.target, self.up);
        let proj = Mat4::perspective_rh(
            self.fovy.to_radians(),
            aspect.max(1e-3),
            self.znear,
            self.zfar,
        );
        proj * view
    }
}

/// Single point light in world space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
}

/// Per-frame camera, light and background.
///
/// `clear` is the colour the frame starts from; pass it to `FrameCtx::render`.
///
/// `light = None` renders every `Shading::Lit` mesh unlit.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SceneView {
    pub camera: Camera,
    pub light: Option<PointLight>,
    pub clear: Color,
}

#[cfg(test)]
mod tests {
    use glam::Vec4;

    use super::*;

    fn camera() -> Camera {
        Camera {
            eye: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fovy: 45.0,
            znear: 0.1,
            zfar: 100.0,
        }
    }

    #[test]
    fn target_projects_to_screen_centre() {
        let clip = camera().view_proj(4.0 / 3.0) * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn points_above_target_project_upwards() {
        let clip = camera().view_proj(1.0) * Vec4::new(0.0, 1.0, 0.0, 1.0);
        assert!(clip.y / clip.w > 0.0);
    }
}
