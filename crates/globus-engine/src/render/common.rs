//! Shared GPU types and utilities used by the scene renderer.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::scene::{Material, SceneView, Shading};

// ── blend ─────────────────────────────────────────────────────────────────

/// Straight-alpha "over" blending.
pub(super) fn alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

// ── depth ─────────────────────────────────────────────────────────────────

pub(super) fn depth_state(write: bool, compare: wgpu::CompareFunction) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: crate::device::DEPTH_FORMAT,
        depth_write_enabled: write,
        depth_compare: compare,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

// ── frame uniform ─────────────────────────────────────────────────────────

/// Group 0: camera and light, written once per frame.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct FrameUniform {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    /// `w = 1` when the light is on.
    pub light_pos: [f32; 4],
    pub light_ambient: [f32; 4],
    pub light_diffuse: [f32; 4],
    pub light_specular: [f32; 4],
}

impl FrameUniform {
    pub(super) fn new(view: &SceneView, aspect: f32) -> Self {
        let cam = view.camera;
        let mut u = Self {
            view_proj: cam.view_proj(aspect).to_cols_array_2d(),
            camera_pos: cam.eye.extend(1.0).to_array(),
            light_pos: [0.0; 4],
            light_ambient: [0.0; 4],
            light_diffuse: [0.0; 4],
            light_specular: [0.0; 4],
        };

        if let Some(light) = view.light {
            u.light_pos = light.position.extend(1.0).to_array();
            u.light_ambient = light.ambient.to_array();
            u.light_diffuse = light.diffuse.to_array();
            u.light_specular = light.specular.to_array();
        }
        u
    }
}

// ── draw uniform ──────────────────────────────────────────────────────────

/// Group 1: per-draw transform and material, bound with a dynamic offset.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct DrawUniform {
    pub model: [[f32; 4]; 4],
    /// Inverse-transpose of `model`, for normals under non-uniform scale.
    pub normal: [[f32; 4]; 4],
    pub tint: [f32; 4],
    /// ambient, diffuse, specular, shininess
    pub material: [f32; 4],
    /// x: lit (0/1)
    pub flags: [f32; 4],
}

impl DrawUniform {
    pub(super) fn new(model: Mat4, tint: [f32; 4], shading: Shading) -> Self {
        let (material, lit) = match shading {
            Shading::Unlit => (Material::default(), 0.0),
            Shading::Lit(m) => (m, 1.0),
        };

        // A singular model (zero scale) has no meaningful normals.
        let normal = if model.determinant().abs() > f32::EPSILON {
            model.inverse().transpose()
        } else {
            Mat4::IDENTITY
        };

        Self {
            model: model.to_cols_array_2d(),
            normal: normal.to_cols_array_2d(),
            tint,
            material: [material.ambient, material.diffuse, material.specular, material.shininess],
            flags: [lit, 0.0, 0.0, 0.0],
        }
    }

    pub(super) fn flat(model: Mat4) -> Self {
        Self::new(model, [1.0; 4], Shading::Unlit)
    }
}

/// Rounds `size` up to the device's dynamic-offset alignment.
pub(super) fn aligned_stride(size: u64, alignment: u64) -> u64 {
    let alignment = alignment.max(1);
    size.div_ceil(alignment) * alignment
}

/// Non-zero binding size for a uniform struct.
pub(super) fn uniform_binding_size<T>() -> Option<std::num::NonZeroU64> {
    std::num::NonZeroU64::new(std::mem::size_of::<T>() as u64)
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn uniform_sizes_respect_std140_alignment() {
        assert_eq!(std::mem::size_of::<FrameUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<DrawUniform>() % 16, 0);
    }

    #[test]
    fn stride_rounds_up_to_alignment() {
        assert_eq!(aligned_stride(176, 256), 256);
        assert_eq!(aligned_stride(256, 256), 256);
        assert_eq!(aligned_stride(257, 256), 512);
        assert_eq!(aligned_stride(10, 0), 10);
    }

    #[test]
    fn lit_flag_follows_shading() {
        let lit = DrawUniform::new(Mat4::IDENTITY, [1.0; 4], Shading::Lit(Material::default()));
        let unlit = DrawUniform::flat(Mat4::IDENTITY);
        assert_eq!(lit.flags[0], 1.0);
        assert_eq!(unlit.flags[0], 0.0);
    }

    #[test]
    fn degenerate_model_keeps_identity_normal_matrix() {
        let u = DrawUniform::flat(Mat4::from_scale(Vec3::ZERO));
        assert_eq!(u.normal, Mat4::IDENTITY.to_cols_array_2d());
    }
}
