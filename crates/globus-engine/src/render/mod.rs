//! GPU rendering subsystem.
//!
//! Renderers consume `scene` draw streams and issue GPU commands via wgpu.
//! Each renderer is responsible for its own GPU resources (pipelines, buffers,
//! textures).
//!
//! Convention:
//! - CPU geometry is in world units, right-handed, +Y up.
//! - Vertex shaders transform with `view_proj * model` from uniforms.
//! - Colours are linear straight-alpha; the surface is sRGB when available.

mod common;
mod ctx;
mod scene_renderer;
mod texture;

pub use ctx::{RenderCtx, RenderTarget};
pub use scene_renderer::SceneRenderer;
