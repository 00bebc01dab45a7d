//! Scene (draw stream) types.
//!
//! Responsibilities:
//! - store renderer-agnostic 3D draw commands for one frame
//! - provide deterministic ordering (layer + insertion order)
//! - describe the per-frame camera and light (`SceneView`)

mod cmd;
mod key;
mod layer;
mod list;
mod view;

pub use cmd::{DecalCmd, DrawCmd, LinesCmd, Material, MeshCmd, MeshId, Shading, TextureId, TrianglesCmd};
pub use key::SortKey;
pub use layer::Layer;
pub use list::{DrawItem, DrawList};
pub use view::{Camera, PointLight, SceneView};
