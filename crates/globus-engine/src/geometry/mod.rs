//! CPU-side geometry.
//!
//! Vertex layouts shared with the shaders, plus generators for the handful of
//! shapes the viewer needs (UV sphere, floor quad, grid, radial fan).

mod primitives;
mod sphere;
mod vertex;

pub use primitives::{disc_fan, grid_lines, quad_xz};
pub use sphere::sphere;
pub use vertex::{ColorVertex, MeshData, MeshVertex};
