use glam::Mat4;

use crate::geometry::ColorVertex;
use crate::paint::Color;

/// Handle to a mesh uploaded to the scene renderer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct MeshId(pub u32);

/// Handle to a texture uploaded to the scene renderer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextureId(pub u32);

/// Surface response to the scene's point light.
///
/// Components are grey levels multiplied with the matching light colour, in
/// the spirit of classic fixed-function materials.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Material {
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self { ambient: 0.2, diffuse: 0.8, specular: 0.0, shininess: 0.0 }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Shading {
    /// Texture × tint, no light contribution.
    Unlit,
    /// Texture × point-light response (falls back to unlit when the scene light is off).
    Lit(Material),
}

/// Textured mesh draw. Opaque; writes depth.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshCmd {
    pub mesh: MeshId,
    pub texture: TextureId,
    pub model: Mat4,
    pub tint: Color,
    pub shading: Shading,
}

/// Textured unit quad (`[-1, 1]` in XZ) transformed by `model`, alpha-blended
/// and depth-tested without writing depth.
#[derive(Debug, Clone, PartialEq)]
pub struct DecalCmd {
    pub texture: TextureId,
    pub model: Mat4,
    pub tint: Color,
}

/// Per-vertex coloured triangle list.
///
/// Writes depth only when every vertex is opaque.
#[derive(Debug, Clone, PartialEq)]
pub struct TrianglesCmd {
    pub vertices: Vec<ColorVertex>,
    pub model: Mat4,
}

impl TrianglesCmd {
    pub fn is_opaque(&self) -> bool {
        self.vertices.iter().all(|v| v.color[3] >= 1.0)
    }
}

/// Per-vertex coloured line list.
#[derive(Debug, Clone, PartialEq)]
pub struct LinesCmd {
    pub vertices: Vec<ColorVertex>,
    pub model: Mat4,
}

/// Renderer-agnostic draw command stream.
///
/// Extending the scene:
/// - add a variant here with its payload struct
/// - add a push helper on `DrawList`
/// - teach `render::SceneRenderer` to encode it
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Mesh(MeshCmd),
    Decal(DecalCmd),
    Triangles(TrianglesCmd),
    Lines(LinesCmd),
}
