use glam::Mat4;

use crate::geometry::ColorVertex;
use crate::paint::Color;

use super::{
    DecalCmd, DrawCmd, Layer, LinesCmd, MeshCmd, MeshId, Shading, SortKey, TextureId, TrianglesCmd,
};

/// A single draw item: sort key + command.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub key: SortKey,
    pub cmd: DrawCmd,
}

/// Recorded draw stream for a frame.
///
/// Performance characteristics:
/// - `push()` is O(1)
/// - paint-order iteration reuses an internal index buffer; no per-frame allocation once warmed
#[derive(Debug, Default)]
pub struct DrawList {
    items: Vec<DrawItem>,
    next_order: u32,

    sorted_indices: Vec<usize>,
    sorted_dirty: bool,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears recorded items. Keeps allocated capacity for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
        self.next_order = 0;
        self.sorted_dirty = true;
        self.sorted_indices.clear();
    }

    /// Returns items in insertion order.
    #[inline]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Pushes a draw command on the given layer.
    #[inline]
    pub fn push(&mut self, layer: Layer, cmd: DrawCmd) {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);

        self.items.push(DrawItem {
            key: SortKey::new(layer, order),
            cmd,
        });

        self.sorted_dirty = true;
    }

    /// Records a textured mesh.
    pub fn push_mesh(
        &mut self,
        layer: Layer,
        mesh: MeshId,
        texture: TextureId,
        model: Mat4,
        shading: Shading,
    ) {
        self.push(
            layer,
            DrawCmd::Mesh(MeshCmd { mesh, texture, model, tint: Color::WHITE, shading }),
        );
    }

    /// Records a floor decal.
    pub fn push_decal(&mut self, layer: Layer, texture: TextureId, model: Mat4, tint: Color) {
        self.push(layer, DrawCmd::Decal(DecalCmd { texture, model, tint }));
    }

    /// Records coloured triangles. Empty input is ignored.
    pub fn push_triangles(&mut self, layer: Layer, vertices: Vec<ColorVertex>, model: Mat4) {
        if vertices.len() < 3 {
            return;
        }
        self.push(layer, DrawCmd::Triangles(TrianglesCmd { vertices, model }));
    }

    /// Records coloured line segments. Empty input is ignored.
    pub fn push_lines(&mut self, layer: Layer, vertices: Vec<ColorVertex>, model: Mat4) {
        if vertices.len() < 2 {
            return;
        }
        self.push(layer, DrawCmd::Lines(LinesCmd { vertices, model }));
    }

    /// Returns indices into `items` in paint order.
    ///
    /// This buffer is owned by `DrawList` and reused across frames.
    pub fn indices_in_paint_order(&mut self) -> &[usize] {
        if self.sorted_dirty {
            self.rebuild_sorted_indices();
        }
        &self.sorted_indices
    }

    /// Iterates items in paint order without cloning draw commands.
    pub fn iter_in_paint_order(&mut self) -> impl Iterator<Item = &DrawItem> {
        if self.sorted_dirty {
            self.rebuild_sorted_indices();
        }

        self.sorted_indices.iter().map(|&i| &self.items[i])
    }

    fn rebuild_sorted_indices(&mut self) {
        self.sorted_indices.clear();
        self.sorted_indices.extend(0..self.items.len());

        // Stable ordering is ensured by SortKey including insertion order.
        self.sorted_indices
            .sort_by(|&a, &b| self.items[a].key.cmp(&self.items[b].key));

        self.sorted_dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri() -> Vec<ColorVertex> {
        vec![ColorVertex::new([0.0; 3], [1.0; 4]); 3]
    }

    #[test]
    fn paint_order_sorts_by_layer_then_insertion() {
        let mut list = DrawList::new();
        list.push_triangles(Layer::TRANSLUCENT, tri(), Mat4::IDENTITY);
        list.push_triangles(Layer::GROUND, tri(), Mat4::IDENTITY);
        list.push_decal(Layer::GROUND_OVERLAY, TextureId(0), Mat4::IDENTITY, Color::BLACK);
        list.push_triangles(Layer::GROUND, tri(), Mat4::from_scale(glam::Vec3::splat(2.0)));

        let order: Vec<usize> = list.indices_in_paint_order().to_vec();
        assert_eq!(order, vec![1, 3, 2, 0]);
    }

    #[test]
    fn degenerate_geometry_is_dropped() {
        let mut list = DrawList::new();
        list.push_triangles(Layer::GROUND, Vec::new(), Mat4::IDENTITY);
        list.push_lines(Layer::GROUND, vec![ColorVertex::new([0.0; 3], [1.0; 4])], Mat4::IDENTITY);
        assert!(list.is_empty());
    }

    #[test]
    fn clear_resets_order() {
        let mut list = DrawList::new();
        list.push_triangles(Layer::GROUND, tri(), Mat4::IDENTITY);
        list.clear();
        list.push_triangles(Layer::OPAQUE, tri(), Mat4::IDENTITY);
        assert_eq!(list.items()[0].key.order, 0);
        assert_eq!(list.iter_in_paint_order().count(), 1);
    }
}
