use std::f32::consts::TAU;

use crate::paint::Color;

use super::{ColorVertex, MeshData, MeshVertex};

/// Quad in the XZ plane spanning `[-half_extent, half_extent]` on both axes,
/// facing +Y.
///
/// UV `(0, 0)` sits at `(-x, -z)` and `(1, 1)` at `(+x, +z)`, which is how
/// floor decals expect their texture laid out.
pub fn quad_xz(half_extent: f32) -> MeshData {
    let h = half_extent;
    let corner = |x: f32, z: f32, u: f32, v: f32| MeshVertex {
        position: [x, 0.0, z],
        normal: [0.0, 1.0, 0.0],
        uv: [u, v],
    };

    MeshData {
        vertices: vec![
            corner(-h, -h, 0.0, 0.0),
            corner(h, -h, 1.0, 0.0),
            corner(h, h, 1.0, 1.0),
            corner(-h, h, 0.0, 1.0),
        ],
        indices: vec![0, 2, 1, 0, 3, 2],
    }
}

/// Line-list segments for a square grid at height `y`.
///
/// Lines run every `spacing` units from `-half_extent` to `+half_extent`
/// inclusive, in both directions. A non-positive spacing yields no lines.
pub fn grid_lines(half_extent: f32, spacing: f32, y: f32, color: Color) -> Vec<ColorVertex> {
    if spacing <= 0.0 || half_extent <= 0.0 {
        return Vec::new();
    }

    let c = color.to_array();
    // Integer stepping avoids accumulating float error across the grid.
    let steps = (2.0 * half_extent / spacing + 1e-4).floor() as u32;

    let mut out = Vec::with_capacity(((steps + 1) * 4) as usize);
    for k in 0..=steps {
        let t = -half_extent + k as f32 * spacing;
        out.push(ColorVertex::new([t, y, -half_extent], c));
        out.push(ColorVertex::new([t, y, half_extent], c));
        out.push(ColorVertex::new([-half_extent, y, t], c));
        out.push(ColorVertex::new([half_extent, y, t], c));
    }
    out
}

/// Radial fan in the XZ plane at height `y`, expanded into a triangle list.
///
/// The centre vertex carries `center` and the rim carries `rim`, so the
/// rasterizer interpolates a radial gradient.
pub fn disc_fan(radius: f32, segments: u32, y: f32, center: Color, rim: Color) -> Vec<ColorVertex> {
    let segments = segments.max(3);
    let c = center.to_array();
    let r = rim.to_array();

    let rim_point = |i: u32| {
        let angle = TAU * i as f32 / segments as f32;
        [radius * angle.cos(), y, radius * angle.sin()]
    };

    let mut out = Vec::with_capacity((segments * 3) as usize);
    for i in 0..segments {
        out.push(ColorVertex::new([0.0, y, 0.0], c));
        out.push(ColorVertex::new(rim_point(i + 1), r));
        out.push(ColorVertex::new(rim_point(i), r));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_uv_corners() {
        let q = quad_xz(1.0);
        assert_eq!(q.vertices[0].position, [-1.0, 0.0, -1.0]);
        assert_eq!(q.vertices[0].uv, [0.0, 0.0]);
        assert_eq!(q.vertices[2].position, [1.0, 0.0, 1.0]);
        assert_eq!(q.vertices[2].uv, [1.0, 1.0]);
        assert_eq!(q.triangle_count(), 2);
    }

    #[test]
    fn grid_covers_both_edges() {
        let lines = grid_lines(4.0, 0.5, -1.5, Color::WHITE);
        // 17 positions per axis, 2 lines per position, 2 vertices per line.
        assert_eq!(lines.len(), 17 * 4);
        assert!(lines.iter().all(|v| v.position[1] == -1.5));
        let max_x = lines.iter().map(|v| v.position[0]).fold(f32::MIN, f32::max);
        assert!((max_x - 4.0).abs() < 1e-5);
    }

    #[test]
    fn grid_with_bad_spacing_is_empty() {
        assert!(grid_lines(4.0, 0.0, 0.0, Color::WHITE).is_empty());
    }

    #[test]
    fn fan_closes_the_rim() {
        let fan = disc_fan(0.2, 32, 0.0, Color::BLACK, Color::transparent());
        assert_eq!(fan.len(), 32 * 3);
        let first_rim = fan[2].position;
        let last_rim = fan[fan.len() - 2].position;
        for k in 0..3 {
            assert!((first_rim[k] - last_rim[k]).abs() < 1e-5);
        }
        assert_eq!(fan[0].color[3], 1.0);
        assert_eq!(fan[1].color[3], 0.0);
    }
}
