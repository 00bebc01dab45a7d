use std::f32::consts::PI;

use super::{MeshData, MeshVertex};

const MIN_SLICES: u32 = 3;
const MIN_STACKS: u32 = 2;

/// Generates a UV sphere centred at the origin.
///
/// Stack `i` sits at polar angle `phi = PI * i / stacks` measured from +Y, so
/// row 0 is the north pole and texture `v` grows southwards. Slice `j` sits at
/// azimuth `theta = 2 * PI * j / slices` measured from +X towards +Z. The seam
/// column is duplicated (`slices + 1` vertices per row) so `u` runs the full
/// `0..=1` range.
///
/// `slices` and `stacks` are raised to 3 and 2 respectively. Normals come
/// from the unit direction, so they stay normalized for any radius.
pub fn sphere(radius: f32, slices: u32, stacks: u32) -> MeshData {
    let slices = slices.max(MIN_SLICES);
    let stacks = stacks.max(MIN_STACKS);
    let radius = radius.abs();

    let row = slices + 1;
    let mut vertices = Vec::with_capacity((row * (stacks + 1)) as usize);

    for i in 0..=stacks {
        let phi = PI * i as f32 / stacks as f32;
        let (sin_phi, cos_phi) = phi.sin_cos();

        for j in 0..=slices {
            let theta = 2.0 * PI * j as f32 / slices as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();

            let n = [sin_phi * cos_theta, cos_phi, sin_phi * sin_theta];

            vertices.push(MeshVertex {
                position: [n[0] * radius, n[1] * radius, n[2] * radius],
                normal: n,
                uv: [j as f32 / slices as f32, i as f32 / stacks as f32],
            });
        }
    }

    // Each band between two stacks is the triangle-strip pair
    // (top j, bottom j, top j+1, bottom j+1) unrolled into a list.
    let mut indices = Vec::with_capacity((6 * slices * stacks) as usize);
    for i in 0..stacks {
        for j in 0..slices {
            let top = i * row + j;
            let bottom = top + row;
            indices.extend_from_slice(&[top, bottom, top + 1, top + 1, bottom, bottom + 1]);
        }
    }

    MeshData { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn length(v: [f32; 3]) -> f32 {
        (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
    }

    #[test]
    fn vertex_and_index_counts() {
        let mesh = sphere(1.0, 36, 18);
        assert_eq!(mesh.vertices.len(), 37 * 19);
        assert_eq!(mesh.indices.len(), 6 * 36 * 18);
        assert_eq!(mesh.triangle_count(), 2 * 36 * 18);
    }

    #[test]
    fn poles_are_first_and_last_rows() {
        let mesh = sphere(2.0, 8, 4);
        let north = mesh.vertices[0].position;
        let south = mesh.vertices.last().unwrap().position;
        assert!((north[1] - 2.0).abs() < 1e-5);
        assert!((south[1] + 2.0).abs() < 1e-5);
    }

    #[test]
    fn normals_are_unit_and_match_positions() {
        let r = 3.0;
        let mesh = sphere(r, 12, 6);
        for v in &mesh.vertices {
            assert!((length(v.normal) - 1.0).abs() < 1e-5);
            assert!((length(v.position) - r).abs() < 1e-4);
        }
    }

    #[test]
    fn uv_covers_unit_square() {
        let mesh = sphere(1.0, 10, 5);
        let first = mesh.vertices.first().unwrap().uv;
        let last = mesh.vertices.last().unwrap().uv;
        assert_eq!(first, [0.0, 0.0]);
        assert_eq!(last, [1.0, 1.0]);
    }

    #[test]
    fn seam_vertices_share_position() {
        let mesh = sphere(1.0, 16, 8);
        let row = 17;
        let a = mesh.vertices[row * 4].position;
        let b = mesh.vertices[row * 4 + 16].position;
        for k in 0..3 {
            assert!((a[k] - b[k]).abs() < 1e-5);
        }
    }

    #[test]
    fn degenerate_resolution_is_raised() {
        let mesh = sphere(1.0, 0, 0);
        assert_eq!(mesh.vertices.len(), 4 * 3);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn negative_radius_keeps_outward_normals() {
        let mesh = sphere(-1.0, 8, 4);
        let v = mesh.vertices[10];
        let dot: f32 = (0..3).map(|k| v.position[k] * v.normal[k]).sum();
        assert!(dot > 0.0);
    }
}
