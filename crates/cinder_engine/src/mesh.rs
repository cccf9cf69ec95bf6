//! Mesh data and primitive generators
//!
//! A [`Mesh`] is plain CPU-side geometry: positions, per-vertex normals and
//! triangle indices. File import (OBJ/FBX) lives outside the engine; anything
//! that can produce these three sequences can feed the renderer. A mesh is
//! immutable once constructed.

use crate::foundation::math::Vec3;
use std::f32::consts::PI;

/// Immutable triangle mesh
///
/// Positions and normals are parallel sequences. A length mismatch is a
/// soft data warning, not an error: the mesh is accepted as supplied and the
/// mismatch is logged.
#[derive(Debug, Clone)]
pub struct Mesh {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    indices: Vec<u32>,
}

impl Mesh {
    /// Create a mesh from raw geometry
    pub fn new(positions: Vec<Vec3>, normals: Vec<Vec3>, indices: Vec<u32>) -> Self {
        if normals.len() != positions.len() {
            log::warn!(
                "mesh: number of vertices ({}) does not match number of normals ({})",
                positions.len(),
                normals.len()
            );
        }
        Self {
            positions,
            normals,
            indices,
        }
    }

    /// Vertex positions
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Per-vertex normals
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Triangle indices (length is a multiple of 3)
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Unit quad in the XZ plane, facing +Y
    pub fn quad() -> Self {
        let positions = vec![
            Vec3::new(-0.5, 0.0, -0.5),
            Vec3::new(-0.5, 0.0, 0.5),
            Vec3::new(0.5, 0.0, 0.5),
            Vec3::new(0.5, 0.0, -0.5),
        ];
        let normals = vec![Vec3::new(0.0, 1.0, 0.0); 4];
        let indices = vec![0, 1, 2, 2, 3, 0];
        Self::new(positions, normals, indices)
    }

    /// Axis-aligned unit cube centered at the origin, flat-shaded
    pub fn cube() -> Self {
        let face = |normal: Vec3, a: Vec3, b: Vec3, c: Vec3, d: Vec3| {
            (vec![a, b, c, d], vec![normal; 4])
        };
        let h = 0.5;
        let faces = [
            // +X
            face(
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(h, -h, -h),
                Vec3::new(h, h, -h),
                Vec3::new(h, h, h),
                Vec3::new(h, -h, h),
            ),
            // -X
            face(
                Vec3::new(-1.0, 0.0, 0.0),
                Vec3::new(-h, -h, h),
                Vec3::new(-h, h, h),
                Vec3::new(-h, h, -h),
                Vec3::new(-h, -h, -h),
            ),
            // +Y
            face(
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(-h, h, -h),
                Vec3::new(-h, h, h),
                Vec3::new(h, h, h),
                Vec3::new(h, h, -h),
            ),
            // -Y
            face(
                Vec3::new(0.0, -1.0, 0.0),
                Vec3::new(-h, -h, h),
                Vec3::new(-h, -h, -h),
                Vec3::new(h, -h, -h),
                Vec3::new(h, -h, h),
            ),
            // +Z
            face(
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(-h, -h, h),
                Vec3::new(h, -h, h),
                Vec3::new(h, h, h),
                Vec3::new(-h, h, h),
            ),
            // -Z
            face(
                Vec3::new(0.0, 0.0, -1.0),
                Vec3::new(h, -h, -h),
                Vec3::new(-h, -h, -h),
                Vec3::new(-h, h, -h),
                Vec3::new(h, h, -h),
            ),
        ];

        let mut positions = Vec::with_capacity(24);
        let mut normals = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (face_positions, face_normals) in faces {
            let base = positions.len() as u32;
            positions.extend(face_positions);
            normals.extend(face_normals);
            indices.extend([base, base + 1, base + 2, base + 2, base + 3, base]);
        }
        Self::new(positions, normals, indices)
    }

    /// Regular tetrahedron with smooth accumulated vertex normals
    pub fn tetrahedron() -> Self {
        let positions = vec![
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
        ];
        let indices = vec![2, 1, 0, 1, 3, 0, 3, 2, 0, 2, 3, 1];
        let normals = accumulate_vertex_normals(&positions, &indices);
        Self::new(positions, normals, indices)
    }

    /// UV sphere of the given radius
    pub fn uv_sphere(radius: f32, longitude_segments: u32, latitude_segments: u32) -> Self {
        let mut positions = Vec::new();
        let mut normals = Vec::new();
        for y in 0..=latitude_segments {
            for x in 0..=longitude_segments {
                let u = x as f32 / longitude_segments as f32;
                let v = y as f32 / latitude_segments as f32;
                let dir = Vec3::new(
                    (u * 2.0 * PI).cos() * (v * PI).sin(),
                    (v * PI).cos(),
                    (u * 2.0 * PI).sin() * (v * PI).sin(),
                );
                positions.push(dir * radius);
                normals.push(dir);
            }
        }

        let stride = longitude_segments + 1;
        let mut indices = Vec::new();
        for y in 0..latitude_segments {
            for x in 0..longitude_segments {
                let i0 = y * stride + x;
                let i1 = (y + 1) * stride + x;
                let i2 = (y + 1) * stride + x + 1;
                let i3 = y * stride + x + 1;
                indices.extend([i2, i1, i0, i0, i3, i2]);
            }
        }
        Self::new(positions, normals, indices)
    }
}

/// Average the face normals of each triangle into per-vertex normals.
fn accumulate_vertex_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::zeros(); positions.len()];
    for triangle in indices.chunks_exact(3) {
        let a = positions[triangle[0] as usize];
        let b = positions[triangle[1] as usize];
        let c = positions[triangle[2] as usize];
        let face_normal = (b - a).cross(&(c - a));
        for &index in triangle {
            normals[index as usize] += face_normal;
        }
    }
    for normal in &mut normals {
        if normal.norm() > 0.0 {
            normal.normalize_mut();
        }
    }
    normals
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn quad_has_matching_sequences() {
        let quad = Mesh::quad();
        assert_eq!(quad.positions().len(), 4);
        assert_eq!(quad.normals().len(), 4);
        assert_eq!(quad.indices().len(), 6);
        assert_eq!(quad.indices().len() % 3, 0);
    }

    #[test]
    fn cube_indices_stay_in_range() {
        let cube = Mesh::cube();
        let max = *cube.indices().iter().max().unwrap();
        assert!((max as usize) < cube.vertex_count());
        assert_eq!(cube.indices().len(), 36);
    }

    #[test]
    fn sphere_normals_are_unit_and_radial() {
        let sphere = Mesh::uv_sphere(2.0, 8, 4);
        for (position, normal) in sphere.positions().iter().zip(sphere.normals()) {
            assert_relative_eq!(normal.norm(), 1.0, epsilon = 1e-5);
            // Normal points along the position direction.
            assert_relative_eq!(position.normalize().dot(normal), 1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn tetrahedron_normals_are_normalized() {
        let tetra = Mesh::tetrahedron();
        assert_eq!(tetra.normals().len(), 4);
        for normal in tetra.normals() {
            assert_relative_eq!(normal.norm(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn mismatched_normals_accepted_as_supplied() {
        let mesh = Mesh::new(
            vec![Vec3::zeros(), Vec3::zeros(), Vec3::zeros()],
            vec![Vec3::new(0.0, 1.0, 0.0)],
            vec![0, 1, 2],
        );
        // Warning only; data passes through untouched.
        assert_eq!(mesh.positions().len(), 3);
        assert_eq!(mesh.normals().len(), 1);
    }
}
