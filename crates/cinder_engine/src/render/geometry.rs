//! Append-only geometry pool bookkeeping
//!
//! [`GeometryStore`] tracks where each registered mesh lives inside the
//! shared vertex and index arrays. It owns only CPU-side state; the renderer
//! uploads the appended ranges to the device buffers after each append.

use crate::mesh::Mesh;
use crate::render::error::{VulkanError, VulkanResult};
use crate::render::vertex::Vertex;

/// Opaque identifier for a registered mesh.
///
/// Handles are only valid against the [`GeometryStore`] that issued them;
/// lookups validate the index and return
/// [`VulkanError::InvalidMeshHandle`] for anything out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub(crate) usize);

impl MeshHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for MeshHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "mesh#{}", self.0)
    }
}

/// Draw parameters for one mesh inside the shared buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshDrawInfo {
    /// First vertex of the mesh, as a base offset for indexed draws
    pub vertex_offset: u32,
    /// First index of the mesh inside the shared index array
    pub index_offset: u32,
    /// Number of indices to draw
    pub index_count: u32,
}

/// Range of elements appended by the latest registration
#[derive(Debug, Clone, Copy)]
pub struct AppendedRange {
    pub vertex_start: usize,
    pub vertex_count: usize,
    pub index_start: usize,
    pub index_count: usize,
}

/// CPU mirror of the shared vertex/index buffers plus the mesh pool
pub struct GeometryStore {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    pool: Vec<MeshDrawInfo>,
    max_vertices: usize,
    max_indices: usize,
}

impl GeometryStore {
    pub fn new(max_vertices: usize, max_indices: usize) -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            pool: Vec::new(),
            max_vertices,
            max_indices,
        }
    }

    /// Append a mesh and return its handle.
    ///
    /// Vertices are decorated with a white color; indices are stored as-is
    /// and resolved at draw time through the mesh's base vertex offset.
    pub fn append(&mut self, mesh: &Mesh) -> VulkanResult<(MeshHandle, AppendedRange)> {
        let vertex_count = mesh.positions().len();
        let index_count = mesh.indices().len();
        if self.vertices.len() + vertex_count > self.max_vertices {
            return Err(VulkanError::CapacityExceeded {
                resource: "vertex buffer",
                requested: self.vertices.len() + vertex_count,
                capacity: self.max_vertices,
            });
        }
        if self.indices.len() + index_count > self.max_indices {
            return Err(VulkanError::CapacityExceeded {
                resource: "index buffer",
                requested: self.indices.len() + index_count,
                capacity: self.max_indices,
            });
        }

        let range = AppendedRange {
            vertex_start: self.vertices.len(),
            vertex_count,
            index_start: self.indices.len(),
            index_count,
        };

        let white = [1.0, 1.0, 1.0];
        let fallback = crate::foundation::math::Vec3::new(0.0, 1.0, 0.0);
        for (i, position) in mesh.positions().iter().enumerate() {
            let normal = mesh.normals().get(i).unwrap_or(&fallback);
            self.vertices.push(Vertex {
                position: [position.x, position.y, position.z],
                color: white,
                normal: [normal.x, normal.y, normal.z],
            });
        }
        self.indices.extend_from_slice(mesh.indices());

        let handle = MeshHandle(self.pool.len());
        self.pool.push(MeshDrawInfo {
            vertex_offset: range.vertex_start as u32,
            index_offset: range.index_start as u32,
            index_count: index_count as u32,
        });
        log::debug!(
            "registered {}: {} vertices at {}, {} indices at {}",
            handle,
            vertex_count,
            range.vertex_start,
            index_count,
            range.index_start
        );
        Ok((handle, range))
    }

    /// Resolve a handle to its draw parameters
    pub fn draw_info(&self, handle: MeshHandle) -> VulkanResult<MeshDrawInfo> {
        self.pool
            .get(handle.0)
            .copied()
            .ok_or(VulkanError::InvalidMeshHandle {
                handle: handle.0,
                pool_size: self.pool.len(),
            })
    }

    pub fn contains(&self, handle: MeshHandle) -> bool {
        handle.0 < self.pool.len()
    }

    pub fn mesh_count(&self) -> usize {
        self.pool.len()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_accumulate_across_appends() {
        let mut store = GeometryStore::new(1000, 1000);
        let (quad, _) = store.append(&Mesh::quad()).unwrap();
        let (cube, _) = store.append(&Mesh::cube()).unwrap();

        let quad_info = store.draw_info(quad).unwrap();
        assert_eq!(quad_info.vertex_offset, 0);
        assert_eq!(quad_info.index_offset, 0);
        assert_eq!(quad_info.index_count, 6);

        let cube_info = store.draw_info(cube).unwrap();
        assert_eq!(cube_info.vertex_offset, 4);
        assert_eq!(cube_info.index_offset, 6);
        assert_eq!(cube_info.index_count, 36);
    }

    #[test]
    fn appended_range_covers_only_new_elements() {
        let mut store = GeometryStore::new(1000, 1000);
        store.append(&Mesh::quad()).unwrap();
        let (_, range) = store.append(&Mesh::cube()).unwrap();
        assert_eq!(range.vertex_start, 4);
        assert_eq!(range.vertex_count, 24);
        assert_eq!(range.index_start, 6);
        assert_eq!(range.index_count, 36);
    }

    #[test]
    fn vertex_capacity_is_enforced() {
        let mut store = GeometryStore::new(5, 1000);
        store.append(&Mesh::quad()).unwrap();
        let err = store.append(&Mesh::quad()).unwrap_err();
        assert!(matches!(
            err,
            VulkanError::CapacityExceeded {
                resource: "vertex buffer",
                ..
            }
        ));
        // A failed append leaves the store unchanged.
        assert_eq!(store.mesh_count(), 1);
        assert_eq!(store.vertices().len(), 4);
    }

    #[test]
    fn index_capacity_is_enforced() {
        let mut store = GeometryStore::new(1000, 8);
        store.append(&Mesh::quad()).unwrap();
        let err = store.append(&Mesh::quad()).unwrap_err();
        assert!(matches!(
            err,
            VulkanError::CapacityExceeded {
                resource: "index buffer",
                ..
            }
        ));
    }

    #[test]
    fn out_of_range_handle_is_rejected() {
        let mut store = GeometryStore::new(1000, 1000);
        store.append(&Mesh::quad()).unwrap();
        let err = store.draw_info(MeshHandle(7)).unwrap_err();
        assert!(matches!(
            err,
            VulkanError::InvalidMeshHandle {
                handle: 7,
                pool_size: 1
            }
        ));
    }

    #[test]
    fn registration_colors_vertices_white() {
        let mut store = GeometryStore::new(1000, 1000);
        store.append(&Mesh::quad()).unwrap();
        assert!(store
            .vertices()
            .iter()
            .all(|v| v.color == [1.0, 1.0, 1.0]));
    }
}
