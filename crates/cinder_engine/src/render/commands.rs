//! Command buffer allocation and draw command generation
//!
//! Translating the frame's draw list into per-draw parameters is pure
//! arithmetic over the geometry pool, shared verbatim by the shadow and
//! main passes, and is kept free of Vulkan handles so it can be tested
//! directly.

use ash::vk;
use ash::Device;

use crate::render::error::{VulkanError, VulkanResult};
use crate::render::geometry::{GeometryStore, MeshHandle};

/// Everything one indexed draw needs from the CPU side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCommand {
    pub index_count: u32,
    pub first_index: u32,
    pub vertex_offset: i32,
    /// Byte offset of this draw's block in the dynamic object uniform buffer
    pub dynamic_offset: u32,
}

/// Resolve the frame's draw list against the geometry pool.
///
/// Draw `j` binds its object uniforms at `j * uniform_stride`, matching the
/// order the uniform blocks were packed in. Both render passes consume the
/// identical command list.
pub fn build_draw_commands(
    store: &GeometryStore,
    handles: &[MeshHandle],
    uniform_stride: usize,
) -> VulkanResult<Vec<DrawCommand>> {
    let mut commands = Vec::with_capacity(handles.len());
    for (j, &handle) in handles.iter().enumerate() {
        let info = store.draw_info(handle)?;
        commands.push(DrawCommand {
            index_count: info.index_count,
            first_index: info.index_offset,
            vertex_offset: info.vertex_offset as i32,
            dynamic_offset: (j * uniform_stride) as u32,
        });
    }
    Ok(commands)
}

/// Primary command buffers allocated from the device's graphics pool.
///
/// The pool owns the buffer storage, so freeing happens with the pool; this
/// wrapper only tracks the handles.
pub struct CommandBuffers {
    buffers: Vec<vk::CommandBuffer>,
}

impl CommandBuffers {
    pub fn allocate(
        device: &Device,
        command_pool: vk::CommandPool,
        count: u32,
    ) -> VulkanResult<Self> {
        let alloc_info = vk::CommandBufferAllocateInfo::builder()
            .command_pool(command_pool)
            .level(vk::CommandBufferLevel::PRIMARY)
            .command_buffer_count(count);
        let buffers = unsafe {
            device
                .allocate_command_buffers(&alloc_info)
                .map_err(VulkanError::Api)?
        };
        Ok(Self { buffers })
    }

    pub fn get(&self, index: usize) -> vk::CommandBuffer {
        self.buffers[index]
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{translation, Mat4, Vec3, Vec4};
    use crate::mesh::Mesh;
    use crate::render::registry::{DrawCall, DrawRegistry};
    use crate::render::uniforms::{aligned_stride, pack_object_uniforms, ObjectUniform};

    #[test]
    fn commands_mirror_pool_offsets() {
        let mut store = GeometryStore::new(1000, 1000);
        let (quad, _) = store.append(&Mesh::quad()).unwrap();
        let (cube, _) = store.append(&Mesh::cube()).unwrap();

        let commands = build_draw_commands(&store, &[cube, quad], 256).unwrap();
        assert_eq!(
            commands[0],
            DrawCommand {
                index_count: 36,
                first_index: 6,
                vertex_offset: 4,
                dynamic_offset: 0,
            }
        );
        assert_eq!(
            commands[1],
            DrawCommand {
                index_count: 6,
                first_index: 0,
                vertex_offset: 0,
                dynamic_offset: 256,
            }
        );
    }

    #[test]
    fn dynamic_offsets_step_by_stride() {
        let mut store = GeometryStore::new(1000, 1000);
        let (quad, _) = store.append(&Mesh::quad()).unwrap();
        let handles = vec![quad; 5];
        let commands = build_draw_commands(&store, &handles, 128).unwrap();
        for (j, command) in commands.iter().enumerate() {
            assert_eq!(command.dynamic_offset, (j * 128) as u32);
        }
    }

    #[test]
    fn same_mesh_drawn_twice_shares_geometry() {
        let mut store = GeometryStore::new(1000, 1000);
        let (cube, _) = store.append(&Mesh::cube()).unwrap();
        let commands = build_draw_commands(&store, &[cube, cube], 64).unwrap();
        assert_eq!(commands[0].first_index, commands[1].first_index);
        assert_eq!(commands[0].vertex_offset, commands[1].vertex_offset);
        assert_ne!(commands[0].dynamic_offset, commands[1].dynamic_offset);
    }

    #[test]
    fn unknown_handle_fails_command_build() {
        let store = GeometryStore::new(1000, 1000);
        let err = build_draw_commands(&store, &[MeshHandle(0)], 64).unwrap_err();
        assert!(matches!(err, VulkanError::InvalidMeshHandle { .. }));
    }

    #[test]
    fn multi_mesh_frame_scenario() {
        // Three meshes, four draws in mixed order.
        let mut store = GeometryStore::new(1000, 1000);
        let (quad, _) = store.append(&Mesh::quad()).unwrap();
        let (cube, _) = store.append(&Mesh::cube()).unwrap();
        let (tetra, _) = store.append(&Mesh::tetrahedron()).unwrap();

        let stride = 256;
        let commands =
            build_draw_commands(&store, &[tetra, quad, cube, quad], stride).unwrap();
        assert_eq!(commands.len(), 4);
        // Tetrahedron sits after quad (4 verts, 6 idx) and cube (24, 36).
        assert_eq!(commands[0].vertex_offset, 28);
        assert_eq!(commands[0].first_index, 42);
        assert_eq!(commands[0].index_count, 12);
        // Draw order, not registration order, decides the dynamic offsets.
        let offsets: Vec<u32> = commands.iter().map(|c| c.dynamic_offset).collect();
        assert_eq!(offsets, vec![0, 256, 512, 768]);
    }

    #[test]
    fn registry_to_commands_frame_flow() {
        // One 4-vertex/6-index mesh drawn twice with distinct transforms,
        // carried through the full CPU side of a frame: registry, uniform
        // packing, draw command build, both passes, then the clear.
        let mut store = GeometryStore::new(1000, 1000);
        let (quad, _) = store.append(&Mesh::quad()).unwrap();

        let white = Vec4::new(1.0, 1.0, 1.0, 1.0);
        let mut registry = DrawRegistry::new(16);
        registry
            .push(DrawCall {
                mesh: quad,
                transform: Mat4::identity(),
                tint: white,
            })
            .unwrap();
        registry
            .push(DrawCall {
                mesh: quad,
                transform: translation(Vec3::new(2.0, 0.0, 0.0)),
                tint: white,
            })
            .unwrap();

        let stride = aligned_stride(std::mem::size_of::<ObjectUniform>(), 256);
        let packed =
            pack_object_uniforms(&registry.object_uniforms(), stride, 16 * stride).unwrap();
        assert_eq!(packed.len(), 2 * stride);

        let commands = build_draw_commands(&store, &registry.handles(), stride).unwrap();
        assert_eq!(commands.len(), 2);
        // Both passes consume the same list, so the shadow pass draws the
        // same index counts as the main pass by construction.
        assert!(commands.iter().all(|c| c.index_count == 6));
        assert_eq!(commands[1].dynamic_offset, stride as u32);

        registry.clear();
        assert!(registry.is_empty());
    }
}
