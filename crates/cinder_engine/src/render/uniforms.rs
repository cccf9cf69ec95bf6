//! Uniform block layouts and dynamic-offset packing
//!
//! Per-object uniforms for a frame live in one host-visible buffer, each
//! block padded out to the device's `minUniformBufferOffsetAlignment` so
//! draw N binds at dynamic offset `N * aligned_stride`. Packing is pure
//! byte bookkeeping and is tested without a device.

use bytemuck::{Pod, Zeroable};

use crate::foundation::math::{to_columns, Mat4, Vec4};
use crate::render::error::{VulkanError, VulkanResult};

/// Per-object uniform block (shader set 1, binding 0, dynamic)
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub tint: [f32; 4],
}

impl ObjectUniform {
    pub fn new(model: &Mat4, tint: Vec4) -> Self {
        Self {
            model: to_columns(model),
            tint: [tint.x, tint.y, tint.z, tint.w],
        }
    }
}

/// Per-frame scene uniform block (shader set 0, binding 0)
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct SceneUniform {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub light_view: [[f32; 4]; 4],
    pub light_projection: [[f32; 4]; 4],
    pub light_direction: [f32; 4],
    pub light_color: [f32; 4],
    pub ambient_color: [f32; 4],
}

/// Round `size` up to the next multiple of `alignment`.
///
/// `alignment` must be a power of two, which the Vulkan spec guarantees for
/// `minUniformBufferOffsetAlignment`.
pub fn aligned_stride(size: usize, alignment: usize) -> usize {
    debug_assert!(alignment.is_power_of_two());
    (size + alignment - 1) & !(alignment - 1)
}

/// Pack object uniforms into a buffer image with `stride` bytes per block.
///
/// Bytes between the end of each block and the next stride boundary are left
/// zeroed. Fails if the packed size would exceed `capacity` bytes.
pub fn pack_object_uniforms(
    uniforms: &[ObjectUniform],
    stride: usize,
    capacity: usize,
) -> VulkanResult<Vec<u8>> {
    let required = uniforms.len() * stride;
    if required > capacity {
        return Err(VulkanError::CapacityExceeded {
            resource: "object uniform buffer",
            requested: required,
            capacity,
        });
    }
    let mut packed = vec![0u8; required];
    for (i, uniform) in uniforms.iter().enumerate() {
        let start = i * stride;
        let bytes = bytemuck::bytes_of(uniform);
        packed[start..start + bytes.len()].copy_from_slice(bytes);
    }
    Ok(packed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec4;

    #[test]
    fn stride_rounds_up_to_alignment() {
        assert_eq!(aligned_stride(80, 64), 128);
        assert_eq!(aligned_stride(64, 64), 64);
        assert_eq!(aligned_stride(1, 256), 256);
        assert_eq!(aligned_stride(0, 64), 0);
    }

    #[test]
    fn stride_is_multiple_of_alignment_and_holds_block() {
        let size = std::mem::size_of::<ObjectUniform>();
        for alignment in [16usize, 64, 256] {
            let stride = aligned_stride(size, alignment);
            assert_eq!(stride % alignment, 0);
            assert!(stride >= size);
            assert!(stride < size + alignment);
        }
    }

    #[test]
    fn packed_blocks_start_at_stride_boundaries() {
        let size = std::mem::size_of::<ObjectUniform>();
        let stride = aligned_stride(size, 256);
        let uniforms = vec![
            ObjectUniform::new(&Mat4::identity(), Vec4::new(1.0, 0.0, 0.0, 1.0)),
            ObjectUniform::new(&Mat4::identity(), Vec4::new(0.0, 1.0, 0.0, 1.0)),
            ObjectUniform::new(&Mat4::identity(), Vec4::new(0.0, 0.0, 1.0, 1.0)),
        ];
        let packed = pack_object_uniforms(&uniforms, stride, 4096).unwrap();
        assert_eq!(packed.len(), 3 * stride);
        for (i, expected) in uniforms.iter().enumerate() {
            let start = i * stride;
            let block: &ObjectUniform =
                bytemuck::from_bytes(&packed[start..start + size]);
            assert_eq!(block.tint, expected.tint);
        }
        // Padding stays zeroed.
        assert!(packed[size..stride].iter().all(|&b| b == 0));
    }

    #[test]
    fn packing_past_capacity_fails() {
        let stride = aligned_stride(std::mem::size_of::<ObjectUniform>(), 256);
        let uniforms = vec![ObjectUniform::zeroed(); 4];
        let err = pack_object_uniforms(&uniforms, stride, 3 * stride).unwrap_err();
        assert!(matches!(err, VulkanError::CapacityExceeded { .. }));
    }

    #[test]
    fn scene_uniform_layout_is_stable() {
        // Four mat4s, three vec4s, std140-compatible.
        assert_eq!(std::mem::size_of::<SceneUniform>(), 4 * 64 + 3 * 16);
    }
}
