//! Per-frame draw registry
//!
//! Draw calls accumulate here between frames and are consumed by
//! `render_frame`, which drains the registry whether or not the frame
//! succeeds so a failed present never replays stale draws.

use crate::foundation::math::{Mat4, Vec4};
use crate::render::error::{VulkanError, VulkanResult};
use crate::render::geometry::MeshHandle;
use crate::render::uniforms::ObjectUniform;

/// One queued draw: which mesh, where, and with what tint
#[derive(Debug, Clone, Copy)]
pub struct DrawCall {
    pub mesh: MeshHandle,
    pub transform: Mat4,
    pub tint: Vec4,
}

/// Frame-scoped list of draw calls, bounded by the object capacity
pub struct DrawRegistry {
    calls: Vec<DrawCall>,
    max_objects: usize,
}

impl DrawRegistry {
    pub fn new(max_objects: usize) -> Self {
        Self {
            calls: Vec::new(),
            max_objects,
        }
    }

    pub fn push(&mut self, call: DrawCall) -> VulkanResult<()> {
        if self.calls.len() >= self.max_objects {
            return Err(VulkanError::CapacityExceeded {
                resource: "draw registry",
                requested: self.calls.len() + 1,
                capacity: self.max_objects,
            });
        }
        self.calls.push(call);
        Ok(())
    }

    /// Draws in submission order
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Handles in submission order, index-aligned with [`object_uniforms`](Self::object_uniforms)
    pub fn handles(&self) -> Vec<MeshHandle> {
        self.calls.iter().map(|c| c.mesh).collect()
    }

    /// Object uniform blocks in submission order
    pub fn object_uniforms(&self) -> Vec<ObjectUniform> {
        self.calls
            .iter()
            .map(|c| ObjectUniform::new(&c.transform, c.tint))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(index: usize) -> DrawCall {
        DrawCall {
            mesh: MeshHandle(index),
            transform: Mat4::identity(),
            tint: Vec4::new(1.0, 1.0, 1.0, 1.0),
        }
    }

    #[test]
    fn submission_order_is_preserved() {
        let mut registry = DrawRegistry::new(10);
        for i in [3, 1, 2] {
            registry.push(call(i)).unwrap();
        }
        let handles: Vec<usize> = registry.handles().iter().map(|h| h.index()).collect();
        assert_eq!(handles, vec![3, 1, 2]);
    }

    #[test]
    fn uniforms_align_with_handles() {
        let mut registry = DrawRegistry::new(10);
        registry
            .push(DrawCall {
                mesh: MeshHandle(0),
                transform: Mat4::identity(),
                tint: Vec4::new(0.5, 0.0, 0.0, 1.0),
            })
            .unwrap();
        registry
            .push(DrawCall {
                mesh: MeshHandle(1),
                transform: Mat4::identity(),
                tint: Vec4::new(0.0, 0.5, 0.0, 1.0),
            })
            .unwrap();
        let uniforms = registry.object_uniforms();
        assert_eq!(uniforms.len(), 2);
        assert_eq!(uniforms[0].tint, [0.5, 0.0, 0.0, 1.0]);
        assert_eq!(uniforms[1].tint, [0.0, 0.5, 0.0, 1.0]);
    }

    #[test]
    fn object_capacity_is_enforced() {
        let mut registry = DrawRegistry::new(2);
        registry.push(call(0)).unwrap();
        registry.push(call(1)).unwrap();
        let err = registry.push(call(2)).unwrap_err();
        assert!(matches!(err, VulkanError::CapacityExceeded { .. }));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn clear_empties_the_registry() {
        let mut registry = DrawRegistry::new(10);
        registry.push(call(0)).unwrap();
        registry.clear();
        assert!(registry.is_empty());
        // Capacity is unaffected by clearing.
        for i in 0..10 {
            registry.push(call(i)).unwrap();
        }
    }
}
