//! Renderer error types

use ash::vk;
use thiserror::Error;

/// Errors produced by the Vulkan renderer
#[derive(Error, Debug)]
pub enum VulkanError {
    /// A raw Vulkan call returned a non-success code
    #[error("Vulkan API error: {0}")]
    Api(#[from] vk::Result),

    /// Instance, device or window system setup failed
    #[error("initialization failed: {0}")]
    InitializationFailed(String),

    /// No device memory type satisfies the requested property flags
    #[error("no suitable memory type found")]
    NoSuitableMemoryType,

    /// A fixed-capacity pool cannot hold the requested amount
    #[error("{resource} capacity exceeded: requested {requested}, capacity {capacity}")]
    CapacityExceeded {
        resource: &'static str,
        requested: usize,
        capacity: usize,
    },

    /// A mesh handle does not refer to any registered mesh
    #[error("invalid mesh handle {handle} (pool holds {pool_size} meshes)")]
    InvalidMeshHandle { handle: usize, pool_size: usize },
}

/// Convenience alias used throughout the renderer
pub type VulkanResult<T> = Result<T, VulkanError>;
