//! Vulkan renderer
//!
//! Layering, from bottom up:
//!
//! - [`context`] owns the instance, physical/logical device and command pool
//! - [`buffer`], [`shader`], [`sync`] wrap individual Vulkan objects with RAII
//! - [`swapchain`], [`render_pass`], [`pipeline`], [`framebuffers`],
//!   [`shadow_map`], [`descriptor`] build the per-pass machinery
//! - [`geometry`], [`registry`], [`uniforms`], [`commands`] are CPU-side
//!   bookkeeping with no Vulkan handles in their logic
//! - [`renderer`] ties everything together behind [`Renderer`]

pub mod buffer;
pub mod commands;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod framebuffers;
pub mod geometry;
pub mod pipeline;
pub mod registry;
pub mod render_pass;
pub mod renderer;
pub mod shader;
pub mod shadow_map;
pub mod swapchain;
pub mod sync;
pub mod uniforms;
pub mod vertex;
pub mod window;

pub use error::{VulkanError, VulkanResult};
pub use geometry::MeshHandle;
pub use renderer::Renderer;
pub use window::Window;
