//! # Cinder Engine
//!
//! A small real-time 3D rendering engine built directly on Vulkan. It draws a
//! dynamic set of meshes with a two-pass lighting pipeline: a depth-only
//! shadow pass into an offscreen shadow map, followed by a lit main pass that
//! samples it. Command submission is pipelined across multiple frames in
//! flight, with fences gating CPU-side buffer reuse and semaphores ordering
//! the two passes on the GPU.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cinder_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RendererConfig::new("Demo");
//!     let mut window = Window::new(800, 600, "Demo")?;
//!     let mut renderer = Renderer::new(&mut window, &config)?;
//!
//!     renderer.set_camera(Vec3::new(0.0, 1.0, 3.0), Vec3::zeros());
//!     renderer.set_scene_lighting(
//!         Vec3::new(4.0, 8.0, 2.0),            // light position
//!         Vec3::zeros(),                       // light target
//!         Vec4::new(0.8, 0.8, 0.8, 1.0),       // light color
//!         Vec4::new(0.05, 0.05, 0.05, 1.0),    // ambient
//!     );
//!
//!     let cube = renderer.register_mesh(&Mesh::cube())?;
//!     while !window.should_close() {
//!         renderer.submit_draw_call(cube, Mat4::identity())?;
//!         renderer.render_frame()?;
//!         window.poll_events();
//!     }
//!     renderer.wait_idle()?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod foundation;
pub mod mesh;
pub mod render;

/// Commonly used types for applications built on the engine
pub mod prelude {
    pub use crate::config::RendererConfig;
    pub use crate::foundation::math::{look_at, Mat4, Vec3, Vec4};
    pub use crate::mesh::Mesh;
    pub use crate::render::{MeshHandle, Renderer, VulkanError, VulkanResult, Window};
}
