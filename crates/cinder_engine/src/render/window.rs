//! GLFW window for Vulkan presentation

use ash::vk;
use glfw::{ClientApiHint, Glfw, GlfwReceiver, PWindow, WindowEvent, WindowHint, WindowMode};

use crate::render::error::{VulkanError, VulkanResult};

/// Window plus its GLFW context and event receiver.
///
/// GLFW is initialized with no client API so Vulkan owns the surface, and
/// the window is fixed-size because the swapchain is built once.
pub struct Window {
    pub glfw: Glfw,
    window: PWindow,
    events: GlfwReceiver<(f64, WindowEvent)>,
}

impl Window {
    pub fn new(width: u32, height: u32, title: &str) -> VulkanResult<Self> {
        let mut glfw = glfw::init(glfw::log_errors).map_err(|e| {
            VulkanError::InitializationFailed(format!("GLFW init failed: {e}"))
        })?;
        glfw.window_hint(WindowHint::ClientApi(ClientApiHint::NoApi));
        glfw.window_hint(WindowHint::Resizable(false));

        let (mut window, events) = glfw
            .create_window(width, height, title, WindowMode::Windowed)
            .ok_or_else(|| {
                VulkanError::InitializationFailed("failed to create GLFW window".into())
            })?;
        window.set_key_polling(true);
        window.set_close_polling(true);

        log::info!("created window \"{}\" ({}x{})", title, width, height);
        Ok(Self {
            glfw,
            window,
            events,
        })
    }

    /// Instance extensions the window system needs
    pub fn required_instance_extensions(&self) -> VulkanResult<Vec<String>> {
        self.glfw.get_required_instance_extensions().ok_or_else(|| {
            VulkanError::InitializationFailed(
                "GLFW reports no Vulkan instance extensions".into(),
            )
        })
    }

    /// Create a presentation surface for this window
    pub fn create_surface(&mut self, instance: vk::Instance) -> VulkanResult<vk::SurfaceKHR> {
        let mut surface = vk::SurfaceKHR::null();
        let result = self
            .window
            .create_window_surface(instance, std::ptr::null(), &mut surface);
        if result != vk::Result::SUCCESS {
            return Err(VulkanError::Api(result));
        }
        Ok(surface)
    }

    pub fn framebuffer_size(&self) -> (u32, u32) {
        let (w, h) = self.window.get_framebuffer_size();
        (w as u32, h as u32)
    }

    pub fn should_close(&self) -> bool {
        self.window.should_close()
    }

    pub fn set_should_close(&mut self, value: bool) {
        self.window.set_should_close(value);
    }

    /// Pump the event queue, returning this tick's events
    pub fn poll_events(&mut self) -> Vec<WindowEvent> {
        self.glfw.poll_events();
        glfw::flush_messages(&self.events)
            .map(|(_, event)| event)
            .collect()
    }
}
