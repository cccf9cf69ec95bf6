//! Framebuffer sets for the two passes

use ash::vk;
use ash::Device;

use crate::render::error::{VulkanError, VulkanResult};

/// One framebuffer per attachment set, destroyed together
pub struct Framebuffers {
    device: Device,
    framebuffers: Vec<vk::Framebuffer>,
    extent: vk::Extent2D,
}

impl Framebuffers {
    /// One framebuffer per swapchain image, each pairing a color view with
    /// the shared depth view.
    pub fn for_swapchain(
        device: Device,
        render_pass: vk::RenderPass,
        color_views: &[vk::ImageView],
        depth_view: vk::ImageView,
        extent: vk::Extent2D,
    ) -> VulkanResult<Self> {
        let mut framebuffers = Vec::with_capacity(color_views.len());
        for &color_view in color_views {
            let attachments = [color_view, depth_view];
            match Self::create_one(&device, render_pass, &attachments, extent) {
                Ok(framebuffer) => framebuffers.push(framebuffer),
                Err(e) => {
                    for framebuffer in framebuffers.drain(..) {
                        unsafe { device.destroy_framebuffer(framebuffer, None) };
                    }
                    return Err(e);
                }
            }
        }
        Ok(Self {
            device,
            framebuffers,
            extent,
        })
    }

    /// Single depth-only framebuffer for the shadow pass
    pub fn for_shadow_map(
        device: Device,
        render_pass: vk::RenderPass,
        depth_view: vk::ImageView,
        extent: vk::Extent2D,
    ) -> VulkanResult<Self> {
        let framebuffer = Self::create_one(&device, render_pass, &[depth_view], extent)?;
        Ok(Self {
            device,
            framebuffers: vec![framebuffer],
            extent,
        })
    }

    fn create_one(
        device: &Device,
        render_pass: vk::RenderPass,
        attachments: &[vk::ImageView],
        extent: vk::Extent2D,
    ) -> VulkanResult<vk::Framebuffer> {
        let create_info = vk::FramebufferCreateInfo::builder()
            .render_pass(render_pass)
            .attachments(attachments)
            .width(extent.width)
            .height(extent.height)
            .layers(1);
        unsafe {
            device
                .create_framebuffer(&create_info, None)
                .map_err(VulkanError::Api)
        }
    }

    pub fn get(&self, index: usize) -> vk::Framebuffer {
        self.framebuffers[index]
    }

    pub fn len(&self) -> usize {
        self.framebuffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.framebuffers.is_empty()
    }

    pub fn extent(&self) -> vk::Extent2D {
        self.extent
    }
}

impl Drop for Framebuffers {
    fn drop(&mut self) {
        unsafe {
            for &framebuffer in &self.framebuffers {
                self.device.destroy_framebuffer(framebuffer, None);
            }
        }
    }
}
