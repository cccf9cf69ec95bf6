//! Descriptor layouts, pool and set updates
//!
//! The renderer binds three single-binding sets per draw: scene uniforms
//! (set 0), per-object uniforms at a dynamic offset (set 1) and the shadow
//! map sampler (set 2). Every layout here has exactly one binding at
//! index 0.

use ash::vk;
use ash::Device;

use crate::render::error::{VulkanError, VulkanResult};

/// Whether a uniform binding takes a per-draw dynamic offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressMode {
    /// Bound once per frame at offset zero
    Static,
    /// Rebound per draw with `dynamic_offset = draw_index * stride`
    Dynamic,
}

impl AddressMode {
    fn descriptor_type(self) -> vk::DescriptorType {
        match self {
            AddressMode::Static => vk::DescriptorType::UNIFORM_BUFFER,
            AddressMode::Dynamic => vk::DescriptorType::UNIFORM_BUFFER_DYNAMIC,
        }
    }
}

/// Descriptor set layout with RAII cleanup
pub struct DescriptorSetLayout {
    device: Device,
    layout: vk::DescriptorSetLayout,
    descriptor_type: vk::DescriptorType,
}

impl DescriptorSetLayout {
    /// Layout for a uniform buffer binding visible to the given stages
    pub fn uniform(
        device: Device,
        mode: AddressMode,
        stages: vk::ShaderStageFlags,
    ) -> VulkanResult<Self> {
        Self::new(device, mode.descriptor_type(), stages)
    }

    /// Layout for a combined image sampler binding
    pub fn combined_sampler(device: Device, stages: vk::ShaderStageFlags) -> VulkanResult<Self> {
        Self::new(device, vk::DescriptorType::COMBINED_IMAGE_SAMPLER, stages)
    }

    fn new(
        device: Device,
        descriptor_type: vk::DescriptorType,
        stages: vk::ShaderStageFlags,
    ) -> VulkanResult<Self> {
        let binding = vk::DescriptorSetLayoutBinding::builder()
            .binding(0)
            .descriptor_type(descriptor_type)
            .descriptor_count(1)
            .stage_flags(stages)
            .build();
        let create_info = vk::DescriptorSetLayoutCreateInfo::builder()
            .bindings(std::slice::from_ref(&binding));
        let layout = unsafe {
            device
                .create_descriptor_set_layout(&create_info, None)
                .map_err(VulkanError::Api)?
        };
        Ok(Self {
            device,
            layout,
            descriptor_type,
        })
    }

    pub fn handle(&self) -> vk::DescriptorSetLayout {
        self.layout
    }

    pub fn descriptor_type(&self) -> vk::DescriptorType {
        self.descriptor_type
    }
}

impl Drop for DescriptorSetLayout {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_descriptor_set_layout(self.layout, None);
        }
    }
}

/// Descriptor pool sized for the renderer's fixed set of bindings
pub struct DescriptorPool {
    device: Device,
    pool: vk::DescriptorPool,
}

impl DescriptorPool {
    pub fn new(device: Device, max_sets: u32) -> VulkanResult<Self> {
        let pool_sizes = [
            vk::DescriptorPoolSize {
                ty: vk::DescriptorType::UNIFORM_BUFFER,
                descriptor_count: max_sets,
            },
            vk::DescriptorPoolSize {
                ty: vk::DescriptorType::UNIFORM_BUFFER_DYNAMIC,
                descriptor_count: max_sets,
            },
            vk::DescriptorPoolSize {
                ty: vk::DescriptorType::COMBINED_IMAGE_SAMPLER,
                descriptor_count: max_sets,
            },
        ];
        let create_info = vk::DescriptorPoolCreateInfo::builder()
            .pool_sizes(&pool_sizes)
            .max_sets(max_sets);
        let pool = unsafe {
            device
                .create_descriptor_pool(&create_info, None)
                .map_err(VulkanError::Api)?
        };
        Ok(Self { device, pool })
    }

    /// Allocate one set for the given layout. Sets live as long as the pool.
    pub fn allocate(&self, layout: &DescriptorSetLayout) -> VulkanResult<vk::DescriptorSet> {
        let layouts = [layout.handle()];
        let alloc_info = vk::DescriptorSetAllocateInfo::builder()
            .descriptor_pool(self.pool)
            .set_layouts(&layouts);
        let sets = unsafe {
            self.device
                .allocate_descriptor_sets(&alloc_info)
                .map_err(VulkanError::Api)?
        };
        Ok(sets[0])
    }

    /// Point a uniform set at a buffer range.
    ///
    /// For dynamic bindings `range` is the per-block stride, not the whole
    /// buffer size.
    pub fn write_uniform(
        &self,
        set: vk::DescriptorSet,
        layout: &DescriptorSetLayout,
        buffer: vk::Buffer,
        range: vk::DeviceSize,
    ) {
        let buffer_info = vk::DescriptorBufferInfo {
            buffer,
            offset: 0,
            range,
        };
        let write = vk::WriteDescriptorSet::builder()
            .dst_set(set)
            .dst_binding(0)
            .descriptor_type(layout.descriptor_type())
            .buffer_info(std::slice::from_ref(&buffer_info))
            .build();
        unsafe {
            self.device.update_descriptor_sets(&[write], &[]);
        }
    }

    /// Point a sampler set at a depth image in its sampled layout
    pub fn write_sampler(
        &self,
        set: vk::DescriptorSet,
        view: vk::ImageView,
        sampler: vk::Sampler,
    ) {
        let image_info = vk::DescriptorImageInfo {
            sampler,
            image_view: view,
            image_layout: vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL,
        };
        let write = vk::WriteDescriptorSet::builder()
            .dst_set(set)
            .dst_binding(0)
            .descriptor_type(vk::DescriptorType::COMBINED_IMAGE_SAMPLER)
            .image_info(std::slice::from_ref(&image_info))
            .build();
        unsafe {
            self.device.update_descriptor_sets(&[write], &[]);
        }
    }
}

impl Drop for DescriptorPool {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_descriptor_pool(self.pool, None);
        }
    }
}
