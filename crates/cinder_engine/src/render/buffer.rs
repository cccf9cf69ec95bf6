//! Host-visible device buffers

use ash::vk;
use ash::{Device, Instance};

use crate::render::error::{VulkanError, VulkanResult};

/// Buffer with bound memory and RAII cleanup.
///
/// All renderer buffers are host-visible and host-coherent; writes go
/// through a map/copy/unmap cycle with no staging pass. The name is kept
/// for log output only.
pub struct Buffer {
    device: Device,
    buffer: vk::Buffer,
    memory: vk::DeviceMemory,
    size: vk::DeviceSize,
    name: &'static str,
}

impl Buffer {
    pub fn new(
        device: Device,
        instance: &Instance,
        physical_device: vk::PhysicalDevice,
        name: &'static str,
        size: vk::DeviceSize,
        usage: vk::BufferUsageFlags,
    ) -> VulkanResult<Self> {
        let buffer_info = vk::BufferCreateInfo::builder()
            .size(size)
            .usage(usage)
            .sharing_mode(vk::SharingMode::EXCLUSIVE);
        let buffer = unsafe {
            device
                .create_buffer(&buffer_info, None)
                .map_err(VulkanError::Api)?
        };

        let requirements = unsafe { device.get_buffer_memory_requirements(buffer) };
        let properties =
            vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT;
        let memory_type = match find_memory_type(
            instance,
            physical_device,
            requirements.memory_type_bits,
            properties,
        ) {
            Ok(index) => index,
            Err(e) => {
                unsafe { device.destroy_buffer(buffer, None) };
                return Err(e);
            }
        };

        let alloc_info = vk::MemoryAllocateInfo::builder()
            .allocation_size(requirements.size)
            .memory_type_index(memory_type);
        let memory = match unsafe { device.allocate_memory(&alloc_info, None) } {
            Ok(memory) => memory,
            Err(e) => {
                unsafe { device.destroy_buffer(buffer, None) };
                return Err(VulkanError::Api(e));
            }
        };

        if let Err(e) = unsafe { device.bind_buffer_memory(buffer, memory, 0) } {
            unsafe {
                device.free_memory(memory, None);
                device.destroy_buffer(buffer, None);
            }
            return Err(VulkanError::Api(e));
        }

        log::debug!("created buffer \"{}\" ({} bytes, {:?})", name, size, usage);
        Ok(Self {
            device,
            buffer,
            memory,
            size,
            name,
        })
    }

    /// Copy `data` to the start of the buffer
    pub fn write_data<T: bytemuck::Pod>(&self, data: &[T]) -> VulkanResult<()> {
        self.write_region(data, 0)
    }

    /// Copy `data` starting at `element_offset` elements into the buffer.
    ///
    /// Used for partial uploads after a geometry append: only the newly
    /// added range is written, existing contents stay untouched.
    pub fn write_region<T: bytemuck::Pod>(
        &self,
        data: &[T],
        element_offset: usize,
    ) -> VulkanResult<()> {
        if data.is_empty() {
            return Ok(());
        }
        let element_size = std::mem::size_of::<T>();
        let byte_offset = (element_offset * element_size) as vk::DeviceSize;
        let byte_len = std::mem::size_of_val(data) as vk::DeviceSize;
        if byte_offset + byte_len > self.size {
            return Err(VulkanError::CapacityExceeded {
                resource: self.name,
                requested: (byte_offset + byte_len) as usize,
                capacity: self.size as usize,
            });
        }

        let bytes: &[u8] = bytemuck::cast_slice(data);
        unsafe {
            let mapped = self
                .device
                .map_memory(self.memory, byte_offset, byte_len, vk::MemoryMapFlags::empty())
                .map_err(VulkanError::Api)?;
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), mapped as *mut u8, bytes.len());
            self.device.unmap_memory(self.memory);
        }
        Ok(())
    }

    /// Copy raw bytes to the start of the buffer
    pub fn write_bytes(&self, bytes: &[u8]) -> VulkanResult<()> {
        self.write_region::<u8>(bytes, 0)
    }

    pub fn handle(&self) -> vk::Buffer {
        self.buffer
    }

    pub fn size(&self) -> vk::DeviceSize {
        self.size
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_buffer(self.buffer, None);
            self.device.free_memory(self.memory, None);
        }
    }
}

/// Find a memory type index satisfying the filter and property flags
pub fn find_memory_type(
    instance: &Instance,
    physical_device: vk::PhysicalDevice,
    type_filter: u32,
    properties: vk::MemoryPropertyFlags,
) -> VulkanResult<u32> {
    let memory_properties =
        unsafe { instance.get_physical_device_memory_properties(physical_device) };
    for i in 0..memory_properties.memory_type_count {
        let suitable = (type_filter & (1 << i)) != 0;
        let has_properties = memory_properties.memory_types[i as usize]
            .property_flags
            .contains(properties);
        if suitable && has_properties {
            return Ok(i);
        }
    }
    Err(VulkanError::NoSuitableMemoryType)
}
