//! SPIR-V shader modules

use std::path::Path;

use ash::vk;
use ash::Device;

use crate::render::error::{VulkanError, VulkanResult};

/// Compiled shader module with RAII cleanup
pub struct ShaderModule {
    device: Device,
    module: vk::ShaderModule,
}

impl ShaderModule {
    /// Create a module from SPIR-V bytes.
    ///
    /// The byte length must be a multiple of four and the data must be
    /// 4-byte aligned; both are checked here rather than assumed.
    pub fn from_bytes(device: Device, bytes: &[u8]) -> VulkanResult<Self> {
        if bytes.len() % 4 != 0 {
            return Err(VulkanError::InitializationFailed(
                "SPIR-V byte length is not a multiple of 4".to_string(),
            ));
        }
        let (prefix, words, suffix) = unsafe { bytes.align_to::<u32>() };
        if !prefix.is_empty() || !suffix.is_empty() {
            return Err(VulkanError::InitializationFailed(
                "SPIR-V data is not 4-byte aligned".to_string(),
            ));
        }

        let create_info = vk::ShaderModuleCreateInfo::builder().code(words);
        let module = unsafe {
            device
                .create_shader_module(&create_info, None)
                .map_err(VulkanError::Api)?
        };
        Ok(Self { device, module })
    }

    /// Load a module from a compiled `.spv` file
    pub fn from_file<P: AsRef<Path>>(device: Device, path: P) -> VulkanResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            VulkanError::InitializationFailed(format!(
                "failed to read shader {}: {}",
                path.display(),
                e
            ))
        })?;
        log::debug!("loaded shader {} ({} bytes)", path.display(), bytes.len());
        Self::from_bytes(device, &bytes)
    }

    pub fn handle(&self) -> vk::ShaderModule {
        self.module
    }
}

impl Drop for ShaderModule {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_shader_module(self.module, None);
        }
    }
}
