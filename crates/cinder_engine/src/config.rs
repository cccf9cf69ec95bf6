//! Renderer configuration
//!
//! Configuration is assembled either in code, through the builder-style
//! `with_*` methods, or from a TOML file. Everything has a sensible default so
//! a demo can get away with `RendererConfig::new("Demo")`. Validation happens
//! once, up front: a renderer is never constructed from an invalid config.

use serde::Deserialize;
use std::path::Path;

/// Paths to the pre-compiled SPIR-V shader binaries
///
/// Shader compilation is outside the engine; these are opaque byte blobs as
/// far as the renderer is concerned. A missing file is fatal at pipeline
/// creation time.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShaderPaths {
    /// Vertex shader for the lit main pass
    pub main_vertex: String,
    /// Fragment shader for the lit main pass
    pub main_fragment: String,
    /// Vertex shader for the depth-only shadow pass
    pub shadow_vertex: String,
}

impl Default for ShaderPaths {
    fn default() -> Self {
        Self {
            main_vertex: "shaders/forward.vert.spv".to_string(),
            main_fragment: "shaders/forward.frag.spv".to_string(),
            shadow_vertex: "shaders/shadow.vert.spv".to_string(),
        }
    }
}

/// Renderer configuration with validation and defaults
///
/// Capacities are fixed for the lifetime of the renderer; the shared
/// vertex/index buffers and the per-object uniform buffer are allocated once
/// at startup and never grow. Exceeding a capacity at runtime is a contract
/// violation reported as a fatal error.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Application name passed to the Vulkan instance
    pub application_name: String,
    /// Number of frames the CPU may record ahead of the GPU
    pub max_frames_in_flight: usize,
    /// Maximum number of vertices across all registered meshes
    pub max_vertices: usize,
    /// Maximum number of indices across all registered meshes
    pub max_indices: usize,
    /// Maximum number of draw calls per frame
    pub max_objects: usize,
    /// Enable the offscreen shadow pass
    pub shadow_pass: bool,
    /// Shadow map resolution (square)
    pub shadow_resolution: u32,
    /// Honor per-draw tint colors; when false every draw renders white
    pub per_draw_tint: bool,
    /// Clear color for the main pass
    pub clear_color: [f32; 4],
    /// SPIR-V shader binary paths
    pub shaders: ShaderPaths,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            application_name: "cinder".to_string(),
            max_frames_in_flight: 3,
            max_vertices: 100_000,
            max_indices: 100_000,
            max_objects: 100_000,
            shadow_pass: true,
            shadow_resolution: 1024,
            per_draw_tint: true,
            clear_color: [0.1, 0.1, 0.1, 1.0],
            shaders: ShaderPaths::default(),
        }
    }
}

impl RendererConfig {
    /// Create a config with defaults and the given application name
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            application_name: app_name.into(),
            ..Self::default()
        }
    }

    /// Set the number of frames in flight
    pub fn with_max_frames_in_flight(mut self, frames: usize) -> Self {
        self.max_frames_in_flight = frames;
        self
    }

    /// Set the shared geometry buffer capacities
    pub fn with_capacities(mut self, vertices: usize, indices: usize, objects: usize) -> Self {
        self.max_vertices = vertices;
        self.max_indices = indices;
        self.max_objects = objects;
        self
    }

    /// Enable or disable the shadow pass
    pub fn with_shadow_pass(mut self, enabled: bool) -> Self {
        self.shadow_pass = enabled;
        self
    }

    /// Set the shadow map resolution
    pub fn with_shadow_resolution(mut self, resolution: u32) -> Self {
        self.shadow_resolution = resolution;
        self
    }

    /// Enable or disable per-draw tinting
    pub fn with_per_draw_tint(mut self, enabled: bool) -> Self {
        self.per_draw_tint = enabled;
        self
    }

    /// Set shader binary paths
    pub fn with_shaders(mut self, shaders: ShaderPaths) -> Self {
        self.shaders = shaders;
        self
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| format!("failed to read config {:?}: {}", path.as_ref(), e))?;
        let config: Self =
            toml::from_str(&text).map_err(|e| format!("failed to parse config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.application_name.is_empty() {
            return Err("application name cannot be empty".to_string());
        }
        if self.max_frames_in_flight == 0 || self.max_frames_in_flight > 8 {
            return Err(format!(
                "max_frames_in_flight must be in 1..=8, got {}",
                self.max_frames_in_flight
            ));
        }
        if self.max_vertices == 0 || self.max_indices == 0 || self.max_objects == 0 {
            return Err("buffer capacities must be non-zero".to_string());
        }
        if self.shadow_pass && !self.shadow_resolution.is_power_of_two() {
            return Err(format!(
                "shadow_resolution must be a power of two, got {}",
                self.shadow_resolution
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(RendererConfig::default().validate().is_ok());
        assert_eq!(RendererConfig::default().max_frames_in_flight, 3);
    }

    #[test]
    fn builder_methods_apply() {
        let config = RendererConfig::new("test")
            .with_max_frames_in_flight(2)
            .with_shadow_pass(false)
            .with_per_draw_tint(false)
            .with_capacities(16, 24, 8);
        assert_eq!(config.max_frames_in_flight, 2);
        assert!(!config.shadow_pass);
        assert!(!config.per_draw_tint);
        assert_eq!(config.max_vertices, 16);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_frames_in_flight_rejected() {
        let config = RendererConfig::new("test").with_max_frames_in_flight(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_power_of_two_shadow_resolution_rejected() {
        let config = RendererConfig::new("test").with_shadow_resolution(1000);
        assert!(config.validate().is_err());
    }

    #[test]
    fn parses_from_toml() {
        let config: RendererConfig = toml::from_str(
            r#"
            application_name = "demo"
            max_frames_in_flight = 2
            shadow_resolution = 2048

            [shaders]
            main_vertex = "out/main.vert.spv"
            "#,
        )
        .unwrap();
        assert_eq!(config.application_name, "demo");
        assert_eq!(config.max_frames_in_flight, 2);
        assert_eq!(config.shadow_resolution, 2048);
        assert_eq!(config.shaders.main_vertex, "out/main.vert.spv");
        // Unspecified fields fall back to defaults.
        assert_eq!(config.max_vertices, 100_000);
    }
}
