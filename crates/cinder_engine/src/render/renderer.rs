//! Renderer orchestration
//!
//! [`Renderer`] owns every GPU resource and drives the two-pass frame loop:
//! a depth-only shadow pass into an offscreen map, then a lit main pass
//! that samples it. Frame pacing allows up to `frames_in_flight` frames of
//! CPU work ahead of the GPU; each in-flight slot carries its own uniform
//! buffers, descriptor sets and synchronization objects.

use ash::vk;

use crate::config::RendererConfig;
use crate::foundation::math::{self, Mat4, Vec3, Vec4};
use crate::mesh::Mesh;
use crate::render::buffer::Buffer;
use crate::render::commands::{build_draw_commands, CommandBuffers, DrawCommand};
use crate::render::context::VulkanContext;
use crate::render::descriptor::{AddressMode, DescriptorPool, DescriptorSetLayout};
use crate::render::error::{VulkanError, VulkanResult};
use crate::render::framebuffers::Framebuffers;
use crate::render::geometry::{GeometryStore, MeshHandle};
use crate::render::pipeline::{GraphicsPipeline, PipelineLayout};
use crate::render::registry::{DrawCall, DrawRegistry};
use crate::render::render_pass::RenderPass;
use crate::render::shader::ShaderModule;
use crate::render::shadow_map::ShadowMap;
use crate::render::swapchain::{DepthBuffer, Swapchain};
use crate::render::sync::{Fence, FrameSchedule, FrameSync, Semaphore};
use crate::render::uniforms::{
    aligned_stride, pack_object_uniforms, ObjectUniform, SceneUniform,
};
use crate::render::vertex::Vertex;
use crate::render::window::Window;

const FENCE_TIMEOUT: u64 = u64::MAX;
const CAMERA_FOV_DEGREES: f32 = 85.0;
const NEAR_PLANE: f32 = 0.1;
const FAR_PLANE: f32 = 100.0;

/// Per-slot resources for one in-flight frame
struct FrameSlot {
    sync: FrameSync,
    scene_buffer: Buffer,
    object_buffer: Buffer,
    scene_set: vk::DescriptorSet,
    object_set: vk::DescriptorSet,
}

/// Camera and lighting state folded into the scene uniform each frame
struct SceneState {
    view: Mat4,
    projection: Mat4,
    light_position: Vec3,
    light_target: Vec3,
    light_color: Vec4,
    ambient_color: Vec4,
}

impl SceneState {
    fn to_uniform(&self) -> SceneUniform {
        let up = Vec3::new(0.0, 1.0, 0.0);
        let light_view = math::look_at(self.light_position, self.light_target, up);
        // Square shadow map, so a unit aspect ratio.
        let light_projection = math::perspective_vk(CAMERA_FOV_DEGREES, 1.0, NEAR_PLANE, FAR_PLANE);
        let direction = (self.light_target - self.light_position).normalize();
        SceneUniform {
            view: math::to_columns(&self.view),
            projection: math::to_columns(&self.projection),
            light_view: math::to_columns(&light_view),
            light_projection: math::to_columns(&light_projection),
            light_direction: [direction.x, direction.y, direction.z, 0.0],
            light_color: [
                self.light_color.x,
                self.light_color.y,
                self.light_color.z,
                self.light_color.w,
            ],
            ambient_color: [
                self.ambient_color.x,
                self.ambient_color.y,
                self.ambient_color.z,
                self.ambient_color.w,
            ],
        }
    }
}

/// Two-pass forward renderer.
///
/// Field order is load-bearing: everything that holds device objects is
/// declared before `context` so it drops first, and `Renderer::drop` waits
/// for the device to go idle before any of that teardown starts.
pub struct Renderer {
    // CPU-side bookkeeping
    geometry: GeometryStore,
    registry: DrawRegistry,
    schedule: FrameSchedule,
    scene: SceneState,
    uniform_stride: usize,
    clear_color: [f32; 4],
    shadow_pass_enabled: bool,
    per_draw_tint: bool,

    // Per-slot frame resources
    slots: Vec<FrameSlot>,
    main_commands: CommandBuffers,
    shadow_command: vk::CommandBuffer,
    shadow_finished: Semaphore,
    shadow_in_flight: Fence,

    // Shared GPU resources
    vertex_buffer: Buffer,
    index_buffer: Buffer,
    shadow_set: vk::DescriptorSet,
    descriptor_pool: DescriptorPool,
    forward_pipeline: GraphicsPipeline,
    shadow_pipeline: GraphicsPipeline,
    pipeline_layout: PipelineLayout,
    scene_layout: DescriptorSetLayout,
    object_layout: DescriptorSetLayout,
    shadow_sampler_layout: DescriptorSetLayout,
    forward_framebuffers: Framebuffers,
    shadow_framebuffers: Framebuffers,
    forward_pass: RenderPass,
    shadow_pass: RenderPass,
    shadow_map: ShadowMap,
    depth_buffer: DepthBuffer,
    swapchain: Swapchain,
    context: VulkanContext,
}

impl Renderer {
    pub fn new(window: &mut Window, config: &RendererConfig) -> VulkanResult<Self> {
        config
            .validate()
            .map_err(VulkanError::InitializationFailed)?;

        let context = VulkanContext::new(window, &config.application_name)?;
        let device = context.raw_device();
        let instance = context.instance();
        let physical = context.physical_device.device;

        let (width, height) = window.framebuffer_size();
        let window_extent = vk::Extent2D { width, height };
        let swapchain = Swapchain::new(
            instance,
            device.clone(),
            context.surface,
            &context.surface_loader,
            &context.physical_device,
            window_extent,
        )?;
        let extent = swapchain.extent();

        let depth_buffer = DepthBuffer::new(device.clone(), instance, physical, extent)?;
        let shadow_map = ShadowMap::new(
            device.clone(),
            instance,
            physical,
            config.shadow_resolution,
        )?;

        let forward_pass = RenderPass::new_forward(device.clone(), swapchain.format())?;
        let shadow_pass = RenderPass::new_shadow(device.clone())?;

        let forward_framebuffers = Framebuffers::for_swapchain(
            device.clone(),
            forward_pass.handle(),
            swapchain.image_views(),
            depth_buffer.view(),
            extent,
        )?;
        let shadow_framebuffers = Framebuffers::for_shadow_map(
            device.clone(),
            shadow_pass.handle(),
            shadow_map.view(),
            shadow_map.extent(),
        )?;

        let scene_layout = DescriptorSetLayout::uniform(
            device.clone(),
            AddressMode::Static,
            vk::ShaderStageFlags::VERTEX | vk::ShaderStageFlags::FRAGMENT,
        )?;
        let object_layout = DescriptorSetLayout::uniform(
            device.clone(),
            AddressMode::Dynamic,
            vk::ShaderStageFlags::VERTEX | vk::ShaderStageFlags::FRAGMENT,
        )?;
        let shadow_sampler_layout = DescriptorSetLayout::combined_sampler(
            device.clone(),
            vk::ShaderStageFlags::FRAGMENT,
        )?;
        let pipeline_layout = PipelineLayout::new(
            device.clone(),
            &[
                scene_layout.handle(),
                object_layout.handle(),
                shadow_sampler_layout.handle(),
            ],
        )?;

        let main_vertex = ShaderModule::from_file(device.clone(), &config.shaders.main_vertex)?;
        let main_fragment =
            ShaderModule::from_file(device.clone(), &config.shaders.main_fragment)?;
        let shadow_vertex =
            ShaderModule::from_file(device.clone(), &config.shaders.shadow_vertex)?;

        let forward_pipeline = GraphicsPipeline::new(
            device.clone(),
            &pipeline_layout,
            forward_pass.handle(),
            extent,
            &main_vertex,
            Some(&main_fragment),
        )?;
        let shadow_pipeline = GraphicsPipeline::new(
            device.clone(),
            &pipeline_layout,
            shadow_pass.handle(),
            shadow_map.extent(),
            &shadow_vertex,
            None,
        )?;

        let uniform_stride = aligned_stride(
            std::mem::size_of::<ObjectUniform>(),
            context.physical_device.min_uniform_buffer_offset_alignment as usize,
        );
        log::debug!(
            "object uniform stride: {} bytes ({} raw)",
            uniform_stride,
            std::mem::size_of::<ObjectUniform>()
        );

        let vertex_buffer = Buffer::new(
            device.clone(),
            instance,
            physical,
            "vertices",
            (config.max_vertices * std::mem::size_of::<Vertex>()) as vk::DeviceSize,
            vk::BufferUsageFlags::VERTEX_BUFFER,
        )?;
        let index_buffer = Buffer::new(
            device.clone(),
            instance,
            physical,
            "indices",
            (config.max_indices * std::mem::size_of::<u32>()) as vk::DeviceSize,
            vk::BufferUsageFlags::INDEX_BUFFER,
        )?;

        let frames = config.max_frames_in_flight;
        let descriptor_pool = DescriptorPool::new(device.clone(), (frames * 2 + 1) as u32)?;
        let shadow_set = descriptor_pool.allocate(&shadow_sampler_layout)?;
        descriptor_pool.write_sampler(shadow_set, shadow_map.view(), shadow_map.sampler());

        let mut slots = Vec::with_capacity(frames);
        for slot_index in 0..frames {
            let scene_buffer = Buffer::new(
                device.clone(),
                instance,
                physical,
                "scene uniforms",
                std::mem::size_of::<SceneUniform>() as vk::DeviceSize,
                vk::BufferUsageFlags::UNIFORM_BUFFER,
            )?;
            let object_buffer = Buffer::new(
                device.clone(),
                instance,
                physical,
                "object uniforms",
                (config.max_objects * uniform_stride) as vk::DeviceSize,
                vk::BufferUsageFlags::UNIFORM_BUFFER,
            )?;
            let scene_set = descriptor_pool.allocate(&scene_layout)?;
            descriptor_pool.write_uniform(
                scene_set,
                &scene_layout,
                scene_buffer.handle(),
                std::mem::size_of::<SceneUniform>() as vk::DeviceSize,
            );
            let object_set = descriptor_pool.allocate(&object_layout)?;
            descriptor_pool.write_uniform(
                object_set,
                &object_layout,
                object_buffer.handle(),
                uniform_stride as vk::DeviceSize,
            );
            let sync = FrameSync::new(device.clone())?;
            log::debug!("created frame slot {slot_index}");
            slots.push(FrameSlot {
                sync,
                scene_buffer,
                object_buffer,
                scene_set,
                object_set,
            });
        }

        let main_commands =
            CommandBuffers::allocate(&device, context.command_pool(), frames as u32)?;
        let shadow_commands = CommandBuffers::allocate(&device, context.command_pool(), 1)?;
        let shadow_command = shadow_commands.get(0);
        let shadow_finished = Semaphore::new(device.clone())?;
        let shadow_in_flight = Fence::new(device.clone(), true)?;

        let aspect = extent.width as f32 / extent.height as f32;
        let scene = SceneState {
            view: math::look_at(
                Vec3::new(0.0, 2.0, 4.0),
                Vec3::zeros(),
                Vec3::new(0.0, 1.0, 0.0),
            ),
            projection: math::perspective_vk(CAMERA_FOV_DEGREES, aspect, NEAR_PLANE, FAR_PLANE),
            light_position: Vec3::new(4.0, 6.0, 2.0),
            light_target: Vec3::zeros(),
            light_color: Vec4::new(1.0, 1.0, 1.0, 1.0),
            ambient_color: Vec4::new(0.1, 0.1, 0.1, 1.0),
        };

        let renderer = Self {
            geometry: GeometryStore::new(config.max_vertices, config.max_indices),
            registry: DrawRegistry::new(config.max_objects),
            schedule: FrameSchedule::new(frames),
            scene,
            uniform_stride,
            clear_color: config.clear_color,
            shadow_pass_enabled: config.shadow_pass,
            per_draw_tint: config.per_draw_tint,
            slots,
            main_commands,
            shadow_command,
            shadow_finished,
            shadow_in_flight,
            vertex_buffer,
            index_buffer,
            shadow_set,
            descriptor_pool,
            forward_pipeline,
            shadow_pipeline,
            pipeline_layout,
            scene_layout,
            object_layout,
            shadow_sampler_layout,
            forward_framebuffers,
            shadow_framebuffers,
            forward_pass,
            shadow_pass,
            shadow_map,
            depth_buffer,
            swapchain,
            context,
        };

        if !renderer.shadow_pass_enabled {
            // The fragment shader always samples the shadow map; run one
            // empty shadow pass so the image reaches its sampled layout
            // with far-plane depth everywhere.
            renderer.clear_shadow_map_once()?;
        }

        log::info!(
            "renderer ready: {} frames in flight, shadow pass {}",
            frames,
            if renderer.shadow_pass_enabled {
                "on"
            } else {
                "off"
            }
        );
        Ok(renderer)
    }

    /// Upload a mesh into the shared geometry buffers and return its handle.
    ///
    /// Only the newly appended vertex and index ranges are written to the
    /// device; registration is append-only and meshes are never evicted.
    pub fn register_mesh(&mut self, mesh: &Mesh) -> VulkanResult<MeshHandle> {
        let (handle, range) = self.geometry.append(mesh)?;
        let vertices = &self.geometry.vertices()[range.vertex_start..];
        let indices = &self.geometry.indices()[range.index_start..];
        self.vertex_buffer.write_region(vertices, range.vertex_start)?;
        self.index_buffer.write_region(indices, range.index_start)?;
        Ok(handle)
    }

    /// Queue a draw of `mesh` with the given model transform for the next
    /// frame.
    pub fn submit_draw_call(&mut self, mesh: MeshHandle, transform: Mat4) -> VulkanResult<()> {
        self.submit_draw_call_tinted(mesh, transform, Vec4::new(1.0, 1.0, 1.0, 1.0))
    }

    /// Queue a tinted draw. When tinting was disabled at construction the
    /// tint is replaced with white.
    pub fn submit_draw_call_tinted(
        &mut self,
        mesh: MeshHandle,
        transform: Mat4,
        tint: Vec4,
    ) -> VulkanResult<()> {
        if !self.geometry.contains(mesh) {
            return Err(VulkanError::InvalidMeshHandle {
                handle: mesh.index(),
                pool_size: self.geometry.mesh_count(),
            });
        }
        let tint = if self.per_draw_tint {
            tint
        } else {
            Vec4::new(1.0, 1.0, 1.0, 1.0)
        };
        self.registry.push(DrawCall {
            mesh,
            transform,
            tint,
        })
    }

    /// Position the camera. The projection is fixed at construction from
    /// the swapchain aspect ratio.
    pub fn set_camera(&mut self, eye: Vec3, target: Vec3) {
        self.scene.view = math::look_at(eye, target, Vec3::new(0.0, 1.0, 0.0));
    }

    /// Set the light that both lights the scene and casts the shadow map
    pub fn set_scene_lighting(
        &mut self,
        light_position: Vec3,
        light_target: Vec3,
        light_color: Vec4,
        ambient_color: Vec4,
    ) {
        self.scene.light_position = light_position;
        self.scene.light_target = light_target;
        self.scene.light_color = light_color;
        self.scene.ambient_color = ambient_color;
    }

    /// Render and present one frame from the queued draw calls.
    ///
    /// The registry is drained whether the frame succeeds or fails, so the
    /// caller resubmits draws every frame and a failed present never
    /// replays stale state.
    pub fn render_frame(&mut self) -> VulkanResult<()> {
        let result = self.render_frame_inner();
        self.registry.clear();
        result
    }

    fn render_frame_inner(&mut self) -> VulkanResult<()> {
        let (slot_index, must_wait) = self.schedule.begin_frame();
        if must_wait {
            // Gates both slot resource reuse and the uniform writes below.
            self.slots[slot_index].sync.in_flight.wait(FENCE_TIMEOUT)?;
        }

        let scene_uniform = self.scene.to_uniform();
        self.slots[slot_index]
            .scene_buffer
            .write_data(&[scene_uniform])?;

        let object_uniforms = self.registry.object_uniforms();
        let packed = pack_object_uniforms(
            &object_uniforms,
            self.uniform_stride,
            self.slots[slot_index].object_buffer.size() as usize,
        )?;
        self.slots[slot_index].object_buffer.write_bytes(&packed)?;

        let handles = self.registry.handles();
        let commands = build_draw_commands(&self.geometry, &handles, self.uniform_stride)?;

        if self.shadow_pass_enabled {
            self.submit_shadow_pass(slot_index, &commands)?;
        }

        let device = &self.context.device.device;
        let (image_index, _suboptimal) = unsafe {
            self.context
                .swapchain_loader()
                .acquire_next_image(
                    self.swapchain.handle(),
                    FENCE_TIMEOUT,
                    self.slots[slot_index].sync.image_available.handle(),
                    vk::Fence::null(),
                )
                .map_err(VulkanError::Api)?
        };

        self.record_main_commands(slot_index, image_index as usize, &commands)?;

        // Reset only once this frame's submit is certain to follow, so an
        // earlier error cannot leave the fence permanently unsignaled.
        self.slots[slot_index].sync.in_flight.reset()?;

        let command_buffers = [self.main_commands.get(slot_index)];
        let signal_semaphores = [self.slots[slot_index].sync.render_finished.handle()];
        let shadow_wait = [
            self.shadow_finished.handle(),
            self.slots[slot_index].sync.image_available.handle(),
        ];
        let shadow_stages = [
            vk::PipelineStageFlags::FRAGMENT_SHADER,
            vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT,
        ];
        let plain_wait = [self.slots[slot_index].sync.image_available.handle()];
        let plain_stages = [vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT];
        let (wait_semaphores, wait_stages): (&[vk::Semaphore], &[vk::PipelineStageFlags]) =
            if self.shadow_pass_enabled {
                (&shadow_wait, &shadow_stages)
            } else {
                (&plain_wait, &plain_stages)
            };

        let submit_info = vk::SubmitInfo::builder()
            .wait_semaphores(wait_semaphores)
            .wait_dst_stage_mask(wait_stages)
            .command_buffers(&command_buffers)
            .signal_semaphores(&signal_semaphores)
            .build();
        unsafe {
            device
                .queue_submit(
                    self.context.queue(),
                    &[submit_info],
                    self.slots[slot_index].sync.in_flight.handle(),
                )
                .map_err(VulkanError::Api)?;
        }

        let swapchains = [self.swapchain.handle()];
        let image_indices = [image_index];
        let present_info = vk::PresentInfoKHR::builder()
            .wait_semaphores(&signal_semaphores)
            .swapchains(&swapchains)
            .image_indices(&image_indices);
        unsafe {
            self.context
                .swapchain_loader()
                .queue_present(self.context.queue(), &present_info)
                .map_err(VulkanError::Api)?;
        }

        self.schedule.advance();
        Ok(())
    }

    fn submit_shadow_pass(
        &mut self,
        slot_index: usize,
        commands: &[DrawCommand],
    ) -> VulkanResult<()> {
        // One shadow command buffer, serialized by its own fence.
        self.shadow_in_flight.wait(FENCE_TIMEOUT)?;
        self.shadow_in_flight.reset()?;
        self.record_shadow_commands(slot_index, commands)?;

        let command_buffers = [self.shadow_command];
        let signal_semaphores = [self.shadow_finished.handle()];
        let submit_info = vk::SubmitInfo::builder()
            .command_buffers(&command_buffers)
            .signal_semaphores(&signal_semaphores)
            .build();
        unsafe {
            self.context
                .device
                .device
                .queue_submit(
                    self.context.queue(),
                    &[submit_info],
                    self.shadow_in_flight.handle(),
                )
                .map_err(VulkanError::Api)
        }
    }

    fn record_shadow_commands(
        &self,
        slot_index: usize,
        commands: &[DrawCommand],
    ) -> VulkanResult<()> {
        let device = &self.context.device.device;
        let cmd = self.shadow_command;
        let begin_info = vk::CommandBufferBeginInfo::builder();
        unsafe {
            device
                .begin_command_buffer(cmd, &begin_info)
                .map_err(VulkanError::Api)?;
        }

        let clear_values = [vk::ClearValue {
            depth_stencil: vk::ClearDepthStencilValue {
                depth: 1.0,
                stencil: 0,
            },
        }];
        let pass_info = vk::RenderPassBeginInfo::builder()
            .render_pass(self.shadow_pass.handle())
            .framebuffer(self.shadow_framebuffers.get(0))
            .render_area(vk::Rect2D {
                offset: vk::Offset2D { x: 0, y: 0 },
                extent: self.shadow_map.extent(),
            })
            .clear_values(&clear_values);

        unsafe {
            device.cmd_begin_render_pass(cmd, &pass_info, vk::SubpassContents::INLINE);
            device.cmd_bind_pipeline(
                cmd,
                vk::PipelineBindPoint::GRAPHICS,
                self.shadow_pipeline.handle(),
            );
            self.record_draws(cmd, slot_index, commands);
            device.cmd_end_render_pass(cmd);
            device.end_command_buffer(cmd).map_err(VulkanError::Api)?;
        }
        Ok(())
    }

    fn record_main_commands(
        &self,
        slot_index: usize,
        image_index: usize,
        commands: &[DrawCommand],
    ) -> VulkanResult<()> {
        let device = &self.context.device.device;
        let cmd = self.main_commands.get(slot_index);
        let begin_info = vk::CommandBufferBeginInfo::builder();
        unsafe {
            device
                .begin_command_buffer(cmd, &begin_info)
                .map_err(VulkanError::Api)?;
        }

        let clear_values = [
            vk::ClearValue {
                color: vk::ClearColorValue {
                    float32: self.clear_color,
                },
            },
            vk::ClearValue {
                depth_stencil: vk::ClearDepthStencilValue {
                    depth: 1.0,
                    stencil: 0,
                },
            },
        ];
        let pass_info = vk::RenderPassBeginInfo::builder()
            .render_pass(self.forward_pass.handle())
            .framebuffer(self.forward_framebuffers.get(image_index))
            .render_area(vk::Rect2D {
                offset: vk::Offset2D { x: 0, y: 0 },
                extent: self.swapchain.extent(),
            })
            .clear_values(&clear_values);

        unsafe {
            device.cmd_begin_render_pass(cmd, &pass_info, vk::SubpassContents::INLINE);
            device.cmd_bind_pipeline(
                cmd,
                vk::PipelineBindPoint::GRAPHICS,
                self.forward_pipeline.handle(),
            );
            self.record_draws(cmd, slot_index, commands);
            device.cmd_end_render_pass(cmd);
            device.end_command_buffer(cmd).map_err(VulkanError::Api)?;
        }
        Ok(())
    }

    /// Shared draw recording for both passes: bind the geometry buffers,
    /// then per draw bind all three sets with the draw's dynamic offset.
    fn record_draws(&self, cmd: vk::CommandBuffer, slot_index: usize, commands: &[DrawCommand]) {
        let device = &self.context.device.device;
        let slot = &self.slots[slot_index];
        unsafe {
            device.cmd_bind_vertex_buffers(cmd, 0, &[self.vertex_buffer.handle()], &[0]);
            device.cmd_bind_index_buffer(
                cmd,
                self.index_buffer.handle(),
                0,
                vk::IndexType::UINT32,
            );
            for command in commands {
                device.cmd_bind_descriptor_sets(
                    cmd,
                    vk::PipelineBindPoint::GRAPHICS,
                    self.pipeline_layout.handle(),
                    0,
                    &[slot.scene_set, slot.object_set, self.shadow_set],
                    &[command.dynamic_offset],
                );
                device.cmd_draw_indexed(
                    cmd,
                    command.index_count,
                    1,
                    command.first_index,
                    command.vertex_offset,
                    0,
                );
            }
        }
    }

    /// Run one empty shadow pass so the map is cleared to the far plane and
    /// transitioned into its sampled layout.
    fn clear_shadow_map_once(&self) -> VulkanResult<()> {
        self.shadow_in_flight.wait(FENCE_TIMEOUT)?;
        self.shadow_in_flight.reset()?;

        let device = &self.context.device.device;
        let cmd = self.shadow_command;
        let begin_info = vk::CommandBufferBeginInfo::builder()
            .flags(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT);
        let clear_values = [vk::ClearValue {
            depth_stencil: vk::ClearDepthStencilValue {
                depth: 1.0,
                stencil: 0,
            },
        }];
        let pass_info = vk::RenderPassBeginInfo::builder()
            .render_pass(self.shadow_pass.handle())
            .framebuffer(self.shadow_framebuffers.get(0))
            .render_area(vk::Rect2D {
                offset: vk::Offset2D { x: 0, y: 0 },
                extent: self.shadow_map.extent(),
            })
            .clear_values(&clear_values);
        unsafe {
            device
                .begin_command_buffer(cmd, &begin_info)
                .map_err(VulkanError::Api)?;
            device.cmd_begin_render_pass(cmd, &pass_info, vk::SubpassContents::INLINE);
            device.cmd_end_render_pass(cmd);
            device.end_command_buffer(cmd).map_err(VulkanError::Api)?;

            let command_buffers = [cmd];
            let submit_info = vk::SubmitInfo::builder()
                .command_buffers(&command_buffers)
                .build();
            device
                .queue_submit(
                    self.context.queue(),
                    &[submit_info],
                    self.shadow_in_flight.handle(),
                )
                .map_err(VulkanError::Api)?;
        }
        self.shadow_in_flight.wait(FENCE_TIMEOUT)
    }

    /// Number of meshes registered so far
    pub fn mesh_count(&self) -> usize {
        self.geometry.mesh_count()
    }

    /// Block until all submitted GPU work retires
    pub fn wait_idle(&self) -> VulkanResult<()> {
        self.context.wait_idle()
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        // All device objects below are still in flight until this returns;
        // only then may the field drops run.
        if let Err(e) = self.context.wait_idle() {
            log::warn!("device wait failed during renderer teardown: {e}");
        }
        log::debug!("renderer shut down");
    }
}
