//! Synchronization primitives and frame pacing
//!
//! RAII wrappers over Vulkan semaphores and fences, plus [`FrameSchedule`],
//! the pure slot-rotation state machine that decides which in-flight frame
//! slot each frame uses and when the CPU must stall on that slot's fence.

use ash::vk;
use ash::Device;

use crate::render::error::{VulkanError, VulkanResult};

/// Binary semaphore for GPU-GPU ordering
pub struct Semaphore {
    device: Device,
    semaphore: vk::Semaphore,
}

impl Semaphore {
    pub fn new(device: Device) -> VulkanResult<Self> {
        let create_info = vk::SemaphoreCreateInfo::builder();
        let semaphore = unsafe {
            device
                .create_semaphore(&create_info, None)
                .map_err(VulkanError::Api)?
        };
        Ok(Self { device, semaphore })
    }

    pub fn handle(&self) -> vk::Semaphore {
        self.semaphore
    }
}

impl Drop for Semaphore {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_semaphore(self.semaphore, None);
        }
    }
}

/// Fence for CPU-GPU waits
pub struct Fence {
    device: Device,
    fence: vk::Fence,
}

impl Fence {
    /// Create a fence, optionally already signaled so the first wait on a
    /// fresh frame slot does not block forever.
    pub fn new(device: Device, signaled: bool) -> VulkanResult<Self> {
        let flags = if signaled {
            vk::FenceCreateFlags::SIGNALED
        } else {
            vk::FenceCreateFlags::empty()
        };
        let create_info = vk::FenceCreateInfo::builder().flags(flags);
        let fence = unsafe {
            device
                .create_fence(&create_info, None)
                .map_err(VulkanError::Api)?
        };
        Ok(Self { device, fence })
    }

    pub fn wait(&self, timeout: u64) -> VulkanResult<()> {
        unsafe {
            self.device
                .wait_for_fences(&[self.fence], true, timeout)
                .map_err(VulkanError::Api)
        }
    }

    pub fn reset(&self) -> VulkanResult<()> {
        unsafe {
            self.device
                .reset_fences(&[self.fence])
                .map_err(VulkanError::Api)
        }
    }

    pub fn handle(&self) -> vk::Fence {
        self.fence
    }
}

impl Drop for Fence {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_fence(self.fence, None);
        }
    }
}

/// Per-slot synchronization objects for one in-flight frame
pub struct FrameSync {
    /// Signaled when the acquired swapchain image is ready to be written
    pub image_available: Semaphore,
    /// Signaled when the main pass finishes; presentation waits on it
    pub render_finished: Semaphore,
    /// Signaled when the slot's submitted work retires on the GPU
    pub in_flight: Fence,
}

impl FrameSync {
    pub fn new(device: Device) -> VulkanResult<Self> {
        let image_available = Semaphore::new(device.clone())?;
        let render_finished = Semaphore::new(device.clone())?;
        // Starts signaled: the slot's first use has nothing to wait for.
        let in_flight = Fence::new(device, true)?;
        Ok(Self {
            image_available,
            render_finished,
            in_flight,
        })
    }
}

/// Pure frame-slot rotation.
///
/// Slots cycle `0, 1, .., n-1, 0, ..`. A slot may only be reused once the
/// work submitted on its previous use has retired, which the renderer
/// enforces by waiting on the slot's fence before touching its resources.
/// `begin_frame` reports whether that wait is required, which it is for
/// every use after the slot's first.
#[derive(Debug)]
pub struct FrameSchedule {
    current: usize,
    slot_count: usize,
    used: Vec<bool>,
}

impl FrameSchedule {
    pub fn new(slot_count: usize) -> Self {
        assert!(slot_count > 0);
        Self {
            current: 0,
            slot_count,
            used: vec![false; slot_count],
        }
    }

    /// Slot the next frame will render on
    pub fn current_slot(&self) -> usize {
        self.current
    }

    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// Claim the current slot for a new frame. Returns `(slot, must_wait)`;
    /// `must_wait` is true when earlier work was submitted on this slot.
    pub fn begin_frame(&mut self) -> (usize, bool) {
        let slot = self.current;
        let must_wait = self.used[slot];
        self.used[slot] = true;
        (slot, must_wait)
    }

    /// Advance to the next slot after the frame's submissions
    pub fn advance(&mut self) {
        self.current = (self.current + 1) % self.slot_count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_rotate_modulo_count() {
        let mut schedule = FrameSchedule::new(3);
        let mut seen = Vec::new();
        for _ in 0..7 {
            let (slot, _) = schedule.begin_frame();
            seen.push(slot);
            schedule.advance();
        }
        assert_eq!(seen, vec![0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn first_use_of_each_slot_needs_no_wait() {
        let mut schedule = FrameSchedule::new(3);
        for _ in 0..3 {
            let (_, must_wait) = schedule.begin_frame();
            assert!(!must_wait);
            schedule.advance();
        }
    }

    #[test]
    fn frame_n_plus_slots_waits_on_frame_n() {
        // With N slots, frame N+1 lands on frame 1's slot and must wait
        // for it, bounding the CPU at N frames ahead of the GPU.
        let slots = 3;
        let mut schedule = FrameSchedule::new(slots);
        for frame in 0..10 {
            let (slot, must_wait) = schedule.begin_frame();
            assert_eq!(slot, frame % slots);
            assert_eq!(must_wait, frame >= slots);
            schedule.advance();
        }
    }

    #[test]
    fn single_slot_serializes_every_frame() {
        let mut schedule = FrameSchedule::new(1);
        let (_, first) = schedule.begin_frame();
        schedule.advance();
        let (_, second) = schedule.begin_frame();
        assert!(!first);
        assert!(second);
    }
}
