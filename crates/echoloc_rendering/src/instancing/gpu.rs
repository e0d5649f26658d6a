//! GPU residency for the two scan buffers.
//!
//! Owns the instance-transform buffer and the indirect-argument buffer.
//! Both are created once, sized for the maximum ray count, and released
//! exactly once - the owning type has no `Copy`/`Clone`, and `Drop`
//! guarantees the release even on early exits.

use tracing::debug;

use super::buffer::ScanInstanceBuffer;
use super::instance_data::DecalInstance;
use crate::error::{RenderError, RenderResult};

/// The two GPU-resident scan buffers.
pub struct GpuScanBuffers {
    /// Instance transforms, `max_ray_count * 64` bytes, storage-bound.
    instances: wgpu::Buffer,
    /// Five `u32` indirect-draw arguments.
    args: wgpu::Buffer,
    /// Instances the buffer was sized for.
    capacity: usize,
    /// Set once by `release`; guards double-free and use-after-release.
    released: bool,
}

impl GpuScanBuffers {
    /// Byte size of the indirect argument buffer (five `u32` fields).
    pub const ARGS_SIZE: u64 =
        std::mem::size_of::<super::instance_data::DrawIndexedIndirectArgs>() as u64;

    /// Allocates both buffers, sized for `max_ray_count` instances.
    ///
    /// Called once at engine initialization; no buffer is ever created or
    /// resized after this.
    ///
    /// # Errors
    ///
    /// `RenderError::Allocation` if the instance buffer would exceed the
    /// device's buffer or binding limits. This is fatal to the engine.
    pub fn initialize(device: &wgpu::Device, max_ray_count: usize) -> RenderResult<Self> {
        let instance_bytes = (max_ray_count * DecalInstance::SIZE) as u64;
        let limits = device.limits();
        let binding_limit = u64::from(limits.max_storage_buffer_binding_size);
        let limit = limits.max_buffer_size.min(binding_limit);
        if instance_bytes > limit {
            return Err(RenderError::Allocation { requested: instance_bytes, limit });
        }

        let instances = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("echoloc instance transforms"),
            size: instance_bytes,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let args = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("echoloc indirect args"),
            size: Self::ARGS_SIZE,
            usage: wgpu::BufferUsages::INDIRECT | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        debug!(max_ray_count, instance_bytes, "scan buffers allocated");
        Ok(Self { instances, args, capacity: max_ray_count, released: false })
    }

    /// Uploads a committed scan.
    ///
    /// The transform write is enqueued before the argument write on the
    /// same queue; the argument buffer carrying the new count is therefore
    /// never visible to a draw without the transforms it describes. A
    /// zero-hit commit uploads nothing - the renderer skips the draw from
    /// the CPU-side count, so the GPU does no work at all.
    ///
    /// # Errors
    ///
    /// `RenderError::CapacityExceeded` if the committed state is larger
    /// than these buffers. Prior GPU contents are untouched.
    ///
    /// # Panics
    ///
    /// Panics if called after `release` - use-after-release is a
    /// programming error, not a recoverable condition.
    pub fn upload(&self, queue: &wgpu::Queue, committed: &ScanInstanceBuffer) -> RenderResult<()> {
        assert!(!self.released, "scan buffers used after release");
        let count = committed.active_count() as usize;
        if count > self.capacity {
            return Err(RenderError::CapacityExceeded { count, capacity: self.capacity });
        }
        if count == 0 {
            return Ok(());
        }
        queue.write_buffer(&self.instances, 0, committed.instance_bytes());
        queue.write_buffer(&self.args, 0, bytemuck::bytes_of(committed.args()));
        Ok(())
    }

    /// The instance-transform buffer, for bind groups.
    ///
    /// # Panics
    ///
    /// Panics if called after `release`.
    #[must_use]
    pub fn instance_buffer(&self) -> &wgpu::Buffer {
        assert!(!self.released, "scan buffers used after release");
        &self.instances
    }

    /// The indirect-argument buffer, for `draw_indexed_indirect`.
    ///
    /// # Panics
    ///
    /// Panics if called after `release`.
    #[must_use]
    pub fn args_buffer(&self) -> &wgpu::Buffer {
        assert!(!self.released, "scan buffers used after release");
        &self.args
    }

    /// Instances the buffers were sized for.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether `release` has run.
    #[must_use]
    pub const fn is_released(&self) -> bool {
        self.released
    }

    /// Frees both GPU allocations. Idempotent: the second and every later
    /// call is a no-op.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.instances.destroy();
        self.args.destroy();
        self.released = true;
        debug!("scan buffers released");
    }
}

impl Drop for GpuScanBuffers {
    fn drop(&mut self) {
        self.release();
    }
}
