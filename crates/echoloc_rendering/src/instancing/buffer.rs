//! CPU-side commit authority for the scan's instance set.
//!
//! Pre-allocates staging for the maximum ray count and owns the committed
//! state the renderer reads: the instance transforms, the indirect draw
//! arguments, and the active count. A commit replaces all three; the count
//! is published last so no reader ever pairs new transforms with a stale
//! count or vice versa.

use echoloc_shared::Transform;

use super::instance_data::{DecalInstance, DrawIndexedIndirectArgs};
use crate::error::{RenderError, RenderResult};
use crate::mesh::DecalMeshDescriptor;

/// Fixed-capacity staging + committed scan state.
#[derive(Debug)]
pub struct ScanInstanceBuffer {
    /// Instance staging, capacity fixed at creation.
    staging: Vec<DecalInstance>,
    /// Maximum instances a commit may carry.
    capacity: usize,
    /// Indirect arguments for the committed scan.
    args: DrawIndexedIndirectArgs,
    /// Committed instance count. Published last by `commit`.
    active_count: u32,
}

impl ScanInstanceBuffer {
    /// Creates staging sized for `max_ray_count` instances.
    ///
    /// This is the only allocation this type ever performs.
    #[must_use]
    pub fn new(max_ray_count: usize) -> Self {
        Self {
            staging: Vec::with_capacity(max_ray_count),
            capacity: max_ray_count,
            args: DrawIndexedIndirectArgs::default(),
            active_count: 0,
        }
    }

    /// Atomically replaces the committed scan state.
    ///
    /// Writes the instances from offset 0, rebuilds the indirect arguments
    /// from the mesh descriptor and the new count, then publishes the
    /// count. All-or-nothing: on a capacity error the previous committed
    /// state is untouched (stale, never corrupted).
    ///
    /// # Errors
    ///
    /// `RenderError::CapacityExceeded` if `transforms` exceeds the fixed
    /// capacity.
    pub fn commit(
        &mut self,
        transforms: &[Transform],
        mesh: &DecalMeshDescriptor,
    ) -> RenderResult<u32> {
        if transforms.len() > self.capacity {
            return Err(RenderError::CapacityExceeded {
                count: transforms.len(),
                capacity: self.capacity,
            });
        }
        self.staging.clear();
        self.staging
            .extend(transforms.iter().map(DecalInstance::from_transform));

        #[allow(clippy::cast_possible_truncation)]
        let count = transforms.len() as u32;
        self.args = DrawIndexedIndirectArgs {
            index_count: mesh.index_count,
            instance_count: count,
            first_index: mesh.first_index,
            base_vertex: mesh.base_vertex,
            first_instance: 0,
        };
        // Publish last: readers see the old state or the new one, never a mix.
        self.active_count = count;
        Ok(count)
    }

    /// Discards the committed state (used by shutdown).
    pub fn clear(&mut self) {
        self.staging.clear();
        self.args = DrawIndexedIndirectArgs::default();
        self.active_count = 0;
    }

    /// Committed instance count.
    #[must_use]
    pub const fn active_count(&self) -> u32 {
        self.active_count
    }

    /// Maximum instances a commit may carry.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// The committed indirect arguments, or `None` when the committed
    /// count is zero and the frame's draw should be skipped.
    #[must_use]
    pub fn draw_args(&self) -> Option<&DrawIndexedIndirectArgs> {
        (self.active_count > 0).then_some(&self.args)
    }

    /// The committed indirect arguments, unconditionally.
    #[must_use]
    pub const fn args(&self) -> &DrawIndexedIndirectArgs {
        &self.args
    }

    /// The committed instances.
    #[must_use]
    pub fn instances(&self) -> &[DecalInstance] {
        &self.staging[..self.active_count as usize]
    }

    /// The committed instances as bytes for GPU upload.
    #[must_use]
    pub fn instance_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.instances())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use echoloc_shared::{Quat, Vec3};

    fn transforms(n: usize) -> Vec<Transform> {
        (0..n)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let x = i as f32;
                Transform::new(Vec3::new(x, 0.0, 0.0), Quat::IDENTITY, 1.0)
            })
            .collect()
    }

    #[test]
    fn test_commit_publishes_count_and_args() {
        let mut buffer = ScanInstanceBuffer::new(16);
        let count = buffer
            .commit(&transforms(5), &DecalMeshDescriptor::UNIT_QUAD)
            .expect("within capacity");

        assert_eq!(count, 5);
        assert_eq!(buffer.active_count(), 5);
        assert_eq!(buffer.instances().len(), 5);
        let args = buffer.draw_args().expect("active");
        assert_eq!(args.index_count, 6);
        assert_eq!(args.instance_count, 5);
        assert_eq!(args.first_instance, 0);
    }

    #[test]
    fn test_zero_commit_yields_no_draw() {
        let mut buffer = ScanInstanceBuffer::new(16);
        buffer
            .commit(&[], &DecalMeshDescriptor::UNIT_QUAD)
            .expect("empty commit is fine");
        assert_eq!(buffer.active_count(), 0);
        assert!(buffer.draw_args().is_none());
        assert!(buffer.instance_bytes().is_empty());
    }

    #[test]
    fn test_overflow_leaves_previous_commit_intact() {
        let mut buffer = ScanInstanceBuffer::new(4);
        buffer
            .commit(&transforms(3), &DecalMeshDescriptor::UNIT_QUAD)
            .expect("within capacity");

        let err = buffer
            .commit(&transforms(5), &DecalMeshDescriptor::UNIT_QUAD)
            .expect_err("over capacity");
        assert_eq!(err, RenderError::CapacityExceeded { count: 5, capacity: 4 });

        // Stale, not corrupted
        assert_eq!(buffer.active_count(), 3);
        assert_eq!(buffer.draw_args().expect("still active").instance_count, 3);
    }

    #[test]
    fn test_no_allocation_after_init() {
        let mut buffer = ScanInstanceBuffer::new(64);
        for n in [64, 1, 32, 0, 64] {
            buffer
                .commit(&transforms(n), &DecalMeshDescriptor::UNIT_QUAD)
                .expect("within capacity");
            assert_eq!(buffer.capacity(), 64);
            assert!(buffer.staging.capacity() >= 64);
            assert_eq!(buffer.staging.capacity(), 64, "staging must never regrow");
        }
    }

    #[test]
    fn test_replacement_is_whole() {
        let mut buffer = ScanInstanceBuffer::new(16);
        buffer
            .commit(&transforms(10), &DecalMeshDescriptor::UNIT_QUAD)
            .expect("first commit");
        buffer
            .commit(&transforms(2), &DecalMeshDescriptor::UNIT_QUAD)
            .expect("second commit");

        assert_eq!(buffer.active_count(), 2);
        assert_eq!(buffer.instances().len(), 2);
        assert_eq!(buffer.args().instance_count, 2);
    }
}
