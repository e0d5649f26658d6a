//! Instance data structures for GPU upload.

use bytemuck::{Pod, Zeroable};
use echoloc_shared::{Transform, Vec3};

/// Per-decal data sent to the GPU.
///
/// One column-major model matrix, pulled by the vertex shader via
/// `instance_index`. 64 bytes, the stride the storage buffer is sized by.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct DecalInstance {
    /// Column-major model matrix (position, surface-aligned rotation,
    /// in-plane scale).
    pub model: [[f32; 4]; 4],
}

impl DecalInstance {
    /// Size in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Expands a compacted decal transform into its GPU layout.
    #[must_use]
    pub fn from_transform(transform: &Transform) -> Self {
        Self { model: transform.to_model_matrix() }
    }

    /// Extracts the world position (translation column).
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        Vec3::new(self.model[3][0], self.model[3][1], self.model[3][2])
    }
}

/// `DrawIndexedIndirect` arguments - written at commit, read by the GPU.
///
/// This is the five-integer layout `draw_indexed_indirect` consumes; the
/// instance count lives here and is never read back by the CPU.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct DrawIndexedIndirectArgs {
    /// Indices per instance (6 for the decal quad).
    pub index_count: u32,
    /// Number of instances to draw - the compacted hit count.
    pub instance_count: u32,
    /// First index within the mesh's index buffer.
    pub first_index: u32,
    /// Vertex offset added to each index.
    pub base_vertex: i32,
    /// First instance ID (always 0; added to the shader's instance index).
    pub first_instance: u32,
}
