//! The decal quad mesh and its draw-argument descriptor.
//!
//! The indirect arguments are rebuilt from this descriptor on every commit;
//! the renderer itself never inspects the mesh beyond binding its buffers.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

/// Read-only mesh metadata consumed when building indirect arguments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecalMeshDescriptor {
    /// Indices per instance.
    pub index_count: u32,
    /// First index within the index buffer.
    pub first_index: u32,
    /// Vertex offset added to each index.
    pub base_vertex: i32,
}

impl DecalMeshDescriptor {
    /// The built-in unit quad: two triangles, six indices.
    pub const UNIT_QUAD: Self = Self { index_count: 6, first_index: 0, base_vertex: 0 };

    /// A descriptor with no indices draws nothing; treated as a missing
    /// mesh and the frame's draw is skipped.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.index_count > 0
    }
}

/// One decal quad vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct QuadVertex {
    /// Position in decal-local space (the quad spans XY, faces +Z).
    pub position: [f32; 3],
    /// Texture coordinate.
    pub uv: [f32; 2],
}

impl QuadVertex {
    /// Vertex attribute layout matching `shaders/decal.wgsl`.
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    /// Vertex buffer layout for the render pipeline.
    #[must_use]
    pub const fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Unit quad vertices, centered on the origin in its local XY plane.
pub const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { position: [-0.5, -0.5, 0.0], uv: [0.0, 1.0] },
    QuadVertex { position: [0.5, -0.5, 0.0], uv: [1.0, 1.0] },
    QuadVertex { position: [0.5, 0.5, 0.0], uv: [1.0, 0.0] },
    QuadVertex { position: [-0.5, 0.5, 0.0], uv: [0.0, 0.0] },
];

/// Unit quad indices: two counter-clockwise triangles.
pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// The uploaded decal quad.
pub struct QuadMesh {
    /// Vertex buffer.
    vertices: wgpu::Buffer,
    /// Index buffer.
    indices: wgpu::Buffer,
    /// Descriptor the commit path reads.
    descriptor: DecalMeshDescriptor,
}

impl QuadMesh {
    /// Uploads the unit quad. Tiny and immutable; done once at renderer
    /// creation.
    #[must_use]
    pub fn upload(device: &wgpu::Device) -> Self {
        let vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("echoloc quad vertices"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("echoloc quad indices"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self { vertices, indices, descriptor: DecalMeshDescriptor::UNIT_QUAD }
    }

    /// Vertex buffer for binding.
    #[must_use]
    pub const fn vertex_buffer(&self) -> &wgpu::Buffer {
        &self.vertices
    }

    /// Index buffer for binding.
    #[must_use]
    pub const fn index_buffer(&self) -> &wgpu::Buffer {
        &self.indices
    }

    /// The mesh descriptor commits are built from.
    #[must_use]
    pub const fn descriptor(&self) -> DecalMeshDescriptor {
        self.descriptor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_quad_descriptor() {
        assert!(DecalMeshDescriptor::UNIT_QUAD.is_valid());
        assert_eq!(DecalMeshDescriptor::UNIT_QUAD.index_count, QUAD_INDICES.len() as u32);
    }

    #[test]
    fn test_empty_descriptor_is_invalid() {
        let empty = DecalMeshDescriptor { index_count: 0, first_index: 0, base_vertex: 0 };
        assert!(!empty.is_valid());
    }

    #[test]
    fn test_vertex_stride() {
        // position (12) + uv (8)
        assert_eq!(std::mem::size_of::<QuadVertex>(), 20);
    }
}
