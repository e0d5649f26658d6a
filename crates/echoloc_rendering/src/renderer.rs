//! The indirect decal renderer.
//!
//! One instanced draw per frame, instance count resolved on the GPU from
//! the committed argument buffer. The CPU side only decides *whether* to
//! draw (committed count nonzero, bindings present) - never *how many*.
//!
//! Because instance positions are GPU-resident, no tight bounding volume
//! exists on the CPU for culling; `SCAN_BOUNDS_RADIUS` deliberately covers
//! the whole plausible scan range so an outside culler never drops the
//! draw.

use tracing::warn;
use wgpu::util::DeviceExt;

use crate::error::{RenderError, RenderResult};
use crate::instancing::{GpuScanBuffers, ScanInstanceBuffer};
use crate::material::{ModeUniforms, VisualBindingSet};
use crate::mesh::{QuadMesh, QuadVertex};

/// Radius of the renderer's reported bounding sphere, in meters.
///
/// Oversized on purpose: it must contain every decal any configured scan
/// could place, or the draw gets culled while decals are on screen.
pub const SCAN_BOUNDS_RADIUS: f32 = 1000.0;

/// Camera uniform consumed by `shaders/decal.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct CameraUniforms {
    /// Column-major view-projection matrix.
    view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniforms {
    fn default() -> Self {
        let mut view_proj = [[0.0; 4]; 4];
        for (i, column) in view_proj.iter_mut().enumerate() {
            column[i] = 1.0;
        }
        Self { view_proj }
    }
}

/// Issues the scan's single indirect draw.
pub struct ScanRenderer {
    /// The two GPU-resident scan buffers.
    buffers: GpuScanBuffers,
    /// The decal quad.
    mesh: QuadMesh,
    /// Render pipeline for both visual modes.
    pipeline: wgpu::RenderPipeline,
    /// Camera + instances + mode bindings.
    bind_group: wgpu::BindGroup,
    /// Camera uniform buffer.
    camera_buffer: wgpu::Buffer,
    /// Mode uniform buffer.
    mode_buffer: wgpu::Buffer,
    /// Set once visual bindings have been applied; until then frames are
    /// skipped and reported, per the configuration-error policy.
    material_ready: bool,
}

impl ScanRenderer {
    /// Creates the renderer and allocates the scan buffers.
    ///
    /// `max_ray_count` fixes buffer capacity for the renderer's lifetime;
    /// `target_format` is the color format of the pass this renderer draws
    /// into.
    ///
    /// # Errors
    ///
    /// `RenderError::Allocation` if the scan buffers exceed device limits.
    pub fn new(
        device: &wgpu::Device,
        max_ray_count: usize,
        target_format: wgpu::TextureFormat,
    ) -> RenderResult<Self> {
        let buffers = GpuScanBuffers::initialize(device, max_ray_count)?;
        let mesh = QuadMesh::upload(device);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("echoloc camera uniforms"),
            contents: bytemuck::bytes_of(&CameraUniforms::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let mode_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("echoloc mode uniforms"),
            contents: bytemuck::bytes_of(&ModeUniforms::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("echoloc scan bindings"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Storage { read_only: true },
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                ],
            });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("echoloc scan bind group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: buffers.instance_buffer().as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: mode_buffer.as_entire_binding(),
                },
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("echoloc decal shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/decal.wgsl").into()),
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("echoloc decal pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("echoloc decal pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[QuadVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            // Decals are visible from both sides; no culling
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        Ok(Self {
            buffers,
            mesh,
            pipeline,
            bind_group,
            camera_buffer,
            mode_buffer,
            material_ready: false,
        })
    }

    /// Uploads the camera view-projection matrix for this frame.
    pub fn set_camera(&self, queue: &wgpu::Queue, view_proj: [[f32; 4]; 4]) {
        let uniforms = CameraUniforms { view_proj };
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&uniforms));
    }

    /// Applies a resolved visual binding set.
    ///
    /// Until this has been called at least once the renderer reports its
    /// material as missing and skips draws.
    pub fn set_visual(&mut self, queue: &wgpu::Queue, bindings: &VisualBindingSet) {
        let uniforms = ModeUniforms::from_bindings(bindings);
        queue.write_buffer(&self.mode_buffer, 0, bytemuck::bytes_of(&uniforms));
        self.material_ready = true;
    }

    /// Uploads a committed scan into the GPU buffers.
    ///
    /// # Errors
    ///
    /// `RenderError::CapacityExceeded` if the commit is larger than the
    /// buffers; prior GPU contents stay stale, never corrupted.
    pub fn upload(&self, queue: &wgpu::Queue, committed: &ScanInstanceBuffer) -> RenderResult<()> {
        self.buffers.upload(queue, committed)
    }

    /// Checks the configuration preconditions a draw needs.
    ///
    /// # Errors
    ///
    /// `RenderError::MissingMaterial` until visual bindings have been
    /// applied, `RenderError::MissingMesh` for an empty mesh descriptor.
    /// Both are non-fatal: the frame's draw is skipped, the scan pipeline
    /// keeps running.
    pub fn ready(&self) -> RenderResult<()> {
        if !self.material_ready {
            return Err(RenderError::MissingMaterial);
        }
        if !self.mesh.descriptor().is_valid() {
            return Err(RenderError::MissingMesh);
        }
        Ok(())
    }

    /// Issues the frame's indirect draw if there is anything to draw.
    ///
    /// Returns `true` when a draw was recorded. A zero committed count is
    /// a silent no-op; a missing material or mesh skips the draw with a
    /// warning, and the scan pipeline keeps running either way.
    pub fn render_if_active<'pass>(
        &'pass self,
        pass: &mut wgpu::RenderPass<'pass>,
        committed: &ScanInstanceBuffer,
    ) -> bool {
        let Some(args) = committed.draw_args() else {
            return false;
        };
        if args.index_count == 0 {
            // A commit built from an empty mesh descriptor.
            warn!("scan draw skipped: {}", RenderError::MissingMesh);
            return false;
        }
        if let Err(skip) = self.ready() {
            warn!("scan draw skipped: {skip}");
            return false;
        }

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.mesh.vertex_buffer().slice(..));
        pass.set_index_buffer(self.mesh.index_buffer().slice(..), wgpu::IndexFormat::Uint16);
        // The GPU reads the instance count from the argument buffer.
        pass.draw_indexed_indirect(self.buffers.args_buffer(), 0);
        true
    }

    /// The mesh descriptor commits should be built from.
    #[must_use]
    pub const fn mesh_descriptor(&self) -> crate::mesh::DecalMeshDescriptor {
        self.mesh.descriptor()
    }

    /// Whether visual bindings have been applied.
    #[must_use]
    pub const fn material_ready(&self) -> bool {
        self.material_ready
    }

    /// Instances the scan buffers were sized for.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.buffers.capacity()
    }

    /// Releases the scan buffers. Idempotent; later draws are a
    /// programming error.
    pub fn release(&mut self) {
        self.buffers.release();
    }

    /// Whether the scan buffers have been released.
    #[must_use]
    pub const fn is_released(&self) -> bool {
        self.buffers.is_released()
    }
}
