//! The echolocation scan engine.
//!
//! Owns the CPU pipeline end to end and, when a GPU backend is attached,
//! mirrors every commit into the GPU-resident buffers. The host loop
//! drives it explicitly: `configure`, then `trigger_scan` per probe pulse,
//! `render_if_active` once per frame, `shutdown` when done.

use std::sync::Arc;
use std::time::Instant;

use echoloc_core::{
    compact_into, intersect_batch, sample_directions_into, CollisionWorld, ScanRequest,
    ScanScratch,
};
use echoloc_rendering::{
    visual_bindings, DecalMeshDescriptor, ScanInstanceBuffer, ScanRenderer,
};
use echoloc_shared::Vec3;
use tracing::debug;

use crate::config::ScanConfig;
use crate::error::{EngineError, EngineResult};

/// Where the engine is in its scan cycle.
///
/// `Committed` persists across frames - rendering is a side-effect-free
/// read of whatever is committed - until the next scan replaces it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanPhase {
    /// No scan has committed yet.
    Idle,
    /// Rays are in flight (the parallel batch has not joined).
    Scanning,
    /// Results are being compacted and committed.
    Compacting,
    /// A scan is committed and renderable.
    Committed,
}

/// What one scan did.
#[derive(Clone, Copy, Debug)]
pub struct ScanReport {
    /// Rays fired.
    pub rays_cast: usize,
    /// Rays that struck a qualifying surface.
    pub hits: usize,
    /// Instances committed for rendering (equals `hits`).
    pub active_instances: u32,
    /// Wall time of the whole pipeline, microseconds.
    pub duration_us: u64,
}

/// GPU attachment: the renderer plus the queue commits upload through.
struct GpuBackend {
    /// The queue shared with the host's frame submission.
    queue: Arc<wgpu::Queue>,
    /// The indirect decal renderer.
    renderer: ScanRenderer,
}

/// The scan engine. One instance per probe.
pub struct EcholocationEngine {
    /// Capacity everything was sized for; `configure` may not exceed it.
    max_ray_count: usize,
    /// Active configuration.
    config: ScanConfig,
    /// Mesh metadata used to build indirect arguments.
    mesh: DecalMeshDescriptor,
    /// Reused per-scan working storage.
    scratch: ScanScratch,
    /// Committed scan state the renderer reads.
    committed: ScanInstanceBuffer,
    /// Current phase.
    phase: ScanPhase,
    /// Optional GPU backend.
    gpu: Option<GpuBackend>,
    /// Set by `shutdown`; everything afterwards is a no-op or error.
    shut_down: bool,
}

impl EcholocationEngine {
    /// Creates an engine sized for scans of up to `max_ray_count` rays.
    ///
    /// All CPU-side storage is allocated here, once; no later call grows
    /// it. GPU buffers are allocated when a backend is attached.
    ///
    /// # Panics
    ///
    /// Panics if `max_ray_count` is zero.
    #[must_use]
    pub fn new(max_ray_count: usize) -> Self {
        assert!(max_ray_count > 0, "an engine needs at least one ray");
        Self {
            max_ray_count,
            config: ScanConfig::default(),
            mesh: DecalMeshDescriptor::UNIT_QUAD,
            scratch: ScanScratch::with_capacity(max_ray_count),
            committed: ScanInstanceBuffer::new(max_ray_count),
            phase: ScanPhase::Idle,
            gpu: None,
            shut_down: false,
        }
    }

    /// Validates and applies a configuration.
    ///
    /// If a GPU backend is attached, the resolved visual bindings are
    /// re-applied immediately so mode changes take effect next frame.
    ///
    /// # Errors
    ///
    /// `EngineError::Config` for invalid values or a ray count above the
    /// initialized maximum; `EngineError::ShutDown` after shutdown.
    pub fn configure(&mut self, config: ScanConfig) -> EngineResult<()> {
        if self.shut_down {
            return Err(EngineError::ShutDown);
        }
        config.validate()?;
        if config.ray_count > self.max_ray_count {
            return Err(EngineError::Config(format!(
                "ray_count {} exceeds initialized maximum {}",
                config.ray_count, self.max_ray_count
            )));
        }
        self.config = config;
        if let Some(gpu) = &mut self.gpu {
            gpu.renderer.set_visual(&gpu.queue, &Self::bindings(&self.config));
        }
        Ok(())
    }

    /// Attaches the GPU backend and applies the current visual bindings.
    ///
    /// The renderer must have been created with a capacity of at least
    /// this engine's maximum ray count.
    ///
    /// # Errors
    ///
    /// `EngineError::Config` on a capacity mismatch;
    /// `EngineError::ShutDown` after shutdown.
    pub fn attach_gpu(
        &mut self,
        mut renderer: ScanRenderer,
        queue: Arc<wgpu::Queue>,
    ) -> EngineResult<()> {
        if self.shut_down {
            return Err(EngineError::ShutDown);
        }
        if renderer.capacity() < self.max_ray_count {
            return Err(EngineError::Config(format!(
                "renderer capacity {} is below engine maximum {}",
                renderer.capacity(),
                self.max_ray_count
            )));
        }
        renderer.set_visual(&queue, &Self::bindings(&self.config));
        self.mesh = renderer.mesh_descriptor();
        self.gpu = Some(GpuBackend { queue, renderer });
        Ok(())
    }

    /// Overrides the mesh metadata indirect arguments are built from.
    ///
    /// An invalid descriptor (zero indices) is accepted here but reported
    /// at render time, where the frame's draw is skipped - a missing mesh
    /// is a configuration problem, not a pipeline failure.
    pub fn set_mesh(&mut self, mesh: DecalMeshDescriptor) {
        self.mesh = mesh;
    }

    /// Runs one full scan synchronously: sample, intersect (parallel,
    /// joined before return), compact, commit. Returns once the new state
    /// is committed - and uploaded, when a GPU backend is attached.
    ///
    /// Zero hits is success: the committed count becomes 0 and rendering
    /// turns into a no-op.
    ///
    /// # Errors
    ///
    /// `EngineError::ShutDown` after shutdown; `EngineError::ScanInFlight`
    /// if a prior scan never completed (triggers must be serialized by the
    /// caller - see the `queue` module); rendering errors pass through
    /// with the previous committed state left stale, never corrupted.
    pub fn trigger_scan<W: CollisionWorld>(
        &mut self,
        origin: Vec3,
        world: &W,
    ) -> EngineResult<ScanReport> {
        if self.shut_down {
            return Err(EngineError::ShutDown);
        }
        if matches!(self.phase, ScanPhase::Scanning | ScanPhase::Compacting) {
            return Err(EngineError::ScanInFlight);
        }

        let started = Instant::now();
        let request = ScanRequest {
            origin,
            ray_count: self.config.ray_count,
            max_distance: self.config.max_distance,
            mask: self.config.layer_mask,
        };

        self.phase = ScanPhase::Scanning;
        let (directions, results, transforms) = self.scratch.split();
        sample_directions_into(request.ray_count, directions);
        intersect_batch(world, &request, directions, results);

        self.phase = ScanPhase::Compacting;
        let hits = compact_into(
            results,
            self.config.standoff_distance,
            self.config.decal_scale(),
            transforms,
        );

        let commit = self.committed.commit(transforms, &self.mesh);
        let active_instances = match commit {
            Ok(count) => count,
            Err(e) => {
                self.settle_phase();
                return Err(e.into());
            }
        };
        if let Some(gpu) = &self.gpu {
            if let Err(e) = gpu.renderer.upload(&gpu.queue, &self.committed) {
                self.settle_phase();
                return Err(e.into());
            }
        }
        self.phase = ScanPhase::Committed;

        #[allow(clippy::cast_possible_truncation)]
        let duration_us = started.elapsed().as_micros() as u64;
        let report = ScanReport {
            rays_cast: request.ray_count,
            hits,
            active_instances,
            duration_us,
        };
        debug!(
            rays = report.rays_cast,
            hits = report.hits,
            duration_us = report.duration_us,
            "scan committed"
        );
        Ok(report)
    }

    /// Records the frame's indirect draw if there is anything to draw.
    ///
    /// A zero committed count, a detached GPU, missing visual bindings or
    /// a shut-down engine all make this a no-op returning `false`; none of
    /// them is an error.
    pub fn render_if_active<'pass>(&'pass self, pass: &mut wgpu::RenderPass<'pass>) -> bool {
        if self.shut_down {
            return false;
        }
        match &self.gpu {
            Some(gpu) => gpu.renderer.render_if_active(pass, &self.committed),
            None => false,
        }
    }

    /// Uploads the camera matrix the decal draw uses this frame.
    pub fn set_camera(&self, view_proj: [[f32; 4]; 4]) {
        if let Some(gpu) = &self.gpu {
            gpu.renderer.set_camera(&gpu.queue, view_proj);
        }
    }

    /// Whether the next `render_if_active` would record a draw.
    #[must_use]
    pub fn draw_pending(&self) -> bool {
        !self.shut_down
            && self.committed.draw_args().is_some_and(|args| args.index_count > 0)
            && self
                .gpu
                .as_ref()
                .is_some_and(|gpu| gpu.renderer.ready().is_ok())
    }

    /// Releases GPU resources. Idempotent: the second and every later
    /// call is a no-op. The committed CPU state is discarded too, so
    /// rendering after shutdown is a clean no-op.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        if let Some(gpu) = &mut self.gpu {
            gpu.renderer.release();
        }
        self.committed.clear();
        self.phase = ScanPhase::Idle;
        self.shut_down = true;
        debug!("scan engine shut down");
    }

    /// Committed scan state (instances, indirect arguments, count).
    #[must_use]
    pub const fn committed(&self) -> &ScanInstanceBuffer {
        &self.committed
    }

    /// Committed instance count; always within `0..=ray_count`.
    #[must_use]
    pub const fn active_instance_count(&self) -> u32 {
        self.committed.active_count()
    }

    /// Instance capacity fixed at construction.
    #[must_use]
    pub const fn instance_capacity(&self) -> usize {
        self.committed.capacity()
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> ScanPhase {
        self.phase
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Whether `shutdown` has run.
    #[must_use]
    pub const fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Resolves the visual bindings for the active configuration.
    fn bindings(config: &ScanConfig) -> echoloc_rendering::VisualBindingSet {
        visual_bindings(
            config.visual_mode,
            config.dot_scale,
            config.grid_quad_size,
            config.standoff_distance,
            config.grid_depth,
        )
    }

    /// After a failed commit the previous state is stale but intact;
    /// settle back onto it instead of wedging mid-cycle.
    fn settle_phase(&mut self) {
        self.phase = if self.committed.active_count() > 0 {
            ScanPhase::Committed
        } else {
            ScanPhase::Idle
        };
    }
}
