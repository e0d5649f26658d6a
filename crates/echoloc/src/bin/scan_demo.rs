//! # ECHOLOC Scan Demo
//!
//! Headless exercise of the full pipeline:
//! - scans the analytic worlds (sphere chamber, open terrain, empty void)
//! - prints a per-scan report
//! - when a GPU adapter exists, attaches the indirect renderer, commits
//!   through it and records one offscreen frame per scan
//!
//! No window, no input: the point is watching the pipeline numbers.

use std::sync::Arc;

use echoloc::{
    EcholocationEngine, EmptyWorld, GroundPlaneWorld, LayerMask, ScanConfig, SphereShellWorld,
    TriggerGate, TriggerPolicy, Vec3, VisualMode,
};
use echoloc_core::CollisionWorld;
use echoloc_rendering::{ScanRenderer, SCAN_BOUNDS_RADIUS};

/// Offscreen frame size.
const FRAME_SIZE: u32 = 256;
/// Render target format for the offscreen pass.
const FRAME_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// One offscreen GPU context, if the machine has an adapter.
struct GpuContext {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    target: wgpu::TextureView,
}

fn acquire_gpu() -> Option<GpuContext> {
    let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::HighPerformance,
        compatible_surface: None,
        force_fallback_adapter: false,
    }))?;
    let (device, queue) = pollster::block_on(adapter.request_device(
        &wgpu::DeviceDescriptor {
            label: Some("echoloc demo device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_defaults(),
        },
        None,
    ))
    .ok()?;

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("echoloc demo target"),
        size: wgpu::Extent3d {
            width: FRAME_SIZE,
            height: FRAME_SIZE,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: FRAME_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let target = texture.create_view(&wgpu::TextureViewDescriptor::default());

    println!("[GPU] adapter: {}", adapter.get_info().name);
    Some(GpuContext { device: Arc::new(device), queue: Arc::new(queue), target })
}

/// Records one frame; returns whether the scan draw was issued.
fn render_frame(gpu: &GpuContext, engine: &EcholocationEngine) -> bool {
    let mut encoder = gpu
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("echoloc frame") });
    let drawn = {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("echoloc decal pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &gpu.target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        engine.render_if_active(&mut pass)
    };
    gpu.queue.submit(Some(encoder.finish()));
    drawn
}

fn scan_and_report<W: CollisionWorld>(
    engine: &mut EcholocationEngine,
    gate: &TriggerGate,
    gpu: Option<&GpuContext>,
    label: &str,
    origin: Vec3,
    world: &W,
) {
    // The gate is the explicit trigger policy; a second pulse while one is
    // pending would be dropped, not queued.
    assert_eq!(gate.request(origin), TriggerPolicy::Accepted);
    let origin = gate.take().expect("just accepted");

    let report = engine.trigger_scan(origin, world).expect("scan failed");
    println!(
        "[SCAN] {label:<16} rays={:<5} hits={:<5} committed={:<5} {}us",
        report.rays_cast, report.hits, report.active_instances, report.duration_us
    );

    if let Some(gpu) = gpu {
        let drawn = render_frame(gpu, engine);
        println!(
            "[DRAW] {label:<16} indirect draw {}",
            if drawn { "issued (count resolved on GPU)" } else { "skipped (nothing committed)" }
        );
    } else {
        println!(
            "[DRAW] {label:<16} headless: draw {}",
            if engine.draw_pending() { "would be issued" } else { "would be skipped" }
        );
    }
}

fn main() {
    println!("=============================================");
    println!(" ECHOLOC SCAN DEMO");
    println!("=============================================");

    let config = ScanConfig {
        ray_count: 2000,
        visual_mode: VisualMode::Grid,
        ..ScanConfig::default()
    };
    let mut engine = EcholocationEngine::new(config.ray_count);
    engine.configure(config.clone()).expect("default config is valid");

    let gpu = acquire_gpu();
    if let Some(gpu) = &gpu {
        let renderer = ScanRenderer::new(&gpu.device, config.ray_count, FRAME_FORMAT)
            .expect("scan buffer allocation is within downlevel limits");
        engine
            .attach_gpu(renderer, Arc::clone(&gpu.queue))
            .expect("renderer capacity matches engine");
        // Identity camera; culling safety comes from the oversized bounds.
        engine.set_camera(identity_view_proj());
        println!("[GPU] renderer attached, bounds radius {SCAN_BOUNDS_RADIUS}m");
    } else {
        println!("[GPU] no adapter available, running CPU-only");
    }

    let gate = TriggerGate::new();

    let chamber = SphereShellWorld::new(Vec3::ZERO, 12.0, LayerMask::GEOMETRY);
    scan_and_report(&mut engine, &gate, gpu.as_ref(), "sphere chamber", Vec3::ZERO, &chamber);

    let terrain = GroundPlaneWorld::new(0.0, LayerMask::GEOMETRY);
    scan_and_report(
        &mut engine,
        &gate,
        gpu.as_ref(),
        "open terrain",
        Vec3::new(0.0, 4.0, 0.0),
        &terrain,
    );

    scan_and_report(&mut engine, &gate, gpu.as_ref(), "empty void", Vec3::ZERO, &EmptyWorld);

    engine.shutdown();
    engine.shutdown(); // idempotent by contract
    println!("[DONE] engine shut down");
}

/// Identity view-projection: decals render in world = clip space.
fn identity_view_proj() -> [[f32; 4]; 4] {
    let mut m = [[0.0; 4]; 4];
    for (i, column) in m.iter_mut().enumerate() {
        column[i] = 1.0;
    }
    m
}
