//! # ECHOLOC Rendering - Indirect Instanced Decals
//!
//! The GPU half of the scan pipeline:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      COMMIT & DRAW                           │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Vec<Transform> ──► ScanInstanceBuffer ──► GpuScanBuffers     │
//! │                    (CPU commit,           (instances +       │
//! │                     count last)            indirect args)    │
//! │                                                 │            │
//! │            every frame ──► ScanRenderer ◄───────┘            │
//! │                            (one draw_indexed_indirect,      │
//! │                             skipped when count is zero)      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## MANDATE
//!
//! - The renderer only READS committed state; commits replace it whole
//! - No allocation after initialization
//! - Release happens exactly once, shutdown is idempotent

pub mod error;
pub mod instancing;
pub mod material;
pub mod mesh;
pub mod renderer;

pub use error::{RenderError, RenderResult};
pub use instancing::{DecalInstance, DrawIndexedIndirectArgs, GpuScanBuffers, ScanInstanceBuffer};
pub use material::{visual_bindings, ModeUniforms, TextureSlot, VisualBindingSet};
pub use mesh::{DecalMeshDescriptor, QuadMesh, QuadVertex};
pub use renderer::{ScanRenderer, SCAN_BOUNDS_RADIUS};
