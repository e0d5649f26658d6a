//! # ECHOLOC - Echolocation Scan Engine
//!
//! One scan paints the dark: rays fan out from the probe origin, every hit
//! becomes an oriented decal, and a single indirect instanced draw renders
//! them all until the next scan replaces them.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        ENGINE LIFECYCLE                         │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  configure(ScanConfig)                                          │
//! │      │                                                          │
//! │  trigger_scan(origin, world)   Idle → Scanning → Compacting     │
//! │      │                                        → Committed       │
//! │  render_if_active(pass)        every frame, reads Committed     │
//! │      │                                                          │
//! │  shutdown()                    releases GPU buffers, idempotent │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The CPU pipeline lives in `echoloc_core`, the GPU half in
//! `echoloc_rendering`; this crate wires them behind an explicit API the
//! host loop drives.

pub mod config;
pub mod engine;
pub mod error;
pub mod queue;

pub use config::ScanConfig;
pub use engine::{EcholocationEngine, ScanPhase, ScanReport};
pub use error::{EngineError, EngineResult};
pub use queue::{ScanQueue, ScanSender, TriggerGate, TriggerPolicy};

pub use echoloc_core::{
    CollisionWorld, EmptyWorld, GroundPlaneWorld, SphereShellWorld, SurfaceHit,
};
pub use echoloc_shared::{LayerMask, Vec3, VisualMode};
