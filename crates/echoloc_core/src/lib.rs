//! # ECHOLOC Core - CPU Scan Pipeline
//!
//! A scan turns one probe origin into a dense set of decal transforms:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        SCAN PIPELINE                         │
//! ├──────────────────────────────────────────────────────────────┤
//! │  origin ──► DirectionSampler ──► BatchIntersector ──► Hit    │
//! │             (Fibonacci sphere)    (parallel fan-out)  Compact │
//! │                                                         │    │
//! │                                  dense Vec<Transform> ◄─┘    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything in this crate is deterministic and GPU-free; the renderer
//! crates consume the compacted transforms.

pub mod compact;
pub mod intersect;
pub mod sampler;
pub mod scratch;
pub mod world;

pub use compact::compact_into;
pub use intersect::{intersect_batch, RaycastResult, ScanRequest};
pub use sampler::{fibonacci_direction, sample_directions_into};
pub use scratch::ScanScratch;
pub use world::{CollisionWorld, EmptyWorld, GroundPlaneWorld, SphereShellWorld, SurfaceHit};
