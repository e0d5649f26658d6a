//! # ECHOLOC Shared Types
//!
//! Math and mask types used by every crate in the workspace:
//! - `Vec3` / `Quat` / `Transform` - GPU-safe (`Pod`) math for decal placement
//! - `LayerMask` - category filtering for scan rays
//! - `VisualMode` - which decal visual a scan projects
//!
//! This crate must stay free of GPU dependencies so the CPU pipeline can be
//! tested headless.

pub mod layers;
pub mod math;
pub mod mode;

pub use layers::LayerMask;
pub use math::{Quat, Transform, Vec3};
pub use mode::VisualMode;
