//! Instance buffer management for the scan's indirect draw.
//!
//! ## Key Concepts
//!
//! - **Staging commit**: a scan replaces the committed instance set whole;
//!   the active count is published last, so a reader sees the previous
//!   full state or the new full state, never a mix
//! - **Indirect arguments**: the GPU reads the instance count from a
//!   5-integer argument buffer via `draw_indexed_indirect` - no readback
//! - **Fixed capacity**: both buffers are sized once for the maximum ray
//!   count and never reallocated

mod buffer;
mod gpu;
mod instance_data;

pub use buffer::ScanInstanceBuffer;
pub use gpu::GpuScanBuffers;
pub use instance_data::{DecalInstance, DrawIndexedIndirectArgs};
