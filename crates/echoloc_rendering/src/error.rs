//! # Rendering Error Types
//!
//! Only allocation and configuration problems surface as errors; a ray
//! that misses or a scan that hits nothing are ordinary data.

use thiserror::Error;

/// Errors that can occur in the rendering layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Buffer creation would exceed what the device allows. Fatal: the
    /// engine cannot run without its fixed-capacity buffers.
    #[error("scan buffer of {requested} bytes exceeds device limit {limit}")]
    Allocation {
        /// Bytes the buffer would need.
        requested: u64,
        /// The device's limit.
        limit: u64,
    },

    /// A commit carried more instances than the buffers were sized for.
    /// The previously committed state is left untouched.
    #[error("commit of {count} instances exceeds buffer capacity {capacity}")]
    CapacityExceeded {
        /// Instances in the rejected commit.
        count: usize,
        /// Fixed capacity chosen at initialization.
        capacity: usize,
    },

    /// The decal mesh descriptor is empty; the frame's draw is skipped.
    #[error("decal mesh descriptor has no indices")]
    MissingMesh,

    /// Visual-mode bindings were never applied; the frame's draw is
    /// skipped but the scan pipeline keeps running.
    #[error("visual material bindings not configured")]
    MissingMaterial,
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;
