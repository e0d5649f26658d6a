//! # Engine Error Types
//!
//! The propagation policy is narrow on purpose: intersection misses and
//! zero-hit scans are data. Only configuration problems, allocation
//! failures and rejected triggers reach the caller.

use echoloc_rendering::RenderError;
use thiserror::Error;

/// Errors surfaced by the engine facade.
#[derive(Error, Debug, Clone)]
pub enum EngineError {
    /// The supplied configuration is unusable (zero rays, negative
    /// distances, ray count above the initialized maximum).
    #[error("invalid scan configuration: {0}")]
    Config(String),

    /// A scan was triggered while one is in flight. The new request is
    /// dropped; serialize triggers through a gate or queue instead.
    #[error("scan already in flight")]
    ScanInFlight,

    /// The engine was shut down; no further scans or draws are possible.
    #[error("engine has been shut down")]
    ShutDown,

    /// A rendering-layer failure (fatal allocation, capacity overflow).
    #[error(transparent)]
    Render(#[from] RenderError),

    /// A config file could not be read.
    #[error("failed to read scan config: {0}")]
    ConfigIo(String),

    /// A config file could not be parsed.
    #[error("failed to parse scan config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
