//! Platform error types

use thiserror::Error;

/// Errors raised by host-side platform integrations
///
/// The sheet engine itself never fails; these cover the host wiring
/// (surface creation, driver setup) around it.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Failed to create or attach a render surface
    #[error("Surface creation failed: {0}")]
    SurfaceCreation(String),

    /// No animation driver is available on this host
    #[error("Animation driver unavailable: {0}")]
    DriverUnavailable(String),

    /// Capability not supported on this host
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// Generic platform error
    #[error("Platform error: {0}")]
    Other(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
