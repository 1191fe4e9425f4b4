//! Error types for slicing operations.

use thiserror::Error;

/// Errors that can occur while planning a voxel grid.
///
/// Sampling itself never fails: once a [`crate::Plan`] exists, every slice
/// query is a pure total function.
#[derive(Debug, Error)]
pub enum SliceError {
    /// Pitch must be positive and finite.
    #[error("invalid pitch: {0} (must be positive and finite)")]
    InvalidPitch(f64),

    /// Mesh has no facets, so its bounding box is undefined.
    #[error("mesh has no facets")]
    EmptyMesh,
}

/// Result type for slicing operations.
pub type SliceResult<T> = std::result::Result<T, SliceError>;
