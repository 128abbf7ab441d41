//! Error types for grid alignment.

use thiserror::Error;

/// Errors that can occur while aligning rasters.
#[derive(Error, Debug)]
pub enum AlignError {
    /// No rasters were supplied.
    #[error("cannot align an empty set of rasters")]
    NoInputs,

    /// The inputs do not overlap: the intersection extent is empty.
    #[error("input rasters have no common extent (intersection is empty)")]
    EmptyIntersection,

    /// Inputs declare different projections; resampling does not reproject.
    #[error("projection mismatch: {first:?} for {first_layer} vs {second:?} for {second_layer}")]
    ProjectionMismatch {
        first_layer: String,
        first: String,
        second_layer: String,
        second: String,
    },

    /// The computed target grid has a zero dimension.
    #[error("degenerate target grid: {width}x{height} pixels")]
    DegenerateTarget { width: usize, height: usize },

    /// A resampling task failed or panicked; the phase is aborted.
    #[error("resampling task for {layer} failed: {reason}")]
    TaskFailed { layer: String, reason: String },

    /// Raster construction error from the core model.
    #[error(transparent)]
    Raster(#[from] raster_core::RasterError),
}

/// Result type for alignment operations.
pub type Result<T> = std::result::Result<T, AlignError>;
