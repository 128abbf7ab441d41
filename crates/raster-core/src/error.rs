//! Error types for the raster data model.

use thiserror::Error;

/// Errors that can occur while constructing or reshaping rasters.
#[derive(Error, Debug)]
pub enum RasterError {
    /// The flat data length does not match the declared grid shape.
    #[error("grid data length {actual} does not match {width}x{height} = {expected}")]
    ShapeMismatch {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    /// A raster was declared with a zero dimension.
    #[error("invalid raster dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    /// The geotransform does not describe a north-up grid.
    #[error("unsupported geotransform {0:?}: expected north-up with negative row pitch")]
    InvalidGeoTransform([f64; 6]),
}

/// Result type for raster model operations.
pub type Result<T> = std::result::Result<T, RasterError>;
