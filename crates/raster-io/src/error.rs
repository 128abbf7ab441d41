//! Error types for raster I/O.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or writing raster files.
#[derive(Error, Debug)]
pub enum IoError {
    /// GDAL failed to open, read or create a dataset.
    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),

    /// Filesystem error while finalizing an output.
    #[error("failed to finalize {path}: {source}")]
    Finalize {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file declares a zero dimension.
    #[error("raster {path} has invalid dimensions {width}x{height}")]
    InvalidDimensions {
        path: PathBuf,
        width: usize,
        height: usize,
    },

    /// The in-memory model rejected the file's shape or geotransform.
    #[error(transparent)]
    Model(#[from] raster_core::RasterError),
}

/// Result type for raster I/O operations.
pub type Result<T> = std::result::Result<T, IoError>;
