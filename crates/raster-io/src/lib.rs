//! GDAL-backed raster I/O.
//!
//! Thin adapter between the in-memory [`raster_core::Raster`] model and
//! single-band grid files: band 1 is read as `f32` regardless of on-disk
//! type, and outputs are written as GeoTIFF with the reference
//! georeference, a declared no-data sentinel, and a temp-then-rename step
//! so a failed write never corrupts an existing output.

mod error;
mod reader;
mod writer;

pub use error::{IoError, Result};
pub use reader::read_raster;
pub use writer::{write_raster, OutputType};
