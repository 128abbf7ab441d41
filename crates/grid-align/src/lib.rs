//! Raster co-registration onto a shared grid.
//!
//! Given a set of input rasters with independent extents and resolutions,
//! [`TargetGrid::common`] computes the intersection box and the coarsest
//! resolution, and [`align_rasters`] resamples every input onto that grid
//! concurrently, one task per raster, joined before anything downstream
//! reads the results. Inputs that already sit on the target grid pass
//! through untouched; when all of them do, the whole phase is a no-op and
//! the returned report says so.

mod aligner;
mod error;
mod resample;
mod target;

pub use aligner::{align_rasters, Aligned};
pub use error::{AlignError, Result};
pub use resample::resample_bilinear;
pub use target::TargetGrid;
