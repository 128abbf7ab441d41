//! In-memory single-band rasters.

use crate::error::{RasterError, Result};
use crate::extent::Extent;
use crate::georef::GeoReference;
use crate::ALIGN_EPSILON;

/// A single-band raster held in memory.
///
/// Samples are stored row-major, top row first, the same flat ordering the
/// chunked evaluator consumes, so `data` serves directly as the positional
/// pixel sequence. All sources are read as `f32` regardless of their on-disk
/// sample type.
#[derive(Debug, Clone)]
pub struct Raster {
    pub data: Vec<f32>,
    pub width: usize,
    pub height: usize,
    pub georef: GeoReference,
    /// Declared no-data sentinel, if the source provides one.
    pub nodata: Option<f64>,
}

impl Raster {
    /// Create a new raster, checking that the flat data matches the shape.
    pub fn new(
        data: Vec<f32>,
        width: usize,
        height: usize,
        georef: GeoReference,
        nodata: Option<f64>,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidDimensions { width, height });
        }
        let expected = width * height;
        if data.len() != expected {
            return Err(RasterError::ShapeMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            georef,
            nodata,
        })
    }

    /// Total number of pixels.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the raster holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Grid shape as `(height, width)`: rows first, matching row-major
    /// storage.
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Get the value at a grid coordinate.
    pub fn get(&self, col: usize, row: usize) -> Option<f32> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.data.get(row * self.width + col).copied()
    }

    /// Geographic extent covered by the grid.
    pub fn extent(&self) -> Extent {
        self.georef.extent(self.width, self.height)
    }

    /// Pixel size as `(res_x, res_y)`, both positive.
    pub fn resolution(&self) -> (f64, f64) {
        (self.georef.res_x(), self.georef.res_y())
    }

    /// No-data sentinel as `f32`, for comparison against samples.
    pub fn nodata_f32(&self) -> Option<f32> {
        self.nodata.map(|v| v as f32)
    }

    /// Check whether this raster already sits on the given extent and
    /// resolution, within [`ALIGN_EPSILON`] of a pixel.
    pub fn matches_grid(&self, extent: &Extent, res_x: f64, res_y: f64) -> bool {
        let (own_res_x, own_res_y) = self.resolution();
        let tol_x = res_x * ALIGN_EPSILON;
        let tol_y = res_y * ALIGN_EPSILON;

        (own_res_x - res_x).abs() <= tol_x
            && (own_res_y - res_y).abs() <= tol_y
            && self.extent().approx_eq(extent, tol_x.max(tol_y))
    }
}
