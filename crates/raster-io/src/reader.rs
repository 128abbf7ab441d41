//! Reading single-band rasters through GDAL.

use std::path::Path;

use gdal::raster::RasterBand;
use gdal::Dataset;
use raster_core::{GeoReference, Raster};
use tracing::debug;

use crate::error::{IoError, Result};

/// Open a raster file and read band 1 as `f32`.
///
/// Carries over the geotransform, projection and the band's declared
/// no-data value. The on-disk sample type is widened (or narrowed) to
/// `f32` by GDAL during the read.
pub fn read_raster(path: impl AsRef<Path>) -> Result<Raster> {
    let path = path.as_ref();
    let dataset = Dataset::open(path)?;
    let band: RasterBand = dataset.rasterband(1)?;

    let width = band.x_size();
    let height = band.y_size();
    if width == 0 || height == 0 {
        return Err(IoError::InvalidDimensions {
            path: path.to_path_buf(),
            width,
            height,
        });
    }

    let nodata = band.no_data_value();
    let geo_transform = dataset.geo_transform()?;
    let georef = GeoReference::from_geo_transform(geo_transform, dataset.projection())?;

    let buffer = band.read_as::<f32>((0, 0), (width, height), (width, height), None)?;
    let data: Vec<f32> = buffer.into_iter().collect();

    debug!(
        path = %path.display(),
        width,
        height,
        nodata = ?nodata,
        "read raster band"
    );

    Ok(Raster::new(data, width, height, georef, nodata)?)
}
