//! Atomic GeoTIFF writing through GDAL.

use std::path::{Path, PathBuf};

use gdal::raster::Buffer;
use gdal::DriverManager;
use raster_core::GeoReference;
use tracing::{debug, info};

use crate::error::{IoError, Result};

/// On-disk sample type of an output raster.
///
/// Classified and packed-code products fit 16-bit integers; continuous
/// erosion quantities need float samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputType {
    Int16,
    Float32,
}

/// Write a single-band GeoTIFF with the reference georeference.
///
/// The dataset is created at `<path>.tmp` and renamed over `path` once
/// fully flushed, so an interrupted write never leaves a truncated file in
/// place of a previous output. `data` is row-major `width x height`;
/// `nodata` is declared on the band.
pub fn write_raster(
    path: impl AsRef<Path>,
    data: &[f32],
    width: usize,
    height: usize,
    output_type: OutputType,
    georef: &GeoReference,
    nodata: f64,
) -> Result<()> {
    let path = path.as_ref();
    let tmp_path = tmp_path_for(path);

    debug!(
        path = %path.display(),
        width,
        height,
        output_type = ?output_type,
        "writing output raster"
    );

    let driver = DriverManager::get_driver_by_name("GTiff")?;

    match output_type {
        OutputType::Int16 => {
            let mut dataset = driver.create_with_band_type::<i16, _>(&tmp_path, width, height, 1)?;
            dataset.set_geo_transform(&georef.geo_transform)?;
            dataset.set_projection(&georef.projection)?;

            let samples: Vec<i16> = data.iter().map(|&v| v as i16).collect();
            let mut buffer = Buffer::new((width, height), samples);
            let mut band = dataset.rasterband(1)?;
            band.write((0, 0), (width, height), &mut buffer)?;
            band.set_no_data_value(Some(nodata))?;
        }
        OutputType::Float32 => {
            let mut dataset = driver.create_with_band_type::<f32, _>(&tmp_path, width, height, 1)?;
            dataset.set_geo_transform(&georef.geo_transform)?;
            dataset.set_projection(&georef.projection)?;

            let mut buffer = Buffer::new((width, height), data.to_vec());
            let mut band = dataset.rasterband(1)?;
            band.write((0, 0), (width, height), &mut buffer)?;
            band.set_no_data_value(Some(nodata))?;
        }
    }

    // The dataset must be closed before the rename so the file is fully
    // flushed; GDAL flushes on drop.
    std::fs::rename(&tmp_path, path).map_err(|source| IoError::Finalize {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), "output raster written");
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut file_name = path.file_name().unwrap_or_default().to_os_string();
    file_name.push(".tmp");
    path.with_file_name(file_name)
}
