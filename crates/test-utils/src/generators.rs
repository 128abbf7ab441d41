//! Synthetic raster builders with predictable value patterns.

use raster_core::{GeoReference, Raster};

/// Build a raster from explicit row-major values.
///
/// The georeference is north-up with its top-left origin at
/// `(origin_x, origin_y)` and square pixels of size `res`.
pub fn raster_from_values(
    values: Vec<f32>,
    width: usize,
    height: usize,
    origin_x: f64,
    origin_y: f64,
    res: f64,
) -> Raster {
    Raster::new(
        values,
        width,
        height,
        GeoReference::north_up(origin_x, origin_y, res, res, "EPSG:2154"),
        None,
    )
    .expect("test raster shape")
}

/// Build a raster where every cell holds `col * 1000 + row`.
///
/// The pattern makes positional mix-ups visible: after any reshaping or
/// resampling onto the same grid, cell `(col, row)` must still read
/// `col * 1000 + row`.
pub fn indexed_raster(width: usize, height: usize, origin_x: f64, origin_y: f64, res: f64) -> Raster {
    let mut values = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            values.push((col * 1000 + row) as f32);
        }
    }
    raster_from_values(values, width, height, origin_x, origin_y, res)
}

/// Build a raster filled with a single value.
pub fn constant_raster(
    value: f32,
    width: usize,
    height: usize,
    origin_x: f64,
    origin_y: f64,
    res: f64,
) -> Raster {
    raster_from_values(vec![value; width * height], width, height, origin_x, origin_y, res)
}
