//! Bilinear resampling onto a target grid.

use raster_core::{GeoReference, Raster};
use tracing::debug;

use crate::error::Result;
use crate::target::TargetGrid;

/// Resample a raster onto the target grid with bilinear interpolation.
///
/// Each target pixel center is mapped to fractional source pixel
/// coordinates and blended from its four neighbours. A neighbour equal to
/// the source no-data value poisons the whole pixel, and target centers
/// falling outside the source grid yield the fill value: the source
/// no-data sentinel when declared, NaN otherwise.
pub fn resample_bilinear(source: &Raster, target: &TargetGrid) -> Result<Raster> {
    let width = target.width();
    let height = target.height();

    let fill = source.nodata_f32().unwrap_or(f32::NAN);
    let georef = GeoReference::north_up(
        target.extent.min_x,
        target.extent.max_y,
        target.res_x,
        target.res_y,
        target.projection.clone(),
    );

    debug!(
        src_width = source.width,
        src_height = source.height,
        dst_width = width,
        dst_height = height,
        "resampling raster onto target grid"
    );

    let mut data = vec![fill; width * height];
    for row in 0..height {
        for col in 0..width {
            let (x, y) = georef.pixel_center(col, row);
            let (src_col, src_row) = source.georef.map_to_pixel(x, y);
            data[row * width + col] = sample_bilinear(source, src_col, src_row, fill);
        }
    }

    Ok(Raster::new(data, width, height, georef, source.nodata)?)
}

/// Bilinear sample at fractional source pixel coordinates.
fn sample_bilinear(source: &Raster, col: f64, row: f64, fill: f32) -> f32 {
    let max_col = (source.width - 1) as f64;
    let max_row = (source.height - 1) as f64;

    // Up to half a pixel of overhang still has a nearest defined neighbour;
    // beyond that the target center is outside the source grid.
    if col < -0.5 || row < -0.5 || col > max_col + 0.5 || row > max_row + 0.5 {
        return fill;
    }

    let col = col.clamp(0.0, max_col);
    let row = row.clamp(0.0, max_row);

    let x0 = col.floor() as usize;
    let y0 = row.floor() as usize;
    let x1 = (x0 + 1).min(source.width - 1);
    let y1 = (y0 + 1).min(source.height - 1);

    let xf = (col - x0 as f64) as f32;
    let yf = (row - y0 as f64) as f32;

    let v00 = source.data[y0 * source.width + x0];
    let v10 = source.data[y0 * source.width + x1];
    let v01 = source.data[y1 * source.width + x0];
    let v11 = source.data[y1 * source.width + x1];

    // A no-data corner poisons the whole pixel rather than bleeding a
    // sentinel value into the blend.
    if let Some(nodata) = source.nodata_f32() {
        if v00 == nodata || v10 == nodata || v01 == nodata || v11 == nodata {
            return fill;
        }
    }
    if v00.is_nan() || v10.is_nan() || v01.is_nan() || v11.is_nan() {
        return fill;
    }

    let top = v00 * (1.0 - xf) + v10 * xf;
    let bottom = v01 * (1.0 - xf) + v11 * xf;
    top * (1.0 - yf) + bottom * yf
}

#[cfg(test)]
mod tests {
    use super::*;
    use raster_core::Extent;

    fn source() -> Raster {
        // 2x2 grid over 0..20 x 0..20, res 10.
        Raster::new(
            vec![1.0, 2.0, 3.0, 4.0],
            2,
            2,
            GeoReference::north_up(0.0, 20.0, 10.0, 10.0, "EPSG:2154"),
            None,
        )
        .unwrap()
    }

    fn target(extent: Extent, res: f64) -> TargetGrid {
        TargetGrid {
            extent,
            res_x: res,
            res_y: res,
            projection: "EPSG:2154".to_string(),
        }
    }

    #[test]
    fn test_identity_grid_preserves_values() {
        let src = source();
        let out = resample_bilinear(&src, &target(src.extent(), 10.0)).unwrap();
        assert_eq!(out.data, src.data);
        assert_eq!(out.shape(), (2, 2));
    }

    #[test]
    fn test_center_blend() {
        // A 1-pixel target covering the full extent samples the exact
        // center of the 2x2 source: the mean of all four corners.
        let src = source();
        let out = resample_bilinear(&src, &target(src.extent(), 20.0)).unwrap();
        assert_eq!(out.shape(), (1, 1));
        assert!((out.data[0] - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_nodata_corner_poisons_pixel() {
        let mut src = source();
        src.nodata = Some(4.0);
        let out = resample_bilinear(&src, &target(src.extent(), 20.0)).unwrap();
        assert_eq!(out.data[0], 4.0);
    }

    #[test]
    fn test_outside_source_gets_fill() {
        let mut src = source();
        src.nodata = Some(-1.0);
        // Target extends far east of the source.
        let out = resample_bilinear(
            &src,
            &target(Extent::new(0.0, 0.0, 40.0, 20.0), 10.0),
        )
        .unwrap();
        assert_eq!(out.shape(), (2, 4));
        // Columns beyond the source grid are fill.
        assert_eq!(out.data[3], -1.0);
        assert_eq!(out.data[7], -1.0);
    }

    #[test]
    fn test_output_georeference() {
        let src = source();
        let out = resample_bilinear(
            &src,
            &target(Extent::new(0.0, 0.0, 20.0, 10.0), 5.0),
        )
        .unwrap();
        assert_eq!(out.georef.origin(), (0.0, 10.0));
        assert_eq!(out.resolution(), (5.0, 5.0));
        assert_eq!(out.shape(), (2, 4));
    }
}
