//! Common target grid computation.

use raster_core::{Extent, Raster};

use crate::error::{AlignError, Result};

/// The shared grid every input is brought onto: the intersection of all
/// input extents at the coarsest input resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetGrid {
    pub extent: Extent,
    pub res_x: f64,
    pub res_y: f64,
    pub projection: String,
}

impl TargetGrid {
    /// Compute the common grid of a set of named rasters.
    ///
    /// The extent is the running intersection of every input extent; the
    /// resolution is the per-axis maximum (coarsest) pixel size. Fails when
    /// the set is empty, when projections disagree, or when the
    /// intersection collapses to an empty box.
    pub fn common(layers: &[(String, Raster)]) -> Result<Self> {
        let (first_name, first) = layers.first().ok_or(AlignError::NoInputs)?;

        let mut extent = first.extent();
        let (mut res_x, mut res_y) = first.resolution();
        let projection = first.georef.projection.clone();

        for (name, raster) in &layers[1..] {
            if raster.georef.projection != projection {
                return Err(AlignError::ProjectionMismatch {
                    first_layer: first_name.clone(),
                    first: projection,
                    second_layer: name.clone(),
                    second: raster.georef.projection.clone(),
                });
            }

            extent = extent
                .intersection(&raster.extent())
                .ok_or(AlignError::EmptyIntersection)?;

            let (layer_res_x, layer_res_y) = raster.resolution();
            res_x = res_x.max(layer_res_x);
            res_y = res_y.max(layer_res_y);
        }

        let target = Self {
            extent,
            res_x,
            res_y,
            projection,
        };

        let (width, height) = (target.width(), target.height());
        if width == 0 || height == 0 {
            return Err(AlignError::DegenerateTarget { width, height });
        }

        Ok(target)
    }

    /// Number of whole pixels across the target extent.
    pub fn width(&self) -> usize {
        (self.extent.width() / self.res_x).round().max(0.0) as usize
    }

    /// Number of whole pixels down the target extent.
    pub fn height(&self) -> usize {
        (self.extent.height() / self.res_y).round().max(0.0) as usize
    }

    /// Check whether a raster already sits on this grid.
    pub fn matches(&self, raster: &Raster) -> bool {
        raster.matches_grid(&self.extent, self.res_x, self.res_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raster_core::GeoReference;

    fn raster(origin_x: f64, origin_y: f64, res: f64, width: usize, height: usize) -> Raster {
        Raster::new(
            vec![0.0; width * height],
            width,
            height,
            GeoReference::north_up(origin_x, origin_y, res, res, "EPSG:2154"),
            None,
        )
        .unwrap()
    }

    fn named(name: &str, raster: Raster) -> (String, Raster) {
        (name.to_string(), raster)
    }

    #[test]
    fn test_common_grid_intersection_and_coarsest_res() {
        let layers = vec![
            named("a", raster(0.0, 100.0, 10.0, 10, 10)), // extent 0..100 x 0..100
            named("b", raster(20.0, 100.0, 5.0, 20, 20)), // extent 20..120 x 0..100
        ];

        let target = TargetGrid::common(&layers).unwrap();
        assert_eq!(target.extent, Extent::new(20.0, 0.0, 100.0, 100.0));
        assert_eq!(target.res_x, 10.0);
        assert_eq!(target.res_y, 10.0);
        assert_eq!(target.width(), 8);
        assert_eq!(target.height(), 10);
    }

    #[test]
    fn test_common_grid_empty_set() {
        assert!(matches!(
            TargetGrid::common(&[]),
            Err(AlignError::NoInputs)
        ));
    }

    #[test]
    fn test_disjoint_extents_fail() {
        let layers = vec![
            named("a", raster(0.0, 100.0, 10.0, 10, 10)),
            named("b", raster(1000.0, 100.0, 10.0, 10, 10)),
        ];
        assert!(matches!(
            TargetGrid::common(&layers),
            Err(AlignError::EmptyIntersection)
        ));
    }

    #[test]
    fn test_projection_mismatch_fails() {
        let mut other = raster(0.0, 100.0, 10.0, 10, 10);
        other.georef.projection = "EPSG:4326".to_string();

        let layers = vec![named("a", raster(0.0, 100.0, 10.0, 10, 10)), named("b", other)];
        assert!(matches!(
            TargetGrid::common(&layers),
            Err(AlignError::ProjectionMismatch { .. })
        ));
    }

    #[test]
    fn test_matches_aligned_raster() {
        let layers = vec![
            named("a", raster(0.0, 100.0, 10.0, 10, 10)),
            named("b", raster(0.0, 100.0, 10.0, 10, 10)),
        ];
        let target = TargetGrid::common(&layers).unwrap();
        assert!(target.matches(&layers[0].1));
        assert!(target.matches(&layers[1].1));
    }
}
