//! Concurrent alignment of a raster set onto its common grid.

use raster_core::Raster;
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::error::{AlignError, Result};
use crate::resample::resample_bilinear;
use crate::target::TargetGrid;

/// Result of an alignment phase.
#[derive(Debug)]
pub struct Aligned {
    /// The co-registered rasters, in input order; all share the target
    /// grid's shape and georeference.
    pub rasters: Vec<Raster>,
    /// The grid everything was brought onto.
    pub target: TargetGrid,
    /// How many inputs actually needed resampling. Zero means the fast
    /// path: the inputs were returned untouched.
    pub resampled: usize,
}

/// Align a set of named rasters onto their common grid.
///
/// Rasters already on the target grid pass through unchanged. The others
/// are resampled concurrently, one blocking task per raster, and joined
/// before this function returns; the first task failure aborts the
/// remaining tasks and fails the whole phase.
pub async fn align_rasters(layers: Vec<(String, Raster)>) -> Result<Aligned> {
    let target = TargetGrid::common(&layers)?;

    if layers.iter().all(|(_, raster)| target.matches(raster)) {
        debug!(
            layers = layers.len(),
            "all rasters already share the target grid; skipping resampling"
        );
        return Ok(Aligned {
            rasters: layers.into_iter().map(|(_, raster)| raster).collect(),
            target,
            resampled: 0,
        });
    }

    let total = layers.len();
    let mut set = JoinSet::new();
    for (index, (name, raster)) in layers.into_iter().enumerate() {
        let target = target.clone();
        set.spawn_blocking(move || {
            if target.matches(&raster) {
                debug!(layer = %name, "raster already on target grid");
                return Ok((index, raster, false));
            }
            info!(
                layer = %name,
                width = raster.width,
                height = raster.height,
                "resampling raster onto common grid"
            );
            let resampled = resample_bilinear(&raster, &target)
                .map_err(|e| AlignError::TaskFailed {
                    layer: name.clone(),
                    reason: e.to_string(),
                })?;
            Ok((index, resampled, true))
        });
    }

    let mut rasters: Vec<Option<Raster>> = (0..total).map(|_| None).collect();
    let mut resampled = 0;

    while let Some(joined) = set.join_next().await {
        let task: Result<(usize, Raster, bool)> = joined.map_err(|e| AlignError::TaskFailed {
            layer: "<unknown>".to_string(),
            reason: e.to_string(),
        })?;

        match task {
            Ok((index, raster, was_resampled)) => {
                if was_resampled {
                    resampled += 1;
                }
                rasters[index] = Some(raster);
            }
            Err(error) => {
                // Fail fast: abandon the remaining tasks instead of
                // proceeding with a partially aligned set.
                set.abort_all();
                return Err(error);
            }
        }
    }

    info!(
        total,
        resampled,
        width = target.width(),
        height = target.height(),
        "alignment phase complete"
    );

    Ok(Aligned {
        rasters: rasters.into_iter().map(|r| r.expect("task per raster")).collect(),
        target,
        resampled,
    })
}
