//! Alignment phase behaviour: fast path, resampling, and failure modes.

use grid_align::{align_rasters, AlignError};
use test_utils::{constant_raster, indexed_raster};

fn named(name: &str, raster: raster_core::Raster) -> (String, raster_core::Raster) {
    (name.to_string(), raster)
}

#[tokio::test]
async fn aligned_inputs_skip_resampling() {
    let layers = vec![
        named("slope", indexed_raster(8, 6, 0.0, 60.0, 10.0)),
        named("permeability", constant_raster(3.0, 8, 6, 0.0, 60.0, 10.0)),
        named("land_cover", constant_raster(5.0, 8, 6, 0.0, 60.0, 10.0)),
    ];
    let expected = layers[0].1.data.clone();

    let aligned = align_rasters(layers).await.unwrap();

    assert_eq!(aligned.resampled, 0);
    assert_eq!(aligned.rasters.len(), 3);
    // Inputs pass through untouched on the fast path.
    assert_eq!(aligned.rasters[0].data, expected);
}

#[tokio::test]
async fn mixed_grids_resample_onto_intersection() {
    // One raster covers 0..80 x 0..60 at res 10, the other 20..100 x 0..60
    // at res 5: the target is 20..80 x 0..60 at res 10.
    let layers = vec![
        named("coarse", constant_raster(1.0, 8, 6, 0.0, 60.0, 10.0)),
        named("fine", constant_raster(2.0, 16, 12, 20.0, 60.0, 5.0)),
    ];

    let aligned = align_rasters(layers).await.unwrap();

    assert_eq!(aligned.resampled, 2);
    assert_eq!(aligned.target.res_x, 10.0);
    assert_eq!(aligned.target.extent.min_x, 20.0);
    assert_eq!(aligned.target.extent.max_x, 80.0);

    for raster in &aligned.rasters {
        assert_eq!(raster.shape(), (6, 6));
    }
    // Constant fields stay constant under bilinear resampling away from
    // the edges; check interior pixels.
    assert_eq!(aligned.rasters[0].get(2, 2), Some(1.0));
    assert_eq!(aligned.rasters[1].get(2, 2), Some(2.0));
}

#[tokio::test]
async fn already_aligned_subset_is_not_resampled() {
    // The coarse raster already sits on the target grid; only the fine one
    // must be resampled.
    let layers = vec![
        named("reference", constant_raster(1.0, 6, 6, 20.0, 60.0, 10.0)),
        named("fine", constant_raster(2.0, 16, 12, 20.0, 60.0, 5.0)),
    ];

    let aligned = align_rasters(layers).await.unwrap();
    assert_eq!(aligned.resampled, 1);
    assert_eq!(aligned.rasters[0].shape(), (6, 6));
    assert_eq!(aligned.rasters[1].shape(), (6, 6));
}

#[tokio::test]
async fn disjoint_extents_abort_before_any_work() {
    let layers = vec![
        named("west", constant_raster(1.0, 4, 4, 0.0, 40.0, 10.0)),
        named("east", constant_raster(2.0, 4, 4, 500.0, 40.0, 10.0)),
    ];

    let result = align_rasters(layers).await;
    assert!(matches!(result, Err(AlignError::EmptyIntersection)));
}

#[tokio::test]
async fn empty_input_set_is_rejected() {
    let result = align_rasters(Vec::new()).await;
    assert!(matches!(result, Err(AlignError::NoInputs)));
}

#[tokio::test]
async fn resampled_grid_preserves_positional_pattern() {
    // Resampling an indexed raster onto its own grid (forced by a second,
    // coarser layer sharing the same extent) must keep values positional.
    let layers = vec![
        named("indexed", indexed_raster(8, 6, 0.0, 60.0, 10.0)),
        named("coarse", constant_raster(0.0, 4, 3, 0.0, 60.0, 20.0)),
    ];

    let aligned = align_rasters(layers).await.unwrap();
    assert_eq!(aligned.target.res_x, 20.0);
    assert_eq!(aligned.rasters[0].shape(), (3, 4));

    // Target pixel (0, 0) center falls at source fractional (0.5, 0.5):
    // the mean of the four top-left indexed values.
    let expected = (0.0 + 1000.0 + 1.0 + 1001.0) / 4.0;
    assert_eq!(aligned.rasters[0].get(0, 0), Some(expected));
}
