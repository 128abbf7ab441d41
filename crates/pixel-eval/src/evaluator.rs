//! Parallel chunk dispatch of scalar per-pixel kernels.

use rayon::prelude::*;
use tracing::debug;

use crate::plan::ChunkPlan;

/// Evaluate a scalar kernel over `0..total`, producing `N` output planes.
///
/// The kernel receives the flat pixel index and returns one value per output
/// plane; it must be pure with respect to position (no cross-pixel state).
/// Chunks are dispatched in plan order, each evaluated in parallel across
/// the worker pool; results are scattered back into pre-allocated
/// full-length planes, so the output is identical for any `chunk_limit`.
/// The per-chunk result buffer is the bounded working set.
///
/// The first kernel error cancels the run and is returned as-is.
pub fn evaluate<const N: usize, F, E>(
    total: usize,
    chunk_limit: usize,
    kernel: F,
) -> Result<[Vec<f32>; N], E>
where
    F: Fn(usize) -> Result<[f32; N], E> + Sync,
    E: Send,
{
    let plan = ChunkPlan::new(total, chunk_limit);
    debug!(
        total,
        chunk_limit,
        chunks = plan.num_chunks(),
        outputs = N,
        "dispatching chunked evaluation"
    );

    let mut planes: [Vec<f32>; N] = std::array::from_fn(|_| vec![0.0; total]);

    for range in plan.ranges() {
        let chunk: Vec<[f32; N]> = range
            .clone()
            .into_par_iter()
            .map(&kernel)
            .collect::<Result<_, E>>()?;

        for (offset, values) in chunk.into_iter().enumerate() {
            let pos = range.start + offset;
            for (plane, value) in planes.iter_mut().zip(values) {
                plane[pos] = value;
            }
        }
    }

    Ok(planes)
}
