//! Chunked data-parallel evaluation over flattened pixel sequences.
//!
//! Per-pixel formulas are embarrassingly parallel: every pixel is computed
//! from the same-position values of the aligned input grids, with no
//! cross-pixel dependency. This crate provides the dispatch machinery:
//! [`ChunkPlan`] partitions the flat index range into bounded contiguous
//! chunks and [`evaluate`] runs a scalar kernel over each chunk in parallel,
//! reassembling per-output planes in original positional order.

mod evaluator;
mod plan;

pub use evaluator::evaluate;
pub use plan::ChunkPlan;

/// Default upper bound on pixels evaluated per chunk.
///
/// Bounds the per-dispatch working set; tune per host via configuration
/// rather than editing this constant.
pub const DEFAULT_CHUNK_LIMIT: usize = 10_000_000;
