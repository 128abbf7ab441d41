//! Chunk partition plan over a flat index range.

use std::ops::Range;

/// Partition of `0..total` into contiguous, near-equal chunks.
///
/// When `total <= chunk_limit` the plan is a single chunk. Otherwise the
/// range splits into `ceil(total / chunk_limit)` pieces whose lengths differ
/// by at most one, the longer pieces first. Chunks cover the range without
/// overlap or gap, so concatenating per-chunk results in plan order
/// reconstructs the full-length sequence.
#[derive(Debug, Clone)]
pub struct ChunkPlan {
    total: usize,
    ranges: Vec<Range<usize>>,
}

impl ChunkPlan {
    /// Build a plan for `total` pixels under the given per-chunk limit.
    ///
    /// A limit of zero is treated as one.
    pub fn new(total: usize, chunk_limit: usize) -> Self {
        let chunk_limit = chunk_limit.max(1);

        if total == 0 {
            return Self {
                total,
                ranges: Vec::new(),
            };
        }

        let num_chunks = total.div_ceil(chunk_limit);
        let base = total / num_chunks;
        let remainder = total % num_chunks;

        let mut ranges = Vec::with_capacity(num_chunks);
        let mut start = 0;
        for i in 0..num_chunks {
            let len = if i < remainder { base + 1 } else { base };
            ranges.push(start..start + len);
            start += len;
        }

        Self { total, ranges }
    }

    /// The chunk ranges, in positional order.
    pub fn ranges(&self) -> &[Range<usize>] {
        &self.ranges
    }

    /// Number of chunks in the plan.
    pub fn num_chunks(&self) -> usize {
        self.ranges.len()
    }

    /// Total number of pixels covered.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Length of the largest chunk.
    pub fn max_chunk_len(&self) -> usize {
        self.ranges.iter().map(|r| r.len()).max().unwrap_or(0)
    }
}
