//! Test-fixture builders: small, composable helpers for constructing
//! representative data rather than a full mocking framework.

use crate::chunk::{Chunk, Column, CHUNK_CAPACITY};

/// Build `row_count` rows of a single `Int64` key column, split into chunks
/// of at most [`CHUNK_CAPACITY`] rows, with keys `start..start + row_count`.
pub fn int_key_chunks(start: i64, row_count: usize) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut produced = 0usize;
    while produced < row_count {
        let this_len = (row_count - produced).min(CHUNK_CAPACITY);
        let keys: Vec<i64> = (0..this_len as i64)
            .map(|i| start + produced as i64 + i)
            .collect();
        chunks.push(Chunk::new(vec![Column::Int64(keys)]));
        produced += this_len;
    }
    chunks
}

/// Total row count across a slice of chunks, for asserting against expected
/// totals in boundary scenarios like E4.
pub fn total_rows(chunks: &[Chunk]) -> usize {
    chunks.iter().map(Chunk::row_count).sum()
}
