//! `testing` module fixture builders.

use bushy_breaker::chunk::CHUNK_CAPACITY;
use bushy_breaker::testing::{int_key_chunks, total_rows};

#[test]
fn int_key_chunks_splits_at_capacity() {
    let chunks = int_key_chunks(0, CHUNK_CAPACITY * 2 + 10);
    assert_eq!(chunks.len(), 3);
    assert_eq!(total_rows(&chunks), CHUNK_CAPACITY * 2 + 10);
}
