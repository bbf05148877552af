//! Column-major batches: the stand-in for the host engine's vectorized
//! `DataChunk` type, an assumed external interface this crate does not own.
//!
//! This crate does not implement a vectorized execution engine; `Chunk` here
//! carries just enough typed, column-oriented structure for the pipeline
//! breaker and the join-order rewrites to be built and tested against real
//! data rather than opaque placeholders.

/// Maximum number of rows per chunk: a batch of up to ~2048 rows, matching
/// the host engine's own vectorization width.
pub const CHUNK_CAPACITY: usize = 2048;

/// The type of a single column, used by `PhysicalPipelineBreaker` to record
/// the ordered column types of its input, which it must preserve unchanged.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum ColumnType {
    Int64,
    Utf8,
}

/// A single typed column of values.
#[derive(Clone, Debug, PartialEq)]
pub enum Column {
    Int64(Vec<i64>),
    Utf8(Vec<String>),
}

impl Column {
    pub fn column_type(&self) -> ColumnType {
        match self {
            Column::Int64(_) => ColumnType::Int64,
            Column::Utf8(_) => ColumnType::Utf8,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Int64(v) => v.len(),
            Column::Utf8(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append `other`'s values onto `self`. Both columns must be the same
    /// variant — mixing types within one column position is a caller bug.
    fn extend(&mut self, other: Column) {
        match (self, other) {
            (Column::Int64(a), Column::Int64(b)) => a.extend(b),
            (Column::Utf8(a), Column::Utf8(b)) => a.extend(b),
            _ => panic!("cannot concatenate columns of different types"),
        }
    }
}

/// A column-major batch of rows.
///
/// All columns in a chunk must have equal length; `Chunk::row_count` is that
/// shared length (0 for an empty chunk, which is also how the breaker's
/// source signals end-of-scan).
#[derive(Clone, Debug, Default)]
pub struct Chunk {
    columns: Vec<Column>,
}

impl Chunk {
    /// Build a chunk from columns, asserting every column has the same
    /// length (this is an internal invariant, not a user-facing error: a
    /// caller that builds a ragged chunk has a bug).
    pub fn new(columns: Vec<Column>) -> Self {
        if let Some(first_len) = columns.first().map(Column::len) {
            debug_assert!(
                columns.iter().all(|c| c.len() == first_len),
                "chunk columns must have equal length"
            );
        }
        Self { columns }
    }

    pub fn empty() -> Self {
        Self { columns: Vec::new() }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_types(&self) -> Vec<ColumnType> {
        self.columns.iter().map(Column::column_type).collect()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Merge several chunks of identical column shape into one, the vector
    /// compaction step the bandit tunes the batch width for. Returns an
    /// empty chunk for an empty input.
    pub fn concat(chunks: Vec<Chunk>) -> Chunk {
        let mut iter = chunks.into_iter();
        let Some(mut merged) = iter.next() else {
            return Chunk::empty();
        };
        for chunk in iter {
            for (col, incoming) in merged.columns.iter_mut().zip(chunk.columns) {
                col.extend(incoming);
            }
        }
        merged
    }
}
