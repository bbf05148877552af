//! The physical-operator capability surface and the two minimal stand-in
//! operators (`PhysicalGet`, `PhysicalComparisonJoin`) needed to build and
//! execute a bushy plan end-to-end in tests.
//!
//! The host engine's real physical-operator zoo (hash joins, merge joins,
//! ASOF/IE joins, the actual vectorized scan) is out of scope.
//! `PhysicalOperator` models the capability set a concrete operator can
//! advertise — "can sink", "can source", with parallel variants of each —
//! each flag defaulting to `false` so a stateless op only overrides the ones
//! it needs. Global and local sink/source state are type-erased
//! `Box<dyn Any>`: operators downcast their own state back to a concrete
//! type, matching the original engine's `input.global_state.Cast<T>()`.

use crate::chunk::{Chunk, ColumnType};
use crate::error::EngineError;
use crate::logical_plan::LogicalOperator;
use crate::operator_id::{OperatorId, OperatorIdAllocator};
use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Result of a `Sink` call. The breaker's sink never needs more than one
/// variant, but the type exists so a future sink operator isn't forced to
/// invent its own enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkResult {
    NeedMoreInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombineResult {
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizeResult {
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceResult {
    HaveMoreOutput,
    Finished,
}

/// Capability set for a physical operator: "can sink", "can source", each
/// with an independent parallel flag, plus the four state constructors the
/// executor calls before driving a pipeline.
pub trait PhysicalOperator: Send + Sync {
    fn operator_id(&self) -> OperatorId;

    /// Output column types, preserved unchanged through breakers and
    /// pass-through nodes.
    fn column_types(&self) -> &[ColumnType];

    fn is_sink(&self) -> bool {
        false
    }
    fn parallel_sink(&self) -> bool {
        false
    }
    fn is_source(&self) -> bool {
        false
    }
    fn parallel_source(&self) -> bool {
        false
    }

    fn get_global_sink_state(&self) -> Box<dyn Any + Send + Sync> {
        unimplemented!("operator is not a sink")
    }
    fn get_local_sink_state(&self) -> Box<dyn Any + Send + Sync> {
        unimplemented!("operator is not a sink")
    }
    fn sink(&self, _chunk: Chunk, _global: &dyn Any, _local: &mut dyn Any) -> SinkResult {
        unimplemented!("operator is not a sink")
    }
    fn combine(&self, _global: &dyn Any, _local: &mut dyn Any) -> CombineResult {
        unimplemented!("operator is not a sink")
    }
    fn finalize(&self) -> FinalizeResult {
        FinalizeResult::Ready
    }

    fn get_global_source_state(&self) -> Box<dyn Any + Send + Sync> {
        unimplemented!("operator is not a source")
    }
    fn get_local_source_state(&self, _global: &dyn Any) -> Box<dyn Any + Send + Sync> {
        unimplemented!("operator is not a source")
    }
    fn get_data(&self, _global: &dyn Any, _local: &mut dyn Any) -> (SourceResult, Chunk) {
        unimplemented!("operator is not a source")
    }
}

/// Drain every chunk a (non-parallel, single-threaded) source produces.
/// Used by [`PhysicalComparisonJoin`] to materialize its children eagerly —
/// the join algorithm itself is not the subject of this crate, so it is kept
/// intentionally simple (a single-threaded hash join over fully-materialized
/// inputs) rather than implemented as a real vectorized pipeline operator.
pub fn drain_source(op: &dyn PhysicalOperator) -> Vec<Chunk> {
    let global = op.get_global_source_state();
    let mut local = op.get_local_source_state(global.as_ref());
    let mut out = Vec::new();
    loop {
        let (result, chunk) = op.get_data(global.as_ref(), local.as_mut());
        if !chunk.is_empty() {
            out.push(chunk);
        }
        if result == SourceResult::Finished {
            break;
        }
    }
    out
}

/// Stand-in for a base-table scan physical operator. Holds its rows
/// pre-loaded (there is no Parquet/CSV reader in scope) and serves them one
/// chunk at a time through an atomic cursor, mirroring the breaker's own
/// source discipline.
pub struct PhysicalGet {
    id: OperatorId,
    types: Vec<ColumnType>,
    rows: Vec<Chunk>,
}

impl PhysicalGet {
    pub fn new(id: OperatorId, types: Vec<ColumnType>, rows: Vec<Chunk>) -> Self {
        Self { id, types, rows }
    }
}

struct CursorState {
    idx: AtomicUsize,
}

impl PhysicalOperator for PhysicalGet {
    fn operator_id(&self) -> OperatorId {
        self.id
    }

    fn column_types(&self) -> &[ColumnType] {
        &self.types
    }

    fn is_source(&self) -> bool {
        true
    }

    fn parallel_source(&self) -> bool {
        true
    }

    fn get_global_source_state(&self) -> Box<dyn Any + Send + Sync> {
        Box::new(CursorState {
            idx: AtomicUsize::new(0),
        })
    }

    fn get_local_source_state(&self, _global: &dyn Any) -> Box<dyn Any + Send + Sync> {
        Box::new(())
    }

    fn get_data(&self, global: &dyn Any, _local: &mut dyn Any) -> (SourceResult, Chunk) {
        let state = global.downcast_ref::<CursorState>().unwrap();
        let idx = state.idx.fetch_add(1, Ordering::Relaxed);
        match self.rows.get(idx) {
            Some(chunk) => (SourceResult::HaveMoreOutput, chunk.clone()),
            None => (SourceResult::Finished, Chunk::empty()),
        }
    }
}

/// Stand-in comparison-join physical operator: a single-threaded hash join,
/// keyed on the first `Int64` column of each side, computed eagerly the
/// first time `get_data` is called and then served chunk-by-chunk. Real join
/// algorithms (hash, merge, ASOF, IE) are out of scope; this exists only so
/// `PhysicalPlanGenerator` and the breaker have a non-trivial join to wrap.
pub struct PhysicalComparisonJoin {
    id: OperatorId,
    types: Vec<ColumnType>,
    left: Arc<dyn PhysicalOperator>,
    right: Arc<dyn PhysicalOperator>,
}

impl PhysicalComparisonJoin {
    pub fn new(
        id: OperatorId,
        left: Arc<dyn PhysicalOperator>,
        right: Arc<dyn PhysicalOperator>,
    ) -> Self {
        let mut types = left.column_types().to_vec();
        types.extend(right.column_types().iter().copied());
        Self {
            id,
            types,
            left,
            right,
        }
    }

    fn compute(&self) -> Vec<Chunk> {
        use crate::chunk::Column;
        use std::collections::HashMap;

        let left_chunks = drain_source(self.left.as_ref());
        let right_chunks = drain_source(self.right.as_ref());

        let mut right_index: HashMap<i64, Vec<usize>> = HashMap::new();
        let mut right_keys = Vec::new();
        let mut right_row = 0usize;
        for chunk in &right_chunks {
            if let Some(Column::Int64(keys)) = chunk.columns().first() {
                for &k in keys {
                    right_index.entry(k).or_default().push(right_row);
                    right_keys.push(k);
                    right_row += 1;
                }
            }
        }

        let mut out_left: Vec<i64> = Vec::new();
        let mut out_right: Vec<i64> = Vec::new();
        for chunk in &left_chunks {
            if let Some(Column::Int64(keys)) = chunk.columns().first() {
                for &k in keys {
                    if let Some(matches) = right_index.get(&k) {
                        for &_m in matches {
                            out_left.push(k);
                            out_right.push(k);
                        }
                    }
                }
            }
        }

        if out_left.is_empty() {
            return Vec::new();
        }
        vec![Chunk::new(vec![
            Column::Int64(out_left),
            Column::Int64(out_right),
        ])]
    }
}

struct JoinSourceState {
    rows: Vec<Chunk>,
    idx: AtomicUsize,
}

impl PhysicalOperator for PhysicalComparisonJoin {
    fn operator_id(&self) -> OperatorId {
        self.id
    }

    fn column_types(&self) -> &[ColumnType] {
        &self.types
    }

    fn is_source(&self) -> bool {
        true
    }

    fn get_global_source_state(&self) -> Box<dyn Any + Send + Sync> {
        Box::new(JoinSourceState {
            rows: self.compute(),
            idx: AtomicUsize::new(0),
        })
    }

    fn get_local_source_state(&self, _global: &dyn Any) -> Box<dyn Any + Send + Sync> {
        Box::new(())
    }

    fn get_data(&self, global: &dyn Any, _local: &mut dyn Any) -> (SourceResult, Chunk) {
        let state = global.downcast_ref::<JoinSourceState>().unwrap();
        let idx = state.idx.fetch_add(1, Ordering::Relaxed);
        match state.rows.get(idx) {
            Some(chunk) => (SourceResult::HaveMoreOutput, chunk.clone()),
            None => (SourceResult::Finished, Chunk::empty()),
        }
    }
}

/// Lowers a logical plan (post breaker-placement rewrite) into a physical
/// plan, assigning each operator a stable [`OperatorId`] as it goes.
pub struct PhysicalPlanGenerator {
    ids: OperatorIdAllocator,
}

impl Default for PhysicalPlanGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicalPlanGenerator {
    pub fn new() -> Self {
        Self {
            ids: OperatorIdAllocator::new(),
        }
    }

    /// Lower a logical node. `get_rows` supplies pre-loaded row data for
    /// `Get` leaves, keyed by table name (the actual scan/reader is out of
    /// scope).
    pub fn build(
        &self,
        op: &LogicalOperator,
        get_rows: &dyn Fn(&str) -> Vec<Chunk>,
    ) -> anyhow::Result<Arc<dyn PhysicalOperator>> {
        match op {
            LogicalOperator::Get { table, columns } => {
                let id = self.ids.next_id();
                Ok(Arc::new(PhysicalGet::new(
                    id,
                    columns.clone(),
                    get_rows(table),
                )))
            }
            LogicalOperator::Projection { input, .. } | LogicalOperator::Filter { input, .. } => {
                // Out of scope: these don't change the physical operator
                // zoo this crate stands in for. We lower straight through.
                self.build(input, get_rows)
            }
            LogicalOperator::ComparisonJoin { left, right, .. } => {
                let id = self.ids.next_id();
                let left_phys = self.build(left, get_rows)?;
                let right_phys = self.build(right, get_rows)?;
                Ok(Arc::new(PhysicalComparisonJoin::new(
                    id, left_phys, right_phys,
                )))
            }
            LogicalOperator::PipelineBreaker { input } => {
                if !matches!(**input, LogicalOperator::ComparisonJoin { .. }) {
                    return Err(EngineError::InvalidPlan(
                        "PipelineBreaker's child must be a comparison join".to_string(),
                    )
                    .into());
                }
                let child_phys = self.build(input, get_rows)?;
                let types = child_phys.column_types().to_vec();
                let id = self.ids.next_id();
                Ok(Arc::new(crate::breaker::PhysicalPipelineBreaker::new(
                    id, child_phys, types,
                )))
            }
        }
    }
}
