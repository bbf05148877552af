//! The pipeline-breaker physical operator: a single operator that is
//! simultaneously the sink of its child's pipeline and the
//! source of a new one, turning a left-deep execution chain into a bushy
//! one.
//!
//! Grounded on the original engine's `PhysicalPipelineBreaker` in
//! `physical_pipeline_breaker.cpp`: `Sink` appends into a worker-local
//! collection, `Combine` merges each worker's collection into one global
//! collection under a lock, `Finalize` is a no-op past that point, and
//! `GetData` lazily turns the now-immutable global collection into a
//! parallel scan keyed by an atomically-advanced chunk index.

use crate::chunk::{Chunk, ColumnType};
use crate::chunk_collection::{ChunkCollection, GlobalScanState, LocalScanCursor};
use crate::operator_id::OperatorId;
use crate::physical_plan::{
    drain_source, CombineResult, FinalizeResult, PhysicalOperator, SinkResult, SourceResult,
};
use crate::profiler::Stopwatch;
use crate::tuner_registry::TunerRegistry;
use std::any::Any;
use std::sync::{Arc, OnceLock};

/// Marker global sink state — the collection the breaker combines into lives
/// on the operator itself (see module docs and `DESIGN.md` on why a cyclic
/// "state that points back at the operator" was dropped in favor of this).
pub struct GlobalSinkState;

/// Opt-in adaptive vector compaction: instead of
/// appending every sunk chunk straight into the local collection, buffer up
/// to `arm_value` chunks and merge them into one before appending, with the
/// merge width chosen by the tuner registry and the elapsed merge time
/// reported back as reward.
struct CompactionTuning {
    registry: Arc<TunerRegistry>,
    call_site: u64,
}

/// A worker's private, pre-combine chunk collection, plus the pending-batch
/// state for adaptive vector compaction, if enabled.
pub struct LocalSinkState {
    local: ChunkCollection,
    pending: Vec<Chunk>,
    current_width: Option<i64>,
    timer: Stopwatch,
}

impl LocalSinkState {
    fn new() -> Self {
        Self {
            local: ChunkCollection::new(),
            pending: Vec::new(),
            current_width: None,
            timer: Stopwatch::default(),
        }
    }
}

/// Lazily-initialized scan state over the breaker's combined collection.
pub struct GlobalSourceState {
    scan: GlobalScanState,
}

#[derive(Default)]
pub struct LocalSourceState {
    cursor: LocalScanCursor,
}

pub struct PhysicalPipelineBreaker {
    id: OperatorId,
    types: Vec<ColumnType>,
    collection: ChunkCollection,
    child: Option<std::sync::Arc<dyn PhysicalOperator>>,
    scan_init: OnceLock<()>,
    tuning: Option<CompactionTuning>,
}

impl PhysicalPipelineBreaker {
    /// Build a breaker with no upstream wired in yet — suitable for
    /// exercising the sink/source contract directly against a bare breaker
    /// (`Sink`/`Combine`/`Finalize`/`GetData`, with no physical child).
    pub fn bare(id: OperatorId, types: Vec<ColumnType>) -> Self {
        Self {
            id,
            types,
            collection: ChunkCollection::new(),
            child: None,
            scan_init: OnceLock::new(),
            tuning: None,
        }
    }

    /// Build a breaker wired to an upstream physical operator — the shape
    /// `PhysicalPlanGenerator` produces when lowering a logical
    /// `PipelineBreaker` node.
    pub fn new(
        id: OperatorId,
        child: std::sync::Arc<dyn PhysicalOperator>,
        types: Vec<ColumnType>,
    ) -> Self {
        Self {
            id,
            types,
            collection: ChunkCollection::new(),
            child: Some(child),
            scan_init: OnceLock::new(),
            tuning: None,
        }
    }

    /// Opt this breaker into adaptive vector compaction: sunk chunks are
    /// buffered and merged in batches of `arm_values[i]` chunks, with the
    /// batch width chosen by the tuner registry at `call_site` and the
    /// observed merge time reported back as reward.
    ///
    /// Fails if `call_site` is already registered.
    pub fn with_tuning(
        mut self,
        registry: Arc<TunerRegistry>,
        call_site: u64,
        arm_values: Vec<i64>,
        initial_means: Vec<f64>,
    ) -> anyhow::Result<Self> {
        registry.register(call_site, arm_values, initial_means)?;
        self.tuning = Some(CompactionTuning { registry, call_site });
        Ok(self)
    }

    pub fn row_count(&self) -> usize {
        self.collection.row_count()
    }

    /// Drain this breaker's upstream child into its combined collection,
    /// one worker for simplicity (the production engine fans this out across
    /// the thread scheduler's reader pool; the multi-pipeline executor that
    /// would drive that is out of scope here — see `DESIGN.md`).
    fn materialize_from_child(&self) {
        let Some(child) = &self.child else { return };
        let local = self.get_local_sink_state();
        let mut local = local;
        for chunk in drain_source(child.as_ref()) {
            self.sink(chunk, &GlobalSinkState, local.as_mut());
        }
        self.combine(&GlobalSinkState, local.as_mut());
        self.finalize();
    }
}

impl PhysicalOperator for PhysicalPipelineBreaker {
    fn operator_id(&self) -> OperatorId {
        self.id
    }

    fn column_types(&self) -> &[ColumnType] {
        &self.types
    }

    fn is_sink(&self) -> bool {
        true
    }

    fn parallel_sink(&self) -> bool {
        true
    }

    fn is_source(&self) -> bool {
        true
    }

    fn parallel_source(&self) -> bool {
        true
    }

    fn get_global_sink_state(&self) -> Box<dyn Any + Send + Sync> {
        Box::new(GlobalSinkState)
    }

    fn get_local_sink_state(&self) -> Box<dyn Any + Send + Sync> {
        Box::new(LocalSinkState::new())
    }

    /// Always `NEED_MORE_INPUT`: the breaker never back-pressures its
    /// upstream. When adaptive compaction is enabled, chunks are buffered and
    /// merged in tuner-chosen batches instead of appended one at a time.
    fn sink(&self, chunk: Chunk, _global: &dyn Any, local: &mut dyn Any) -> SinkResult {
        let local = local.downcast_mut::<LocalSinkState>().unwrap();
        let Some(tuning) = &self.tuning else {
            local.local.append_handle().append(chunk);
            return SinkResult::NeedMoreInput;
        };

        if local.current_width.is_none() {
            local.current_width = Some(tuning.registry.select_arm(tuning.call_site));
            local.timer.start();
        }
        local.pending.push(chunk);

        let width = local.current_width.unwrap().max(1) as usize;
        if local.pending.len() >= width {
            let batch = std::mem::take(&mut local.pending);
            let width_value = local.current_width.take().unwrap();
            local.local.append_handle().append(Chunk::concat(batch));
            let elapsed = local.timer.stop();
            // Minimize elapsed time: reward the arm with the negative of the
            // merge duration.
            tuning.registry.update_arm(tuning.call_site, width_value, -elapsed);
        }
        SinkResult::NeedMoreInput
    }

    /// Merge one worker's local collection into the shared global one.
    /// No-ops if the local collection is empty, avoiding a lock acquisition
    /// for workers that never saw a chunk. Flushes any partial compaction
    /// batch first — a partial batch never reports a reward, since its
    /// duration was cut short by end-of-input rather than reaching its full
    /// tuned width.
    fn combine(&self, _global: &dyn Any, local: &mut dyn Any) -> CombineResult {
        let local = local.downcast_mut::<LocalSinkState>().unwrap();
        if !local.pending.is_empty() {
            let batch = std::mem::take(&mut local.pending);
            local.current_width = None;
            local.local.append_handle().append(Chunk::concat(batch));
        }
        self.collection.combine(&local.local);
        CombineResult::Finished
    }

    fn finalize(&self) -> FinalizeResult {
        FinalizeResult::Ready
    }

    fn get_global_source_state(&self) -> Box<dyn Any + Send + Sync> {
        self.scan_init.get_or_init(|| self.materialize_from_child());
        Box::new(GlobalSourceState {
            scan: self.collection.init_scan(),
        })
    }

    fn get_local_source_state(&self, _global: &dyn Any) -> Box<dyn Any + Send + Sync> {
        Box::new(LocalSourceState::default())
    }

    fn get_data(&self, global: &dyn Any, local: &mut dyn Any) -> (SourceResult, Chunk) {
        let global = global.downcast_ref::<GlobalSourceState>().unwrap();
        let local = local.downcast_mut::<LocalSourceState>().unwrap();
        let chunk = self.collection.scan(&global.scan, &mut local.cursor);
        if chunk.is_empty() {
            (SourceResult::Finished, chunk)
        } else {
            (SourceResult::HaveMoreOutput, chunk)
        }
    }
}
