//! Per-query context bundling the three process-wide services as explicit,
//! `Arc`-shared state rather than static singletons, plus the worker-pool
//! dispatch primitive the executor assumes.
//!
//! Threads an explicit context through query execution rather than reaching
//! for `lazy_static` globals; `rayon`'s global thread pool plays the role of
//! the worker-pool primitive (parallel workers fanning out over a pipeline's
//! chunks).

use crate::profiler::StageProfiler;
use crate::scheduler::ThreadScheduler;
use crate::tuner_registry::TunerRegistry;
use std::sync::{Arc, OnceLock};

/// Everything a query needs beyond the plan itself: scheduler, tuner
/// registry, profiler, and the worker-pool handle.
pub struct QueryContext {
    pub scheduler: Arc<ThreadScheduler>,
    pub tuners: Arc<TunerRegistry>,
    pub profiler: Arc<StageProfiler>,
}

impl QueryContext {
    pub fn new(default_workers: u32) -> Self {
        Self {
            scheduler: Arc::new(ThreadScheduler::new(default_workers)),
            tuners: Arc::new(TunerRegistry::new()),
            profiler: Arc::new(StageProfiler::new()),
        }
    }

    /// Run `work` across `worker_count` rayon tasks, each receiving its
    /// 0-based worker index. Used to drive a breaker's parallel sink/source
    /// phases without hand-rolling a thread pool.
    pub fn dispatch<F>(&self, worker_count: u32, work: F)
    where
        F: Fn(u32) + Sync,
    {
        rayon::scope(|scope| {
            for worker_id in 0..worker_count {
                scope.spawn(|_| work(worker_id));
            }
        });
    }

    /// End-of-query cleanup: drop and log every tuner's history, clear the
    /// scheduler's rules, clear profiler timings. Idempotent.
    pub fn finish_query(&self) {
        self.tuners.reset_all();
        self.scheduler.clear();
        self.profiler.clear();
    }
}

/// Process-global default context, for benchmarks and examples only —
/// real query execution should thread an explicit `QueryContext` through
/// instead.
static DEFAULT_CONTEXT: OnceLock<QueryContext> = OnceLock::new();

pub fn default_context() -> &'static QueryContext {
    DEFAULT_CONTEXT.get_or_init(|| QueryContext::new(num_cpus::get() as u32))
}
