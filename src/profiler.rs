//! Stage profiler: a thread-safe start/end timer keyed by stage name,
//! feeding both benchmark output and the bandit's reward signal.
//! Grounded on the original engine's `BaseProfiler`/`BeeProfiler` in
//! `profiler.hpp`.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Instant;

struct State {
    current: Option<(String, Instant)>,
    accumulated: HashMap<String, f64>,
}

/// Exactly one stage is "current" at a time. `start`/`end` calls that don't
/// match the current stage are silent no-ops.
pub struct StageProfiler {
    state: Mutex<State>,
}

impl Default for StageProfiler {
    fn default() -> Self {
        Self::new()
    }
}

impl StageProfiler {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                current: None,
                accumulated: HashMap::new(),
            }),
        }
    }

    /// Begin `name`. A no-op if already inside `name`.
    pub fn start(&self, name: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some((current_name, _)) = &state.current {
            if current_name == name {
                return;
            }
        }
        state.current = Some((name.to_string(), Instant::now()));
    }

    /// End `name`, accumulating elapsed time. A no-op if the profiler isn't
    /// currently inside `name`.
    pub fn end(&self, name: &str) {
        let mut state = self.state.lock().unwrap();
        let should_end = matches!(&state.current, Some((current_name, _)) if current_name == name);
        if !should_end {
            return;
        }
        let (_, started_at) = state.current.take().unwrap();
        let elapsed = started_at.elapsed().as_secs_f64();
        *state.accumulated.entry(name.to_string()).or_insert(0.0) += elapsed;
    }

    /// Finalize any in-flight stage and return the accumulated map.
    pub fn timings(&self) -> HashMap<String, f64> {
        let mut state = self.state.lock().unwrap();
        if let Some((name, started_at)) = state.current.take() {
            let elapsed = started_at.elapsed().as_secs_f64();
            *state.accumulated.entry(name).or_insert(0.0) += elapsed;
        }
        state.accumulated.clone()
    }

    /// Drop all accumulated timings.
    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap();
        state.current = None;
        state.accumulated.clear();
    }
}

/// A per-worker start/stop timer, unsynchronized: grounded on
/// `thread_context.hpp`'s `profiler_compaction` field, which is one
/// `Profiler` per `ThreadContext` rather than the shared, name-keyed
/// [`StageProfiler`]. Used by [`crate::breaker::PhysicalPipelineBreaker`] to
/// time a vector-compaction batch without contending on the stage profiler's
/// mutex.
#[derive(Default)]
pub struct Stopwatch {
    started_at: Option<Instant>,
}

impl Stopwatch {
    pub fn start(&mut self) {
        self.started_at = Some(Instant::now());
    }

    /// Stop and return elapsed seconds. 0.0 if never started.
    pub fn stop(&mut self) -> f64 {
        self.started_at
            .take()
            .map_or(0.0, |started_at| started_at.elapsed().as_secs_f64())
    }
}
