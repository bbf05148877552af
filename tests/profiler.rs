//! `StageProfiler` start/end/timings/clear, and the per-worker `Stopwatch`.

use bushy_breaker::profiler::{StageProfiler, Stopwatch};
use std::thread::sleep;
use std::time::Duration;

#[test]
fn start_end_accumulates_elapsed() {
    let profiler = StageProfiler::new();
    profiler.start("scan");
    sleep(Duration::from_millis(5));
    profiler.end("scan");
    let timings = profiler.timings();
    assert!(timings["scan"] > 0.0);
}

#[test]
fn re_entrant_start_is_noop() {
    let profiler = StageProfiler::new();
    profiler.start("scan");
    profiler.start("scan");
    profiler.end("scan");
    assert_eq!(profiler.timings().len(), 1);
}

#[test]
fn end_wrong_stage_is_noop() {
    let profiler = StageProfiler::new();
    profiler.start("scan");
    profiler.end("probe");
    let timings = profiler.timings();
    // "scan" only shows up once `timings()` finalizes the in-flight stage.
    assert!(timings.contains_key("scan"));
}

#[test]
fn clear_drops_everything() {
    let profiler = StageProfiler::new();
    profiler.start("scan");
    profiler.end("scan");
    profiler.clear();
    assert!(profiler.timings().is_empty());
}

#[test]
fn stopwatch_measures_elapsed() {
    let mut sw = Stopwatch::default();
    sw.start();
    sleep(Duration::from_millis(5));
    assert!(sw.stop() > 0.0);
}

#[test]
fn stopwatch_stop_without_start_is_zero() {
    let mut sw = Stopwatch::default();
    assert_eq!(sw.stop(), 0.0);
}
