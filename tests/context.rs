//! `QueryContext`'s rayon-backed dispatch helper.

use bushy_breaker::context::QueryContext;
use std::sync::atomic::{AtomicU32, Ordering};

#[test]
fn dispatch_runs_every_worker() {
    let ctx = QueryContext::new(4);
    let counter = AtomicU32::new(0);
    ctx.dispatch(4, |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    assert_eq!(counter.load(Ordering::SeqCst), 4);
}
