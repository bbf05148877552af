//! `SplitPipelineOptimizer` breaker placement, boundary scenario E3.

use bushy_breaker::chunk::ColumnType;
use bushy_breaker::logical_plan::LogicalOperator;
use bushy_breaker::optimizer::SplitPipelineOptimizer;

fn get(name: &str) -> LogicalOperator {
    LogicalOperator::get(name, vec![ColumnType::Int64])
}

/// Build a left-deep spine of `depth` comparison joins: the innermost
/// join has two `Get` leaves, every join above it has a `Get` right
/// child.
fn left_deep_spine(depth: usize) -> LogicalOperator {
    let mut plan = LogicalOperator::join(get("leaf_l"), get("leaf_r"), "x = x");
    for i in 0..depth - 1 {
        plan = LogicalOperator::join(plan, get(&format!("t{i}")), "x = x");
    }
    plan
}

fn count_breakers(op: &LogicalOperator) -> usize {
    match op {
        LogicalOperator::PipelineBreaker { input } => 1 + count_breakers(input),
        LogicalOperator::Get { .. } => 0,
        LogicalOperator::Projection { input, .. } | LogicalOperator::Filter { input, .. } => {
            count_breakers(input)
        }
        LogicalOperator::ComparisonJoin { left, right, .. } => {
            count_breakers(left) + count_breakers(right)
        }
    }
}

/// E3: a left-deep spine of 8 joins produces exactly one breaker.
#[test]
fn e3_single_breaker_on_eight_join_spine() {
    let plan = left_deep_spine(8);
    let rewritten = SplitPipelineOptimizer::optimize(plan);
    assert_eq!(count_breakers(&rewritten), 1);
}

/// A spine shorter than the threshold gets no breaker at all.
#[test]
fn short_spine_gets_no_breaker() {
    let plan = left_deep_spine(5);
    let rewritten = SplitPipelineOptimizer::optimize(plan);
    assert_eq!(count_breakers(&rewritten), 0);
}

/// Invariant 6: never more than one breaker per seven consecutive joins
/// on the left spine — a spine of 15 joins gets exactly two.
#[test]
fn long_spine_gets_one_breaker_per_seven_joins() {
    let plan = left_deep_spine(15);
    let rewritten = SplitPipelineOptimizer::optimize(plan);
    assert_eq!(count_breakers(&rewritten), 2);
}
