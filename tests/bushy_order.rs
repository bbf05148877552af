//! `BushyOrderOptimizer` breaker placement, boundary scenarios E1–E2.

use bushy_breaker::chunk::ColumnType;
use bushy_breaker::logical_plan::LogicalOperator;
use bushy_breaker::optimizer::BushyOrderOptimizer;

fn get(name: &str) -> LogicalOperator {
    LogicalOperator::get(name, vec![ColumnType::Int64])
}

fn contains_breaker(op: &LogicalOperator) -> bool {
    match op {
        LogicalOperator::PipelineBreaker { .. } => true,
        LogicalOperator::Get { .. } => false,
        LogicalOperator::Projection { input, .. } | LogicalOperator::Filter { input, .. } => {
            contains_breaker(input)
        }
        LogicalOperator::ComparisonJoin { left, right, .. } => {
            contains_breaker(left) || contains_breaker(right)
        }
    }
}

/// E1: `J(G(A), J(G(B), G(C)))` — all right children are plain scans, so
/// no breaker is inserted anywhere.
#[test]
fn e1_no_breaker_when_right_children_are_plain_scans() {
    let plan = LogicalOperator::join(
        get("a"),
        LogicalOperator::join(get("b"), get("c"), "b.x = c.x"),
        "a.x = b.x",
    );
    let rewritten = BushyOrderOptimizer::optimize(plan);
    assert!(!contains_breaker(&rewritten));
}

/// E2: `J(J(G(A), G(B)), J(G(C), G(D)))` — breaker inserted exactly
/// above the left `J(G(A), G(B))`.
#[test]
fn e2_breaker_above_left_join_only() {
    let left_join = LogicalOperator::join(get("a"), get("b"), "a.x = b.x");
    let right_join = LogicalOperator::join(get("c"), get("d"), "c.x = d.x");
    let plan = LogicalOperator::join(left_join, right_join, "b.x = c.x");

    let rewritten = BushyOrderOptimizer::optimize(plan);
    match rewritten {
        LogicalOperator::ComparisonJoin { left, right, .. } => {
            assert!(matches!(*left, LogicalOperator::PipelineBreaker { .. }));
            assert!(!matches!(*right, LogicalOperator::PipelineBreaker { .. }));
        }
        _ => panic!("expected root to remain a comparison join"),
    }
}

#[test]
fn root_join_is_never_wrapped() {
    let plan = LogicalOperator::join(
        LogicalOperator::join(get("a"), get("b"), "a.x = b.x"),
        get("c"),
        "b.x = c.x",
    );
    let rewritten = BushyOrderOptimizer::optimize(plan);
    assert!(!matches!(rewritten, LogicalOperator::PipelineBreaker { .. }));
}
