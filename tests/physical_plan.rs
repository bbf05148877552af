//! `PhysicalPlanGenerator` lowering and end-to-end execution of a bushy plan
//! through a wired-in breaker.

use bushy_breaker::chunk::{Chunk, Column, ColumnType};
use bushy_breaker::logical_plan::LogicalOperator;
use bushy_breaker::optimizer::BushyOrderOptimizer;
use bushy_breaker::physical_plan::{drain_source, PhysicalPlanGenerator};

fn rows_for(table: &str) -> Vec<Chunk> {
    match table {
        "a" => vec![Chunk::new(vec![Column::Int64(vec![1, 2, 3, 4])])],
        "b" => vec![Chunk::new(vec![Column::Int64(vec![2, 3, 5])])],
        _ => vec![],
    }
}

fn rows_for_four_tables(table: &str) -> Vec<Chunk> {
    match table {
        "a" => vec![Chunk::new(vec![Column::Int64(vec![1, 2, 3, 4])])],
        "b" => vec![Chunk::new(vec![Column::Int64(vec![2, 3, 5, 6])])],
        "c" => vec![Chunk::new(vec![Column::Int64(vec![2, 3, 7])])],
        "d" => vec![Chunk::new(vec![Column::Int64(vec![3, 8])])],
        _ => vec![],
    }
}

fn sorted_join_pairs(op: &dyn bushy_breaker::PhysicalOperator) -> Vec<(i64, i64)> {
    let mut pairs: Vec<(i64, i64)> = drain_source(op)
        .iter()
        .flat_map(|chunk| {
            let left = match &chunk.columns()[0] {
                Column::Int64(v) => v.clone(),
                _ => vec![],
            };
            let right = match &chunk.columns()[1] {
                Column::Int64(v) => v.clone(),
                _ => vec![],
            };
            left.into_iter().zip(right)
        })
        .collect();
    pairs.sort_unstable();
    pairs
}

/// Invariant 1: executing a plan with and without
/// `BushyOrderOptimizer` yields the same multiset of result rows — the
/// rewrite only inserts materialization points, never changes semantics.
#[test]
fn invariant_1_breaker_placement_preserves_result_rows() -> anyhow::Result<()> {
    let build_plan = || {
        LogicalOperator::join(
            LogicalOperator::join(
                LogicalOperator::get("a", vec![ColumnType::Int64]),
                LogicalOperator::get("b", vec![ColumnType::Int64]),
                "a.x = b.x",
            ),
            LogicalOperator::join(
                LogicalOperator::get("c", vec![ColumnType::Int64]),
                LogicalOperator::get("d", vec![ColumnType::Int64]),
                "c.x = d.x",
            ),
            "b.x = c.x",
        )
    };

    let generator = PhysicalPlanGenerator::new();

    let unrewritten = generator.build(&build_plan(), &rows_for_four_tables)?;
    let baseline = sorted_join_pairs(unrewritten.as_ref());

    let rewritten_plan = BushyOrderOptimizer::optimize(build_plan());
    let rewritten = generator.build(&rewritten_plan, &rows_for_four_tables)?;
    let with_breaker = sorted_join_pairs(rewritten.as_ref());

    assert!(!baseline.is_empty());
    assert_eq!(baseline, with_breaker);
    Ok(())
}

#[test]
fn lowering_rejects_breaker_over_non_join() {
    let plan = LogicalOperator::breaker(LogicalOperator::get("a", vec![ColumnType::Int64]));
    let generator = PhysicalPlanGenerator::new();
    let err = generator.build(&plan, &rows_for).unwrap_err();
    assert!(err.to_string().contains("comparison join"));
}

#[test]
fn lowering_and_execution_of_breaker_over_join() -> anyhow::Result<()> {
    let plan = LogicalOperator::breaker(LogicalOperator::join(
        LogicalOperator::get("a", vec![ColumnType::Int64]),
        LogicalOperator::get("b", vec![ColumnType::Int64]),
        "a.x = b.x",
    ));

    let generator = PhysicalPlanGenerator::new();
    let physical = generator.build(&plan, &rows_for)?;

    let output = drain_source(physical.as_ref());
    let total_rows: usize = output.iter().map(Chunk::row_count).sum();
    // a ∩ b on equality of the single key column: {2, 3}.
    assert_eq!(total_rows, 2);
    Ok(())
}
