//! `SplitPipelineOptimizer`: counts consecutive comparison
//! joins down a left spine and forces a materialization point every
//! `SPINE_THRESHOLD` joins, to keep probe pipelines from growing long enough
//! to thrash the executor's hash-table cache.

use crate::logical_plan::LogicalOperator;

/// Inserts a breaker above the left child once `SPINE_THRESHOLD` consecutive
/// joins have been seen down a left spine, resetting the counter afterward.
/// Descending into a right child also resets the counter.
pub struct SplitPipelineOptimizer;

impl SplitPipelineOptimizer {
    pub const SPINE_THRESHOLD: usize = 7;

    pub fn optimize(plan: LogicalOperator) -> LogicalOperator {
        Self::rewrite(plan, 0)
    }

    fn rewrite(node: LogicalOperator, count: usize) -> LogicalOperator {
        match node {
            LogicalOperator::ComparisonJoin {
                left,
                right,
                predicate,
            } => {
                let new_count = count + 1;
                let new_left = if new_count >= Self::SPINE_THRESHOLD && !left.is_plain_scan() {
                    LogicalOperator::breaker(Self::rewrite(*left, 0))
                } else {
                    Self::rewrite(*left, new_count)
                };
                let new_right = Self::rewrite(*right, 0);
                LogicalOperator::join(new_left, new_right, predicate)
            }
            LogicalOperator::Projection { input, columns } => {
                LogicalOperator::projection(Self::rewrite(*input, count), columns)
            }
            LogicalOperator::Filter { input, predicate } => {
                LogicalOperator::filter(Self::rewrite(*input, count), predicate)
            }
            LogicalOperator::PipelineBreaker { input } => {
                LogicalOperator::breaker(Self::rewrite(*input, count))
            }
            get @ LogicalOperator::Get { .. } => get,
        }
    }
}
