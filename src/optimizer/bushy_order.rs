//! `BushyOrderOptimizer`: a recursive `can_break`-flag walk
//! that wraps a comparison join in a breaker whenever its *parent* arrived
//! at it via a left edge whose sibling (the parent's right child) isn't
//! cheap to recompute.

use crate::logical_plan::LogicalOperator;

/// Wraps selected comparison joins in `PipelineBreaker` nodes.
///
/// The flag threaded through the walk is "should the node I'm about to visit
/// be wrapped", decided by the *caller*: a join sets it `true` for its left
/// child's visit unless its own right child is a plain scan, and always
/// `false` for its right child's visit. A join wraps itself using the flag
/// it was called with, not anything about its own children — this mirrors
/// the original's save-before-descent/restore-after-return `can_break`
/// field exactly (see `DESIGN.md`). The root call starts with `can_break =
/// false`, so the topmost join is never wrapped (invariant 6). Takes the
/// permissive reading of what counts as cheap to recompute: a filter
/// directly atop a `Get` still counts as a plain scan.
pub struct BushyOrderOptimizer;

impl BushyOrderOptimizer {
    pub fn optimize(plan: LogicalOperator) -> LogicalOperator {
        Self::rewrite(plan, false)
    }

    fn rewrite(node: LogicalOperator, can_break: bool) -> LogicalOperator {
        match node {
            LogicalOperator::ComparisonJoin {
                left,
                right,
                predicate,
            } => {
                let left_can_break = !right.is_plain_scan();
                let new_left = Self::rewrite(*left, left_can_break);
                let new_right = Self::rewrite(*right, false);
                let join = LogicalOperator::join(new_left, new_right, predicate);
                if can_break {
                    LogicalOperator::breaker(join)
                } else {
                    join
                }
            }
            LogicalOperator::Projection { input, columns } => {
                LogicalOperator::projection(Self::rewrite(*input, can_break), columns)
            }
            LogicalOperator::Filter { input, predicate } => {
                LogicalOperator::filter(Self::rewrite(*input, can_break), predicate)
            }
            LogicalOperator::PipelineBreaker { input } => {
                LogicalOperator::breaker(Self::rewrite(*input, can_break))
            }
            get @ LogicalOperator::Get { .. } => get,
        }
    }
}
