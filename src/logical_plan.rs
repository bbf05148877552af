//! Minimal logical-plan tree: a typed tree of base-table scans, projections,
//! filters, and joins, assumed to exist upstream of this crate.
//!
//! The host engine's logical plan representation, catalog, and SQL binding
//! are explicitly out of scope. This module provides just enough of a typed
//! tree — `Get`, `Projection`, `Filter`, `ComparisonJoin`, and the
//! `PipelineBreaker` node this crate's optimizers insert — for the
//! breaker-placement rewrites to walk and mutate, and for tests to build
//! representative bushy/left-deep shapes.

use crate::chunk::ColumnType;

/// A node in the logical plan tree: a small, closed set of typed variants
/// the optimizers pattern-match on, modeling join-tree shape rather than a
/// general dataflow DAG.
#[derive(Clone, Debug, PartialEq)]
pub enum LogicalOperator {
    /// A base table scan. Always a leaf.
    Get {
        table: String,
        columns: Vec<ColumnType>,
    },
    /// A column projection over a single child.
    Projection {
        input: Box<LogicalOperator>,
        columns: Vec<String>,
    },
    /// A row filter over a single child.
    Filter {
        input: Box<LogicalOperator>,
        predicate: String,
    },
    /// A two-child comparison join (the only join shape the breaker-placement
    /// rewrites need to reason about).
    ComparisonJoin {
        left: Box<LogicalOperator>,
        right: Box<LogicalOperator>,
        predicate: String,
    },
    /// Inserted by `BushyOrderOptimizer`/`SplitPipelineOptimizer` above a
    /// sub-plan that should be materialized before being consumed further
    /// up the tree. Exactly one child; preserves the child's columns and
    /// bindings unchanged.
    PipelineBreaker { input: Box<LogicalOperator> },
}

impl LogicalOperator {
    pub fn get(table: impl Into<String>, columns: Vec<ColumnType>) -> Self {
        LogicalOperator::Get {
            table: table.into(),
            columns,
        }
    }

    pub fn projection(input: LogicalOperator, columns: Vec<impl Into<String>>) -> Self {
        LogicalOperator::Projection {
            input: Box::new(input),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn filter(input: LogicalOperator, predicate: impl Into<String>) -> Self {
        LogicalOperator::Filter {
            input: Box::new(input),
            predicate: predicate.into(),
        }
    }

    pub fn join(
        left: LogicalOperator,
        right: LogicalOperator,
        predicate: impl Into<String>,
    ) -> Self {
        LogicalOperator::ComparisonJoin {
            left: Box::new(left),
            right: Box::new(right),
            predicate: predicate.into(),
        }
    }

    pub fn breaker(input: LogicalOperator) -> Self {
        LogicalOperator::PipelineBreaker {
            input: Box::new(input),
        }
    }

    /// The output columns of this node (used by the breaker's physical
    /// lowering to capture the types it must preserve). `Get` carries
    /// explicit types; everything else forwards its (first) child's.
    pub fn output_columns(&self) -> Vec<ColumnType> {
        match self {
            LogicalOperator::Get { columns, .. } => columns.clone(),
            LogicalOperator::Projection { input, .. }
            | LogicalOperator::Filter { input, .. }
            | LogicalOperator::PipelineBreaker { input } => input.output_columns(),
            LogicalOperator::ComparisonJoin { left, right, .. } => {
                let mut cols = left.output_columns();
                cols.extend(right.output_columns());
                cols
            }
        }
    }

    /// Returns `true` if this node is a "plain scan": a `Get`, a projection
    /// directly atop a `Get`, or a filter directly atop a `Get`. This is the
    /// shape `BushyOrderOptimizer`/`SplitPipelineOptimizer` treat as too cheap
    /// to bother materializing — the permissive reading, where a filter atop
    /// a `Get` still counts as plain and it's the filter-above-*non-Get* case
    /// that does not.
    pub fn is_plain_scan(&self) -> bool {
        match self {
            LogicalOperator::Get { .. } => true,
            LogicalOperator::Projection { input, .. } => {
                matches!(**input, LogicalOperator::Get { .. })
            }
            LogicalOperator::Filter { input, .. } => {
                matches!(**input, LogicalOperator::Get { .. })
            }
            _ => false,
        }
    }
}
