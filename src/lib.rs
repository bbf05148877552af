//! # bushy-breaker
//!
//! A research fork layering three tightly coupled subsystems on top of a
//! vectorized pipelined executor:
//!
//! - a **pipeline-breaker operator** ([`breaker::PhysicalPipelineBreaker`])
//!   that materializes a sub-plan's output into a column-oriented buffer and
//!   re-exposes it as a parallel source, turning left-deep join plans into
//!   bushy ones;
//! - **breaker-placement rewrites** ([`optimizer::BushyOrderOptimizer`],
//!   [`optimizer::SplitPipelineOptimizer`]) that decide where to insert
//!   breakers;
//! - a **role-based thread scheduler** ([`scheduler::ThreadScheduler`]) and
//!   a **multi-armed-bandit auto-tuner** ([`bandit::MultiArmedBandit`] /
//!   [`tuner_registry::TunerRegistry`]) that adjust worker counts per
//!   pipeline stage and choose per-operator parameters from runtime
//!   feedback.
//!
//! SQL parsing, the catalog, the full physical-operator zoo, the real
//! vectorized column buffers, file-format readers, and the connection API
//! are all out of scope — they're external collaborators this crate only
//! assumes minimal interfaces for (see `chunk`, `chunk_collection`,
//! `logical_plan`, and the stand-in operators in `physical_plan`).
//!
//! ## Quick start
//!
//! ```
//! use bushy_breaker::chunk::ColumnType;
//! use bushy_breaker::logical_plan::LogicalOperator;
//! use bushy_breaker::optimizer::BushyOrderOptimizer;
//!
//! let plan = LogicalOperator::join(
//!     LogicalOperator::join(
//!         LogicalOperator::get("a", vec![ColumnType::Int64]),
//!         LogicalOperator::get("b", vec![ColumnType::Int64]),
//!         "a.x = b.x",
//!     ),
//!     LogicalOperator::get("c", vec![ColumnType::Int64]),
//!     "b.x = c.x",
//! );
//! let rewritten = BushyOrderOptimizer::optimize(plan);
//! ```

pub mod bandit;
pub mod breaker;
pub mod chunk;
pub mod chunk_collection;
pub mod context;
pub mod error;
pub mod logical_plan;
pub mod operator_id;
pub mod optimizer;
pub mod physical_plan;
pub mod profiler;
pub mod scheduler;
pub mod testing;
pub mod tuner_registry;
pub mod utils;

pub use bandit::MultiArmedBandit;
pub use breaker::PhysicalPipelineBreaker;
pub use chunk::{Chunk, Column, ColumnType};
pub use context::QueryContext;
pub use error::EngineError;
pub use logical_plan::LogicalOperator;
pub use operator_id::OperatorId;
pub use optimizer::{BushyOrderOptimizer, SplitPipelineOptimizer};
pub use physical_plan::{PhysicalComparisonJoin, PhysicalGet, PhysicalOperator, PhysicalPlanGenerator};
pub use profiler::StageProfiler;
pub use scheduler::ThreadScheduler;
pub use tuner_registry::TunerRegistry;
