//! Error types for the subset of failures that are fatal rather than silent.
//!
//! Per the error handling design: most mismatched calls (scheduler rules that
//! match nothing, `update_arm` on an unknown arm value, `start`/`end` stage
//! mismatches) are silent no-ops by design and never surface as `Err`. Only
//! planning invariant violations and tuner setup conflicts are fatal, and both
//! are represented here so callers can match on them instead of string-sniffing
//! an `anyhow::Error`.

use std::fmt;

/// Fatal errors raised by planning and tuner setup.
///
/// Everything else this crate can fail at (mismatched `start`/`end`,
/// unknown-arm updates, unmatched scheduler rules) is a no-op, not an error,
/// and therefore has no variant here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Physical lowering of a `LogicalPipelineBreaker` found something other
    /// than a single comparison-join child.
    InvalidPlan(String),
    /// A call-site id was registered with the tuner registry twice.
    AlreadyRegistered(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidPlan(msg) => write!(f, "invalid plan: {msg}"),
            EngineError::AlreadyRegistered(id) => {
                write!(f, "call-site id already registered: {id}")
            }
        }
    }
}

impl std::error::Error for EngineError {}
