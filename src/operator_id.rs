//! Stable per-operator identity.
//!
//! The original engine keys bandit instances by the physical address of the
//! operator object (`negative_feedback.hpp`'s `CompactionController` is handed
//! a call-site "id" that is, in practice, a pointer). Addresses don't survive
//! across runs or across plan copies, so this fork assigns every physical
//! operator a sequential [`OperatorId`] at physical-plan construction time and
//! uses that as the tuner registry key instead (see `DESIGN.md`).

use std::sync::atomic::{AtomicU64, Ordering};

/// Stable identifier for a physical operator instance, assigned once when the
/// operator is built and stable for the lifetime of the query.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct OperatorId(u64);

impl OperatorId {
    /// Return the underlying numeric value, useful for the tuner registry's
    /// file-naming scheme (`0x<id>`).
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for OperatorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// Process-wide counter handing out fresh [`OperatorId`]s during physical
/// planning. A query's physical plan is built once on one thread, so a bare
/// atomic (no mutex) is enough.
#[derive(Default)]
pub struct OperatorIdAllocator {
    next: AtomicU64,
}

impl OperatorIdAllocator {
    /// Create a fresh allocator starting from zero.
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
        }
    }

    /// Allocate the next id.
    pub fn next_id(&self) -> OperatorId {
        OperatorId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}
