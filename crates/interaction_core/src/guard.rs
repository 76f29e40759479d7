//! Single-flight guard for critical actions.
//!
//! There is no queue and no timeout: a second request while engaged is
//! rejected immediately, and an operation that never completes keeps the lock
//! engaged until it is released. Holders normally take a
//! [`CriticalActionLease`], which releases on drop so the lock cannot leak
//! through an early return, an error, a panic or an aborted task.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

pub const NAVIGATION_PROMPT: &str = "Optimization is running. Are you sure you want to leave?";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    Proceed,
    Confirm(String),
}

#[derive(Debug, Default)]
pub struct SingleFlightGuard {
    engaged: AtomicBool,
}

impl SingleFlightGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engages the lock if it is free. Never blocks.
    pub fn try_acquire(&self) -> bool {
        self.engaged
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Clears the lock. Idempotent.
    pub fn release(&self) {
        self.engaged.store(false, Ordering::Release);
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged.load(Ordering::Acquire)
    }

    /// Scoped form of [`try_acquire`](Self::try_acquire).
    pub fn try_lease(self: &Arc<Self>) -> Option<CriticalActionLease> {
        if self.try_acquire() {
            tracing::debug!("critical action lock engaged");
            Some(CriticalActionLease {
                guard: Arc::clone(self),
            })
        } else {
            None
        }
    }

    pub fn before_navigate(&self) -> NavigationDecision {
        if self.is_engaged() {
            NavigationDecision::Confirm(NAVIGATION_PROMPT.to_string())
        } else {
            NavigationDecision::Proceed
        }
    }
}

/// Proof of holding the critical-action lock; releases it when dropped.
#[must_use = "dropping the lease releases the critical-action lock"]
#[derive(Debug)]
pub struct CriticalActionLease {
    guard: Arc<SingleFlightGuard>,
}

impl Drop for CriticalActionLease {
    fn drop(&mut self) {
        self.guard.release();
        tracing::debug!("critical action lock released");
    }
}

#[cfg(test)]
#[path = "tests/guard_tests.rs"]
mod tests;
