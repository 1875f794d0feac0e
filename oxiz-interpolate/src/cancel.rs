//! Cooperative cancellation.
//!
//! The engine polls a [`TerminationRequest`] before dispatching every leaf
//! and every resolution node, and once per disjunct of an integer case
//! split. A set request aborts the call with
//! [`OxizError::Timeout`](oxiz_core::error::OxizError::Timeout).

use std::sync::atomic::{AtomicBool, Ordering};

/// Predicate polled by the engine; `true` stops the computation.
pub trait TerminationRequest {
    /// Whether the computation should stop now.
    fn should_stop(&self) -> bool;
}

impl TerminationRequest for AtomicBool {
    fn should_stop(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

impl<F> TerminationRequest for F
where
    F: Fn() -> bool,
{
    fn should_stop(&self) -> bool {
        self()
    }
}

/// A request that never fires.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

impl TerminationRequest for NeverCancel {
    fn should_stop(&self) -> bool {
        false
    }
}
