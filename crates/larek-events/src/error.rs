//! Bus error types.

use thiserror::Error;

/// Errors returned by [`EventBus::emit`](crate::EventBus::emit).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BusError {
    /// The event kind is already being dispatched further up the stack.
    #[error("Re-entrant emit of '{event}' refused")]
    Reentrant { event: &'static str },

    /// Nested dispatch went deeper than the bus allows.
    #[error("Dispatch depth {depth} exceeded while emitting '{event}'")]
    DepthExceeded { event: &'static str, depth: usize },

    /// One or more handlers failed.
    ///
    /// See [`DispatchReport::into_result`](crate::DispatchReport::into_result).
    #[error("{failed} handler(s) failed for '{event}'")]
    HandlersFailed { event: &'static str, failed: usize },
}
