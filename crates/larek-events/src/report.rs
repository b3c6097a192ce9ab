//! Per-emit dispatch outcome.

use crate::{BusError, SubscriptionId};

/// A handler that returned an error or panicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerFailure {
    /// The failing subscription.
    pub subscription: SubscriptionId,
    /// Error chain or panic message.
    pub message: String,
}

/// What happened during one `emit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    /// Event label.
    pub event: &'static str,
    /// Handlers that completed successfully.
    pub delivered: usize,
    /// Handlers that failed.
    pub failures: Vec<HandlerFailure>,
}

impl DispatchReport {
    pub(crate) fn new(event: &'static str) -> Self {
        Self {
            event,
            delivered: 0,
            failures: Vec::new(),
        }
    }

    /// Check if every handler succeeded.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of handlers invoked.
    pub fn invoked(&self) -> usize {
        self.delivered + self.failures.len()
    }

    /// Turn handler failures into an error.
    pub fn into_result(self) -> Result<Self, BusError> {
        if self.is_clean() {
            Ok(self)
        } else {
            Err(BusError::HandlersFailed {
                event: self.event,
                failed: self.failures.len(),
            })
        }
    }
}
