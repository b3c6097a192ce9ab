//! Subscription identity and event routing.

use std::fmt;

/// An event that can be routed by an [`EventBus`](crate::EventBus).
///
/// `Kind` is a fieldless discriminant used for subscriptions; `name` is the
/// stable label used in logs and reports.
pub trait BusEvent: 'static {
    type Kind: Copy + Eq + fmt::Debug + 'static;

    /// The routing discriminant of this event.
    fn kind(&self) -> Self::Kind;

    /// Stable label, e.g. `"basket:changed"`.
    fn name(&self) -> &'static str;
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) u64);

impl SubscriptionId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}
