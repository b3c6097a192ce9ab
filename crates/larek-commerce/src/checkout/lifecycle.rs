//! Checkout lifecycle state machine.

use crate::CommerceError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// States of the checkout lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckoutState {
    /// No checkout in progress.
    #[default]
    Browsing,
    /// Delivery form shown, not yet valid.
    DeliveryOpen,
    /// Delivery form shown and valid.
    DeliveryValid,
    /// Contacts form shown, not yet valid.
    ContactsOpen,
    /// Contacts form shown and valid.
    ContactsValid,
    /// Order sent, awaiting the product service.
    Submitting,
    /// Order accepted.
    Success,
    /// Order rejected or the request failed.
    Failed,
}

impl CheckoutState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutState::Browsing => "browsing",
            CheckoutState::DeliveryOpen => "delivery_open",
            CheckoutState::DeliveryValid => "delivery_valid",
            CheckoutState::ContactsOpen => "contacts_open",
            CheckoutState::ContactsValid => "contacts_valid",
            CheckoutState::Submitting => "submitting",
            CheckoutState::Success => "success",
            CheckoutState::Failed => "failed",
        }
    }

    /// Check if the delivery form is the active one.
    pub fn in_delivery(&self) -> bool {
        matches!(self, CheckoutState::DeliveryOpen | CheckoutState::DeliveryValid)
    }

    /// Check if the contacts form is the active one.
    pub fn in_contacts(&self) -> bool {
        matches!(self, CheckoutState::ContactsOpen | CheckoutState::ContactsValid)
    }

    /// Check if a checkout can be abandoned from here.
    pub fn can_cancel(&self) -> bool {
        !matches!(self, CheckoutState::Submitting)
    }
}

impl fmt::Display for CheckoutState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs that move the lifecycle.
///
/// Triggers that land on a form carry the result of that form's validation
/// so the machine settles directly in the open or valid state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckoutTrigger {
    /// Checkout button in the basket.
    OpenDelivery { valid: bool },
    /// A delivery field changed.
    DeliveryEdited { valid: bool },
    /// Delivery form submitted.
    SubmitDelivery { contacts_valid: bool },
    /// A contacts field changed.
    ContactsEdited { valid: bool },
    /// Contacts form submitted; sends the order.
    SubmitContacts,
    /// The product service accepted the order.
    OrderSucceeded,
    /// The order request failed.
    OrderFailed,
    /// Return from a failed submission to the contacts form.
    Retry { contacts_valid: bool },
    /// Success screen dismissed.
    Acknowledge,
    /// Checkout abandoned.
    Cancel,
}

impl CheckoutTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutTrigger::OpenDelivery { .. } => "open_delivery",
            CheckoutTrigger::DeliveryEdited { .. } => "delivery_edited",
            CheckoutTrigger::SubmitDelivery { .. } => "submit_delivery",
            CheckoutTrigger::ContactsEdited { .. } => "contacts_edited",
            CheckoutTrigger::SubmitContacts => "submit_contacts",
            CheckoutTrigger::OrderSucceeded => "order_succeeded",
            CheckoutTrigger::OrderFailed => "order_failed",
            CheckoutTrigger::Retry { .. } => "retry",
            CheckoutTrigger::Acknowledge => "acknowledge",
            CheckoutTrigger::Cancel => "cancel",
        }
    }
}

/// The checkout lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutLifecycle {
    state: CheckoutState,
    /// Reason of the last failed submission, until retried or abandoned.
    failure: Option<String>,
}

impl CheckoutLifecycle {
    /// Start in `Browsing`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> CheckoutState {
        self.state
    }

    /// Reason of the last failed submission.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Record why the last submission failed. Only meaningful in `Failed`.
    pub fn set_failure(&mut self, reason: impl Into<String>) {
        self.failure = Some(reason.into());
    }

    /// Compute the state a trigger leads to, without applying it.
    pub fn next(&self, trigger: CheckoutTrigger) -> Result<CheckoutState, CommerceError> {
        use CheckoutState::*;
        use CheckoutTrigger as T;

        let settle = |valid: bool, open: CheckoutState, ok: CheckoutState| {
            if valid {
                ok
            } else {
                open
            }
        };

        let next = match (self.state, trigger) {
            (
                Browsing | DeliveryOpen | DeliveryValid | ContactsOpen | ContactsValid | Failed,
                T::OpenDelivery { valid },
            ) => settle(valid, DeliveryOpen, DeliveryValid),
            (DeliveryOpen | DeliveryValid, T::DeliveryEdited { valid }) => {
                settle(valid, DeliveryOpen, DeliveryValid)
            }
            (DeliveryValid, T::SubmitDelivery { contacts_valid }) => {
                settle(contacts_valid, ContactsOpen, ContactsValid)
            }
            (ContactsOpen | ContactsValid, T::ContactsEdited { valid }) => {
                settle(valid, ContactsOpen, ContactsValid)
            }
            (ContactsValid, T::SubmitContacts) => Submitting,
            (Submitting, T::SubmitContacts) => return Err(CommerceError::SubmitInFlight),
            (Submitting, T::OrderSucceeded) => Success,
            (Submitting, T::OrderFailed) => Failed,
            (Failed, T::Retry { contacts_valid }) => {
                settle(contacts_valid, ContactsOpen, ContactsValid)
            }
            (Success, T::Acknowledge) => Browsing,
            (state, T::Cancel) if state.can_cancel() => Browsing,
            (state, trigger) => {
                return Err(CommerceError::InvalidCheckoutTransition {
                    from: state.as_str().to_string(),
                    trigger: trigger.as_str().to_string(),
                })
            }
        };
        Ok(next)
    }

    /// Apply a trigger. Returns the new state.
    pub fn apply(&mut self, trigger: CheckoutTrigger) -> Result<CheckoutState, CommerceError> {
        let next = self.next(trigger)?;
        if next != CheckoutState::Failed {
            self.failure = None;
        }
        self.state = next;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CheckoutState::*;
    use CheckoutTrigger as T;

    fn at(state: CheckoutState) -> CheckoutLifecycle {
        CheckoutLifecycle {
            state,
            failure: None,
        }
    }

    #[test]
    fn test_happy_path() {
        let mut lifecycle = CheckoutLifecycle::new();
        assert_eq!(lifecycle.state(), Browsing);

        assert_eq!(lifecycle.apply(T::OpenDelivery { valid: false }).unwrap(), DeliveryOpen);
        assert_eq!(lifecycle.apply(T::DeliveryEdited { valid: true }).unwrap(), DeliveryValid);
        assert_eq!(
            lifecycle.apply(T::SubmitDelivery { contacts_valid: false }).unwrap(),
            ContactsOpen
        );
        assert_eq!(lifecycle.apply(T::ContactsEdited { valid: true }).unwrap(), ContactsValid);
        assert_eq!(lifecycle.apply(T::SubmitContacts).unwrap(), Submitting);
        assert_eq!(lifecycle.apply(T::OrderSucceeded).unwrap(), Success);
        assert_eq!(lifecycle.apply(T::Acknowledge).unwrap(), Browsing);
    }

    #[test]
    fn test_edit_can_invalidate() {
        let mut lifecycle = at(DeliveryValid);
        assert_eq!(lifecycle.apply(T::DeliveryEdited { valid: false }).unwrap(), DeliveryOpen);

        let mut lifecycle = at(ContactsValid);
        assert_eq!(lifecycle.apply(T::ContactsEdited { valid: false }).unwrap(), ContactsOpen);
    }

    #[test]
    fn test_submit_requires_valid_form() {
        assert!(at(DeliveryOpen)
            .next(T::SubmitDelivery { contacts_valid: true })
            .is_err());
        assert!(at(ContactsOpen).next(T::SubmitContacts).is_err());
    }

    #[test]
    fn test_double_submit_rejected() {
        let mut lifecycle = at(ContactsValid);
        lifecycle.apply(T::SubmitContacts).unwrap();

        assert_eq!(
            lifecycle.apply(T::SubmitContacts),
            Err(CommerceError::SubmitInFlight)
        );
        assert_eq!(lifecycle.state(), Submitting);
    }

    #[test]
    fn test_failure_then_retry() {
        let mut lifecycle = at(Submitting);
        assert_eq!(lifecycle.apply(T::OrderFailed).unwrap(), Failed);
        lifecycle.set_failure("HTTP 500");
        assert_eq!(lifecycle.failure(), Some("HTTP 500"));

        assert_eq!(
            lifecycle.apply(T::Retry { contacts_valid: true }).unwrap(),
            ContactsValid
        );
        assert_eq!(lifecycle.failure(), None);
    }

    #[test]
    fn test_cancel() {
        for state in [
            Browsing,
            DeliveryOpen,
            DeliveryValid,
            ContactsOpen,
            ContactsValid,
            Success,
            Failed,
        ] {
            assert_eq!(at(state).next(T::Cancel).unwrap(), Browsing, "from {}", state);
        }
        assert!(at(Submitting).next(T::Cancel).is_err());
    }

    #[test]
    fn test_open_delivery_not_while_submitting() {
        assert!(at(Submitting).next(T::OpenDelivery { valid: true }).is_err());
        assert!(at(Success).next(T::OpenDelivery { valid: true }).is_err());
    }

    #[test]
    fn test_invalid_transition_names_states() {
        let err = at(Browsing).next(T::OrderSucceeded).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid checkout transition from browsing on order_succeeded"
        );
    }
}
