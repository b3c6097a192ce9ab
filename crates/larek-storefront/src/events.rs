//! The closed set of events carried by the storefront bus.
//!
//! Intents come from the UI or from network continuations and are handled by
//! the state core. Notifications carry freshly computed view models and are
//! meant for rendering subscribers.

use crate::views::{BasketView, CardView, FailureView, FormView, PreviewView, SuccessView};
use larek_commerce::catalog::CatalogItem;
use larek_commerce::checkout::{CheckoutState, OrderField, OrderResult};
use larek_commerce::{CommerceError, ProductId};
use larek_events::BusEvent;

/// Discriminant of [`AppEvent`], used to subscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    CatalogLoaded,
    CardSelected,
    PreviewLoaded,
    BasketAdd,
    BasketRemove,
    BasketOpened,
    CheckoutStarted,
    FieldChanged,
    DeliverySubmitted,
    OrderSucceeded,
    OrderFailed,
    RetryRequested,
    SuccessAcknowledged,
    CheckoutCancelled,
    ModalOpened,
    ModalClosed,

    CatalogChanged,
    BasketChanged,
    PreviewChanged,
    DeliveryFormChanged,
    ContactsFormChanged,
    LifecycleChanged,
    OrderPlaced,
    OrderRejected,
    SubmitRefused,
    PageLockChanged,
}

/// Every event the storefront bus can carry.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The product service returned the catalog.
    CatalogLoaded { items: Vec<CatalogItem> },
    /// A catalog card was clicked; its details are being fetched.
    CardSelected { id: ProductId },
    /// Item details arrived for a preview request.
    PreviewLoaded { item: CatalogItem },
    BasketAdd { id: ProductId },
    BasketRemove { id: ProductId },
    BasketOpened,
    /// Checkout button in the basket.
    CheckoutStarted,
    /// One form input changed.
    FieldChanged { field: OrderField, value: String },
    DeliverySubmitted,
    /// The order request was accepted. Sent by `Storefront::submit_order`.
    OrderSucceeded { result: OrderResult },
    OrderFailed { message: String },
    RetryRequested,
    SuccessAcknowledged,
    CheckoutCancelled,
    ModalOpened,
    ModalClosed,

    CatalogChanged { cards: Vec<CardView> },
    BasketChanged { basket: BasketView },
    PreviewChanged { preview: PreviewView },
    DeliveryFormChanged { form: FormView },
    ContactsFormChanged { form: FormView },
    LifecycleChanged { from: CheckoutState, to: CheckoutState },
    OrderPlaced { success: SuccessView },
    OrderRejected { failure: FailureView },
    /// An order submission was refused before anything was sent.
    SubmitRefused { reason: String },
    PageLockChanged { locked: bool },
}

impl AppEvent {
    /// Build a field change from a form input name.
    ///
    /// Unknown names are rejected instead of silently dropped.
    pub fn field_changed(name: &str, value: impl Into<String>) -> Result<Self, CommerceError> {
        Ok(AppEvent::FieldChanged {
            field: name.parse()?,
            value: value.into(),
        })
    }

    /// Check if this event carries a view model for rendering.
    pub fn is_notification(&self) -> bool {
        matches!(
            self.kind(),
            EventKind::CatalogChanged
                | EventKind::BasketChanged
                | EventKind::PreviewChanged
                | EventKind::DeliveryFormChanged
                | EventKind::ContactsFormChanged
                | EventKind::LifecycleChanged
                | EventKind::OrderPlaced
                | EventKind::OrderRejected
                | EventKind::SubmitRefused
                | EventKind::PageLockChanged
        )
    }
}

impl BusEvent for AppEvent {
    type Kind = EventKind;

    fn kind(&self) -> EventKind {
        match self {
            AppEvent::CatalogLoaded { .. } => EventKind::CatalogLoaded,
            AppEvent::CardSelected { .. } => EventKind::CardSelected,
            AppEvent::PreviewLoaded { .. } => EventKind::PreviewLoaded,
            AppEvent::BasketAdd { .. } => EventKind::BasketAdd,
            AppEvent::BasketRemove { .. } => EventKind::BasketRemove,
            AppEvent::BasketOpened => EventKind::BasketOpened,
            AppEvent::CheckoutStarted => EventKind::CheckoutStarted,
            AppEvent::FieldChanged { .. } => EventKind::FieldChanged,
            AppEvent::DeliverySubmitted => EventKind::DeliverySubmitted,
            AppEvent::OrderSucceeded { .. } => EventKind::OrderSucceeded,
            AppEvent::OrderFailed { .. } => EventKind::OrderFailed,
            AppEvent::RetryRequested => EventKind::RetryRequested,
            AppEvent::SuccessAcknowledged => EventKind::SuccessAcknowledged,
            AppEvent::CheckoutCancelled => EventKind::CheckoutCancelled,
            AppEvent::ModalOpened => EventKind::ModalOpened,
            AppEvent::ModalClosed => EventKind::ModalClosed,
            AppEvent::CatalogChanged { .. } => EventKind::CatalogChanged,
            AppEvent::BasketChanged { .. } => EventKind::BasketChanged,
            AppEvent::PreviewChanged { .. } => EventKind::PreviewChanged,
            AppEvent::DeliveryFormChanged { .. } => EventKind::DeliveryFormChanged,
            AppEvent::ContactsFormChanged { .. } => EventKind::ContactsFormChanged,
            AppEvent::LifecycleChanged { .. } => EventKind::LifecycleChanged,
            AppEvent::OrderPlaced { .. } => EventKind::OrderPlaced,
            AppEvent::OrderRejected { .. } => EventKind::OrderRejected,
            AppEvent::SubmitRefused { .. } => EventKind::SubmitRefused,
            AppEvent::PageLockChanged { .. } => EventKind::PageLockChanged,
        }
    }

    fn name(&self) -> &'static str {
        match self.kind() {
            EventKind::CatalogLoaded => "items:loaded",
            EventKind::CardSelected => "card:select",
            EventKind::PreviewLoaded => "preview:loaded",
            EventKind::BasketAdd => "basket:add",
            EventKind::BasketRemove => "basket:remove",
            EventKind::BasketOpened => "basket:open",
            EventKind::CheckoutStarted => "order:open",
            EventKind::FieldChanged => "order:change",
            EventKind::DeliverySubmitted => "order:submit",
            EventKind::OrderSucceeded => "order:success",
            EventKind::OrderFailed => "order:failed",
            EventKind::RetryRequested => "order:retry",
            EventKind::SuccessAcknowledged => "success:close",
            EventKind::CheckoutCancelled => "order:cancel",
            EventKind::ModalOpened => "modal:open",
            EventKind::ModalClosed => "modal:close",
            EventKind::CatalogChanged => "items:changed",
            EventKind::BasketChanged => "basket:changed",
            EventKind::PreviewChanged => "preview:changed",
            EventKind::DeliveryFormChanged => "delivery:changed",
            EventKind::ContactsFormChanged => "contacts:changed",
            EventKind::LifecycleChanged => "lifecycle:changed",
            EventKind::OrderPlaced => "order:placed",
            EventKind::OrderRejected => "order:rejected",
            EventKind::SubmitRefused => "order:refused",
            EventKind::PageLockChanged => "page:lock",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_changed_from_input_name() {
        let event = AppEvent::field_changed("address", "Moscow").unwrap();
        assert_eq!(
            event,
            AppEvent::FieldChanged {
                field: OrderField::Address,
                value: "Moscow".to_string()
            }
        );
        assert_eq!(event.name(), "order:change");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = AppEvent::field_changed("adress", "Moscow");
        assert!(matches!(result, Err(CommerceError::UnknownField(_))));
    }

    #[test]
    fn test_notifications_are_distinguished() {
        assert!(AppEvent::PageLockChanged { locked: true }.is_notification());
        assert!(!AppEvent::ModalOpened.is_notification());
        assert!(!AppEvent::BasketAdd { id: "a".into() }.is_notification());
        let refused = AppEvent::SubmitRefused {
            reason: "Order submission already in flight".to_string(),
        };
        assert!(refused.is_notification());
        assert_eq!(refused.name(), "order:refused");
    }
}
