//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in storefront domain operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommerceError {
    /// Product not found in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// A form field name that is not part of the order.
    #[error("Unknown order field: {0}")]
    UnknownField(String),

    /// A payment method outside of the supported set.
    #[error("Unknown payment method: {0}")]
    UnknownPayment(String),

    /// Invalid checkout state transition.
    #[error("Invalid checkout transition from {from} on {trigger}")]
    InvalidCheckoutTransition { from: String, trigger: String },

    /// An order is already being submitted.
    #[error("Order submission already in flight")]
    SubmitInFlight,

    /// Checkout incomplete.
    #[error("Checkout incomplete: missing {0}")]
    CheckoutIncomplete(String),

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in price calculation")]
    Overflow,
}
