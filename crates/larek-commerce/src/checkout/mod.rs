//! Checkout module.
//!
//! Contains the order draft, field validation, the checkout lifecycle state
//! machine, and the order payloads exchanged with the product service.

mod draft;
mod lifecycle;
mod order;
mod validation;

pub use draft::{FormPhase, OrderDraft, OrderField, Payment};
pub use lifecycle::{CheckoutLifecycle, CheckoutState, CheckoutTrigger};
pub use order::{OrderRequest, OrderResult};
pub use validation::{
    validate_contacts, validate_delivery, ContactRules, FieldErrors, ADDRESS_REQUIRED,
    EMAIL_MALFORMED, EMAIL_REQUIRED, PAYMENT_REQUIRED, PHONE_MALFORMED, PHONE_REQUIRED,
};
