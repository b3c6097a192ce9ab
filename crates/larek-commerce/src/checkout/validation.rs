//! Field validation for the two checkout forms.
//!
//! Validation is pure: it returns the error map and leaves storing and
//! announcing it to the caller.

use crate::checkout::{OrderDraft, OrderField};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

pub const ADDRESS_REQUIRED: &str = "Delivery address is required";
pub const PAYMENT_REQUIRED: &str = "Choose a payment method";
pub const PHONE_REQUIRED: &str = "Phone number is required";
pub const EMAIL_REQUIRED: &str = "Email is required";
pub const PHONE_MALFORMED: &str = "Phone number must have 10 to 15 digits";
pub const EMAIL_MALFORMED: &str = "Email must look like name@example.com";

/// Field-level errors. A missing key means the field is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<OrderField, String>);

impl FieldErrors {
    /// An empty (valid) error map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for a field.
    pub fn insert(&mut self, field: OrderField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    /// Message for a field, if it is invalid.
    pub fn get(&self, field: OrderField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Check if a field is invalid.
    pub fn contains(&self, field: OrderField) -> bool {
        self.0.contains_key(&field)
    }

    /// Valid iff there are no errors.
    pub fn is_valid(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of invalid fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over invalid fields in field order.
    pub fn iter(&self) -> impl Iterator<Item = (OrderField, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    /// All messages joined for the form's error line.
    pub fn joined(&self) -> String {
        self.0.values().map(String::as_str).collect::<Vec<_>>().join("; ")
    }
}

/// How strictly the contact form is checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRules {
    /// Also check phone and email formats, not just presence.
    #[serde(default)]
    pub strict: bool,
}

impl ContactRules {
    /// Presence checks only.
    pub fn lenient() -> Self {
        Self { strict: false }
    }

    /// Presence and format checks.
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

/// Check the delivery form: address and payment.
pub fn validate_delivery(draft: &OrderDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if draft.address.trim().is_empty() {
        errors.insert(OrderField::Address, ADDRESS_REQUIRED);
    }
    if draft.payment.is_none() {
        errors.insert(OrderField::Payment, PAYMENT_REQUIRED);
    }
    errors
}

/// Check the contacts form: phone and email.
pub fn validate_contacts(draft: &OrderDraft, rules: ContactRules) -> FieldErrors {
    let mut errors = FieldErrors::new();

    let phone = draft.phone.trim();
    if phone.is_empty() {
        errors.insert(OrderField::Phone, PHONE_REQUIRED);
    } else if rules.strict && !is_phone(phone) {
        errors.insert(OrderField::Phone, PHONE_MALFORMED);
    }

    let email = draft.email.trim();
    if email.is_empty() {
        errors.insert(OrderField::Email, EMAIL_REQUIRED);
    } else if rules.strict && !is_email(email) {
        errors.insert(OrderField::Email, EMAIL_MALFORMED);
    }

    errors
}

/// Between 10 and 15 digits, optionally grouped with `+`, brackets, dashes and spaces.
static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+() -]*(?:[0-9][+() -]*){10,15}$").expect("Invalid phone regex pattern")
});

/// One `@`, no whitespace, a dot somewhere in the domain.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Invalid email regex pattern")
});

fn is_phone(value: &str) -> bool {
    PHONE_PATTERN.is_match(value)
}

fn is_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}
