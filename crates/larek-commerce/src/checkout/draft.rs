//! Order draft: the in-progress order.

use crate::basket::BasketLedger;
use crate::catalog::Catalog;
use crate::error::CommerceError;
use crate::money::Synapses;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Payment method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Payment {
    /// Pay online by card.
    Online,
    /// Pay on delivery.
    Offline,
}

impl Payment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Payment::Online => "online",
            Payment::Offline => "offline",
        }
    }
}

impl FromStr for Payment {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" => Ok(Payment::Online),
            "offline" => Ok(Payment::Offline),
            other => Err(CommerceError::UnknownPayment(other.to_string())),
        }
    }
}

/// Which checkout form a field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormPhase {
    /// First form: address and payment.
    Delivery,
    /// Second form: phone and email.
    Contacts,
}

/// A user-editable order field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderField {
    Address,
    Payment,
    Phone,
    Email,
}

impl OrderField {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderField::Address => "address",
            OrderField::Payment => "payment",
            OrderField::Phone => "phone",
            OrderField::Email => "email",
        }
    }

    /// The form this field is edited in.
    pub fn phase(&self) -> FormPhase {
        match self {
            OrderField::Address | OrderField::Payment => FormPhase::Delivery,
            OrderField::Phone | OrderField::Email => FormPhase::Contacts,
        }
    }
}

impl fmt::Display for OrderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Form inputs carry their field name as a string; unknown names are a
/// wiring bug and are rejected here rather than silently dropped.
impl FromStr for OrderField {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "address" => Ok(OrderField::Address),
            "payment" => Ok(OrderField::Payment),
            "phone" => Ok(OrderField::Phone),
            "email" => Ok(OrderField::Email),
            other => Err(CommerceError::UnknownField(other.to_string())),
        }
    }
}

/// The in-progress, not yet submitted order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    /// Delivery address.
    pub address: String,
    /// Payment method, unset until chosen.
    pub payment: Option<Payment>,
    /// Contact phone.
    pub phone: String,
    /// Contact email.
    pub email: String,
    /// Selected items in insertion order.
    pub items: BasketLedger,
}

impl OrderDraft {
    /// Write one delivery or contact field.
    ///
    /// A payment value outside `online`/`offline` leaves the payment unset,
    /// which the delivery validation then reports.
    pub fn set_field(&mut self, field: OrderField, value: impl Into<String>) {
        let value = value.into();
        match field {
            OrderField::Address => self.address = value,
            OrderField::Payment => self.payment = value.trim().parse().ok(),
            OrderField::Phone => self.phone = value,
            OrderField::Email => self.email = value,
        }
    }

    /// Current value of a field as text.
    pub fn field(&self, field: OrderField) -> &str {
        match field {
            OrderField::Address => &self.address,
            OrderField::Payment => self.payment.map(|p| p.as_str()).unwrap_or(""),
            OrderField::Phone => &self.phone,
            OrderField::Email => &self.email,
        }
    }

    /// Total of the selected items against the catalog.
    pub fn total(&self, catalog: &Catalog) -> Result<Synapses, CommerceError> {
        self.items.total(catalog).ok_or(CommerceError::Overflow)
    }

    /// Empty the item list. Delivery and contact fields are kept.
    pub fn clear_items(&mut self) {
        self.items.clear();
    }
}
