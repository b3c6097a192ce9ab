//! Synapse amounts.
//!
//! Prices in the storefront are whole numbers of synapses, the in-game
//! currency. An item without a price is "priceless": it can be looked at
//! but contributes nothing to a total.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit label shown next to every amount.
pub const UNIT: &str = "synapses";

/// Label shown instead of a price for priceless items.
pub const PRICELESS: &str = "Priceless";

/// An amount of synapses.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Synapses(i64);

impl Synapses {
    /// Create a new amount.
    pub fn new(amount: i64) -> Self {
        Self(amount)
    }

    /// The zero amount.
    pub fn zero() -> Self {
        Self(0)
    }

    /// Raw amount.
    pub fn amount(&self) -> i64 {
        self.0
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Try to add another amount, returning None on overflow.
    pub fn try_add(&self, other: Synapses) -> Option<Synapses> {
        self.0.checked_add(other.0).map(Synapses)
    }

    /// Sum an iterator of amounts, returning None on overflow.
    pub fn try_sum(iter: impl IntoIterator<Item = Synapses>) -> Option<Synapses> {
        iter.into_iter()
            .try_fold(Synapses::zero(), |acc, amount| acc.try_add(amount))
    }

    /// Format with thousands separators, without the unit (e.g., "1,500").
    pub fn display_amount(&self) -> String {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        if self.0 < 0 {
            format!("-{}", grouped)
        } else {
            grouped
        }
    }

    /// Format as a display string (e.g., "1,500 synapses").
    pub fn display(&self) -> String {
        format!("{} {}", self.display_amount(), UNIT)
    }
}

impl fmt::Display for Synapses {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl From<i64> for Synapses {
    fn from(amount: i64) -> Self {
        Self(amount)
    }
}

/// Price label for an optional price: the amount, or "Priceless".
pub fn price_label(price: Option<i64>) -> String {
    match price {
        Some(amount) => Synapses::new(amount).display(),
        None => PRICELESS.to_string(),
    }
}
