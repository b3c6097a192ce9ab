//! Basket module.
//!
//! The basket is the subset of catalog items selected for purchase.

mod ledger;

pub use ledger::BasketLedger;
