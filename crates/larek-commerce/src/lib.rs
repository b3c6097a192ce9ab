//! Storefront domain types and logic for Web Larek.
//!
//! This crate holds everything the state core needs that is independent of
//! event dispatch and transport:
//!
//! - **Catalog**: purchasable items, categories, id-indexed catalog
//! - **Basket**: the insertion-ordered set of selected item ids
//! - **Checkout**: order draft, field validation, lifecycle state machine,
//!   order payloads for the product service
//!
//! # Example
//!
//! ```rust
//! use larek_commerce::prelude::*;
//!
//! let catalog = Catalog::new(vec![
//!     CatalogItem::new("a", "Frontend course", Category::SoftSkill, Some(750)),
//!     CatalogItem::new("b", "Mug", Category::Other, None),
//! ]);
//!
//! let mut draft = OrderDraft::default();
//! draft.items.add(ProductId::new("a"));
//! draft.items.add(ProductId::new("b"));
//!
//! assert_eq!(draft.total(&catalog).unwrap(), Synapses::new(750));
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod basket;
pub mod catalog;
pub mod checkout;

pub use error::CommerceError;
pub use ids::*;
pub use money::{price_label, Synapses};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{price_label, Synapses};

    // Catalog
    pub use crate::catalog::{Catalog, CatalogItem, Category};

    // Basket
    pub use crate::basket::BasketLedger;

    // Checkout
    pub use crate::checkout::{
        validate_contacts, validate_delivery, CheckoutLifecycle, CheckoutState, CheckoutTrigger,
        ContactRules, FieldErrors, FormPhase, OrderDraft, OrderField, OrderRequest, OrderResult,
        Payment,
    };
}
