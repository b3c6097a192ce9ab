//! Event-driven state core for the Web Larek storefront.
//!
//! This crate provides:
//! - `AppEvent` - the closed set of intents and notifications on the bus
//! - `Store` - catalog, basket, order draft and checkout lifecycle
//! - `Storefront` - the facade that installs the handlers and runs network
//!   round trips against a `ProductService`
//! - `StorefrontConfig` - file and environment configuration
//!
//! # Example
//!
//! ```
//! use larek_commerce::catalog::{CatalogItem, Category};
//! use larek_events::EventBus;
//! use larek_storefront::{handlers, AppEvent, EventKind, Store};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let bus = EventBus::new();
//! let store = Rc::new(RefCell::new(Store::default()));
//! handlers::install(&bus, &store);
//!
//! let counter = Rc::new(RefCell::new(0));
//! let seen = Rc::clone(&counter);
//! bus.subscribe(EventKind::BasketChanged, move |event| {
//!     if let AppEvent::BasketChanged { basket } = event {
//!         *seen.borrow_mut() = basket.counter;
//!     }
//!     Ok(())
//! });
//!
//! bus.emit(AppEvent::CatalogLoaded {
//!     items: vec![CatalogItem::new("a", "Item a", Category::Other, Some(100))],
//! })
//! .unwrap();
//! bus.emit(AppEvent::BasketAdd { id: "a".into() }).unwrap();
//! assert_eq!(*counter.borrow(), 1);
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod handlers;
pub mod store;
pub mod storefront;
pub mod views;

pub use config::{CheckoutConfig, StorefrontConfig};
pub use error::StorefrontError;
pub use events::{AppEvent, EventKind};
pub use store::{PreviewOutcome, Store, Transition};
pub use storefront::Storefront;
pub use views::{BasketLine, BasketView, CardView, FailureView, FormView, PreviewView, SuccessView};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        AppEvent, EventKind, PreviewOutcome, Store, Storefront, StorefrontConfig,
        StorefrontError,
    };
}
