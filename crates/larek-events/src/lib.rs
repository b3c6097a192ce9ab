//! Synchronous event bus.
//!
//! The bus is the only channel between the storefront's state core and its
//! views. It provides:
//!
//! - [`EventBus`] - depth-first, in-order dispatch to handlers subscribed to an
//!   event kind, plus wildcard handlers that see every event
//! - [`BusEvent`] - the trait a closed event union implements to be routable
//! - [`DispatchReport`] - what happened to each handler during one emit
//!
//! Dispatch runs on the caller's thread. A handler may emit other events
//! while it runs; emitting a kind that is already being dispatched further up
//! the stack is refused with [`BusError::Reentrant`], so event cycles end
//! instead of recursing. A handler that fails or panics is reported and its
//! siblings still receive the event.
//!
//! # Example
//!
//! ```rust
//! use larek_events::{BusEvent, EventBus};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! enum Kind { Ping }
//!
//! #[derive(Debug)]
//! enum Event { Ping(u32) }
//!
//! impl BusEvent for Event {
//!     type Kind = Kind;
//!     fn kind(&self) -> Kind { Kind::Ping }
//!     fn name(&self) -> &'static str { "ping" }
//! }
//!
//! let bus = EventBus::new();
//! let seen = Rc::new(Cell::new(0));
//! let sink = Rc::clone(&seen);
//! bus.subscribe(Kind::Ping, move |event: &Event| {
//!     let Event::Ping(n) = event;
//!     sink.set(*n);
//!     Ok(())
//! });
//!
//! let report = bus.emit(Event::Ping(7)).unwrap();
//! assert_eq!(report.delivered, 1);
//! assert_eq!(seen.get(), 7);
//! ```

mod bus;
mod error;
mod report;
mod subscription;

pub use bus::{EventBus, Handler, MAX_DISPATCH_DEPTH};
pub use error::BusError;
pub use report::{DispatchReport, HandlerFailure};
pub use subscription::{BusEvent, SubscriptionId};
