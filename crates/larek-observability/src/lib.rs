//! Observability for the storefront.
//!
//! This crate provides:
//! - `init_logging` - installs the global `tracing` subscriber (JSON or human)
//! - `EventLog` - a wildcard bus subscriber that traces every event and keeps
//!   the most recent ones for diagnostics

mod event_log;
mod logging;

pub use event_log::{EventLog, EventRecord, DEFAULT_EVENT_LOG_CAPACITY};
pub use logging::{init_logging, LogFormat, LoggingConfig, LoggingError};
