//! Event log for diagnostics

use larek_events::{BusEvent, EventBus, SubscriptionId};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use std::time::Instant;

/// Records kept when no capacity is given.
pub const DEFAULT_EVENT_LOG_CAPACITY: usize = 256;

/// A logged event with metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    /// Monotonic sequence number
    pub sequence: u64,
    /// Milliseconds since the log was attached
    pub elapsed_ms: u64,
    /// The event name
    pub name: &'static str,
    /// Debug rendering of the payload
    pub detail: String,
}

struct LogState {
    sequence: u64,
    capacity: usize,
    records: VecDeque<EventRecord>,
}

/// Wildcard subscriber that traces every event at debug level and keeps the
/// most recent ones in memory.
pub struct EventLog<E: BusEvent> {
    bus: EventBus<E>,
    subscription: SubscriptionId,
    state: Rc<RefCell<LogState>>,
}

impl<E: BusEvent + fmt::Debug> EventLog<E> {
    /// Attach to a bus with the default capacity.
    pub fn attach(bus: &EventBus<E>) -> Self {
        Self::with_capacity(bus, DEFAULT_EVENT_LOG_CAPACITY)
    }

    /// Attach to a bus keeping at most `capacity` records.
    pub fn with_capacity(bus: &EventBus<E>, capacity: usize) -> Self {
        let state = Rc::new(RefCell::new(LogState {
            sequence: 0,
            capacity: capacity.max(1),
            records: VecDeque::new(),
        }));
        let start = Instant::now();

        let sink = Rc::clone(&state);
        let subscription = bus.subscribe_all(move |event: &E| {
            let detail = format!("{:?}", event);
            tracing::debug!(event = event.name(), payload = %detail, "event");

            let mut state = sink.borrow_mut();
            state.sequence += 1;
            let record = EventRecord {
                sequence: state.sequence,
                elapsed_ms: start.elapsed().as_millis() as u64,
                name: event.name(),
                detail,
            };
            if state.records.len() == state.capacity {
                state.records.pop_front();
            }
            state.records.push_back(record);
            Ok(())
        });

        Self {
            bus: bus.clone(),
            subscription,
            state,
        }
    }
}

impl<E: BusEvent> EventLog<E> {
    /// Retained records, oldest first.
    pub fn records(&self) -> Vec<EventRecord> {
        self.state.borrow().records.iter().cloned().collect()
    }

    /// Names of the retained records, oldest first.
    pub fn names(&self) -> Vec<&'static str> {
        self.state.borrow().records.iter().map(|r| r.name).collect()
    }

    /// Total events seen since attaching, including evicted ones.
    pub fn seen(&self) -> u64 {
        self.state.borrow().sequence
    }

    /// Forget retained records.
    pub fn clear(&self) {
        self.state.borrow_mut().records.clear();
    }

    /// Stop listening. Retained records stay readable.
    pub fn detach(&self) -> bool {
        self.bus.unsubscribe(self.subscription)
    }
}
