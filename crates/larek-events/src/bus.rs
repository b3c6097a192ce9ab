//! Event bus for routing events to subscribers

use crate::report::{DispatchReport, HandlerFailure};
use crate::subscription::{BusEvent, SubscriptionId};
use crate::BusError;
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

/// Deepest nesting of emits from within handlers.
pub const MAX_DISPATCH_DEPTH: usize = 16;

/// A subscribed callback.
pub type Handler<E> = Rc<dyn Fn(&E) -> anyhow::Result<()>>;

struct Subscriber<E: BusEvent> {
    id: SubscriptionId,
    /// `None` receives every event.
    filter: Option<E::Kind>,
    handler: Handler<E>,
}

struct Inner<E: BusEvent> {
    subscribers: RefCell<Vec<Subscriber<E>>>,
    next_id: Cell<u64>,
    /// Kinds currently being dispatched, outermost first.
    stack: RefCell<Vec<E::Kind>>,
}

/// The event bus routes events to matching subscribers.
///
/// Cloning yields another handle to the same bus. The bus is meant for a
/// single-threaded host and is neither `Send` nor `Sync`.
pub struct EventBus<E: BusEvent> {
    inner: Rc<Inner<E>>,
}

impl<E: BusEvent> EventBus<E> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(Inner {
                subscribers: RefCell::new(Vec::new()),
                next_id: Cell::new(1),
                stack: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Subscribe to one event kind.
    pub fn subscribe<F>(&self, kind: E::Kind, handler: F) -> SubscriptionId
    where
        F: Fn(&E) -> anyhow::Result<()> + 'static,
    {
        self.insert(Some(kind), Rc::new(handler))
    }

    /// Subscribe to every event (logging, recording).
    pub fn subscribe_all<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&E) -> anyhow::Result<()> + 'static,
    {
        self.insert(None, Rc::new(handler))
    }

    fn insert(&self, filter: Option<E::Kind>, handler: Handler<E>) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        self.inner.subscribers.borrow_mut().push(Subscriber {
            id,
            filter,
            handler,
        });
        id
    }

    /// Unsubscribe. Returns false if the id was not subscribed.
    ///
    /// Safe to call from inside a handler; the removed handler is skipped for
    /// the rest of the current dispatch.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subs = self.inner.subscribers.borrow_mut();
        let len_before = subs.len();
        subs.retain(|s| s.id != id);
        subs.len() < len_before
    }

    /// Check if a subscription is active.
    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.inner.subscribers.borrow().iter().any(|s| s.id == id)
    }

    /// Get count of active subscribers, wildcards included.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    /// Depth of the dispatch currently running (0 when idle).
    pub fn depth(&self) -> usize {
        self.inner.stack.borrow().len()
    }

    /// Dispatch an event to every matching handler, in subscription order.
    ///
    /// Handlers subscribed during this dispatch do not see the event. A
    /// handler error or panic is logged and recorded in the report; the
    /// remaining handlers still run.
    pub fn emit(&self, event: E) -> Result<DispatchReport, BusError> {
        let kind = event.kind();
        let name = event.name();
        let _frame = self.enter(kind, name)?;

        let targets: Vec<(SubscriptionId, Handler<E>)> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .filter(|s| s.filter.map_or(true, |k| k == kind))
            .map(|s| (s.id, Rc::clone(&s.handler)))
            .collect();

        let mut report = DispatchReport::new(name);
        for (id, handler) in targets {
            if !self.is_subscribed(id) {
                continue;
            }
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler(&event)));
            let message = match outcome {
                Ok(Ok(())) => {
                    report.delivered += 1;
                    continue;
                }
                Ok(Err(err)) => format!("{:#}", err),
                Err(payload) => format!("handler panicked: {}", panic_message(payload.as_ref())),
            };
            tracing::error!(
                event = name,
                subscription = %id,
                error = %message,
                "event handler failed"
            );
            report.failures.push(HandlerFailure {
                subscription: id,
                message,
            });
        }

        Ok(report)
    }

    fn enter(&self, kind: E::Kind, name: &'static str) -> Result<DispatchFrame<'_, E>, BusError> {
        let mut stack = self.inner.stack.borrow_mut();
        if stack.contains(&kind) {
            tracing::warn!(event = name, depth = stack.len(), "re-entrant emit refused");
            return Err(BusError::Reentrant { event: name });
        }
        if stack.len() >= MAX_DISPATCH_DEPTH {
            tracing::warn!(event = name, depth = stack.len(), "dispatch depth exceeded");
            return Err(BusError::DepthExceeded {
                event: name,
                depth: stack.len(),
            });
        }
        stack.push(kind);
        Ok(DispatchFrame { inner: &self.inner })
    }
}

impl<E: BusEvent> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: BusEvent> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

/// Pops the dispatch stack when an emit finishes, panics included.
struct DispatchFrame<'a, E: BusEvent> {
    inner: &'a Inner<E>,
}

impl<E: BusEvent> Drop for DispatchFrame<'_, E> {
    fn drop(&mut self) {
        self.inner.stack.borrow_mut().pop();
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Kind {
        Ping,
        Pong,
        Level(u8),
    }

    #[derive(Debug)]
    enum TestEvent {
        Ping(u32),
        Pong,
        Level(u8),
    }

    impl BusEvent for TestEvent {
        type Kind = Kind;

        fn kind(&self) -> Kind {
            match self {
                TestEvent::Ping(_) => Kind::Ping,
                TestEvent::Pong => Kind::Pong,
                TestEvent::Level(n) => Kind::Level(*n),
            }
        }

        fn name(&self) -> &'static str {
            match self {
                TestEvent::Ping(_) => "ping",
                TestEvent::Pong => "pong",
                TestEvent::Level(_) => "level",
            }
        }
    }

    type Log = Rc<RefCell<Vec<String>>>;

    fn recorder(log: &Log, label: &'static str) -> impl Fn(&TestEvent) -> anyhow::Result<()> {
        let log = Rc::clone(log);
        move |event: &TestEvent| {
            log.borrow_mut().push(format!("{}:{}", label, event.name()));
            Ok(())
        }
    }

    #[test]
    fn test_delivers_in_subscription_order() {
        let bus = EventBus::new();
        let log: Log = Rc::default();

        bus.subscribe(Kind::Ping, recorder(&log, "first"));
        bus.subscribe_all(recorder(&log, "wildcard"));
        bus.subscribe(Kind::Ping, recorder(&log, "second"));

        let report = bus.emit(TestEvent::Ping(1)).unwrap();
        assert_eq!(report.delivered, 3);
        assert_eq!(
            *log.borrow(),
            vec!["first:ping", "wildcard:ping", "second:ping"]
        );
    }

    #[test]
    fn test_kind_filter() {
        let bus = EventBus::new();
        let log: Log = Rc::default();
        bus.subscribe(Kind::Pong, recorder(&log, "pong-only"));

        let report = bus.emit(TestEvent::Ping(1)).unwrap();
        assert_eq!(report.invoked(), 0);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_unsubscribe() {
        let bus = EventBus::<TestEvent>::new();
        let log: Log = Rc::default();
        let id = bus.subscribe(Kind::Ping, recorder(&log, "gone"));

        assert_eq!(bus.subscriber_count(), 1);
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        assert_eq!(bus.subscriber_count(), 0);

        bus.emit(TestEvent::Ping(1)).unwrap();
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_nested_emit_runs_depth_first() {
        let bus = EventBus::new();
        let log: Log = Rc::default();

        let inner_bus = bus.clone();
        let inner_log = Rc::clone(&log);
        bus.subscribe(Kind::Ping, move |_: &TestEvent| {
            inner_log.borrow_mut().push("ping:before".to_string());
            inner_bus.emit(TestEvent::Pong)?;
            inner_log.borrow_mut().push("ping:after".to_string());
            Ok(())
        });
        bus.subscribe(Kind::Pong, recorder(&log, "handler"));

        bus.emit(TestEvent::Ping(1)).unwrap();
        assert_eq!(
            *log.borrow(),
            vec!["ping:before", "handler:pong", "ping:after"]
        );
        assert_eq!(bus.depth(), 0);
    }

    #[test]
    fn test_same_kind_reentry_refused() {
        let bus = EventBus::new();
        let seen: Rc<RefCell<Option<BusError>>> = Rc::default();

        let inner_bus = bus.clone();
        let inner_seen = Rc::clone(&seen);
        bus.subscribe(Kind::Ping, move |event: &TestEvent| {
            if let TestEvent::Ping(n) = event {
                if let Err(err) = inner_bus.emit(TestEvent::Ping(n + 1)) {
                    *inner_seen.borrow_mut() = Some(err);
                }
            }
            Ok(())
        });

        let report = bus.emit(TestEvent::Ping(0)).unwrap();
        assert!(report.is_clean());
        assert_eq!(
            *seen.borrow(),
            Some(BusError::Reentrant { event: "ping" })
        );
    }

    #[test]
    fn test_depth_is_bounded() {
        let bus = EventBus::new();
        let deepest = Rc::new(Cell::new(0u8));

        for level in 0..=MAX_DISPATCH_DEPTH as u8 {
            let inner_bus = bus.clone();
            let inner_deepest = Rc::clone(&deepest);
            bus.subscribe(Kind::Level(level), move |_: &TestEvent| {
                inner_deepest.set(level);
                inner_bus.emit(TestEvent::Level(level + 1))?;
                Ok(())
            });
        }

        // the innermost handler's emit is refused; only its own dispatch records that
        let report = bus.emit(TestEvent::Level(0)).unwrap();
        assert!(report.is_clean());
        assert_eq!(deepest.get() as usize, MAX_DISPATCH_DEPTH - 1);
        assert_eq!(bus.depth(), 0);
    }

    #[test]
    fn test_failing_handler_does_not_block_siblings() {
        let bus = EventBus::new();
        let log: Log = Rc::default();

        bus.subscribe(Kind::Ping, |_: &TestEvent| Err(anyhow::anyhow!("view exploded")));
        bus.subscribe(Kind::Ping, recorder(&log, "sibling"));

        let report = bus.emit(TestEvent::Ping(1)).unwrap();
        assert_eq!(report.delivered, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].message, "view exploded");
        assert_eq!(*log.borrow(), vec!["sibling:ping"]);

        assert_eq!(
            report.into_result(),
            Err(BusError::HandlersFailed {
                event: "ping",
                failed: 1
            })
        );
    }

    #[test]
    fn test_panicking_handler_is_contained() {
        let bus = EventBus::new();
        let log: Log = Rc::default();

        bus.subscribe(Kind::Ping, |_: &TestEvent| -> anyhow::Result<()> {
            panic!("bad template");
        });
        bus.subscribe(Kind::Ping, recorder(&log, "sibling"));

        let report = bus.emit(TestEvent::Ping(1)).unwrap();
        assert_eq!(report.delivered, 1);
        assert!(report.failures[0].message.contains("bad template"));
        assert_eq!(bus.depth(), 0);
    }

    #[test]
    fn test_unsubscribe_during_dispatch_skips_handler() {
        let bus = EventBus::new();
        let log: Log = Rc::default();
        let victim: Rc<Cell<Option<SubscriptionId>>> = Rc::default();

        let inner_bus = bus.clone();
        let inner_victim = Rc::clone(&victim);
        bus.subscribe(Kind::Ping, move |_: &TestEvent| {
            if let Some(id) = inner_victim.get() {
                inner_bus.unsubscribe(id);
            }
            Ok(())
        });
        victim.set(Some(bus.subscribe(Kind::Ping, recorder(&log, "victim"))));

        let report = bus.emit(TestEvent::Ping(1)).unwrap();
        assert_eq!(report.delivered, 1);
        assert!(log.borrow().is_empty());
    }
}
