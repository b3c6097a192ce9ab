//! Bus handlers that own the store.
//!
//! Every intent handler mutates the store under a short borrow, builds the
//! resulting notifications, releases the borrow and only then emits them, so
//! rendering subscribers never observe a store that is still borrowed.
//!
//! Submitting the order is not a bus intent: it is driven by
//! [`submit_contacts`] from the caller that owns the network request, so the
//! lifecycle only enters `Submitting` when a request is about to be sent.

use crate::events::{AppEvent, EventKind};
use crate::store::{PreviewOutcome, Store, Transition};
use crate::StorefrontError;
use larek_commerce::checkout::{CheckoutState, CheckoutTrigger, FormPhase, OrderRequest};
use larek_events::{EventBus, SubscriptionId};
use std::cell::RefCell;
use std::rc::Rc;

type Updates = anyhow::Result<Vec<AppEvent>>;

/// Register the state core on the bus.
pub fn install(bus: &EventBus<AppEvent>, store: &Rc<RefCell<Store>>) -> Vec<SubscriptionId> {
    let routes: [(EventKind, fn(&mut Store, &AppEvent) -> Updates); 16] = [
        (EventKind::CatalogLoaded, on_catalog_loaded),
        (EventKind::CardSelected, on_card_selected),
        (EventKind::PreviewLoaded, on_preview_loaded),
        (EventKind::BasketAdd, on_basket_add),
        (EventKind::BasketRemove, on_basket_remove),
        (EventKind::BasketOpened, on_basket_opened),
        (EventKind::CheckoutStarted, on_checkout_started),
        (EventKind::FieldChanged, on_field_changed),
        (EventKind::DeliverySubmitted, on_delivery_submitted),
        (EventKind::OrderSucceeded, on_order_succeeded),
        (EventKind::OrderFailed, on_order_failed),
        (EventKind::RetryRequested, on_retry),
        (EventKind::SuccessAcknowledged, on_success_acknowledged),
        (EventKind::CheckoutCancelled, on_checkout_cancelled),
        (EventKind::ModalOpened, on_modal_opened),
        (EventKind::ModalClosed, on_modal_closed),
    ];

    routes
        .into_iter()
        .map(|(kind, handler)| route(bus, store, kind, handler))
        .collect()
}

fn route(
    bus: &EventBus<AppEvent>,
    store: &Rc<RefCell<Store>>,
    kind: EventKind,
    handler: fn(&mut Store, &AppEvent) -> Updates,
) -> SubscriptionId {
    let store = Rc::clone(store);
    let publisher = bus.clone();
    bus.subscribe(kind, move |event| {
        let updates = {
            let mut store = store.borrow_mut();
            handler(&mut store, event)?
        };
        for update in updates {
            publisher.emit(update)?;
        }
        Ok(())
    })
}

/// Enter `Submitting` and build the order to send.
///
/// A refusal (an order already in flight, an incomplete draft, a form that
/// is not ready) leaves the state untouched and is announced as
/// `SubmitRefused` before being returned.
pub(crate) fn submit_contacts(
    bus: &EventBus<AppEvent>,
    store: &RefCell<Store>,
) -> Result<OrderRequest, StorefrontError> {
    let (outcome, updates) = {
        let mut store = store.borrow_mut();
        let from = store.state();
        match store.begin_submission() {
            Ok(order) => {
                tracing::info!(items = order.items.len(), total = order.total, "order submitted");
                let mut updates = Vec::new();
                push_transition(
                    &mut updates,
                    Transition {
                        from,
                        to: store.state(),
                    },
                );
                (Ok(order), updates)
            }
            Err(err) => {
                tracing::warn!(state = %from, error = %err, "order submission refused");
                let reason = err.to_string();
                (Err(err), vec![AppEvent::SubmitRefused { reason }])
            }
        }
    };
    for update in updates {
        bus.emit(update)?;
    }
    Ok(outcome?)
}

fn push_transition(events: &mut Vec<AppEvent>, transition: Transition) {
    if transition.changed() {
        events.push(AppEvent::LifecycleChanged {
            from: transition.from,
            to: transition.to,
        });
    }
}

/// Basket view, plus the open preview whose button depends on the basket.
fn basket_updates(store: &Store) -> Updates {
    let mut events = vec![AppEvent::BasketChanged {
        basket: store.basket_view()?,
    }];
    if let Some(preview) = store.preview_view() {
        events.push(AppEvent::PreviewChanged { preview });
    }
    Ok(events)
}

fn on_catalog_loaded(store: &mut Store, event: &AppEvent) -> Updates {
    let AppEvent::CatalogLoaded { items } = event else {
        return Ok(Vec::new());
    };
    let dropped = store.set_catalog(items.clone());
    tracing::info!(items = store.catalog().len(), "catalog replaced");

    let mut events = vec![AppEvent::CatalogChanged {
        cards: store.card_views(),
    }];
    if !dropped.is_empty() {
        events.extend(basket_updates(store)?);
    }
    Ok(events)
}

fn on_card_selected(store: &mut Store, event: &AppEvent) -> Updates {
    let AppEvent::CardSelected { id } = event else {
        return Ok(Vec::new());
    };
    store.request_preview(id)?;
    Ok(Vec::new())
}

fn on_preview_loaded(store: &mut Store, event: &AppEvent) -> Updates {
    let AppEvent::PreviewLoaded { item } = event else {
        return Ok(Vec::new());
    };
    match store.resolve_preview(item.clone()) {
        PreviewOutcome::Shown => Ok(store
            .preview_view()
            .map(|preview| AppEvent::PreviewChanged { preview })
            .into_iter()
            .collect()),
        PreviewOutcome::Stale => Ok(Vec::new()),
    }
}

fn on_basket_add(store: &mut Store, event: &AppEvent) -> Updates {
    let AppEvent::BasketAdd { id } = event else {
        return Ok(Vec::new());
    };
    if store.add_to_order(id)? {
        basket_updates(store)
    } else {
        Ok(Vec::new())
    }
}

fn on_basket_remove(store: &mut Store, event: &AppEvent) -> Updates {
    let AppEvent::BasketRemove { id } = event else {
        return Ok(Vec::new());
    };
    if store.remove_from_order(id) {
        basket_updates(store)
    } else {
        Ok(Vec::new())
    }
}

fn on_basket_opened(store: &mut Store, _event: &AppEvent) -> Updates {
    Ok(vec![AppEvent::BasketChanged {
        basket: store.basket_view()?,
    }])
}

fn on_checkout_started(store: &mut Store, _event: &AppEvent) -> Updates {
    let transition = store.open_delivery()?;
    let mut events = Vec::new();
    push_transition(&mut events, transition);
    events.push(AppEvent::DeliveryFormChanged {
        form: store.delivery_view(),
    });
    Ok(events)
}

fn on_field_changed(store: &mut Store, event: &AppEvent) -> Updates {
    let AppEvent::FieldChanged { field, value } = event else {
        return Ok(Vec::new());
    };
    let phase = store.set_field(*field, value.as_str());
    let state = store.state();
    let mut events = Vec::new();

    match phase {
        FormPhase::Delivery => {
            if state.in_delivery() {
                let valid = store.delivery_errors().is_valid();
                let transition = store.transition(CheckoutTrigger::DeliveryEdited { valid })?;
                push_transition(&mut events, transition);
            }
            events.push(AppEvent::DeliveryFormChanged {
                form: store.delivery_view(),
            });
        }
        FormPhase::Contacts => {
            if state.in_contacts() {
                let valid = store.contact_errors().is_valid();
                let transition = store.transition(CheckoutTrigger::ContactsEdited { valid })?;
                push_transition(&mut events, transition);
            }
            events.push(AppEvent::ContactsFormChanged {
                form: store.contacts_view(),
            });
        }
    }
    Ok(events)
}

fn on_delivery_submitted(store: &mut Store, _event: &AppEvent) -> Updates {
    let transition = store.submit_delivery()?;
    let mut events = Vec::new();
    push_transition(&mut events, transition);
    events.push(AppEvent::ContactsFormChanged {
        form: store.contacts_view(),
    });
    Ok(events)
}

fn on_order_succeeded(store: &mut Store, event: &AppEvent) -> Updates {
    let AppEvent::OrderSucceeded { result } = event else {
        return Ok(Vec::new());
    };
    let transition = store.complete_order()?;
    tracing::info!(order = %result.id, total = result.total, "order placed");

    let mut events = Vec::new();
    push_transition(&mut events, transition);
    events.push(AppEvent::OrderPlaced {
        success: store.success_view(result),
    });
    events.extend(basket_updates(store)?);
    Ok(events)
}

fn on_order_failed(store: &mut Store, event: &AppEvent) -> Updates {
    let AppEvent::OrderFailed { message } = event else {
        return Ok(Vec::new());
    };
    let transition = store.fail_order(message)?;
    let mut events = Vec::new();
    push_transition(&mut events, transition);
    events.push(AppEvent::OrderRejected {
        failure: store.failure_view(),
    });
    Ok(events)
}

fn on_retry(store: &mut Store, _event: &AppEvent) -> Updates {
    let transition = store.retry()?;
    let mut events = Vec::new();
    push_transition(&mut events, transition);
    events.push(AppEvent::ContactsFormChanged {
        form: store.contacts_view(),
    });
    Ok(events)
}

fn on_success_acknowledged(store: &mut Store, _event: &AppEvent) -> Updates {
    let transition = store.transition(CheckoutTrigger::Acknowledge)?;
    let mut events = Vec::new();
    push_transition(&mut events, transition);
    Ok(events)
}

fn on_checkout_cancelled(store: &mut Store, _event: &AppEvent) -> Updates {
    let transition = store.cancel()?;
    let mut events = Vec::new();
    push_transition(&mut events, transition);
    Ok(events)
}

fn on_modal_opened(store: &mut Store, _event: &AppEvent) -> Updates {
    let mut events = Vec::new();
    if store.set_page_locked(true) {
        events.push(AppEvent::PageLockChanged { locked: true });
    }
    Ok(events)
}

fn on_modal_closed(store: &mut Store, _event: &AppEvent) -> Updates {
    let mut events = Vec::new();
    if store.set_page_locked(false) {
        events.push(AppEvent::PageLockChanged { locked: false });
    }
    store.close_preview();

    let transition = match store.state() {
        CheckoutState::Browsing => None,
        CheckoutState::Submitting => {
            tracing::debug!("modal closed while submitting; checkout kept");
            None
        }
        CheckoutState::Success => Some(store.transition(CheckoutTrigger::Acknowledge)?),
        _ => Some(store.cancel()?),
    };
    if let Some(transition) = transition {
        push_transition(&mut events, transition);
    }
    Ok(events)
}
