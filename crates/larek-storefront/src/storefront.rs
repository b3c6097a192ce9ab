//! Storefront facade: the state core plus the product service it talks to.

use crate::config::StorefrontConfig;
use crate::events::AppEvent;
use crate::handlers;
use crate::store::{PreviewOutcome, Store};
use crate::StorefrontError;
use larek_commerce::checkout::{CheckoutState, ContactRules, OrderResult};
use larek_commerce::{CommerceError, ProductId};
use larek_data::{LarekApi, ProductService};
use larek_events::{DispatchReport, EventBus, SubscriptionId};
use std::cell::{Ref, RefCell};
use std::rc::Rc;

/// The storefront state core.
///
/// UI components talk to it only through the bus: intents go in with
/// [`Storefront::dispatch`], view models come out as notifications. The
/// async methods run the network round trips and feed their results back
/// as events.
pub struct Storefront<S: ProductService> {
    bus: EventBus<AppEvent>,
    store: Rc<RefCell<Store>>,
    service: S,
    handlers: Vec<SubscriptionId>,
}

impl Storefront<LarekApi> {
    /// Build a storefront backed by the HTTP product service.
    pub fn connect(config: &StorefrontConfig) -> Result<Self, StorefrontError> {
        let api = LarekApi::from_config(&config.api)?;
        tracing::info!(base_url = %config.api.base_url, "storefront connected");
        Ok(Self::new(api, config.contact_rules()))
    }
}

impl<S: ProductService> Storefront<S> {
    pub fn new(service: S, rules: ContactRules) -> Self {
        let bus = EventBus::new();
        let store = Rc::new(RefCell::new(Store::new(rules)));
        let handlers = handlers::install(&bus, &store);
        Self {
            bus,
            store,
            service,
            handlers,
        }
    }

    /// The bus views subscribe to.
    pub fn bus(&self) -> &EventBus<AppEvent> {
        &self.bus
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Read-only view of the state.
    pub fn store(&self) -> Ref<'_, Store> {
        self.store.borrow()
    }

    pub fn state(&self) -> CheckoutState {
        self.store.borrow().state()
    }

    /// Emit an intent on the bus.
    pub fn dispatch(&self, event: AppEvent) -> Result<DispatchReport, StorefrontError> {
        Ok(self.bus.emit(event)?)
    }

    /// Fetch the catalog and publish it. Returns the number of items.
    pub async fn load_catalog(&self) -> Result<usize, StorefrontError> {
        let items = match self.service.fetch_catalog().await {
            Ok(items) => items,
            Err(err) => {
                tracing::error!(error = %err, "failed to load catalog");
                return Err(err.into());
            }
        };
        let count = items.len();
        self.dispatch(AppEvent::CatalogLoaded { items })?;
        Ok(count)
    }

    /// Open the preview for a catalog item.
    ///
    /// Only the most recent selection is shown: a response that arrives after
    /// another card was selected is discarded.
    pub async fn select_card(&self, id: ProductId) -> Result<PreviewOutcome, StorefrontError> {
        if !self.store.borrow().catalog().contains(&id) {
            return Err(CommerceError::ProductNotFound(id.to_string()).into());
        }
        self.dispatch(AppEvent::CardSelected { id: id.clone() })?;

        let item = match self.service.fetch_item(&id).await {
            Ok(item) => item,
            Err(err) => {
                tracing::warn!(id = %id, error = %err, "failed to load item details");
                return Err(err.into());
            }
        };

        let outcome = if self.store.borrow().is_current_preview(&id) {
            PreviewOutcome::Shown
        } else {
            PreviewOutcome::Stale
        };
        self.dispatch(AppEvent::PreviewLoaded { item })?;
        Ok(outcome)
    }

    /// Submit the contacts form and send the order.
    ///
    /// This is the only way into `Submitting`, so every submission that is
    /// accepted also sends exactly one request. Fails with `SubmitInFlight`
    /// while a previous order is still being sent; refusals are announced as
    /// `SubmitRefused`. A network failure moves the checkout to `Failed`,
    /// announces it and is returned.
    pub async fn submit_order(&self) -> Result<OrderResult, StorefrontError> {
        let order = handlers::submit_contacts(&self.bus, &self.store)?;

        match self.service.place_order(&order).await {
            Ok(result) => {
                self.dispatch(AppEvent::OrderSucceeded {
                    result: result.clone(),
                })?;
                Ok(result)
            }
            Err(err) => {
                tracing::error!(error = %err, "order request failed");
                self.dispatch(AppEvent::OrderFailed {
                    message: err.to_string(),
                })?;
                Err(err.into())
            }
        }
    }
}

impl<S: ProductService> Drop for Storefront<S> {
    fn drop(&mut self) {
        for id in self.handlers.drain(..) {
            self.bus.unsubscribe(id);
        }
    }
}
