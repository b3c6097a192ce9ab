//! Application state: catalog, basket, order draft and checkout lifecycle.
//!
//! The store is owned by the state core and mutated only from bus handlers.
//! Its methods never emit; callers decide what to announce.

use crate::views::{BasketView, CardView, FailureView, FormView, PreviewView, SuccessView};
use larek_commerce::catalog::{Catalog, CatalogItem};
use larek_commerce::checkout::{
    validate_contacts, validate_delivery, CheckoutLifecycle, CheckoutState, CheckoutTrigger,
    ContactRules, FieldErrors, FormPhase, OrderDraft, OrderField, OrderRequest, OrderResult,
};
use larek_commerce::{CommerceError, ProductId, Synapses};

/// Result of delivering fetched item details to the preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewOutcome {
    /// The item was the latest request and is now displayed.
    Shown,
    /// A newer request superseded this one; the record was discarded.
    Stale,
}

/// A lifecycle move, `from` and `to` equal when the state did not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: CheckoutState,
    pub to: CheckoutState,
}

impl Transition {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// The storefront state.
#[derive(Debug, Default)]
pub struct Store {
    catalog: Catalog,
    draft: OrderDraft,
    lifecycle: CheckoutLifecycle,
    delivery_errors: FieldErrors,
    contact_errors: FieldErrors,
    rules: ContactRules,
    /// Most recently requested preview id.
    preview_token: Option<ProductId>,
    preview: Option<CatalogItem>,
    page_locked: bool,
}

impl Store {
    pub fn new(rules: ContactRules) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn draft(&self) -> &OrderDraft {
        &self.draft
    }

    pub fn state(&self) -> CheckoutState {
        self.lifecycle.state()
    }

    pub fn lifecycle(&self) -> &CheckoutLifecycle {
        &self.lifecycle
    }

    pub fn contact_rules(&self) -> ContactRules {
        self.rules
    }

    pub fn is_page_locked(&self) -> bool {
        self.page_locked
    }

    pub fn delivery_errors(&self) -> &FieldErrors {
        &self.delivery_errors
    }

    pub fn contact_errors(&self) -> &FieldErrors {
        &self.contact_errors
    }

    // Catalog and basket

    /// Replace the catalog wholesale.
    ///
    /// Basket ids missing from the new catalog are dropped and returned.
    pub fn set_catalog(&mut self, items: Vec<CatalogItem>) -> Vec<ProductId> {
        self.catalog = Catalog::new(items);
        let catalog = &self.catalog;
        let dropped = self.draft.items.retain(|id| catalog.contains(id));
        if !dropped.is_empty() {
            tracing::warn!(dropped = dropped.len(), "basket items no longer in catalog");
        }
        if let Some(item) = &self.preview {
            if !self.catalog.contains(&item.id) {
                self.preview = None;
                self.preview_token = None;
            }
        }
        dropped
    }

    /// Put an item in the basket. Returns false if it was already there.
    pub fn add_to_order(&mut self, id: &ProductId) -> Result<bool, CommerceError> {
        if !self.catalog.contains(id) {
            return Err(CommerceError::ProductNotFound(id.to_string()));
        }
        Ok(self.draft.items.add(id.clone()))
    }

    /// Take an item out of the basket. Returns false if it was not there.
    pub fn remove_from_order(&mut self, id: &ProductId) -> bool {
        self.draft.items.remove(id)
    }

    /// Empty the basket. Delivery and contact fields are kept.
    pub fn clear_order(&mut self) {
        self.draft.clear_items();
    }

    pub fn in_basket(&self, id: &ProductId) -> bool {
        self.draft.items.contains(id)
    }

    /// Check if the basket holds anything that can be bought.
    pub fn has_purchasable(&self) -> bool {
        self.draft
            .items
            .ids()
            .iter()
            .any(|id| self.catalog.get(id).is_some_and(|item| !item.is_priceless()))
    }

    /// Sum of the priced basket items.
    pub fn total(&self) -> Result<Synapses, CommerceError> {
        self.draft.total(&self.catalog)
    }

    /// Basket items in catalog order, for display.
    pub fn active_items(&self) -> Vec<&CatalogItem> {
        self.draft.items.active_items(&self.catalog)
    }

    // Order form

    /// Write a field and re-run the validation of its form.
    pub fn set_field(&mut self, field: OrderField, value: impl Into<String>) -> FormPhase {
        self.draft.set_field(field, value);
        let phase = field.phase();
        self.refresh_errors(phase);
        phase
    }

    /// Re-run the validation of one form and store the result.
    pub fn refresh_errors(&mut self, phase: FormPhase) -> &FieldErrors {
        match phase {
            FormPhase::Delivery => {
                self.delivery_errors = self.validate_delivery();
                &self.delivery_errors
            }
            FormPhase::Contacts => {
                self.contact_errors = self.validate_contacts();
                &self.contact_errors
            }
        }
    }

    pub fn validate_delivery(&self) -> FieldErrors {
        validate_delivery(&self.draft)
    }

    pub fn validate_contacts(&self) -> FieldErrors {
        validate_contacts(&self.draft, self.rules)
    }

    // Lifecycle

    /// Apply a trigger to the lifecycle.
    pub fn transition(&mut self, trigger: CheckoutTrigger) -> Result<Transition, CommerceError> {
        let from = self.lifecycle.state();
        let to = self.lifecycle.apply(trigger)?;
        if from != to {
            tracing::debug!(%from, %to, trigger = trigger.as_str(), "checkout transition");
        }
        Ok(Transition { from, to })
    }

    /// Open the delivery form. The basket needs at least one priced item.
    pub fn open_delivery(&mut self) -> Result<Transition, CommerceError> {
        if !self.has_purchasable() {
            return Err(CommerceError::CheckoutIncomplete("purchasable items".to_string()));
        }
        let valid = self.refresh_errors(FormPhase::Delivery).is_valid();
        self.transition(CheckoutTrigger::OpenDelivery { valid })
    }

    /// Move from the delivery form to the contacts form.
    pub fn submit_delivery(&mut self) -> Result<Transition, CommerceError> {
        let contacts_valid = self.refresh_errors(FormPhase::Contacts).is_valid();
        self.transition(CheckoutTrigger::SubmitDelivery { contacts_valid })
    }

    /// Enter `Submitting` and build the order to send.
    ///
    /// A second call while the first order is in flight is rejected with
    /// `SubmitInFlight`. On any error the state is unchanged.
    pub fn begin_submission(&mut self) -> Result<OrderRequest, CommerceError> {
        self.lifecycle.next(CheckoutTrigger::SubmitContacts)?;

        if let Some((field, _)) = self.validate_delivery().iter().next() {
            return Err(CommerceError::CheckoutIncomplete(field.to_string()));
        }
        let order = OrderRequest::from_draft(&self.draft, &self.catalog)?;
        self.transition(CheckoutTrigger::SubmitContacts)?;
        Ok(order)
    }

    /// The order was accepted: the basket is emptied.
    pub fn complete_order(&mut self) -> Result<Transition, CommerceError> {
        let transition = self.transition(CheckoutTrigger::OrderSucceeded)?;
        self.clear_order();
        Ok(transition)
    }

    /// The order request failed: keep the reason for the failure view.
    pub fn fail_order(&mut self, reason: &str) -> Result<Transition, CommerceError> {
        let transition = self.transition(CheckoutTrigger::OrderFailed)?;
        self.lifecycle.set_failure(reason);
        Ok(transition)
    }

    /// Leave `Failed` for the contacts form.
    pub fn retry(&mut self) -> Result<Transition, CommerceError> {
        let contacts_valid = self.refresh_errors(FormPhase::Contacts).is_valid();
        self.transition(CheckoutTrigger::Retry { contacts_valid })
    }

    /// Abandon the checkout. A no-op while browsing.
    pub fn cancel(&mut self) -> Result<Transition, CommerceError> {
        if self.state() == CheckoutState::Browsing {
            return Ok(Transition {
                from: CheckoutState::Browsing,
                to: CheckoutState::Browsing,
            });
        }
        self.transition(CheckoutTrigger::Cancel)
    }

    // Preview

    /// Record `id` as the latest preview request.
    pub fn request_preview(&mut self, id: &ProductId) -> Result<(), CommerceError> {
        if !self.catalog.contains(id) {
            return Err(CommerceError::ProductNotFound(id.to_string()));
        }
        self.preview_token = Some(id.clone());
        Ok(())
    }

    pub fn is_current_preview(&self, id: &ProductId) -> bool {
        self.preview_token.as_ref() == Some(id)
    }

    /// Show fetched details unless a newer request superseded them.
    pub fn resolve_preview(&mut self, item: CatalogItem) -> PreviewOutcome {
        if !self.is_current_preview(&item.id) {
            tracing::debug!(id = %item.id, "discarding stale preview");
            return PreviewOutcome::Stale;
        }
        self.preview = Some(item);
        PreviewOutcome::Shown
    }

    /// Forget the preview and any request still in flight.
    pub fn close_preview(&mut self) {
        self.preview = None;
        self.preview_token = None;
    }

    pub fn preview(&self) -> Option<&CatalogItem> {
        self.preview.as_ref()
    }

    pub fn set_page_locked(&mut self, locked: bool) -> bool {
        let changed = self.page_locked != locked;
        self.page_locked = locked;
        changed
    }

    // Views

    pub fn card_views(&self) -> Vec<CardView> {
        self.catalog.iter().map(CardView::from_item).collect()
    }

    /// Basket rows follow insertion order, the order sent with the request.
    pub fn basket_view(&self) -> Result<BasketView, CommerceError> {
        let items = self
            .draft
            .items
            .ids()
            .iter()
            .filter_map(|id| self.catalog.get(id));
        Ok(BasketView::new(items, self.total()?))
    }

    pub fn preview_view(&self) -> Option<PreviewView> {
        self.preview
            .as_ref()
            .map(|item| PreviewView::new(item, self.in_basket(&item.id)))
    }

    pub fn delivery_view(&self) -> FormView {
        FormView::new(FormPhase::Delivery, &self.delivery_errors, self.draft.payment)
    }

    pub fn contacts_view(&self) -> FormView {
        FormView::new(FormPhase::Contacts, &self.contact_errors, self.draft.payment)
    }

    pub fn success_view(&self, result: &OrderResult) -> SuccessView {
        SuccessView::new(result.id.clone(), result.charged())
    }

    pub fn failure_view(&self) -> FailureView {
        FailureView {
            message: self
                .lifecycle
                .failure()
                .unwrap_or("Order failed")
                .to_string(),
            can_retry: self.state() == CheckoutState::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larek_commerce::catalog::Category;
    use larek_commerce::checkout::{Payment, ADDRESS_REQUIRED};
    use larek_commerce::OrderId;

    fn item(id: &str, price: Option<i64>) -> CatalogItem {
        CatalogItem::new(id, format!("Item {}", id), Category::Other, price)
    }

    fn store_with(items: Vec<CatalogItem>) -> Store {
        let mut store = Store::new(ContactRules::lenient());
        store.set_catalog(items);
        store
    }

    fn id(s: &str) -> ProductId {
        ProductId::new(s)
    }

    fn ready_to_submit() -> Store {
        let mut store = store_with(vec![item("a", Some(100)), item("b", Some(250))]);
        store.add_to_order(&id("a")).unwrap();
        store.add_to_order(&id("b")).unwrap();
        store.open_delivery().unwrap();
        store.set_field(OrderField::Address, "Moscow");
        store.set_field(OrderField::Payment, "online");
        store.transition(CheckoutTrigger::DeliveryEdited { valid: true }).unwrap();
        store.submit_delivery().unwrap();
        store.set_field(OrderField::Phone, "+71234567890");
        store.set_field(OrderField::Email, "buyer@example.com");
        store.transition(CheckoutTrigger::ContactsEdited { valid: true }).unwrap();
        store
    }

    #[test]
    fn test_priceless_items_stay_out_of_total() {
        let mut store = store_with(vec![item("a", Some(100)), item("b", None)]);
        store.add_to_order(&id("a")).unwrap();
        store.add_to_order(&id("b")).unwrap();

        assert_eq!(store.total().unwrap(), Synapses::new(100));
        assert_eq!(store.draft().items.ids(), &[id("a"), id("b")]);
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut store = store_with(vec![item("a", Some(100))]);
        assert!(store.add_to_order(&id("a")).unwrap());
        assert!(!store.add_to_order(&id("a")).unwrap());
        assert_eq!(store.draft().items.len(), 1);
    }

    #[test]
    fn test_add_unknown_id_rejected() {
        let mut store = store_with(vec![item("a", Some(100))]);
        let result = store.add_to_order(&id("zzz"));
        assert!(matches!(result, Err(CommerceError::ProductNotFound(_))));
        assert!(store.draft().items.is_empty());
    }

    #[test]
    fn test_readd_moves_to_end() {
        let mut store = store_with(vec![item("a", Some(1)), item("b", Some(2))]);
        store.add_to_order(&id("a")).unwrap();
        store.add_to_order(&id("b")).unwrap();
        assert!(store.remove_from_order(&id("a")));
        store.add_to_order(&id("a")).unwrap();

        assert_eq!(store.draft().items.ids(), &[id("b"), id("a")]);
        assert!(!store.remove_from_order(&id("zzz")));
    }

    #[test]
    fn test_active_items_follow_catalog_order() {
        let mut store = store_with(vec![item("a", Some(1)), item("b", Some(2))]);
        store.add_to_order(&id("b")).unwrap();
        store.add_to_order(&id("a")).unwrap();

        let active: Vec<&str> = store.active_items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(active, vec!["a", "b"]);

        let view = store.basket_view().unwrap();
        assert_eq!(view.lines[0].id, id("b"));
    }

    #[test]
    fn test_set_catalog_prunes_basket() {
        let mut store = store_with(vec![item("a", Some(1)), item("b", Some(2))]);
        store.add_to_order(&id("a")).unwrap();
        store.add_to_order(&id("b")).unwrap();

        let dropped = store.set_catalog(vec![item("b", Some(2))]);
        assert_eq!(dropped, vec![id("a")]);
        assert_eq!(store.draft().items.ids(), &[id("b")]);

        // Replacing with the same catalog again changes nothing.
        assert!(store.set_catalog(vec![item("b", Some(2))]).is_empty());
    }

    #[test]
    fn test_set_field_validates() {
        let mut store = store_with(vec![]);
        let phase = store.set_field(OrderField::Address, "");
        assert_eq!(phase, FormPhase::Delivery);
        assert_eq!(
            store.delivery_errors().get(OrderField::Address),
            Some(ADDRESS_REQUIRED)
        );
        assert!(!store.delivery_errors().is_valid());
        assert!(store.contact_errors().is_empty());
    }

    #[test]
    fn test_clear_order_keeps_fields() {
        let mut store = ready_to_submit();
        store.clear_order();

        assert!(store.draft().items.is_empty());
        assert_eq!(store.draft().address, "Moscow");
        assert_eq!(store.draft().payment, Some(Payment::Online));
        assert_eq!(store.draft().email, "buyer@example.com");
    }

    #[test]
    fn test_open_delivery_needs_items() {
        let mut store = store_with(vec![item("a", Some(1))]);
        assert!(matches!(
            store.open_delivery(),
            Err(CommerceError::CheckoutIncomplete(_))
        ));
        assert_eq!(store.state(), CheckoutState::Browsing);
    }

    #[test]
    fn test_priceless_only_basket_cannot_check_out() {
        let mut store = store_with(vec![item("a", Some(100)), item("b", None)]);
        store.add_to_order(&id("b")).unwrap();
        assert!(!store.has_purchasable());
        assert!(!store.basket_view().unwrap().checkout_enabled);
        assert_eq!(
            store.open_delivery(),
            Err(CommerceError::CheckoutIncomplete("purchasable items".to_string()))
        );
        assert_eq!(store.state(), CheckoutState::Browsing);

        store.add_to_order(&id("a")).unwrap();
        assert!(store.basket_view().unwrap().checkout_enabled);
        assert_eq!(store.open_delivery().unwrap().to, CheckoutState::DeliveryOpen);
    }

    #[test]
    fn test_submission_rejects_second_submit() {
        let mut store = ready_to_submit();
        assert_eq!(store.state(), CheckoutState::ContactsValid);

        let order = store.begin_submission().unwrap();
        assert_eq!(order.total, 350);
        assert_eq!(order.items, vec![id("a"), id("b")]);
        assert_eq!(store.state(), CheckoutState::Submitting);

        assert_eq!(
            store.begin_submission(),
            Err(CommerceError::SubmitInFlight)
        );
    }

    #[test]
    fn test_submission_revalidates_delivery() {
        let mut store = ready_to_submit();
        store.set_field(OrderField::Address, "  ");

        let result = store.begin_submission();
        assert!(matches!(result, Err(CommerceError::CheckoutIncomplete(_))));
        assert_eq!(store.state(), CheckoutState::ContactsValid);
    }

    #[test]
    fn test_failure_then_retry() {
        let mut store = ready_to_submit();
        store.begin_submission().unwrap();

        store.fail_order("Service unavailable").unwrap();
        assert_eq!(store.state(), CheckoutState::Failed);
        let view = store.failure_view();
        assert_eq!(view.message, "Service unavailable");
        assert!(view.can_retry);

        let t = store.retry().unwrap();
        assert_eq!(t.to, CheckoutState::ContactsValid);
        assert!(store.lifecycle().failure().is_none());
    }

    #[test]
    fn test_success_clears_basket_only() {
        let mut store = ready_to_submit();
        store.begin_submission().unwrap();

        store.complete_order().unwrap();
        assert_eq!(store.state(), CheckoutState::Success);
        assert!(store.draft().items.is_empty());
        assert_eq!(store.draft().address, "Moscow");

        let result = OrderResult {
            id: OrderId::new("o-1"),
            total: 350,
        };
        assert_eq!(store.success_view(&result).description, "Charged 350 synapses");

        store.transition(CheckoutTrigger::Acknowledge).unwrap();
        assert_eq!(store.state(), CheckoutState::Browsing);
    }

    #[test]
    fn test_cancel_from_browsing_is_noop() {
        let mut store = store_with(vec![]);
        let t = store.cancel().unwrap();
        assert!(!t.changed());
    }

    #[test]
    fn test_stale_preview_discarded() {
        let mut store = store_with(vec![item("a", Some(1)), item("b", Some(2))]);
        store.request_preview(&id("a")).unwrap();
        store.request_preview(&id("b")).unwrap();

        assert_eq!(store.resolve_preview(item("b", Some(2))), PreviewOutcome::Shown);
        assert_eq!(store.resolve_preview(item("a", Some(1))), PreviewOutcome::Stale);
        assert_eq!(store.preview().map(|i| i.id.as_str()), Some("b"));
    }

    #[test]
    fn test_closed_preview_ignores_late_response() {
        let mut store = store_with(vec![item("a", Some(1))]);
        store.request_preview(&id("a")).unwrap();
        store.close_preview();

        assert_eq!(store.resolve_preview(item("a", Some(1))), PreviewOutcome::Stale);
        assert!(store.preview_view().is_none());
    }

    #[test]
    fn test_preview_view_tracks_basket() {
        let mut store = store_with(vec![item("a", Some(1))]);
        store.request_preview(&id("a")).unwrap();
        store.resolve_preview(item("a", Some(1)));
        assert!(!store.preview_view().unwrap().in_basket);

        store.add_to_order(&id("a")).unwrap();
        assert!(store.preview_view().unwrap().in_basket);
    }
}
