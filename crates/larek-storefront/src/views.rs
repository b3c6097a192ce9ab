//! View models handed to rendering subscribers.

use larek_commerce::catalog::CatalogItem;
use larek_commerce::checkout::{FieldErrors, FormPhase, Payment};
use larek_commerce::{OrderId, ProductId, Synapses};
use serde::Serialize;

/// Buy button label for an item outside the basket.
pub const BUY_LABEL: &str = "Add to basket";

/// Buy button label for an item already in the basket.
pub const REMOVE_LABEL: &str = "Remove";

/// A catalog card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub id: ProductId,
    pub title: String,
    pub category: String,
    /// CSS modifier for the category badge.
    pub category_class: String,
    pub image: String,
    pub price: String,
}

impl CardView {
    pub fn from_item(item: &CatalogItem) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            category: item.category.as_str().to_string(),
            category_class: item.category.css_modifier().to_string(),
            image: item.image.clone(),
            price: item.price_label(),
        }
    }
}

/// The item preview modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewView {
    pub card: CardView,
    pub description: String,
    pub in_basket: bool,
    pub button_label: String,
    /// Priceless items cannot be bought; once in the basket they can still
    /// be removed.
    pub button_disabled: bool,
}

impl PreviewView {
    pub fn new(item: &CatalogItem, in_basket: bool) -> Self {
        let label = if in_basket { REMOVE_LABEL } else { BUY_LABEL };
        Self {
            card: CardView::from_item(item),
            description: item.description.clone(),
            in_basket,
            button_label: label.to_string(),
            button_disabled: item.is_priceless() && !in_basket,
        }
    }
}

/// One basket row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BasketLine {
    /// 1-based position.
    pub index: usize,
    pub id: ProductId,
    pub title: String,
    pub price: String,
}

/// The basket modal plus the header counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BasketView {
    pub lines: Vec<BasketLine>,
    pub total: String,
    pub counter: usize,
    /// At least one line has a price.
    pub checkout_enabled: bool,
}

impl BasketView {
    /// Build from the basket items in insertion order.
    pub fn new<'a>(items: impl IntoIterator<Item = &'a CatalogItem>, total: Synapses) -> Self {
        let mut purchasable = false;
        let lines: Vec<BasketLine> = items
            .into_iter()
            .inspect(|item| purchasable |= !item.is_priceless())
            .enumerate()
            .map(|(i, item)| BasketLine {
                index: i + 1,
                id: item.id.clone(),
                title: item.title.clone(),
                price: item.price_label(),
            })
            .collect();
        let counter = lines.len();
        Self {
            lines,
            total: total.display(),
            counter,
            checkout_enabled: purchasable,
        }
    }
}

/// Delivery or contacts form state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    pub phase: FormPhase,
    pub valid: bool,
    /// All messages joined with "; ".
    pub errors: String,
    /// Selected payment, for highlighting its button.
    pub payment: Option<Payment>,
}

impl FormView {
    pub fn new(phase: FormPhase, errors: &FieldErrors, payment: Option<Payment>) -> Self {
        Self {
            phase,
            valid: errors.is_valid(),
            errors: errors.joined(),
            payment,
        }
    }
}

/// Shown after the order is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuccessView {
    pub order_id: OrderId,
    pub description: String,
}

impl SuccessView {
    pub fn new(order_id: OrderId, charged: Synapses) -> Self {
        Self {
            order_id,
            description: format!("Charged {}", charged.display()),
        }
    }
}

/// Shown when the order request failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureView {
    pub message: String,
    pub can_retry: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use larek_commerce::catalog::Category;
    use larek_commerce::checkout::OrderField;

    fn item(id: &str, price: Option<i64>) -> CatalogItem {
        CatalogItem::new(id, format!("Item {}", id), Category::SoftSkill, price)
    }

    #[test]
    fn test_card_view() {
        let card = CardView::from_item(&item("a", Some(1500)));
        assert_eq!(card.price, "1,500 synapses");
        assert_eq!(card.category, "софт-скил");
        assert_eq!(card.category_class, "card__category_soft");
    }

    #[test]
    fn test_preview_button() {
        let priced = item("a", Some(100));
        assert_eq!(PreviewView::new(&priced, false).button_label, BUY_LABEL);
        assert_eq!(PreviewView::new(&priced, true).button_label, REMOVE_LABEL);
        assert!(!PreviewView::new(&priced, false).button_disabled);

        let priceless = item("b", None);
        assert!(PreviewView::new(&priceless, false).button_disabled);
        assert!(!PreviewView::new(&priceless, true).button_disabled);
        assert_eq!(PreviewView::new(&priceless, false).card.price, "Priceless");
    }

    #[test]
    fn test_basket_view_numbers_lines() {
        let a = item("a", Some(100));
        let b = item("b", None);
        let view = BasketView::new([&a, &b], Synapses::new(100));

        assert_eq!(view.counter, 2);
        assert_eq!(view.lines[0].index, 1);
        assert_eq!(view.lines[1].index, 2);
        assert_eq!(view.lines[1].price, "Priceless");
        assert_eq!(view.total, "100 synapses");
        assert!(view.checkout_enabled);
    }

    #[test]
    fn test_empty_basket_cannot_check_out() {
        let view = BasketView::new(Vec::<&CatalogItem>::new(), Synapses::zero());
        assert_eq!(view.counter, 0);
        assert!(!view.checkout_enabled);
        assert_eq!(view.total, "0 synapses");
    }

    #[test]
    fn test_priceless_only_basket_cannot_check_out() {
        let b = item("b", None);
        let view = BasketView::new([&b], Synapses::zero());
        assert_eq!(view.counter, 1);
        assert!(!view.checkout_enabled);
    }

    #[test]
    fn test_form_view_joins_errors() {
        let mut errors = FieldErrors::new();
        errors.insert(OrderField::Address, "Delivery address is required");
        errors.insert(OrderField::Payment, "Choose a payment method");

        let view = FormView::new(FormPhase::Delivery, &errors, None);
        assert!(!view.valid);
        assert_eq!(
            view.errors,
            "Delivery address is required; Choose a payment method"
        );
    }

    #[test]
    fn test_success_view() {
        let view = SuccessView::new("order-1".into(), Synapses::new(2500));
        assert_eq!(view.description, "Charged 2,500 synapses");
    }
}
