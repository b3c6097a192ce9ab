//! Order payloads exchanged with the product service.

use crate::catalog::Catalog;
use crate::checkout::{OrderDraft, Payment};
use crate::error::CommerceError;
use crate::ids::{OrderId, ProductId};
use crate::money::Synapses;
use serde::{Deserialize, Serialize};

/// Body of `POST /order`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderRequest {
    /// Payment method.
    pub payment: Payment,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Delivery address.
    pub address: String,
    /// Expected total, recomputed from the catalog.
    pub total: i64,
    /// Purchased item ids in basket order.
    pub items: Vec<ProductId>,
}

impl OrderRequest {
    /// Build the request from a draft.
    ///
    /// Item order follows the basket. Priceless and unknown ids are left out,
    /// so `total` always equals the sum of the listed items.
    pub fn from_draft(draft: &OrderDraft, catalog: &Catalog) -> Result<Self, CommerceError> {
        let payment = draft
            .payment
            .ok_or_else(|| CommerceError::CheckoutIncomplete("payment method".to_string()))?;

        let items: Vec<ProductId> = draft
            .items
            .ids()
            .iter()
            .filter(|id| catalog.price_of(id).is_some())
            .cloned()
            .collect();
        if items.is_empty() {
            return Err(CommerceError::CheckoutIncomplete(
                "purchasable items".to_string(),
            ));
        }

        let total = draft.total(catalog)?;

        Ok(Self {
            payment,
            email: draft.email.trim().to_string(),
            phone: draft.phone.trim().to_string(),
            address: draft.address.trim().to_string(),
            total: total.amount(),
            items,
        })
    }
}

/// Response of `POST /order`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderResult {
    /// Order id assigned by the service.
    pub id: OrderId,
    /// Amount charged.
    pub total: i64,
}

impl OrderResult {
    /// Amount charged.
    pub fn charged(&self) -> Synapses {
        Synapses::new(self.total)
    }
}
