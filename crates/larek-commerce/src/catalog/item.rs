//! Catalog item type.

use crate::catalog::Category;
use crate::ids::ProductId;
use crate::money::price_label;
use serde::{Deserialize, Serialize};

/// A purchasable record from the product service.
///
/// `price: None` marks a priceless item: it is never charged and never part
/// of an order total.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogItem {
    /// Unique item identifier.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Long description.
    #[serde(default)]
    pub description: String,
    /// Full image URL.
    #[serde(default)]
    pub image: String,
    /// Item category.
    pub category: Category,
    /// Price in synapses.
    pub price: Option<i64>,
}

impl CatalogItem {
    /// Create an item without description or image.
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        category: Category,
        price: Option<i64>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            image: String::new(),
            category,
            price,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the image URL.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Check if the item has no price.
    pub fn is_priceless(&self) -> bool {
        self.price.is_none()
    }

    /// Price as shown on cards: "750 synapses" or "Priceless".
    pub fn price_label(&self) -> String {
        price_label(self.price)
    }
}
