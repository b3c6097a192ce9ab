//! Catalog module.
//!
//! Contains the purchasable items fetched from the product service and the
//! id-indexed catalog that holds them.

mod category;
mod item;

pub use category::Category;
pub use item::CatalogItem;

use crate::ids::ProductId;
use std::collections::HashMap;

/// The list of purchasable items, in the order the product service sent them.
///
/// Lookups by id go through an index instead of scanning the list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    items: Vec<CatalogItem>,
    index: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Build a catalog. Later duplicates of an id are dropped.
    pub fn new(items: Vec<CatalogItem>) -> Self {
        let mut index = HashMap::with_capacity(items.len());
        let mut unique = Vec::with_capacity(items.len());
        for item in items {
            if index.contains_key(&item.id) {
                continue;
            }
            index.insert(item.id.clone(), unique.len());
            unique.push(item);
        }
        Self {
            items: unique,
            index,
        }
    }

    /// Get an item by id.
    pub fn get(&self, id: &ProductId) -> Option<&CatalogItem> {
        self.index.get(id).map(|&pos| &self.items[pos])
    }

    /// Check if an id is in the catalog.
    pub fn contains(&self, id: &ProductId) -> bool {
        self.index.contains_key(id)
    }

    /// Price of an item, `None` if the id is unknown or the item is priceless.
    pub fn price_of(&self, id: &ProductId) -> Option<i64> {
        self.get(id).and_then(|item| item.price)
    }

    /// Items in catalog order.
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Iterate over items in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogItem> {
        self.items.iter()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
