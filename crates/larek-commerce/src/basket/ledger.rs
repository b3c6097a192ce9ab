//! Basket ledger.

use crate::catalog::{Catalog, CatalogItem};
use crate::ids::ProductId;
use crate::money::Synapses;
use serde::{Deserialize, Serialize};

/// Insertion-ordered set of selected item ids.
///
/// An id appears at most once. Removing an id and adding it again puts it
/// at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BasketLedger {
    ids: Vec<ProductId>,
}

impl BasketLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an id. Returns false if it was already present.
    pub fn add(&mut self, id: ProductId) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Remove an id. Returns false if it was not present.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let len_before = self.ids.len();
        self.ids.retain(|i| i != id);
        self.ids.len() < len_before
    }

    /// Drop every id the predicate rejects. Returns the dropped ids.
    pub fn retain(&mut self, mut keep: impl FnMut(&ProductId) -> bool) -> Vec<ProductId> {
        let mut dropped = Vec::new();
        self.ids.retain(|id| {
            if keep(id) {
                true
            } else {
                dropped.push(id.clone());
                false
            }
        });
        dropped
    }

    /// Remove all ids.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Check if an id is present.
    pub fn contains(&self, id: &ProductId) -> bool {
        self.ids.iter().any(|i| i == id)
    }

    /// Ids in insertion order.
    pub fn ids(&self) -> &[ProductId] {
        &self.ids
    }

    /// Number of ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if the ledger is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Sum of prices of the ids that resolve to a priced catalog item.
    ///
    /// Unknown ids and priceless items contribute nothing.
    pub fn total(&self, catalog: &Catalog) -> Option<Synapses> {
        Synapses::try_sum(
            self.ids
                .iter()
                .filter_map(|id| catalog.price_of(id))
                .map(Synapses::new),
        )
    }

    /// Selected catalog items in catalog order.
    pub fn active_items<'a>(&self, catalog: &'a Catalog) -> Vec<&'a CatalogItem> {
        catalog.iter().filter(|item| self.contains(&item.id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;
    use proptest::prelude::*;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            CatalogItem::new("a", "A", Category::SoftSkill, Some(100)),
            CatalogItem::new("b", "B", Category::Other, None),
            CatalogItem::new("c", "C", Category::HardSkill, Some(40)),
        ])
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut ledger = BasketLedger::new();
        assert!(ledger.add("a".into()));
        assert!(!ledger.add("a".into()));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut ledger = BasketLedger::new();
        ledger.add("a".into());
        assert!(!ledger.remove(&"zzz".into()));
        assert_eq!(ledger.ids(), &[ProductId::new("a")]);
    }

    #[test]
    fn test_remove_then_add_moves_to_end() {
        let mut ledger = BasketLedger::new();
        ledger.add("a".into());
        ledger.add("b".into());
        ledger.add("c".into());

        ledger.remove(&"a".into());
        ledger.add("a".into());

        let ids: Vec<&str> = ledger.ids().iter().map(|i| i.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_total_skips_priceless_and_unknown() {
        let mut ledger = BasketLedger::new();
        ledger.add("a".into());
        ledger.add("b".into());
        ledger.add("ghost".into());
        assert_eq!(ledger.total(&catalog()), Some(Synapses::new(100)));
    }

    #[test]
    fn test_active_items_follow_catalog_order() {
        let catalog = catalog();
        let mut ledger = BasketLedger::new();
        ledger.add("c".into());
        ledger.add("a".into());

        let active: Vec<&str> = ledger
            .active_items(&catalog)
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(active, vec!["a", "c"]);
    }

    #[test]
    fn test_retain_reports_dropped() {
        let mut ledger = BasketLedger::new();
        ledger.add("a".into());
        ledger.add("ghost".into());

        let catalog = catalog();
        let dropped = ledger.retain(|id| catalog.contains(id));
        assert_eq!(dropped, vec![ProductId::new("ghost")]);
        assert_eq!(ledger.len(), 1);
    }

    proptest! {
        #[test]
        fn prop_adds_never_duplicate(ids in prop::collection::vec("[a-e]", 0..40)) {
            let mut ledger = BasketLedger::new();
            for id in &ids {
                ledger.add(ProductId::new(id.clone()));
            }
            let mut seen = std::collections::HashSet::new();
            for id in ledger.ids() {
                prop_assert!(seen.insert(id.clone()));
            }
        }

        #[test]
        fn prop_total_matches_priced_subset(
            prices in prop::collection::vec(prop::option::of(0i64..10_000), 1..12),
            picks in prop::collection::vec(any::<prop::sample::Index>(), 0..20),
        ) {
            let items: Vec<CatalogItem> = prices
                .iter()
                .enumerate()
                .map(|(i, price)| {
                    CatalogItem::new(format!("id-{}", i), "item", Category::Other, *price)
                })
                .collect();
            let catalog = Catalog::new(items);

            let mut ledger = BasketLedger::new();
            let mut expected = 0i64;
            for pick in picks {
                let i = pick.index(prices.len());
                if ledger.add(ProductId::new(format!("id-{}", i))) {
                    expected += prices[i].unwrap_or(0);
                }
            }
            // ids outside the catalog never count
            ledger.add(ProductId::new("not-in-catalog"));

            prop_assert_eq!(ledger.total(&catalog), Some(Synapses::new(expected)));
        }
    }
}
