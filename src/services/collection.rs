use std::collections::HashSet;

use crate::models::CatalogItem;

/// Ordered working set of catalog items with unique ids
#[derive(Debug, Clone, Default)]
pub struct CatalogCollection {
    items: Vec<CatalogItem>,
    ids: HashSet<u64>,
    seed_ids: HashSet<u64>,
}

impl CatalogCollection {
    /// Seeds first in the given order, then candidates; the first item seen
    /// with a given id wins.
    pub fn assemble(seeds: Vec<CatalogItem>, candidates: Vec<CatalogItem>) -> Self {
        let mut collection = Self::default();

        for seed in seeds {
            let id = seed.id;
            if collection.push(seed) {
                collection.seed_ids.insert(id);
            }
        }

        let mut duplicates = 0;
        for candidate in candidates {
            if !collection.push(candidate) {
                duplicates += 1;
            }
        }

        if duplicates > 0 {
            tracing::debug!(duplicates, "Dropped duplicate candidates");
        }

        collection
    }

    /// Appends `item` unless its id is already present
    pub fn push(&mut self, item: CatalogItem) -> bool {
        if !self.ids.insert(item.id) {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Ids of the user's own titles, never recommended back
    pub fn seed_ids(&self) -> &HashSet<u64> {
        &self.seed_ids
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
