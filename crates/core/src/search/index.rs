//! Token inverted index over the catalog.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use super::tokenize;
use crate::catalog::{category_label, Catalog, Item, ItemId, Rarity};

/// Inverted index from normalized token to the items that contain it.
///
/// Built once from a [`Catalog`] and never mutated. Queries match a word
/// against every key that contains it as a substring, so the cost of a query
/// is linear in the number of distinct tokens.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    postings: BTreeMap<String, BTreeSet<ItemId>>,
}

impl SearchIndex {
    /// Index every item's name and base, plus the set name for set items.
    pub fn build(catalog: &Catalog) -> Self {
        let mut postings: BTreeMap<String, BTreeSet<ItemId>> = BTreeMap::new();

        for item in catalog.items() {
            let mut words = tokenize(&item.name);
            words.extend(tokenize(&item.base));
            if item.rarity == Rarity::Set {
                if let Some(label) = category_label(item.category) {
                    words.extend(tokenize(label));
                }
            }

            for word in words {
                postings.entry(word).or_default().insert(item.id);
            }
        }

        info!(
            items = catalog.len(),
            tokens = postings.len(),
            "Search index built"
        );
        Self { postings }
    }

    /// Number of distinct tokens in the index.
    pub fn token_count(&self) -> usize {
        self.postings.len()
    }

    /// Ids of items matching every word of `query`.
    ///
    /// Each query word matches any index key containing it; words are
    /// combined with AND. A query without words matches nothing.
    pub fn search_ids(&self, query: &str) -> BTreeSet<ItemId> {
        let mut words = tokenize(query).into_iter();
        let Some(first) = words.next() else {
            return BTreeSet::new();
        };

        let mut result = self.substring_hits(&first);
        for word in words {
            if result.is_empty() {
                break;
            }
            let hits = self.substring_hits(&word);
            result.retain(|id| hits.contains(id));
        }

        debug!(query, hits = result.len(), "Search");
        result
    }

    /// Items matching `query`, resolved against `catalog` and ordered by id.
    ///
    /// `catalog` must be the catalog this index was built from.
    pub fn search<'c>(&self, catalog: &'c Catalog, query: &str) -> Vec<&'c Item> {
        self.search_ids(query)
            .into_iter()
            .filter_map(|id| catalog.get(id))
            .collect()
    }

    fn substring_hits(&self, word: &str) -> BTreeSet<ItemId> {
        self.postings
            .iter()
            .filter(|(key, _)| key.contains(word))
            .flat_map(|(_, ids)| ids.iter().copied())
            .collect()
    }
}
