//! Application context - the single entry point for the UI layer.
//!
//! Owns the catalog, its search index and the found store. Built once at
//! startup and handed to the UI by reference.

use thiserror::Error;
use tracing::{info, warn};

use crate::catalog::{Catalog, CatalogError, Item, ItemId};
use crate::config::{validate_config, Config, ConfigError};
use crate::found::{FoundStore, LogFoundStore, StoreError};
use crate::search::SearchIndex;
use crate::summary::CollectionCounts;

/// Errors surfaced to the UI layer.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog could not be loaded.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Found store error.
    #[error("found store error: {0}")]
    Store(#[from] StoreError),

    /// Id outside the catalog.
    #[error("unknown item id {0}")]
    UnknownItem(ItemId),
}

/// Catalog, index and found-state wired together.
pub struct AppContext {
    catalog: Catalog,
    index: SearchIndex,
    store: Box<dyn FoundStore>,
    max_results: usize,
}

impl AppContext {
    /// Wire a loaded catalog to a found store, building the search index.
    pub fn new(catalog: Catalog, store: Box<dyn FoundStore>) -> Self {
        let index = SearchIndex::build(&catalog);
        Self {
            catalog,
            index,
            store,
            max_results: 0,
        }
    }

    /// Cap the number of search results, 0 = unlimited.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Validate `config`, load the catalog and open the found log.
    pub fn from_config(config: &Config) -> Result<Self, TrackerError> {
        validate_config(config)?;
        let catalog = Catalog::load(&config.catalog.path)?;
        let store = LogFoundStore::open(&config.store)?;

        let stale: Vec<ItemId> = store
            .found_ids()
            .into_iter()
            .filter(|&id| !catalog.contains(id))
            .collect();
        if !stale.is_empty() {
            warn!(
                count = stale.len(),
                ids = ?stale,
                "Found log references items missing from the catalog"
            );
        }

        let context =
            Self::new(catalog, Box::new(store)).with_max_results(config.search.max_results);
        info!(
            items = context.catalog.len(),
            found = context.store.found_count(),
            "Tracker ready"
        );
        Ok(context)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// All items in id order.
    pub fn get_all_items(&self) -> &[Item] {
        self.catalog.items()
    }

    /// Items matching every word of `query`, in id order, capped at the
    /// configured maximum.
    pub fn search(&self, query: &str) -> Vec<&Item> {
        let mut items = self.index.search(&self.catalog, query);
        if self.max_results > 0 {
            items.truncate(self.max_results);
        }
        items
    }

    pub fn is_found(&self, id: ItemId) -> bool {
        self.store.is_found(id)
    }

    pub fn mark_found(&mut self, id: ItemId) -> Result<(), TrackerError> {
        self.check_known(id)?;
        self.store.mark_found(id)?;
        Ok(())
    }

    pub fn mark_missing(&mut self, id: ItemId) -> Result<(), TrackerError> {
        self.check_known(id)?;
        self.store.mark_missing(id)?;
        Ok(())
    }

    /// Flip an item's found state, returning the new state.
    pub fn toggle(&mut self, id: ItemId) -> Result<bool, TrackerError> {
        if self.is_found(id) {
            self.mark_missing(id)?;
            Ok(false)
        } else {
            self.mark_found(id)?;
            Ok(true)
        }
    }

    /// Drop the log history of one item. Accepts ids outside the catalog so
    /// stale entries can be purged.
    pub fn compact(&mut self, id: ItemId) -> Result<(), TrackerError> {
        self.store.compact(id)?;
        Ok(())
    }

    /// Rewrite the log to one entry per found item.
    pub fn compact_all(&mut self) -> Result<(), TrackerError> {
        self.store.compact_all()?;
        Ok(())
    }

    /// Totals and found counts per UNIQUE/SET/RUNE grouping and per
    /// (rarity, slot) pair.
    pub fn get_counts_by_rarity_and_slot(&self) -> CollectionCounts {
        CollectionCounts::compute(&self.catalog, |id| self.store.is_found(id))
    }

    fn check_known(&self, id: ItemId) -> Result<(), TrackerError> {
        if self.catalog.contains(id) {
            Ok(())
        } else {
            Err(TrackerError::UnknownItem(id))
        }
    }
}
