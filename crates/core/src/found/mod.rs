//! Found-state persistence.
//!
//! The set of found items is rebuilt at startup by replaying an append-only
//! log of add/remove entries behind a versioned header.

mod entry;
mod error;
mod log_store;

pub use entry::{LogEntry, LOG_VERSION};
pub use error::StoreError;
pub use log_store::LogFoundStore;

use std::collections::BTreeSet;

use crate::catalog::ItemId;

/// Trait for found-state storage backends.
///
/// Mutations are durable before they become visible: if a write fails the
/// in-memory set is left as it was.
pub trait FoundStore: Send {
    /// Whether the item is currently marked found.
    fn is_found(&self, id: ItemId) -> bool;

    /// Snapshot of all found item ids.
    fn found_ids(&self) -> BTreeSet<ItemId>;

    /// Number of found items.
    fn found_count(&self) -> usize;

    /// Mark an item found. Marking an already found item is harmless but
    /// still recorded.
    fn mark_found(&mut self, id: ItemId) -> Result<(), StoreError>;

    /// Mark an item missing. Fails with [`StoreError::NotFound`] if it is not
    /// currently found.
    fn mark_missing(&mut self, id: ItemId) -> Result<(), StoreError>;

    /// Drop every recorded entry for `id` and forget it as found, without
    /// recording a removal.
    fn compact(&mut self, id: ItemId) -> Result<(), StoreError>;

    /// Rewrite storage to the minimal history reproducing the current state.
    fn compact_all(&mut self) -> Result<(), StoreError>;
}
