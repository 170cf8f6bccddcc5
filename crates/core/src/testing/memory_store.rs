//! In-memory found store for tests.

use std::collections::BTreeSet;
use std::io;

use chrono::Utc;

use crate::catalog::ItemId;
use crate::found::{FoundStore, LogEntry, StoreError};

/// Found store that keeps its log in a `Vec`.
///
/// Writes can be made to fail to exercise error paths.
#[derive(Debug, Default)]
pub struct MemoryFoundStore {
    found: BTreeSet<ItemId>,
    entries: Vec<LogEntry>,
    fail_writes: bool,
}

impl MemoryFoundStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with found items.
    pub fn with_found(ids: impl IntoIterator<Item = ItemId>) -> Self {
        let mut store = Self::new();
        for id in ids {
            store.found.insert(id);
            store.entries.push(LogEntry::Add {
                item_id: id,
                found_at: Utc::now(),
            });
        }
        store
    }

    /// Make every following write fail with an I/O error.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Entries recorded so far, in order.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Io(io::Error::other("simulated write failure")));
        }
        Ok(())
    }

    fn record(&mut self, entry: LogEntry) -> Result<(), StoreError> {
        self.check_writable()?;
        self.entries.push(entry);
        Ok(())
    }
}

impl FoundStore for MemoryFoundStore {
    fn is_found(&self, id: ItemId) -> bool {
        self.found.contains(&id)
    }

    fn found_ids(&self) -> BTreeSet<ItemId> {
        self.found.clone()
    }

    fn found_count(&self) -> usize {
        self.found.len()
    }

    fn mark_found(&mut self, id: ItemId) -> Result<(), StoreError> {
        self.record(LogEntry::Add {
            item_id: id,
            found_at: Utc::now(),
        })?;
        self.found.insert(id);
        Ok(())
    }

    fn mark_missing(&mut self, id: ItemId) -> Result<(), StoreError> {
        if !self.found.contains(&id) {
            return Err(StoreError::NotFound(id));
        }
        self.record(LogEntry::Remove { item_id: id })?;
        self.found.remove(&id);
        Ok(())
    }

    fn compact(&mut self, id: ItemId) -> Result<(), StoreError> {
        self.check_writable()?;
        self.entries.retain(|e| e.item_id() != Some(id));
        self.found.remove(&id);
        Ok(())
    }

    fn compact_all(&mut self) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut seen = BTreeSet::new();
        let found = &self.found;
        self.entries.retain(|entry| match entry {
            LogEntry::Add { item_id, .. } => found.contains(item_id) && seen.insert(*item_id),
            _ => false,
        });
        Ok(())
    }
}
