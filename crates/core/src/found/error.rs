//! Error types for the found-state store.

use std::path::PathBuf;
use thiserror::Error;

use crate::catalog::ItemId;

/// Errors that can occur while reading or writing the found log.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Header mismatch or unparseable entry. Never recovered silently.
    #[error("Corrupt found log at line {line}: {reason}")]
    Corrupt { line: usize, reason: String },

    /// Tried to unmark an item that is not marked found.
    #[error("Item {0} is not marked found")]
    NotFound(ItemId),

    /// The log removes an item that was not found at that point of replay.
    #[error("Log replay removes item {item_id} at line {line} while it is not found")]
    InvariantViolation { line: usize, item_id: ItemId },

    /// Operation needs a loaded store.
    #[error("Found log {path} has not been loaded")]
    NotLoaded { path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub(crate) fn corrupt(line: usize, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            line,
            reason: reason.into(),
        }
    }

    /// Whether the on-disk log itself is damaged.
    pub fn is_corruption(&self) -> bool {
        matches!(self, Self::Corrupt { .. } | Self::InvariantViolation { .. })
    }
}
