//! Types for the item catalog.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Item identifier. Equal to the item's position in the loaded catalog.
pub type ItemId = u32;

/// Equipment slot an item occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Helm,
    Armor,
    Belt,
    Gloves,
    Boots,
    Weapon,
    Shield,
    Amulet,
    Ring,
    Charm,
    Jewel,
    Rune,
}

impl Slot {
    /// All slots in dataset code order.
    pub const ALL: [Slot; 12] = [
        Slot::Helm,
        Slot::Armor,
        Slot::Belt,
        Slot::Gloves,
        Slot::Boots,
        Slot::Weapon,
        Slot::Shield,
        Slot::Amulet,
        Slot::Ring,
        Slot::Charm,
        Slot::Jewel,
        Slot::Rune,
    ];

    /// Numeric code used by the dataset (1-based).
    pub fn code(self) -> u8 {
        self as u8 + 1
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Slot::Helm => "helm",
            Slot::Armor => "armor",
            Slot::Belt => "belt",
            Slot::Gloves => "gloves",
            Slot::Boots => "boots",
            Slot::Weapon => "weapon",
            Slot::Shield => "shield",
            Slot::Amulet => "amulet",
            Slot::Ring => "ring",
            Slot::Charm => "charm",
            Slot::Jewel => "jewel",
            Slot::Rune => "rune",
        }
    }
}

impl TryFrom<u8> for Slot {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1..=12 => Ok(Slot::ALL[usize::from(code) - 1]),
            other => Err(other),
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Item rarity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Normal,
    Magic,
    Rare,
    Set,
    Unique,
}

impl Rarity {
    /// All rarities in dataset code order.
    pub const ALL: [Rarity; 5] = [
        Rarity::Normal,
        Rarity::Magic,
        Rarity::Rare,
        Rarity::Set,
        Rarity::Unique,
    ];

    /// Numeric code used by the dataset (1-based).
    pub fn code(self) -> u8 {
        self as u8 + 1
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rarity::Normal => "normal",
            Rarity::Magic => "magic",
            Rarity::Rare => "rare",
            Rarity::Set => "set",
            Rarity::Unique => "unique",
        }
    }
}

impl TryFrom<u8> for Rarity {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1..=5 => Ok(Rarity::ALL[usize::from(code) - 1]),
            other => Err(other),
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A collectible item from the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique id, equal to the item's index in the catalog.
    pub id: ItemId,
    /// Display name (e.g. "Guillaume's Face").
    pub name: String,
    /// Base item type (e.g. "Winged Helm").
    pub base: String,
    pub slot: Slot,
    pub rarity: Rarity,
    /// Index into [`CATEGORIES`](super::CATEGORIES).
    pub category: usize,
}

/// Errors for catalog loading.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Malformed row or broken identifier space. Fatal at startup.
    #[error("Corrupt catalog at line {line}: {reason}")]
    Corrupt { line: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    pub(crate) fn corrupt(line: usize, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            line,
            reason: reason.into(),
        }
    }
}
