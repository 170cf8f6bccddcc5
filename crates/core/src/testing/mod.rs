//! Testing utilities: catalog fixtures and an in-memory found store.
//!
//! # Example
//!
//! ```rust,ignore
//! use grailtracker_core::testing::{fixtures, MemoryFoundStore};
//!
//! let catalog = fixtures::grail_catalog();
//! let context = AppContext::new(catalog, Box::new(MemoryFoundStore::new()));
//! ```

mod memory_store;

pub use memory_store::MemoryFoundStore;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::{Catalog, ItemId, Rarity, Slot};

    /// Header row of the item dataset.
    pub const CSV_HEADER: &str = "id,name,base,slot,rarity,category";

    /// Ids of the "Heaven's Brethren" set in [`grail_catalog`].
    pub const HEAVENS_BRETHREN_IDS: [ItemId; 4] = [498, 499, 500, 501];

    /// Ids of the "Orphan's Call" set in [`grail_catalog`].
    pub const ORPHANS_CALL_IDS: [ItemId; 4] = [524, 525, 526, 527];

    const RUNES: [&str; 33] = [
        "El", "Eld", "Tir", "Nef", "Eth", "Ith", "Tal", "Ral", "Ort", "Thul", "Amn", "Sol",
        "Shael", "Dol", "Hel", "Io", "Lum", "Ko", "Fal", "Lem", "Pul", "Um", "Mal", "Ist", "Gul",
        "Vex", "Ohm", "Lo", "Sur", "Ber", "Jah", "Cham", "Zod",
    ];

    /// Render one dataset row.
    pub fn csv_row(
        id: ItemId,
        name: &str,
        base: &str,
        slot: Slot,
        rarity: Rarity,
        category: usize,
    ) -> String {
        format!(
            "{},{},{},{},{},{}",
            id,
            quote(name),
            quote(base),
            slot.code(),
            rarity.code(),
            category
        )
    }

    fn quote(field: &str) -> String {
        if field.contains(',') || field.contains('"') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    /// Full dataset text for [`grail_catalog`].
    ///
    /// 545 items: ids 0..33 are runes, 33..418 uniques and 418..545 set
    /// items, with two real sets placed at [`HEAVENS_BRETHREN_IDS`] and
    /// [`ORPHANS_CALL_IDS`]. Every other set item belongs to "Angelic Raiment".
    pub fn grail_csv() -> String {
        let mut lines = vec![CSV_HEADER.to_string()];

        for (id, rune) in RUNES.iter().enumerate() {
            lines.push(csv_row(
                id as ItemId,
                &format!("{} Rune", rune),
                "Rune",
                Slot::Rune,
                Rarity::Normal,
                32,
            ));
        }

        for id in 33..418 {
            lines.push(csv_row(
                id,
                &format!("Unique Relic {}", id),
                "Relic",
                Slot::Weapon,
                Rarity::Unique,
                44,
            ));
        }

        for id in 418..545 {
            let row = match id {
                498 => csv_row(id, "Dangoon's Teaching", "Reinforced Mace", Slot::Weapon, Rarity::Set, 21),
                499 => csv_row(id, "Taebaek's Glory", "Ward", Slot::Shield, Rarity::Set, 21),
                500 => csv_row(id, "Haemosu's Adamant", "Cuirass", Slot::Armor, Rarity::Set, 21),
                501 => csv_row(id, "Ondal's Almighty", "Spired Helm", Slot::Helm, Rarity::Set, 21),
                524 => csv_row(id, "Guillaume's Face", "Winged Helm", Slot::Helm, Rarity::Set, 27),
                525 => csv_row(id, "Whitstan's Guard", "Round Shield", Slot::Shield, Rarity::Set, 27),
                526 => csv_row(id, "Magnus' Skin", "Sharkskin Gloves", Slot::Gloves, Rarity::Set, 27),
                527 => csv_row(id, "Wilhelm's Pride", "Battle Belt", Slot::Belt, Rarity::Set, 27),
                _ => csv_row(id, &format!("Set Piece {}", id), "Sash", Slot::Belt, Rarity::Set, 0),
            };
            lines.push(row);
        }

        lines.join("\n") + "\n"
    }

    /// A 545-item catalog shaped like the real dataset.
    pub fn grail_catalog() -> Catalog {
        Catalog::from_reader(grail_csv().as_bytes()).expect("fixture catalog is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::catalog::{Rarity, Slot};

    #[test]
    fn test_grail_catalog_shape() {
        let catalog = grail_catalog();
        let items = catalog.items();
        assert_eq!(items.len(), 545);
        assert_eq!(items.iter().filter(|i| i.rarity == Rarity::Set).count(), 127);
        assert_eq!(items.iter().filter(|i| i.slot == Slot::Rune).count(), 33);
        assert_eq!(
            items.iter().filter(|i| i.rarity == Rarity::Unique).count(),
            545 - 127 - 33
        );
    }

    #[test]
    fn test_csv_row_quotes_commas() {
        let row = csv_row(3, "Rings, \"Odd\"", "Ring", Slot::Ring, Rarity::Unique, 33);
        assert_eq!(row, "3,\"Rings, \"\"Odd\"\"\",Ring,9,5,33");
    }
}
