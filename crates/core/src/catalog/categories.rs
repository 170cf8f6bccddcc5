//! Fixed category table.
//!
//! Indexes 0..=31 are set names, followed by unique-item groupings. The
//! trailing empty entries are reserved slots with no label.

pub const CATEGORIES: [&str; 51] = [
    "Angelic Raiment",
    "Arcanna's Tricks",
    "Arctic Gear",
    "Berserker's Arsenal",
    "Cathan's Traps",
    "Civerb's Vestments",
    "Cleglaw's Brace",
    "Death's Disguise",
    "Hsaru's Defense",
    "Infernal Tools",
    "Iratha's Finery",
    "Isenhart's Armory",
    "Milabrega's Regalia",
    "Sigon's Complete Steel",
    "Tancred's Battlegear",
    "Vidala's Rig",
    "Aldur's Watchtower",
    "Bul-Kathos' Children",
    "Cow King's Leathers",
    "The Disciple",
    "Griswold's Legacy",
    "Heaven's Brethren",
    "Hwanin's Majesty",
    "Immortal King",
    "M'avina's Battle Hymn",
    "Natalya's Odium",
    "Naj's Ancient Vestige",
    "Orphan's Call",
    "Sander's Folly",
    "Sazabi's Grand Tribute",
    "Tal Rasha's Wrappings",
    "Trang-Oul's Avatar",
    "Runes",
    "Rings",
    "Amulets",
    "Charms",
    "Jewels",
    "Amazon",
    "Assassin",
    "Necromancer",
    "Barbarian",
    "Sorceress",
    "Druid",
    "Paladin",
    "Normal Unique Armor",
    "",
    "",
    "",
    "",
    "",
    "",
];

/// Label for a category index, `None` for reserved or out-of-range slots.
pub fn category_label(index: usize) -> Option<&'static str> {
    CATEGORIES
        .get(index)
        .copied()
        .filter(|label| !label.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_labels() {
        assert_eq!(category_label(21), Some("Heaven's Brethren"));
        assert_eq!(category_label(27), Some("Orphan's Call"));
        assert_eq!(category_label(32), Some("Runes"));
    }

    #[test]
    fn test_reserved_and_out_of_range() {
        assert_eq!(category_label(45), None);
        assert_eq!(category_label(50), None);
        assert_eq!(category_label(51), None);
    }
}
