//! Collection progress counts for the overlay summary.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::catalog::{Catalog, Item, ItemId, Rarity, Slot};

/// Found/total counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub found: usize,
    pub total: usize,
}

impl Tally {
    fn record(&mut self, found: bool) {
        self.total += 1;
        if found {
            self.found += 1;
        }
    }

    /// Whole-number completion percentage, truncated. 0 for an empty tally.
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            0
        } else {
            self.found * 100 / self.total
        }
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}/{}][{}%]", self.found, self.total, self.percent())
    }
}

/// Summary grouping shown on the checklist overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Group {
    Uniques,
    Sets,
    Runes,
}

impl Group {
    pub const ALL: [Group; 3] = [Group::Uniques, Group::Sets, Group::Runes];

    /// Group an item falls into. Rarity wins over slot, so a unique rune
    /// counts as a unique.
    pub fn of(item: &Item) -> Option<Self> {
        match (item.rarity, item.slot) {
            (Rarity::Unique, _) => Some(Group::Uniques),
            (Rarity::Set, _) => Some(Group::Sets),
            (_, Slot::Rune) => Some(Group::Runes),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Group::Uniques => "Uniques",
            Group::Sets => "Sets",
            Group::Runes => "Runes",
        }
    }
}

/// Totals and found counts per group and per (rarity, slot) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionCounts {
    groups: BTreeMap<Group, Tally>,
    by_rarity_and_slot: BTreeMap<(Rarity, Slot), Tally>,
}

impl CollectionCounts {
    /// Count every catalog item, asking `is_found` for each id.
    pub fn compute(catalog: &Catalog, is_found: impl Fn(ItemId) -> bool) -> Self {
        let mut counts = Self::default();
        for item in catalog.items() {
            let found = is_found(item.id);
            if let Some(group) = Group::of(item) {
                counts.groups.entry(group).or_default().record(found);
            }
            counts
                .by_rarity_and_slot
                .entry((item.rarity, item.slot))
                .or_default()
                .record(found);
        }
        counts
    }

    pub fn group(&self, group: Group) -> Tally {
        self.groups.get(&group).copied().unwrap_or_default()
    }

    pub fn rarity_and_slot(&self, rarity: Rarity, slot: Slot) -> Tally {
        self.by_rarity_and_slot
            .get(&(rarity, slot))
            .copied()
            .unwrap_or_default()
    }

    /// Non-empty (rarity, slot) tallies in rarity then slot order.
    pub fn iter_rarity_and_slot(&self) -> impl Iterator<Item = (Rarity, Slot, Tally)> + '_ {
        self.by_rarity_and_slot
            .iter()
            .map(|(&(rarity, slot), &tally)| (rarity, slot, tally))
    }

    /// Sum over every catalog item.
    pub fn overall(&self) -> Tally {
        self.by_rarity_and_slot
            .values()
            .fold(Tally::default(), |acc, t| Tally {
                found: acc.found + t.found,
                total: acc.total + t.total,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
id,name,base,slot,rarity,category
0,El Rune,Rune,12,1,32
1,Stone of Jordan,Ring,9,5,33
2,Harlequin Crest,Shako,1,5,44
3,Guillaume's Face,Winged Helm,1,4,27
4,Plain Ring,Ring,9,3,33
";

    fn catalog() -> Catalog {
        Catalog::from_reader(SAMPLE.as_bytes()).unwrap()
    }

    #[test]
    fn test_tally_display_and_percent() {
        let tally = Tally { found: 1, total: 3 };
        assert_eq!(tally.percent(), 33);
        assert_eq!(tally.to_string(), "[1/3][33%]");
        assert_eq!(Tally::default().to_string(), "[0/0][0%]");
    }

    #[test]
    fn test_group_assignment() {
        let catalog = catalog();
        let groups: Vec<Option<Group>> = catalog.items().iter().map(Group::of).collect();
        assert_eq!(
            groups,
            vec![
                Some(Group::Runes),
                Some(Group::Uniques),
                Some(Group::Uniques),
                Some(Group::Sets),
                None
            ]
        );
    }

    #[test]
    fn test_compute_counts() {
        let counts = CollectionCounts::compute(&catalog(), |id| id == 1 || id == 3);

        assert_eq!(counts.group(Group::Uniques), Tally { found: 1, total: 2 });
        assert_eq!(counts.group(Group::Sets), Tally { found: 1, total: 1 });
        assert_eq!(counts.group(Group::Runes), Tally { found: 0, total: 1 });
        assert_eq!(
            counts.rarity_and_slot(Rarity::Unique, Slot::Ring),
            Tally { found: 1, total: 1 }
        );
        assert_eq!(
            counts.rarity_and_slot(Rarity::Magic, Slot::Boots),
            Tally::default()
        );
        assert_eq!(counts.overall(), Tally { found: 2, total: 5 });
        assert_eq!(counts.iter_rarity_and_slot().count(), 5);
    }

    #[test]
    fn test_empty_catalog_counts() {
        let counts = CollectionCounts::compute(&Catalog::default(), |_| true);
        for group in Group::ALL {
            assert_eq!(counts.group(group).percent(), 0);
        }
    }
}
