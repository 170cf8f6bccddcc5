//! Item catalog - the immutable dataset of collectible items.
//!
//! The catalog is loaded once at startup from a CSV file with the columns
//! `id, name, base, slot, rarity, category`. Item ids must form the dense
//! range `0..N` so an id doubles as the item's index.

mod categories;
mod csv;
mod loader;
mod types;

pub use categories::{category_label, CATEGORIES};
pub use types::*;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::info;

/// Immutable, id-sorted item catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<Item>,
}

impl Catalog {
    /// Load the catalog from a CSV file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let file = File::open(path)?;
        let catalog = Self::from_reader(file)?;
        info!(
            path = %path.display(),
            items = catalog.len(),
            uniques = catalog.count_rarity(Rarity::Unique),
            sets = catalog.count_rarity(Rarity::Set),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    /// Load the catalog from any CSV source.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let rows = loader::parse_rows(BufReader::new(reader))?;
        Ok(Self {
            items: loader::into_dense(rows)?,
        })
    }

    /// Build a catalog from already-constructed items.
    ///
    /// Items may arrive in any order; the same density rule as file loading
    /// applies.
    pub fn from_items(items: Vec<Item>) -> Result<Self, CatalogError> {
        let rows = items.into_iter().map(|item| (0, item)).collect();
        Ok(Self {
            items: loader::into_dense(rows)?,
        })
    }

    /// All items, ordered by id.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id as usize)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        (id as usize) < self.items.len()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn count_rarity(&self, rarity: Rarity) -> usize {
        self.items.iter().filter(|i| i.rarity == rarity).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "\
id,name,base,slot,rarity,category
2,Guillaume's Face,Winged Helm,1,4,27
0,El Rune,Rune,12,5,32
1,Stone of Jordan,Ring,9,5,33
";

    #[test]
    fn test_ids_equal_positions() {
        let catalog = Catalog::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 3);
        for (position, item) in catalog.items().iter().enumerate() {
            assert_eq!(item.id as usize, position);
        }
    }

    #[test]
    fn test_get_and_contains() {
        let catalog = Catalog::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(catalog.get(2).unwrap().base, "Winged Helm");
        assert!(catalog.contains(2));
        assert!(!catalog.contains(3));
        assert!(catalog.get(3).is_none());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let catalog = Catalog::load(file.path()).unwrap();
        assert_eq!(catalog.items()[1].name, "Stone of Jordan");
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = Catalog::load(Path::new("/nonexistent/items.csv"));
        assert!(matches!(result, Err(CatalogError::Io(_))));
    }

    #[test]
    fn test_from_items_rejects_gap() {
        let item = Item {
            id: 1,
            name: "Stone of Jordan".to_string(),
            base: "Ring".to_string(),
            slot: Slot::Ring,
            rarity: Rarity::Unique,
            category: 33,
        };
        assert!(matches!(
            Catalog::from_items(vec![item]),
            Err(CatalogError::Corrupt { .. })
        ));
    }
}
