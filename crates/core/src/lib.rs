pub mod catalog;
pub mod config;
pub mod context;
pub mod found;
pub mod search;
pub mod summary;
pub mod testing;

pub use catalog::{category_label, Catalog, CatalogError, Item, ItemId, Rarity, Slot, CATEGORIES};
pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, CatalogConfig,
    Config, ConfigError, SearchConfig, StoreConfig,
};
pub use context::{AppContext, TrackerError};
pub use found::{FoundStore, LogEntry, LogFoundStore, StoreError, LOG_VERSION};
pub use search::{tokenize, SearchIndex};
pub use summary::{CollectionCounts, Group, Tally};
