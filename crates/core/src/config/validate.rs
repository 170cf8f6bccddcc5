use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Catalog and store paths are not empty
/// - The store does not point at the catalog file
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.catalog.path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "catalog.path cannot be empty".to_string(),
        ));
    }

    if config.store.path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "store.path cannot be empty".to_string(),
        ));
    }

    // The store rewrites its file on compaction; never let it touch the dataset.
    if config.store.path == config.catalog.path {
        return Err(ConfigError::ValidationError(format!(
            "store.path and catalog.path both point to {}",
            config.store.path.display()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_empty_store_path_fails() {
        let mut config = Config::default();
        config.store.path = PathBuf::new();
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_empty_catalog_path_fails() {
        let mut config = Config::default();
        config.catalog.path = PathBuf::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_store_equals_catalog_fails() {
        let mut config = Config::default();
        config.store.path = config.catalog.path.clone();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("both point to"));
    }
}
