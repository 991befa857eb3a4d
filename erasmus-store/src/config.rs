use std::path::{Path, PathBuf};

/// Default location of the url table, relative to the working directory
pub const DEFAULT_TABLE_PATH: &str = "data/url-store.json";

/// Short-URL store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path of the JSON table file
    pub path: PathBuf,

    /// Length of generated short ids
    pub id_length: usize,

    /// Records older than this many days are removed by cleanup
    pub retention_days: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_TABLE_PATH),
            id_length: 6,
            retention_days: 90,
        }
    }
}

impl StoreConfig {
    /// Create a configuration for the table at `path` with default values
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Set the length of generated ids
    pub fn with_id_length(mut self, length: usize) -> Self {
        self.id_length = length;
        self
    }

    /// Set the retention window used by [`crate::UrlStore::cleanup_expired`]
    pub fn with_retention_days(mut self, days: u32) -> Self {
        self.retention_days = days;
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.id_length == 0 || self.id_length > 64 {
            return Err("id_length must be between 1 and 64".to_string());
        }

        if self.path.as_os_str().is_empty() {
            return Err("path must not be empty".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.id_length, 6);
        assert_eq!(config.retention_days, 90);
        assert_eq!(config.path, PathBuf::from("data/url-store.json"));
    }

    #[test]
    fn test_builder_methods() {
        let config = StoreConfig::new("/tmp/urls.json")
            .with_id_length(8)
            .with_retention_days(30);

        assert_eq!(config.path, PathBuf::from("/tmp/urls.json"));
        assert_eq!(config.id_length, 8);
        assert_eq!(config.retention_days, 30);
    }

    #[test]
    fn test_validate_success() {
        assert!(StoreConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_id_length() {
        assert!(StoreConfig::default().with_id_length(0).validate().is_err());
        assert!(StoreConfig::default().with_id_length(65).validate().is_err());
    }

    #[test]
    fn test_validate_empty_path() {
        assert!(StoreConfig::new("").validate().is_err());
    }
}
