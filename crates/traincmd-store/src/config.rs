//! Store configuration
//!
//! Where the backing file lives. Defaults to `./commands`.

use crate::errors::{invalid_config, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default backing file name inside a run's result directory
pub const DEFAULT_FILE_NAME: &str = "commands";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the backing file, resolved to an absolute path on use
    pub directory: PathBuf,
    /// Backing file name within `directory`
    pub file_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }
}

impl StoreConfig {
    /// Config for `directory` with the default file name
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..Self::default()
        }
    }

    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// Parse a TOML fragment; missing keys keep their defaults
    ///
    /// ```toml
    /// directory = "results/run-7"
    /// file_name = "commands"
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for malformed TOML or an invalid file name.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: StoreConfig =
            toml::from_str(source).map_err(|e| invalid_config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the file name names a single file
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the file name is empty or has a path
    /// separator in it.
    pub fn validate(&self) -> Result<()> {
        if self.file_name.trim().is_empty() {
            return Err(invalid_config("file_name must not be empty"));
        }
        let as_path = Path::new(&self.file_name);
        if as_path.components().count() != 1 || as_path.file_name().is_none() {
            return Err(invalid_config(format!(
                "file_name '{}' must be a plain file name",
                self.file_name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_file_name() {
        let config = StoreConfig::default();
        assert_eq!(config.file_name, "commands");
        assert_eq!(config.directory, PathBuf::from("."));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_partial_keeps_defaults() {
        let config = StoreConfig::from_toml_str("directory = \"results/run-7\"").unwrap();
        assert_eq!(config.directory, PathBuf::from("results/run-7"));
        assert_eq!(config.file_name, DEFAULT_FILE_NAME);
    }

    #[test]
    fn test_from_toml_full() {
        let config =
            StoreConfig::from_toml_str("directory = \"out\"\nfile_name = \"queue.json\"").unwrap();
        assert_eq!(config, StoreConfig::new("out").with_file_name("queue.json"));
    }

    #[test]
    fn test_rejects_bad_file_names() {
        for bad in ["", "  ", "nested/commands", "..", "."] {
            let err = StoreConfig::default().with_file_name(bad).validate();
            assert!(err.is_err(), "expected '{}' to be rejected", bad);
        }
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let err = StoreConfig::from_toml_str("directory = ").unwrap_err();
        assert_eq!(err.code(), "ERR_INVALID_CONFIG");
    }
}
