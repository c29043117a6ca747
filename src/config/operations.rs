//! Config loading and validation.

use super::model::Config;
use crate::error::{RangerError, Result};
use chrono::format::{Item, StrftimeItems};
use std::path::Path;

impl Config {
    /// Load config from a YAML file.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(RangerError::UserError)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            RangerError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| RangerError::UserError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            RangerError::UserError(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values.
    ///
    /// - `prompt` must be non-empty
    /// - `timestamp_format` must be a non-empty, well-formed chrono format
    /// - `event_log` must not be an empty path
    pub fn validate(&self) -> Result<()> {
        if self.prompt.is_empty() {
            return Err(RangerError::UserError(
                "config validation failed: prompt must not be empty".to_string(),
            ));
        }

        if self.timestamp_format.is_empty() {
            return Err(RangerError::UserError(
                "config validation failed: timestamp_format must not be empty".to_string(),
            ));
        }

        if StrftimeItems::new(&self.timestamp_format).any(|item| matches!(item, Item::Error)) {
            return Err(RangerError::UserError(format!(
                "config validation failed: timestamp_format '{}' is not a valid format",
                self.timestamp_format
            )));
        }

        if let Some(path) = &self.event_log
            && path.as_os_str().is_empty()
        {
            return Err(RangerError::UserError(
                "config validation failed: event_log must not be an empty path".to_string(),
            ));
        }

        Ok(())
    }
}
