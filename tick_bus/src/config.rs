//! Bus configuration, read from TOML.
//!
//! ```toml
//! default_step = 0.5
//! log_packets = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{BusError, Result};

/// Settings for a manager and the session driving it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BusConfig {
    /// Clock increment used by [`Session::advance`](crate::Session::advance).
    pub default_step: f32,

    /// Log every accepted packet at debug level instead of trace.
    pub log_packets: bool,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            default_step: 1.0,
            log_packets: false,
        }
    }
}

impl BusConfig {
    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| BusError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| BusError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.default_step > 0.0) {
            return Err(BusError::Config(format!(
                "default_step must be positive, got {}",
                self.default_step
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BusConfig::default();
        assert_eq!(config.default_step, 1.0);
        assert!(!config.log_packets);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let config = BusConfig::from_toml_str("default_step = 0.5\nlog_packets = true\n").unwrap();
        assert_eq!(config.default_step, 0.5);
        assert!(config.log_packets);
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let config = BusConfig::from_toml_str("").unwrap();
        assert_eq!(config, BusConfig::default());
    }

    #[test]
    fn test_rejects_non_positive_step() {
        let result = BusConfig::from_toml_str("default_step = 0.0");
        assert!(matches!(result, Err(BusError::Config(_))));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        assert!(matches!(
            BusConfig::from_toml_str("default_step = \"fast\""),
            Err(BusError::Config(_))
        ));
        assert!(matches!(
            BusConfig::from_toml_str("unknown_key = 1"),
            Err(BusError::Config(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let result = BusConfig::load("/nonexistent/tick_bus.toml");
        assert!(matches!(result, Err(BusError::Config(_))));
    }
}
