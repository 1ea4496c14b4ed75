//! Engine configuration, loadable from TOML:
//!
//! ```toml
//! # spectral.toml
//! [lookup]
//! peak_tolerance = 5e-8
//!
//! [compare]
//! tolerance = 1e-6
//! extra_info = false
//! ```
//!
//! Every key is optional; missing keys keep their defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Relative tolerance used by peak matching and float comparison when no
/// other tolerance is given
pub const DEFAULT_RELATIVE_TOLERANCE: f64 = 5e-8;

/// Errors that can occur while loading a configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The content is not valid TOML for this configuration
    #[error("Failed to parse TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// A value is out of its allowed range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Root configuration of the engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Lookup settings
    #[serde(default)]
    pub lookup: LookupConfig,

    /// Comparison settings
    #[serde(default)]
    pub compare: CompareConfig,
}

/// Settings for value lookups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Relative tolerance (fraction of the variable's data span) for matching
    /// peaks
    pub peak_tolerance: f64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            peak_tolerance: DEFAULT_RELATIVE_TOLERANCE,
        }
    }
}

/// Settings for dataset comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    /// Relative tolerance for float equality
    pub tolerance: f64,

    /// Whether per-item extra info takes part in comparisons
    pub extra_info: bool,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_RELATIVE_TOLERANCE,
            extra_info: true,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every tolerance is finite and non-negative
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("lookup.peak_tolerance", self.lookup.peak_tolerance),
            ("compare.tolerance", self.compare.tolerance),
        ];
        for (key, value) in checks {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a non-negative number, got {}",
                    key, value
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [lookup]
            peak_tolerance = 0.01

            [compare]
            tolerance = 1e-6
            extra_info = false
        "#;

        let config = EngineConfig::from_str(toml).unwrap();
        assert_eq!(config.lookup.peak_tolerance, 0.01);
        assert_eq!(config.compare.tolerance, 1e-6);
        assert!(!config.compare.extra_info);
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
            [compare]
            extra_info = false
        "#;

        let config = EngineConfig::from_str(toml).unwrap();
        assert_eq!(config.compare.tolerance, DEFAULT_RELATIVE_TOLERANCE);
        assert_eq!(config.lookup.peak_tolerance, DEFAULT_RELATIVE_TOLERANCE);
    }

    #[test]
    fn test_empty_config() {
        let config = EngineConfig::from_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert!(config.compare.extra_info);
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        let err = EngineConfig::from_str("[lookup]\npeak_tolerance = -1.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spectral.toml");
        std::fs::write(&path, "[compare]\ntolerance = 0.5\n").unwrap();
        let config = EngineConfig::from_file(&path).unwrap();
        assert_eq!(config.compare.tolerance, 0.5);

        assert!(matches!(
            EngineConfig::from_file(&dir.path().join("missing.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
