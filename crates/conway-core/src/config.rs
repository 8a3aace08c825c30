use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConwayError;
use crate::types::{PairOrder, SortOrder};

/// Top-level configuration loaded from `.conway.toml`.
///
/// Supports layered resolution: CLI flags > config file > defaults.
///
/// # Examples
///
/// ```
/// use conway_core::ConwayConfig;
///
/// let config = ConwayConfig::default();
/// assert_eq!(config.communication.min_shared, 1);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConwayConfig {
    /// Communication analysis settings.
    #[serde(default)]
    pub communication: CommunicationConfig,
}

impl ConwayConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConwayError::FileNotFound`] if `path` does not exist,
    /// [`ConwayError::Io`] if it cannot be read, [`ConwayError::Toml`] if the
    /// content is not valid TOML, or [`ConwayError::Config`] if a value is
    /// out of range.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use conway_core::ConwayConfig;
    /// use std::path::Path;
    ///
    /// let config = ConwayConfig::from_file(Path::new(".conway.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, ConwayError> {
        if !path.exists() {
            return Err(ConwayError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConwayError::Toml`] if parsing fails, or
    /// [`ConwayError::Config`] if a value is out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use conway_core::{ConwayConfig, SortOrder};
    ///
    /// let toml = r#"
    /// [communication]
    /// sort = "strength"
    /// min_shared = 2
    /// "#;
    /// let config = ConwayConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.communication.sort, SortOrder::Strength);
    /// assert_eq!(config.communication.min_shared, 2);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, ConwayError> {
        let config: Self = toml::from_str(content)?;
        config.communication.validate()?;
        Ok(config)
    }
}

/// Communication analysis configuration.
///
/// # Examples
///
/// ```
/// use conway_core::{CommunicationConfig, PairOrder, SortOrder};
///
/// let config = CommunicationConfig::default();
/// assert_eq!(config.pair_order, PairOrder::Canonical);
/// assert_eq!(config.sort, SortOrder::Pair);
/// assert_eq!(config.min_strength, 0.0);
/// assert_eq!(config.parallel_threshold, 1024);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunicationConfig {
    /// How author/peer are labelled (default: canonical).
    #[serde(default)]
    pub pair_order: PairOrder,
    /// Output ordering (default: pair).
    #[serde(default)]
    pub sort: SortOrder,
    /// Drop pairs sharing fewer entities than this (default: 1).
    #[serde(default = "default_min_shared")]
    pub min_shared: u32,
    /// Drop pairs weaker than this (default: 0.0).
    #[serde(default)]
    pub min_strength: f64,
    /// Tally in parallel once there are at least this many efforts
    /// (default: 1024, 0 disables).
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

fn default_min_shared() -> u32 {
    1
}

fn default_parallel_threshold() -> usize {
    1024
}

impl Default for CommunicationConfig {
    fn default() -> Self {
        Self {
            pair_order: PairOrder::default(),
            sort: SortOrder::default(),
            min_shared: default_min_shared(),
            min_strength: 0.0,
            parallel_threshold: default_parallel_threshold(),
        }
    }
}

impl CommunicationConfig {
    /// Check that thresholds are usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConwayError::Config`] if `min_strength` is negative or not finite.
    pub fn validate(&self) -> Result<(), ConwayError> {
        if !self.min_strength.is_finite() || self.min_strength < 0.0 {
            return Err(ConwayError::Config(format!(
                "min_strength must be a finite value >= 0, got {}",
                self.min_strength
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = ConwayConfig::default();
        assert_eq!(config.communication.pair_order, PairOrder::Canonical);
        assert_eq!(config.communication.sort, SortOrder::Pair);
        assert_eq!(config.communication.min_shared, 1);
        assert_eq!(config.communication.min_strength, 0.0);
        assert_eq!(config.communication.parallel_threshold, 1024);
    }

    #[test]
    fn parse_full_toml() {
        let toml = r#"
[communication]
pair_order = "encounter"
sort = "strength"
min_shared = 3
min_strength = 0.25
parallel_threshold = 0
"#;
        let config = ConwayConfig::from_toml(toml).unwrap();
        assert_eq!(config.communication.pair_order, PairOrder::Encounter);
        assert_eq!(config.communication.sort, SortOrder::Strength);
        assert_eq!(config.communication.min_shared, 3);
        assert_eq!(config.communication.min_strength, 0.25);
        assert_eq!(config.communication.parallel_threshold, 0);
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config = ConwayConfig::from_toml("").unwrap();
        assert_eq!(config.communication.min_shared, 1);
        assert_eq!(config.communication.sort, SortOrder::Pair);
    }

    #[test]
    fn invalid_toml_returns_error() {
        let result = ConwayConfig::from_toml("{{invalid}}");
        assert!(matches!(result, Err(ConwayError::Toml(_))));
    }

    #[test]
    fn unknown_sort_is_rejected() {
        let toml = r#"
[communication]
sort = "volume"
"#;
        assert!(ConwayConfig::from_toml(toml).is_err());
    }

    #[test]
    fn negative_min_strength_is_rejected() {
        let toml = r#"
[communication]
min_strength = -0.5
"#;
        let err = ConwayConfig::from_toml(toml).unwrap_err();
        assert!(matches!(err, ConwayError::Config(_)));
        assert!(err.to_string().contains("min_strength"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ConwayConfig::from_file(Path::new("/nonexistent/.conway.toml")).unwrap_err();
        assert!(matches!(err, ConwayError::FileNotFound(_)));
    }
}
