//! Top-level analytics configuration and file loading.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult, Validate, ValidationError};
use crate::sections::{
    BreadthConfig, BreakevenConfig, CacheConfig, CreditConfig, CurveConfig, HistoryConfig,
    RatioConfig, TenorConfig,
};

/// Every tunable of the monitor, grouped by analytic.
///
/// Loaded from TOML or JSON; missing sections and fields take their
/// defaults.
///
/// ```rust
/// use curvewatch_config::AnalyticsConfig;
///
/// let config = AnalyticsConfig::from_toml_str("[ratio]\nwindow = 126\n").unwrap();
/// assert_eq!(config.ratio.window, 126);
/// assert_eq!(config.breadth.window, 200);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Nearest-to-horizon series.
    #[serde(default)]
    pub tenor: TenorConfig,
    /// Implied inflation.
    #[serde(default)]
    pub breakeven: BreakevenConfig,
    /// Curve snapshots.
    #[serde(default)]
    pub curve: CurveConfig,
    /// Credit indices.
    #[serde(default)]
    pub credit: CreditConfig,
    /// Pair ratios.
    #[serde(default)]
    pub ratio: RatioConfig,
    /// Market breadth.
    #[serde(default)]
    pub breadth: BreadthConfig,
    /// Maturity histories.
    #[serde(default)]
    pub history: HistoryConfig,
    /// Result memoization.
    #[serde(default)]
    pub cache: CacheConfig,
}

impl AnalyticsConfig {
    /// Loads a configuration file, choosing the format by extension.
    ///
    /// The loaded configuration is validated before it is returned.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let config = match extension.as_str() {
            "toml" => Self::from_toml_str(&content)?,
            "json" => Self::from_json_str(&content)?,
            _ => return Err(ConfigError::UnsupportedFormat { extension }),
        };

        config.validate_or_error()?;
        log::info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parses TOML without validating.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Parses JSON without validating.
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Renders the configuration as TOML.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Renders the configuration as pretty JSON.
    pub fn to_json_string(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Validate for AnalyticsConfig {
    fn validate(&self) -> Vec<ValidationError> {
        fn section(name: &str, errors: Vec<ValidationError>) -> impl Iterator<Item = ValidationError> + '_ {
            errors.into_iter().map(move |e| e.in_section(name))
        }

        section("tenor", self.tenor.validate())
            .chain(section("breakeven", self.breakeven.validate()))
            .chain(section("curve", self.curve.validate()))
            .chain(section("credit", self.credit.validate()))
            .chain(section("ratio", self.ratio.validate()))
            .chain(section("breadth", self.breadth.validate()))
            .chain(section("history", self.history.validate()))
            .chain(section("cache", self.cache.validate()))
            .collect()
    }
}
