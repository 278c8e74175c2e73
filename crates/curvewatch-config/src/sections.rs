//! Per-analytic configuration sections.
//!
//! Every field has a serde default, so a configuration file only needs to
//! name what it changes.

use serde::{Deserialize, Serialize};

use curvewatch_analytics::breadth::{
    BreadthParams, DEFAULT_BREADTH_WINDOW, DEFAULT_HISTOGRAM_BINS,
};
use curvewatch_analytics::breakeven::{BreakevenParams, DEFAULT_MAX_GAP_DAYS};
use curvewatch_analytics::credit::{IndexSpec, DEFAULT_EXCLUDED_ISSUERS};
use curvewatch_analytics::curve::{long_horizon_offsets, short_horizon_offsets, NamedOffset};
use curvewatch_analytics::history::DEFAULT_MATURITY_YEARS;
use curvewatch_analytics::parallel::DEFAULT_PARALLEL_THRESHOLD;
use curvewatch_analytics::ratio::DEFAULT_RATIO_WINDOW;
use curvewatch_analytics::tenor::TieBreak;
use curvewatch_core::{Date, InstrumentType};

use crate::error::{Validate, ValidationError};

// =============================================================================
// TENOR
// =============================================================================

/// Nearest-to-horizon selection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenorConfig {
    /// Horizon in years.
    #[serde(default = "default_horizon_years")]
    pub horizon_years: i32,

    /// Tie rule for equally distant maturities.
    #[serde(default)]
    pub tie_break: TieBreak,

    /// Real-rate series instrument.
    #[serde(default = "default_real_rate_type")]
    pub real_rate_type: InstrumentType,

    /// Nominal-rate series instrument.
    #[serde(default = "default_nominal_rate_type")]
    pub nominal_rate_type: InstrumentType,
}

fn default_horizon_years() -> i32 {
    10
}

fn default_real_rate_type() -> InstrumentType {
    InstrumentType::IpcaJurosSemestrais
}

fn default_nominal_rate_type() -> InstrumentType {
    InstrumentType::Prefixado
}

impl Default for TenorConfig {
    fn default() -> Self {
        Self {
            horizon_years: default_horizon_years(),
            tie_break: TieBreak::default(),
            real_rate_type: default_real_rate_type(),
            nominal_rate_type: default_nominal_rate_type(),
        }
    }
}

impl Validate for TenorConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if !(1..=50).contains(&self.horizon_years) {
            errors.push(ValidationError::with_rule(
                "horizon_years",
                "Horizon must be between 1 and 50 years",
                "valid_horizon",
            ));
        }
        errors
    }
}

// =============================================================================
// BREAKEVEN
// =============================================================================

/// Implied inflation pairing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakevenConfig {
    /// Pairs this many days apart or more are dropped.
    #[serde(default = "default_max_gap_days")]
    pub max_gap_days: i64,

    /// Nominal bond types.
    #[serde(default = "default_fixed_types")]
    pub fixed_types: Vec<InstrumentType>,

    /// Inflation-linked types, highest priority first.
    #[serde(default = "default_linked_priority")]
    pub linked_priority: Vec<InstrumentType>,

    /// Tie rule for equally distant linked maturities.
    #[serde(default)]
    pub tie_break: TieBreak,
}

fn default_max_gap_days() -> i64 {
    DEFAULT_MAX_GAP_DAYS
}

fn default_fixed_types() -> Vec<InstrumentType> {
    BreakevenParams::default().fixed_types
}

fn default_linked_priority() -> Vec<InstrumentType> {
    BreakevenParams::default().linked_priority
}

impl Default for BreakevenConfig {
    fn default() -> Self {
        Self {
            max_gap_days: default_max_gap_days(),
            fixed_types: default_fixed_types(),
            linked_priority: default_linked_priority(),
            tie_break: TieBreak::default(),
        }
    }
}

impl BreakevenConfig {
    /// Calculation parameters.
    #[must_use]
    pub fn params(&self) -> BreakevenParams {
        BreakevenParams {
            max_gap_days: self.max_gap_days,
            fixed_types: self.fixed_types.clone(),
            linked_priority: self.linked_priority.clone(),
            tie_break: self.tie_break,
        }
    }
}

impl Validate for BreakevenConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.max_gap_days <= 0 {
            errors.push(ValidationError::with_rule(
                "max_gap_days",
                "Maximum gap must be positive",
                "positive_gap",
            ));
        }
        if self.fixed_types.is_empty() {
            errors.push(ValidationError::new("fixed_types", "At least one fixed-rate type is required"));
        }
        if self.linked_priority.is_empty() {
            errors.push(ValidationError::new(
                "linked_priority",
                "At least one inflation-linked type is required",
            ));
        }
        if let Some(t) = self.fixed_types.iter().find(|t| self.linked_priority.contains(t)) {
            errors.push(ValidationError::with_rule(
                "linked_priority",
                format!("{t} is listed as both fixed-rate and inflation-linked"),
                "disjoint_sides",
            ));
        }
        errors
    }
}

// =============================================================================
// CURVE
// =============================================================================

/// Curve snapshot settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveConfig {
    /// Instrument type the curves are built from.
    #[serde(default = "default_curve_type")]
    pub instrument_type: InstrumentType,

    /// Recent-days comparison.
    #[serde(default = "short_horizon_offsets")]
    pub short_offsets: Vec<NamedOffset>,

    /// Historical comparison.
    #[serde(default = "long_horizon_offsets")]
    pub long_offsets: Vec<NamedOffset>,
}

fn default_curve_type() -> InstrumentType {
    InstrumentType::Prefixado
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            instrument_type: default_curve_type(),
            short_offsets: short_horizon_offsets(),
            long_offsets: long_horizon_offsets(),
        }
    }
}

impl Validate for CurveConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for (field, offsets) in [("short_offsets", &self.short_offsets), ("long_offsets", &self.long_offsets)] {
            if offsets.is_empty() {
                errors.push(ValidationError::new(field, "At least one offset is required"));
            }
            if offsets.iter().any(|o| o.label.trim().is_empty()) {
                errors.push(ValidationError::new(field, "Offset labels cannot be empty"));
            }
        }
        errors
    }
}

// =============================================================================
// CREDIT
// =============================================================================

/// Spread column of the CDI indices (% over CDI).
pub const CDI_SPREAD_COLUMN: &str = "Spread de compra (%)";

/// Spread column of the infrastructure index (bps over NTN-B).
pub const NTNB_SPREAD_COLUMN: &str = "MID spread (Bps/NTNB)";

/// One credit index: its name, exclusions and the spread column to read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditIndexConfig {
    /// Display name.
    pub name: String,

    /// Issuers removed before aggregation.
    #[serde(default)]
    pub excluded_issuers: Vec<String>,

    /// Constituent file column holding the spread.
    #[serde(default = "default_spread_column")]
    pub spread_column: String,
}

fn default_spread_column() -> String {
    CDI_SPREAD_COLUMN.to_string()
}

impl CreditIndexConfig {
    /// The aggregation spec for this index.
    #[must_use]
    pub fn spec(&self) -> IndexSpec {
        IndexSpec::new(self.name.clone()).excluding(self.excluded_issuers.iter().cloned())
    }
}

/// Credit index settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditConfig {
    /// Indices, in panel column order.
    #[serde(default = "default_indices")]
    pub indices: Vec<CreditIndexConfig>,
}

fn default_indices() -> Vec<CreditIndexConfig> {
    let excluded: Vec<String> = DEFAULT_EXCLUDED_ISSUERS.iter().map(|s| (*s).to_string()).collect();
    vec![
        CreditIndexConfig {
            name: "IDEX CDI General".to_string(),
            excluded_issuers: excluded.clone(),
            spread_column: CDI_SPREAD_COLUMN.to_string(),
        },
        CreditIndexConfig {
            name: "IDEX CDI Low Rated".to_string(),
            excluded_issuers: excluded,
            spread_column: CDI_SPREAD_COLUMN.to_string(),
        },
        CreditIndexConfig {
            name: "IDEX INFRA".to_string(),
            excluded_issuers: Vec::new(),
            spread_column: NTNB_SPREAD_COLUMN.to_string(),
        },
    ]
}

impl Default for CreditConfig {
    fn default() -> Self {
        Self {
            indices: default_indices(),
        }
    }
}

impl CreditConfig {
    /// Looks up an index by name, case-insensitively.
    #[must_use]
    pub fn index(&self, name: &str) -> Option<&CreditIndexConfig> {
        self.indices.iter().find(|i| i.name.eq_ignore_ascii_case(name))
    }
}

impl Validate for CreditConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for (i, index) in self.indices.iter().enumerate() {
            if index.name.trim().is_empty() {
                errors.push(ValidationError::new(format!("indices[{i}].name"), "Name cannot be empty"));
            }
            if index.spread_column.trim().is_empty() {
                errors.push(ValidationError::new(
                    format!("indices[{i}].spread_column"),
                    "Spread column cannot be empty",
                ));
            }
            if self.indices[..i].iter().any(|other| other.name == index.name) {
                errors.push(ValidationError::with_rule(
                    format!("indices[{i}].name"),
                    format!("Duplicate index name '{}'", index.name),
                    "unique_names",
                ));
            }
        }
        errors
    }
}

// =============================================================================
// RATIO
// =============================================================================

/// Pair-ratio settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatioConfig {
    /// Rolling window in observations.
    #[serde(default = "default_ratio_window")]
    pub window: usize,

    /// Smallest window a caller may request.
    #[serde(default = "default_min_window")]
    pub min_window: usize,

    /// Largest window a caller may request.
    #[serde(default = "default_max_window")]
    pub max_window: usize,
}

fn default_ratio_window() -> usize {
    DEFAULT_RATIO_WINDOW
}

fn default_min_window() -> usize {
    20
}

fn default_max_window() -> usize {
    500
}

impl Default for RatioConfig {
    fn default() -> Self {
        Self {
            window: default_ratio_window(),
            min_window: default_min_window(),
            max_window: default_max_window(),
        }
    }
}

impl RatioConfig {
    /// True when `window` is within the allowed range.
    #[must_use]
    pub fn allows(&self, window: usize) -> bool {
        (self.min_window..=self.max_window).contains(&window)
    }
}

impl Validate for RatioConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.min_window == 0 || self.min_window > self.max_window {
            errors.push(ValidationError::with_rule(
                "min_window",
                "Window range must satisfy 0 < min_window <= max_window",
                "valid_range",
            ));
        } else if !self.allows(self.window) {
            errors.push(ValidationError::with_rule(
                "window",
                format!(
                    "Window must be between {} and {}",
                    self.min_window, self.max_window
                ),
                "window_in_range",
            ));
        }
        errors
    }
}

// =============================================================================
// BREADTH
// =============================================================================

/// Market breadth settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreadthConfig {
    /// Moving-average length in observations.
    #[serde(default = "default_breadth_window")]
    pub window: usize,

    /// First date shown.
    #[serde(default = "default_start_floor")]
    pub start_floor: Option<Date>,

    /// Histogram bins for the distribution view.
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,

    /// Universe width above which the `parallel` feature kicks in.
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

fn default_breadth_window() -> usize {
    DEFAULT_BREADTH_WINDOW
}

fn default_start_floor() -> Option<Date> {
    BreadthParams::default().start_floor
}

fn default_histogram_bins() -> usize {
    DEFAULT_HISTOGRAM_BINS
}

fn default_parallel_threshold() -> usize {
    DEFAULT_PARALLEL_THRESHOLD
}

impl Default for BreadthConfig {
    fn default() -> Self {
        Self {
            window: default_breadth_window(),
            start_floor: default_start_floor(),
            histogram_bins: default_histogram_bins(),
            parallel_threshold: default_parallel_threshold(),
        }
    }
}

impl BreadthConfig {
    /// Calculation parameters.
    #[must_use]
    pub fn params(&self) -> BreadthParams {
        BreadthParams {
            window: self.window,
            start_floor: self.start_floor,
            parallel_threshold: self.parallel_threshold,
        }
    }
}

impl Validate for BreadthConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.window == 0 {
            errors.push(ValidationError::with_rule("window", "Window must be positive", "positive_window"));
        }
        if self.histogram_bins == 0 {
            errors.push(ValidationError::with_rule(
                "histogram_bins",
                "At least one histogram bin is required",
                "positive_bins",
            ));
        }
        errors
    }
}

// =============================================================================
// HISTORY
// =============================================================================

/// Per-maturity history settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Instrument types offered for history views.
    #[serde(default = "default_history_types")]
    pub instrument_types: Vec<InstrumentType>,

    /// Maturity years preselected when none are given.
    #[serde(default = "default_maturity_years")]
    pub maturity_years: Vec<i32>,
}

fn default_history_types() -> Vec<InstrumentType> {
    vec![InstrumentType::Ipca, InstrumentType::IpcaJurosSemestrais]
}

fn default_maturity_years() -> Vec<i32> {
    DEFAULT_MATURITY_YEARS.to_vec()
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            instrument_types: default_history_types(),
            maturity_years: default_maturity_years(),
        }
    }
}

impl Validate for HistoryConfig {
    fn validate(&self) -> Vec<ValidationError> {
        if self.instrument_types.is_empty() {
            vec![ValidationError::new("instrument_types", "At least one instrument type is required")]
        } else {
            Vec::new()
        }
    }
}

// =============================================================================
// CACHE
// =============================================================================

/// Memoization settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether results are memoized at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Entry lifetime in seconds.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_ttl_secs() -> u64 {
    4 * 60 * 60
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl CacheConfig {
    /// Entry lifetime.
    #[must_use]
    pub fn ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.ttl_secs)
    }
}

impl Validate for CacheConfig {
    fn validate(&self) -> Vec<ValidationError> {
        if self.enabled && self.ttl_secs == 0 {
            vec![ValidationError::with_rule(
                "ttl_secs",
                "TTL must be positive when caching is enabled",
                "positive_ttl",
            )]
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(TenorConfig::default().horizon_years, 10);
        assert_eq!(BreakevenConfig::default().max_gap_days, 550);
        assert_eq!(RatioConfig::default().window, 252);
        assert_eq!(BreadthConfig::default().window, 200);
        assert_eq!(
            BreadthConfig::default().start_floor,
            Some(Date::from_ymd(2014, 1, 1).unwrap())
        );
        assert_eq!(BreadthConfig::default().histogram_bins, 50);
        assert_eq!(CacheConfig::default().ttl_secs, 14_400);
        assert_eq!(CreditConfig::default().indices.len(), 3);
        assert_eq!(HistoryConfig::default().maturity_years, vec![2030, 2035, 2040, 2045, 2060]);
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(TenorConfig::default().is_valid());
        assert!(BreakevenConfig::default().is_valid());
        assert!(CurveConfig::default().is_valid());
        assert!(CreditConfig::default().is_valid());
        assert!(RatioConfig::default().is_valid());
        assert!(BreadthConfig::default().is_valid());
        assert!(HistoryConfig::default().is_valid());
        assert!(CacheConfig::default().is_valid());
    }

    #[test]
    fn test_ratio_window_range() {
        let config = RatioConfig {
            window: 10,
            ..RatioConfig::default()
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "window");
        assert!(RatioConfig::default().allows(20));
        assert!(!RatioConfig::default().allows(501));
    }

    #[test]
    fn test_breakeven_sides_must_be_disjoint() {
        let config = BreakevenConfig {
            fixed_types: vec![InstrumentType::Ipca],
            ..BreakevenConfig::default()
        };
        assert!(config
            .validate()
            .iter()
            .any(|e| e.rule.as_deref() == Some("disjoint_sides")));
    }

    #[test]
    fn test_credit_lookup_and_spec() {
        let config = CreditConfig::default();
        let infra = config.index("idex infra").unwrap();
        assert_eq!(infra.spread_column, NTNB_SPREAD_COLUMN);
        assert!(infra.spec().excluded_issuers.is_empty());

        let general = config.index("IDEX CDI General").unwrap();
        assert_eq!(general.spec().excluded_issuers.len(), 4);
    }

    #[test]
    fn test_duplicate_index_names_rejected() {
        let mut config = CreditConfig::default();
        config.indices.push(config.indices[0].clone());
        assert!(!config.is_valid());
    }

    #[test]
    fn test_breadth_params() {
        let params = BreadthConfig::default().params();
        assert_eq!(params.window, 200);
        assert_eq!(params.parallel_threshold, DEFAULT_PARALLEL_THRESHOLD);
    }
}
