//! # Curvewatch Config
//!
//! Tunables for every Curvewatch analytic, loadable from TOML or JSON.
//!
//! - **Sections**: tenor, breakeven, curve, credit, ratio, breadth, history
//!   and cache settings, each with defaults matching the monitor's
//!   standard views
//! - **Validation**: every section implements [`Validate`]; errors are
//!   reported with a `section.field` path
//!
//! ## Example
//!
//! ```toml
//! [breakeven]
//! max_gap_days = 550
//!
//! [ratio]
//! window = 252
//!
//! [[credit.indices]]
//! name = "IDEX INFRA"
//! spread_column = "MID spread (Bps/NTNB)"
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]

pub mod analytics;
pub mod error;
pub mod sections;

pub use analytics::AnalyticsConfig;
pub use error::{ConfigError, ConfigResult, Validate, ValidationError};
pub use sections::{
    BreadthConfig, BreakevenConfig, CacheConfig, CreditConfig, CreditIndexConfig, CurveConfig,
    HistoryConfig, RatioConfig, TenorConfig,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::analytics::AnalyticsConfig;
    pub use crate::error::{ConfigError, ConfigResult, Validate, ValidationError};
    pub use crate::sections::*;
}
