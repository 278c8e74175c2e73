//! # Curvewatch Analytics
//!
//! Batch analytics over Brazilian Treasury quotes, credit index
//! constituents and equity price histories.
//!
//! - **Tenor**: nearest-to-horizon maturity selection and tenor series
//! - **Breakeven**: implied inflation from nominal and IPCA-linked bonds
//! - **Curve**: multi-date yield curve snapshots in business days
//! - **Credit**: weighted index spreads with issuer exclusions
//! - **Ratio**: rolling and static bands on a pair's price ratio
//! - **Breadth**: share of a universe above its moving average
//! - **History** and **Panel**: per-maturity histories, spreads between
//!   series and forward-filled macro panels
//!
//! Every function is a pure transform of immutable inputs. Empty inputs are
//! valid and produce empty outputs.
//!
//! ## Example
//!
//! ```rust
//! use curvewatch_analytics::prelude::*;
//! use curvewatch_core::prelude::*;
//! use rust_decimal::Decimal;
//!
//! let quote_date = Date::from_ymd(2025, 6, 2).unwrap();
//! let table = QuoteTable::from_records(vec![
//!     QuoteRecord::new(
//!         InstrumentType::Prefixado,
//!         quote_date,
//!         Date::from_ymd(2032, 1, 1).unwrap(),
//!         10.0,
//!         Decimal::ONE,
//!     ),
//!     QuoteRecord::new(
//!         InstrumentType::IpcaJurosSemestrais,
//!         quote_date,
//!         Date::from_ymd(2032, 8, 15).unwrap(),
//!         5.0,
//!         Decimal::ONE,
//!     ),
//! ]);
//!
//! let points = implied_inflation_latest(&table, &BreakevenParams::default()).unwrap();
//! assert_eq!(points.len(), 1);
//! assert!((points[0].breakeven - 4.7619).abs() < 1e-4);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]

pub mod breadth;
pub mod breakeven;
pub mod credit;
pub mod curve;
pub mod error;
pub mod history;
pub mod panel;
pub mod parallel;
pub mod ratio;
pub mod tenor;

pub use error::{AnalyticsError, AnalyticsResult};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::breadth::{market_breadth, BreadthDistribution, BreadthParams, BreadthSeries};
    pub use crate::breakeven::{
        breakeven_rate, implied_inflation, implied_inflation_latest, BreakevenParams,
        BreakevenPoint,
    };
    pub use crate::credit::{aggregate, credit_panel, IndexSpec};
    pub use crate::curve::{
        curve_snapshots, long_horizon_offsets, short_horizon_offsets, CurveOffset, CurvePoint,
        CurveSnapshot, NamedOffset,
    };
    pub use crate::error::{AnalyticsError, AnalyticsResult};
    pub use crate::history::{
        maturities_in_years, maturity_history, HistoryMetric, MaturityHistory,
    };
    pub use crate::panel::{spread_between, SeriesPanel};
    pub use crate::ratio::{ratio_metrics, RatioKpis, RatioMetrics, RatioPoint, StaticBands};
    pub use crate::tenor::{
        nearest_maturity, nearest_to, tenor_series, TenorPoint, TenorSeries, TieBreak,
    };
}
