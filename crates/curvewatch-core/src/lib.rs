//! # Curvewatch Core
//!
//! Core types shared by every Curvewatch crate.
//!
//! - **Types**: `Date`, instrument types, quote records, credit constituents,
//!   date-indexed series and price matrices
//! - **Calendars**: weekday-only business day counting
//! - **Dataset**: normalization of raw Treasury export rows into a typed
//!   `QuoteTable`
//! - **Traits**: the price-history provider seam
//!
//! ## Example
//!
//! ```rust
//! use curvewatch_core::prelude::*;
//!
//! let rows = vec![RawQuoteRow {
//!     instrument_type: "Tesouro Prefixado".into(),
//!     maturity_date: "01/01/2031".into(),
//!     quote_date: "02/01/2025".into(),
//!     purchase_rate: "15,12".into(),
//!     unit_price: "412,33".into(),
//!     ..RawQuoteRow::default()
//! }];
//!
//! let table = QuoteTable::from_rows(rows).unwrap();
//! assert_eq!(table.len(), 1);
//! assert_eq!(table.records()[0].instrument_type, InstrumentType::Prefixado);
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
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::return_self_not_must_use)]

pub mod calendars;
pub mod dataset;
pub mod error;
pub mod traits;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calendars::{Calendar, WeekendCalendar};
    pub use crate::dataset::{QuoteSnapshot, QuoteTable, RawQuoteRow};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::traits::{InMemoryPriceSource, PriceHistorySource};
    pub use crate::types::{
        CreditConstituent, Date, InstrumentType, PriceTable, QuoteRecord, Series,
    };
}

// Re-export commonly used types at crate root
pub use error::{CoreError, CoreResult};
pub use types::{CreditConstituent, Date, InstrumentType, PriceTable, QuoteRecord, Series};
