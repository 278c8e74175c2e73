//! # Curvewatch Ext File
//!
//! CSV loaders feeding the Curvewatch analytics:
//! - Treasury price/rate export (`;`, decimal comma, Portuguese headers)
//! - Credit index constituents with a caller-chosen spread column
//! - Wide price histories, also usable as a [`PriceHistorySource`]
//! - Two-column date/value series
//!
//! Files separated by `;` or `,` are both accepted where the source
//! varies; the header line decides.
//!
//! [`PriceHistorySource`]: curvewatch_core::traits::PriceHistorySource

#![warn(missing_docs)]
#![warn(clippy::all)]

mod credit;
mod error;
mod prices;
mod reader;
mod series;
mod treasury;

pub use credit::*;
pub use error::{FileError, FileResult};
pub use prices::*;
pub use series::*;
pub use treasury::*;
