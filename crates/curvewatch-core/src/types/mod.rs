//! Domain types.

mod date;
mod instrument;
mod price_table;
mod quote;
mod series;

pub use date::Date;
pub use instrument::InstrumentType;
pub use price_table::PriceTable;
pub use quote::{CreditConstituent, QuoteRecord};
pub use series::Series;
