//! Provider seams for data the core does not fetch itself.

use crate::error::CoreResult;
use crate::types::{Date, PriceTable};

/// Source of adjusted close price histories.
///
/// Implementations may fetch tickers in parallel and in any order; the
/// returned table is keyed by ticker and date, never by arrival position.
/// Tickers the source does not know are simply absent from the table.
pub trait PriceHistorySource: Send + Sync {
    /// Name of the source, for logs.
    fn name(&self) -> &str;

    /// Prices for `tickers` with `start <= date <= end`.
    fn price_history(&self, tickers: &[String], start: Date, end: Date) -> CoreResult<PriceTable>;
}

/// A source backed by a table already in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPriceSource {
    table: PriceTable,
}

impl InMemoryPriceSource {
    /// Wraps a price table.
    #[must_use]
    pub fn new(table: PriceTable) -> Self {
        Self { table }
    }
}

impl PriceHistorySource for InMemoryPriceSource {
    fn name(&self) -> &str {
        "in-memory"
    }

    fn price_history(&self, tickers: &[String], start: Date, end: Date) -> CoreResult<PriceTable> {
        Ok(self.table.select(tickers).between(start, end))
    }
}
