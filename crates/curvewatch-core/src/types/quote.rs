//! Bond quote and credit constituent records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Date, InstrumentType};

/// One daily quote for one bond.
///
/// Unique by `(instrument_type, quote_date, maturity_date)`: several
/// instrument types may share a maturity on the same day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRecord {
    /// Bond type.
    pub instrument_type: InstrumentType,
    /// Trade (base) date of the quote.
    pub quote_date: Date,
    /// Maturity date of the bond.
    pub maturity_date: Date,
    /// Morning purchase rate, % p.a.
    pub purchase_rate: f64,
    /// Morning purchase unit price.
    pub unit_price: Decimal,
    /// Morning sale rate, % p.a., when published.
    #[serde(default)]
    pub sale_rate: Option<f64>,
    /// Morning sale unit price, when published.
    #[serde(default)]
    pub sale_price: Option<Decimal>,
    /// Morning base unit price, when published.
    #[serde(default)]
    pub base_price: Option<Decimal>,
}

impl QuoteRecord {
    /// Creates a record with the mandatory fields only.
    #[must_use]
    pub fn new(
        instrument_type: InstrumentType,
        quote_date: Date,
        maturity_date: Date,
        purchase_rate: f64,
        unit_price: Decimal,
    ) -> Self {
        Self {
            instrument_type,
            quote_date,
            maturity_date,
            purchase_rate,
            unit_price,
            sale_rate: None,
            sale_price: None,
            base_price: None,
        }
    }

    /// The uniqueness key of this record.
    #[must_use]
    pub fn key(&self) -> (&InstrumentType, Date, Date) {
        (&self.instrument_type, self.quote_date, self.maturity_date)
    }
}

/// One constituent row of a credit index on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditConstituent {
    /// Date of the index composition.
    pub quote_date: Date,
    /// Issuer name or identifier.
    pub issuer_id: String,
    /// Weight in the index, in percent.
    pub weight_pct: f64,
    /// Spread of the constituent (% over CDI, or bps over NTN-B).
    pub spread_value: f64,
}

impl CreditConstituent {
    /// Creates a constituent row.
    #[must_use]
    pub fn new(
        quote_date: Date,
        issuer_id: impl Into<String>,
        weight_pct: f64,
        spread_value: f64,
    ) -> Self {
        Self {
            quote_date,
            issuer_id: issuer_id.into(),
            weight_pct,
            spread_value,
        }
    }
}
