//! Tenor command implementation.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use curvewatch_core::{Date, InstrumentType};

use super::{tail, BondChoice, Context, QuotesArg};
use crate::output::{fmt_number, print_output};

/// Arguments for the tenor command.
#[derive(Args, Debug)]
pub struct TenorArgs {
    #[command(flatten)]
    pub quotes: QuotesArg,

    /// Bond type; defaults to the configured nominal type
    #[arg(short = 't', long = "type", value_enum)]
    pub bond: Option<BondChoice>,

    /// Horizon in years
    #[arg(short = 'y', long)]
    pub years: Option<i32>,

    /// Show only the last N dates
    #[arg(short = 'n', long)]
    pub last: Option<usize>,
}

#[derive(Debug, Serialize, Tabled)]
struct TenorRow {
    #[tabled(rename = "Date")]
    quote_date: Date,
    #[tabled(rename = "Maturity")]
    maturity_date: Date,
    #[tabled(rename = "Rate %", display_with = "fmt_number")]
    purchase_rate: f64,
}

/// Execute the tenor command.
pub fn execute(args: TenorArgs, mut ctx: Context) -> Result<()> {
    if let Some(years) = args.years {
        ctx.config.tenor.horizon_years = years;
    }
    let instrument_type: InstrumentType = args
        .bond
        .map_or_else(|| ctx.config.tenor.nominal_rate_type.clone(), Into::into);

    let service = ctx.service_with_quotes(&args.quotes.quotes)?;
    let series = service.tenor_series(&instrument_type)?;
    tracing::info!(
        "{} {}y: {} dates",
        instrument_type,
        series.horizon_years,
        series.points.len()
    );

    let rows: Vec<TenorRow> = series
        .points
        .iter()
        .map(|p| TenorRow {
            quote_date: p.quote_date,
            maturity_date: p.maturity_date,
            purchase_rate: p.purchase_rate,
        })
        .collect();
    print_output(&tail(rows, args.last), ctx.format)
}
