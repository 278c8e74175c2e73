//! Curve command implementation.
//!
//! Prints the configured bond curve on the latest quote date and at each
//! look-back offset that resolves to a distinct earlier date.

use anyhow::Result;
use clap::{Args, ValueEnum};
use serde::Serialize;
use tabled::Tabled;

use curvewatch_core::Date;
use curvewatch_engine::CurveHorizon;

use super::{BondChoice, Context, QuotesArg};
use crate::output::{fmt_number, print_output};

/// Arguments for the curve command.
#[derive(Args, Debug)]
pub struct CurveArgs {
    #[command(flatten)]
    pub quotes: QuotesArg,

    /// Offset table
    #[arg(long, value_enum, default_value = "short")]
    pub horizon: HorizonChoice,

    /// Bond type; defaults to the configured curve type
    #[arg(short = 't', long = "type", value_enum)]
    pub bond: Option<BondChoice>,
}

/// Offset table choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HorizonChoice {
    /// Today and the previous five days
    Short,
    /// One week to one year back
    Long,
}

impl From<HorizonChoice> for CurveHorizon {
    fn from(choice: HorizonChoice) -> Self {
        match choice {
            HorizonChoice::Short => CurveHorizon::Short,
            HorizonChoice::Long => CurveHorizon::Long,
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
struct CurveRow {
    #[tabled(rename = "Curve")]
    label: String,
    #[tabled(rename = "Quote date")]
    quote_date: Date,
    #[tabled(rename = "Maturity")]
    maturity_date: Date,
    #[tabled(rename = "Business days")]
    business_days: i64,
    #[tabled(rename = "Rate %", display_with = "fmt_number")]
    purchase_rate: f64,
}

/// Execute the curve command.
pub fn execute(args: CurveArgs, mut ctx: Context) -> Result<()> {
    if let Some(bond) = args.bond {
        ctx.config.curve.instrument_type = bond.into();
    }
    let service = ctx.service_with_quotes(&args.quotes.quotes)?;
    let snapshots = service.curve_snapshots(args.horizon.into())?;

    let rows: Vec<CurveRow> = snapshots
        .iter()
        .flat_map(|snapshot| {
            snapshot.points.iter().map(|p| CurveRow {
                label: snapshot.label.clone(),
                quote_date: snapshot.quote_date,
                maturity_date: p.maturity_date,
                business_days: p.business_days,
                purchase_rate: p.purchase_rate,
            })
        })
        .collect();
    print_output(&rows, ctx.format)
}
