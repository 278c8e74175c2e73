//! Breakeven command implementation.
//!
//! Pairs each nominal bond on the latest quote date with the nearest
//! IPCA-linked bond and prints the implied inflation.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use curvewatch_analytics::breakeven::BreakevenPoint;
use curvewatch_core::Date;

use super::{Context, QuotesArg};
use crate::output::{fmt_number, print_header, print_output, print_warning};
use crate::cli::OutputFormat;

/// Arguments for the breakeven command.
#[derive(Args, Debug)]
pub struct BreakevenArgs {
    #[command(flatten)]
    pub quotes: QuotesArg,

    /// Drop pairs whose maturities are this many days apart or more
    #[arg(long)]
    pub max_gap_days: Option<i64>,
}

#[derive(Debug, Serialize, Tabled)]
struct BreakevenRow {
    #[tabled(rename = "Maturity")]
    fixed_maturity: Date,
    #[tabled(rename = "Nominal %", display_with = "fmt_number")]
    fixed_rate: f64,
    #[tabled(rename = "Linked bond")]
    linked_bond: String,
    #[tabled(rename = "Linked maturity")]
    linked_maturity: Date,
    #[tabled(rename = "Real %", display_with = "fmt_number")]
    linked_rate: f64,
    #[tabled(rename = "Gap (days)")]
    gap_days: i64,
    #[tabled(rename = "Breakeven %", display_with = "fmt_number")]
    breakeven: f64,
}

impl From<&BreakevenPoint> for BreakevenRow {
    fn from(p: &BreakevenPoint) -> Self {
        Self {
            fixed_maturity: p.fixed_maturity,
            fixed_rate: p.fixed_rate,
            linked_bond: p.linked_type.short_name().to_string(),
            linked_maturity: p.linked_maturity,
            linked_rate: p.linked_rate,
            gap_days: p.gap_days(),
            breakeven: p.breakeven,
        }
    }
}

/// Execute the breakeven command.
pub fn execute(args: BreakevenArgs, mut ctx: Context) -> Result<()> {
    if let Some(gap) = args.max_gap_days {
        ctx.config.breakeven.max_gap_days = gap;
    }
    let service = ctx.service_with_quotes(&args.quotes.quotes)?;
    let points = service.implied_inflation()?;

    if points.is_empty() {
        print_warning("No nominal/linked pairs within the maturity gap.");
    }
    if ctx.format == OutputFormat::Table {
        if let Some(first) = points.first() {
            print_header(&format!("Implied inflation on {}", first.quote_date));
        }
    }
    let rows: Vec<BreakevenRow> = points.iter().map(BreakevenRow::from).collect();
    print_output(&rows, ctx.format)
}
