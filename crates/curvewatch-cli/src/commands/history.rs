//! History command implementation.

use anyhow::Result;
use clap::{Args, ValueEnum};
use serde::Serialize;
use tabled::Tabled;

use curvewatch_analytics::history::HistoryMetric;
use curvewatch_core::Date;

use super::{BondChoice, Context, QuotesArg};
use crate::output::{fmt_number, print_output};

/// Arguments for the history command.
#[derive(Args, Debug)]
pub struct HistoryArgs {
    #[command(flatten)]
    pub quotes: QuotesArg,

    /// Maturity years (comma-separated); defaults to the configured years
    #[arg(short = 'y', long, value_delimiter = ',')]
    pub years: Vec<i32>,

    /// Bond types (comma-separated); defaults to the configured types
    #[arg(short = 't', long = "types", value_enum, value_delimiter = ',')]
    pub bonds: Vec<BondChoice>,

    /// Field to chart
    #[arg(short, long, value_enum, default_value = "rate")]
    pub metric: MetricChoice,

    /// Show only the last N dates of each bond
    #[arg(short = 'n', long, default_value = "5")]
    pub last: usize,
}

/// Metric choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MetricChoice {
    /// Purchase rate
    Rate,
    /// Purchase unit price
    Price,
}

impl From<MetricChoice> for HistoryMetric {
    fn from(choice: MetricChoice) -> Self {
        match choice {
            MetricChoice::Rate => HistoryMetric::PurchaseRate,
            MetricChoice::Price => HistoryMetric::UnitPrice,
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
struct HistoryRow {
    #[tabled(rename = "Bond")]
    bond: String,
    #[tabled(rename = "Maturity")]
    maturity_date: Date,
    #[tabled(rename = "Date")]
    quote_date: Date,
    #[tabled(rename = "Value", display_with = "fmt_number")]
    value: f64,
}

/// Execute the history command.
pub fn execute(args: HistoryArgs, mut ctx: Context) -> Result<()> {
    if !args.bonds.is_empty() {
        ctx.config.history.instrument_types = args.bonds.iter().map(|&b| b.into()).collect();
    }
    let service = ctx.service_with_quotes(&args.quotes.quotes)?;
    let histories = service.maturity_history(&args.years, args.metric.into())?;

    let rows: Vec<HistoryRow> = histories
        .iter()
        .flat_map(|history| {
            let skip = history.series.len().saturating_sub(args.last);
            history.series.iter().skip(skip).map(|(date, value)| HistoryRow {
                bond: history.series.name().to_string(),
                maturity_date: history.maturity_date,
                quote_date: date,
                value,
            })
        })
        .collect();
    print_output(&rows, ctx.format)
}
