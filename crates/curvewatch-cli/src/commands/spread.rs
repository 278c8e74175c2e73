//! Spread command implementation.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use curvewatch_core::Date;

use super::{tail, Context, QuotesArg};
use crate::cli::OutputFormat;
use crate::output::{fmt_number, print_header, print_output, print_warning};

/// Arguments for the spread command.
#[derive(Args, Debug)]
pub struct SpreadArgs {
    #[command(flatten)]
    pub quotes: QuotesArg,

    /// Date/value file with the foreign yield (e.g. a FRED DFII10 export)
    #[arg(long)]
    pub foreign: PathBuf,

    /// Label for the foreign series; defaults to its column header
    #[arg(long)]
    pub foreign_name: Option<String>,

    /// Show only the last N dates
    #[arg(short = 'n', long)]
    pub last: Option<usize>,
}

#[derive(Debug, Serialize, Tabled)]
struct SpreadRow {
    #[tabled(rename = "Date")]
    date: Date,
    #[tabled(rename = "Spread (pp)", display_with = "fmt_number")]
    spread: f64,
}

/// Execute the spread command.
pub fn execute(args: SpreadArgs, ctx: Context) -> Result<()> {
    let foreign = curvewatch_ext_file::load_series(&args.foreign, args.foreign_name.as_deref())
        .with_context(|| format!("loading {}", args.foreign.display()))?;
    let service = ctx.service_with_quotes(&args.quotes.quotes)?;
    let spread = service.real_rate_spread(&foreign)?;

    if spread.is_empty() {
        print_warning("The real-rate tenor series and the foreign series share no dates.");
    }
    if ctx.format == OutputFormat::Table {
        print_header(&format!(
            "{}y {} minus {}",
            ctx.config.tenor.horizon_years,
            ctx.config.tenor.real_rate_type.short_name(),
            foreign.name()
        ));
    }
    let rows: Vec<SpreadRow> = spread
        .iter()
        .map(|(date, spread)| SpreadRow { date, spread })
        .collect();
    print_output(&tail(rows, args.last), ctx.format)
}
