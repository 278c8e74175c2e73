//! Breadth command implementation.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use curvewatch_core::Date;

use super::{parse_date, Context};
use crate::cli::OutputFormat;
use crate::output::{fmt_number, print_header, print_json, print_key_values, print_output, KeyValue};

/// Arguments for the breadth command.
#[derive(Args, Debug)]
pub struct BreadthArgs {
    /// Wide price history CSV (date column, one column per ticker)
    #[arg(short, long, env = "CURVEWATCH_PRICES")]
    pub prices: PathBuf,

    /// Moving-average length in observations
    #[arg(short, long)]
    pub window: Option<usize>,

    /// First date shown (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub since: Option<Date>,

    /// Print the distribution histogram
    #[arg(long)]
    pub histogram: bool,

    /// Histogram bins
    #[arg(long)]
    pub bins: Option<usize>,
}

#[derive(Debug, Serialize, Tabled)]
struct BinRow {
    #[tabled(rename = "From %", display_with = "fmt_number")]
    lower: f64,
    #[tabled(rename = "To %", display_with = "fmt_number")]
    upper: f64,
    #[tabled(rename = "Count")]
    count: usize,
    #[tabled(rename = "Current")]
    current: String,
}

/// Execute the breadth command.
pub fn execute(args: BreadthArgs, mut ctx: Context) -> Result<()> {
    let breadth_config = &mut ctx.config.breadth;
    if let Some(window) = args.window {
        breadth_config.window = window;
    }
    if args.since.is_some() {
        breadth_config.start_floor = args.since;
    }
    if let Some(bins) = args.bins {
        breadth_config.histogram_bins = bins;
    }

    let service = ctx.service_with_prices(&args.prices)?;
    let breadth = service.market_breadth()?;

    if args.histogram {
        let dist = service.breadth_distribution()?;
        let bin = dist.histogram.bin_of(dist.current);
        let rows: Vec<BinRow> = dist
            .histogram
            .counts
            .iter()
            .enumerate()
            .map(|(i, &count)| BinRow {
                lower: dist.histogram.edges[i],
                upper: dist.histogram.edges[i + 1],
                count,
                current: if bin == Some(i) { "◀".to_string() } else { String::new() },
            })
            .collect();
        if ctx.format == OutputFormat::Table {
            print_header(&format!(
                "Breadth distribution (median {}, current {})",
                fmt_number(&dist.median),
                fmt_number(&dist.current)
            ));
        }
        return print_output(&rows, ctx.format);
    }

    match ctx.format {
        OutputFormat::Json => print_json(&breadth),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            wtr.write_record(["date", "pct_above"])?;
            for (date, pct) in breadth.series.iter() {
                wtr.write_record([date.to_string(), pct.to_string()])?;
            }
            wtr.flush()?;
            Ok(())
        }
        OutputFormat::Table => {
            let mut results = vec![
                KeyValue::new("Universe", breadth.universe_size),
                KeyValue::new("Window", breadth.window),
                KeyValue::new("Dates", breadth.series.len()),
            ];
            if let Some((date, pct)) = breadth.current() {
                results.push(KeyValue::new("Current", format!("{}% ({date})", fmt_number(&pct))));
            }
            results.push(KeyValue::optional("Median %", breadth.median()));
            print_key_values(&results, "Market breadth", ctx.format)
        }
    }
}
