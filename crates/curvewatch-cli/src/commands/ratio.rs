//! Ratio command implementation.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use curvewatch_analytics::ratio::{RatioKpis, RatioMetrics, RatioPoint, StaticBands};
use curvewatch_core::Date;

use super::{tail, Context};
use crate::cli::OutputFormat;
use crate::output::{fmt_number, fmt_opt, print_header, print_json, print_key_values, print_output, KeyValue};

/// Arguments for the ratio command.
#[derive(Args, Debug)]
pub struct RatioArgs {
    /// Wide price history CSV (date column, one column per ticker)
    #[arg(short, long, env = "CURVEWATCH_PRICES")]
    pub prices: PathBuf,

    /// Numerator ticker
    pub numerator: String,

    /// Denominator ticker
    pub denominator: String,

    /// Rolling window in observations
    #[arg(short, long)]
    pub window: Option<usize>,

    /// Also print the last N ratio points
    #[arg(short = 'n', long)]
    pub last: Option<usize>,
}

#[derive(Debug, Serialize, Tabled)]
struct RatioRow {
    #[tabled(rename = "Date")]
    date: Date,
    #[tabled(rename = "Ratio", display_with = "fmt_number")]
    ratio: f64,
    #[tabled(rename = "Mean", display_with = "fmt_opt")]
    rolling_mean: Option<f64>,
    #[tabled(rename = "Upper", display_with = "fmt_opt")]
    rolling_upper: Option<f64>,
    #[tabled(rename = "Lower", display_with = "fmt_opt")]
    rolling_lower: Option<f64>,
}

impl From<&RatioPoint> for RatioRow {
    fn from(p: &RatioPoint) -> Self {
        Self {
            date: p.date,
            ratio: p.ratio,
            rolling_mean: p.rolling_mean,
            rolling_upper: p.rolling_upper,
            rolling_lower: p.rolling_lower,
        }
    }
}

#[derive(Serialize)]
struct RatioReport<'a> {
    pair: String,
    window: usize,
    kpis: Option<RatioKpis>,
    static_bands: Option<StaticBands>,
    points: Vec<&'a RatioPoint>,
}

fn summary(metrics: &RatioMetrics) -> Vec<KeyValue> {
    let mut results = vec![
        KeyValue::new("Pair", format!("{}/{}", metrics.numerator, metrics.denominator)),
        KeyValue::new("Window", metrics.window),
        KeyValue::new("Observations", metrics.points.len()),
    ];
    if let Some(kpis) = metrics.kpis() {
        results.extend([
            KeyValue::new("Current", format!("{} ({})", fmt_number(&kpis.current), kpis.current_date)),
            KeyValue::number("Mean", kpis.mean),
            KeyValue::new("Min", format!("{} ({})", fmt_number(&kpis.min), kpis.min_date)),
            KeyValue::new("Max", format!("{} ({})", fmt_number(&kpis.max), kpis.max_date)),
            KeyValue::new("To mean", format!("{:+.2}%", kpis.pct_to_mean)),
        ]);
    }
    if let Some(bands) = metrics.static_bands {
        results.extend([
            KeyValue::number("Median", bands.median),
            KeyValue::optional("Median +1σ", bands.upper_1x),
            KeyValue::optional("Median -1σ", bands.lower_1x),
            KeyValue::optional("Median +2σ", bands.upper_2x),
            KeyValue::optional("Median -2σ", bands.lower_2x),
        ]);
    }
    if let Some(last) = metrics.points.last() {
        results.extend([
            KeyValue::optional("Rolling mean", last.rolling_mean),
            KeyValue::optional("Rolling +2σ", last.rolling_upper),
            KeyValue::optional("Rolling -2σ", last.rolling_lower),
        ]);
    }
    results
}

/// Execute the ratio command.
pub fn execute(args: RatioArgs, ctx: Context) -> Result<()> {
    let service = ctx.service_with_prices(&args.prices)?;
    let metrics = service.ratio(&args.numerator, &args.denominator, args.window)?;
    let recent: Vec<&RatioPoint> = tail(metrics.points.iter().collect(), args.last.or(Some(0)));

    match ctx.format {
        OutputFormat::Json => print_json(&RatioReport {
            pair: format!("{}/{}", metrics.numerator, metrics.denominator),
            window: metrics.window,
            kpis: metrics.kpis(),
            static_bands: metrics.static_bands,
            points: recent,
        }),
        OutputFormat::Csv => {
            let rows: Vec<RatioRow> = tail(metrics.points.iter().collect(), args.last)
                .into_iter()
                .map(RatioRow::from)
                .collect();
            print_output(&rows, ctx.format)
        }
        OutputFormat::Table => {
            print_key_values(&summary(&metrics), "Ratio", ctx.format)?;
            if !recent.is_empty() {
                print_header("Recent points");
                let rows: Vec<RatioRow> = recent.into_iter().map(RatioRow::from).collect();
                print_output(&rows, ctx.format)?;
            }
            Ok(())
        }
    }
}
