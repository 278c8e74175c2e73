//! Macro command implementation.
//!
//! Aligns any number of external date/value files (central bank or FRED
//! exports) into one panel.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;

use curvewatch_analytics::panel::SeriesPanel;

use super::Context;
use crate::output::print_panel;

/// Arguments for the macro command.
#[derive(Args, Debug)]
pub struct MacroArgs {
    /// Date/value files, one series each
    #[arg(short, long = "series", required = true, num_args = 1..)]
    pub series: Vec<PathBuf>,

    /// Keep only the trailing N calendar days of each series
    #[arg(short, long)]
    pub days: Option<i64>,

    /// Keep dates where some series has not started yet
    #[arg(long)]
    pub keep_gaps: bool,

    /// Show only the last N dates
    #[arg(short = 'n', long)]
    pub last: Option<usize>,
}

/// Execute the macro command.
pub fn execute(args: MacroArgs, ctx: Context) -> Result<()> {
    let mut loaded = Vec::with_capacity(args.series.len());
    for path in &args.series {
        let series = curvewatch_ext_file::load_series(path, None)
            .with_context(|| format!("loading {}", path.display()))?;
        tracing::debug!(name = series.name(), points = series.len(), "loaded macro series");
        loaded.push(match args.days {
            Some(days) => series.trailing(days),
            None => series,
        });
    }

    let mut panel = if args.keep_gaps {
        SeriesPanel::outer_join(&loaded).forward_fill()
    } else {
        SeriesPanel::aligned(&loaded)
    };
    if let Some(n) = args.last {
        panel = panel.last_rows(n);
    }
    print_panel(&panel, ctx.format)
}
