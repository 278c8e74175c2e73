//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::{
    BreadthArgs, BreakevenArgs, ConfigArgs, CreditArgs, CurveArgs, HistoryArgs, MacroArgs,
    RatioArgs, SpreadArgs, TenorArgs,
};

/// Curvewatch - Brazilian sovereign curve and market monitor analytics
#[derive(Parser)]
#[command(name = "curvewatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Analytics configuration file (.toml or .json)
    #[arg(short, long, env = "CURVEWATCH_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Implied inflation from nominal and IPCA-linked bonds
    Breakeven(BreakevenArgs),

    /// Rate history of the bond nearest a fixed horizon
    Tenor(TenorArgs),

    /// Yield curve snapshots at several look-back offsets
    Curve(CurveArgs),

    /// Rate or price history of selected maturities
    History(HistoryArgs),

    /// Weighted spreads of credit indices
    Credit(CreditArgs),

    /// Rolling and static statistics of a price ratio
    Ratio(RatioArgs),

    /// Share of a universe above its moving average
    Breadth(BreadthArgs),

    /// Local real rate minus a foreign yield
    Spread(SpreadArgs),

    /// Aligned panel of external macro series
    Macro(MacroArgs),

    /// Show, validate or write the analytics configuration
    Config(ConfigArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
}
