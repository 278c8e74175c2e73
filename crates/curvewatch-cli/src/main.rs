//! Curvewatch CLI - Command-line interface for the market monitor analytics.
//!
//! # Usage
//!
//! ```bash
//! # Implied inflation from the latest Treasury quotes
//! curvewatch breakeven --quotes precotaxatesourodireto.csv
//!
//! # 10-year NTN-B real rate over the last 20 days
//! curvewatch tenor -q precotaxatesourodireto.csv --type ntnb -n 20
//!
//! # Credit index spreads
//! curvewatch credit --index "IDEX INFRA=idex_infra.csv"
//!
//! # Gold/silver ratio statistics
//! curvewatch ratio --prices closes.csv GC=F SI=F --window 252
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands};
use commands::Context;

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn,curvewatch=info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ctx = Context::load(cli.config.as_deref(), cli.format)?;

    match cli.command {
        Commands::Breakeven(args) => commands::breakeven::execute(args, ctx)?,
        Commands::Tenor(args) => commands::tenor::execute(args, ctx)?,
        Commands::Curve(args) => commands::curve::execute(args, ctx)?,
        Commands::History(args) => commands::history::execute(args, ctx)?,
        Commands::Credit(args) => commands::credit::execute(args, ctx)?,
        Commands::Ratio(args) => commands::ratio::execute(args, ctx)?,
        Commands::Breadth(args) => commands::breadth::execute(args, ctx)?,
        Commands::Spread(args) => commands::spread::execute(args, ctx)?,
        Commands::Macro(args) => commands::macros::execute(args, ctx)?,
        Commands::Config(args) => commands::config::execute(args, ctx)?,
    }

    Ok(())
}
