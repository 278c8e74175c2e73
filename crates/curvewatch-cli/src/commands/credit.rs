//! Credit command implementation.
//!
//! Each `--index NAME=PATH` loads one constituent file; the indices are
//! aggregated and joined by date.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;

use super::Context;
use crate::error::CliError;
use crate::output::print_panel;

/// Arguments for the credit command.
#[derive(Args, Debug)]
pub struct CreditArgs {
    /// Configured index name and its constituent file, as NAME=PATH
    #[arg(short, long = "index", value_parser = parse_index_file, required = true)]
    pub indices: Vec<(String, PathBuf)>,

    /// Show only the last N dates
    #[arg(short = 'n', long)]
    pub last: Option<usize>,
}

fn parse_index_file(s: &str) -> Result<(String, PathBuf), CliError> {
    match s.split_once('=') {
        Some((name, path)) if !name.trim().is_empty() && !path.trim().is_empty() => {
            Ok((name.trim().to_string(), PathBuf::from(path.trim())))
        }
        _ => Err(CliError::InvalidIndexFile(s.to_string())),
    }
}

/// Execute the credit command.
pub fn execute(args: CreditArgs, ctx: Context) -> Result<()> {
    let mut service = ctx.service()?;
    let mut names = Vec::with_capacity(args.indices.len());

    for (name, path) in &args.indices {
        let index = ctx
            .config
            .credit
            .index(name)
            .with_context(|| format!("unknown credit index '{name}'"))?;
        let rows = curvewatch_ext_file::load_credit_constituents(path, &index.spread_column)
            .with_context(|| format!("loading {}", path.display()))?;
        service.set_credit_index(name, rows)?;
        names.push(index.name.clone());
    }

    let panel = service.credit_panel(&names)?;
    let panel = match args.last {
        Some(n) => panel.last_rows(n),
        None => panel,
    };
    print_panel(&panel, ctx.format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_index_file() {
        let (name, path) = parse_index_file("IDEX INFRA=data/infra.csv").unwrap();
        assert_eq!(name, "IDEX INFRA");
        assert_eq!(path, PathBuf::from("data/infra.csv"));
        assert!(parse_index_file("no-separator").is_err());
        assert!(parse_index_file("=path").is_err());
    }
}
