//! Config command implementation.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};

use curvewatch_config::AnalyticsConfig;

use super::Context;
use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::output::print_success;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config actions.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the active configuration (TOML, or JSON with `-f json`)
    Show,

    /// Check a configuration file
    Validate {
        /// File to check (.toml or .json)
        path: PathBuf,
    },

    /// Write the default configuration to a file
    Init {
        /// Destination (.toml or .json)
        #[arg(default_value = "curvewatch.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command.
pub fn execute(args: ConfigArgs, ctx: Context) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            let text = match ctx.format {
                OutputFormat::Json => ctx.config.to_json_string()?,
                OutputFormat::Table | OutputFormat::Csv => ctx.config.to_toml_string()?,
            };
            println!("{text}");
        }
        ConfigAction::Validate { path } => {
            AnalyticsConfig::load(&path)?;
            print_success(&format!("{} is valid", path.display()));
        }
        ConfigAction::Init { path, force } => {
            if path.exists() && !force {
                return Err(CliError::FileExists(path.display().to_string()).into());
            }
            let defaults = AnalyticsConfig::default();
            let text = match path.extension().and_then(|e| e.to_str()) {
                Some("json") => defaults.to_json_string()?,
                _ => defaults.to_toml_string()?,
            };
            std::fs::write(&path, text)?;
            print_success(&format!("Wrote default configuration to {}", path.display()));
        }
    }
    Ok(())
}
