//! CLI command implementations.

pub mod breadth;
pub mod breakeven;
pub mod config;
pub mod credit;
pub mod curve;
pub mod history;
pub mod macros;
pub mod ratio;
pub mod spread;
pub mod tenor;

pub use breadth::BreadthArgs;
pub use breakeven::BreakevenArgs;
pub use config::ConfigArgs;
pub use credit::CreditArgs;
pub use curve::CurveArgs;
pub use history::HistoryArgs;
pub use macros::MacroArgs;
pub use ratio::RatioArgs;
pub use spread::SpreadArgs;
pub use tenor::TenorArgs;

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::{Args, ValueEnum};

use curvewatch_config::AnalyticsConfig;
use curvewatch_core::{Date, InstrumentType};
use curvewatch_engine::AnalyticsService;

use crate::cli::OutputFormat;
use crate::error::{CliError, CliResult};

/// Settings shared by every command.
pub struct Context {
    /// Loaded analytics configuration.
    pub config: AnalyticsConfig,
    /// Output format.
    pub format: OutputFormat,
}

impl Context {
    /// Loads the configuration file if one was given.
    pub fn load(config_path: Option<&Path>, format: OutputFormat) -> Result<Self> {
        let config = match config_path {
            Some(path) => AnalyticsConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => AnalyticsConfig::default(),
        };
        Ok(Self { config, format })
    }

    /// A fresh service over the active configuration.
    pub fn service(&self) -> Result<AnalyticsService> {
        Ok(AnalyticsService::new(self.config.clone())?)
    }

    /// A service with the Treasury export at `quotes` loaded.
    pub fn service_with_quotes(&self, quotes: &Path) -> Result<AnalyticsService> {
        let mut service = self.service()?;
        let table = curvewatch_ext_file::load_treasury_quotes(quotes)
            .with_context(|| format!("loading {}", quotes.display()))?;
        service.set_quotes(table)?;
        Ok(service)
    }

    /// A service with the wide price file at `prices` loaded.
    pub fn service_with_prices(&self, prices: &Path) -> Result<AnalyticsService> {
        let mut service = self.service()?;
        let table = curvewatch_ext_file::load_price_table(prices)
            .with_context(|| format!("loading {}", prices.display()))?;
        service.set_prices(table)?;
        Ok(service)
    }
}

/// Treasury export argument shared by the bond commands.
#[derive(Args, Debug)]
pub struct QuotesArg {
    /// Treasury price/rate export (`;`-separated CSV)
    #[arg(short, long, env = "CURVEWATCH_QUOTES")]
    pub quotes: PathBuf,
}

/// Bond types selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BondChoice {
    /// Tesouro Prefixado
    #[value(name = "prefixado")]
    Prefixado,
    /// Tesouro Prefixado com Juros Semestrais
    #[value(name = "prefixado-juros")]
    PrefixadoJuros,
    /// Tesouro IPCA+
    #[value(name = "ipca")]
    Ipca,
    /// Tesouro IPCA+ com Juros Semestrais (NTN-B)
    #[value(name = "ipca-juros", alias = "ntnb")]
    IpcaJuros,
}

impl From<BondChoice> for InstrumentType {
    fn from(choice: BondChoice) -> Self {
        match choice {
            BondChoice::Prefixado => InstrumentType::Prefixado,
            BondChoice::PrefixadoJuros => InstrumentType::PrefixadoJurosSemestrais,
            BondChoice::Ipca => InstrumentType::Ipca,
            BondChoice::IpcaJuros => InstrumentType::IpcaJurosSemestrais,
        }
    }
}

/// Parses a date in `YYYY-MM-DD` or `DD/MM/YYYY` format.
pub fn parse_date(s: &str) -> CliResult<Date> {
    Date::parse_any(s).map_err(|_| CliError::InvalidDate(s.to_string()))
}

/// Keeps the last `n` items; all of them when `n` is `None`.
pub fn tail<T>(mut items: Vec<T>, n: Option<usize>) -> Vec<T> {
    if let Some(n) = n {
        let skip = items.len().saturating_sub(n);
        items.drain(..skip);
    }
    items
}
