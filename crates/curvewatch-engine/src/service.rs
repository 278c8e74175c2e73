//! The analytics service: loaded datasets, configuration and memoized
//! calls into `curvewatch-analytics`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use curvewatch_analytics::breadth::{market_breadth, BreadthDistribution, BreadthSeries};
use curvewatch_analytics::breakeven::{implied_inflation_latest, BreakevenPoint};
use curvewatch_analytics::credit::{credit_panel, IndexSpec};
use curvewatch_analytics::curve::{curve_snapshots, CurveSnapshot, NamedOffset};
use curvewatch_analytics::history::{maturities_in_years, maturity_history, HistoryMetric, MaturityHistory};
use curvewatch_analytics::panel::{spread_between, SeriesPanel};
use curvewatch_analytics::ratio::{ratio_metrics, RatioMetrics};
use curvewatch_analytics::tenor::{tenor_series, TenorSeries};
use curvewatch_config::{AnalyticsConfig, Validate};
use curvewatch_core::calendars::WeekendCalendar;
use curvewatch_core::dataset::QuoteTable;
use curvewatch_core::traits::PriceHistorySource;
use curvewatch_core::types::PriceTable;
use curvewatch_core::{CreditConstituent, Date, InstrumentType, Series};

use crate::cache::{AnalyticsCache, CacheStats, Fingerprint};
use crate::error::{EngineError, EngineResult};

/// Which offset table a curve view uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveHorizon {
    /// Today and the previous five days.
    #[default]
    Short,
    /// Today back to one year ago.
    Long,
}

struct Dataset<T> {
    data: T,
    fingerprint: Fingerprint,
}

impl<T: Serialize> Dataset<T> {
    fn new(data: T) -> EngineResult<Self> {
        let fingerprint = Fingerprint::of(&data)?;
        Ok(Self { data, fingerprint })
    }
}

/// Owns configuration, datasets and the result cache.
///
/// Replacing a dataset changes its fingerprint, so results computed from
/// the old data are never served again.
pub struct AnalyticsService {
    config: AnalyticsConfig,
    calendar: WeekendCalendar,
    quotes: Option<Dataset<QuoteTable>>,
    credit: BTreeMap<String, Dataset<Vec<CreditConstituent>>>,
    prices: Option<Dataset<PriceTable>>,
    cache: AnalyticsCache,
}

impl AnalyticsService {
    /// Creates a service with no datasets loaded.
    pub fn new(config: AnalyticsConfig) -> EngineResult<Self> {
        config.validate_or_error()?;
        let cache = if config.cache.enabled {
            AnalyticsCache::new(config.cache.ttl())
        } else {
            AnalyticsCache::disabled()
        };
        Ok(Self {
            config,
            calendar: WeekendCalendar,
            quotes: None,
            credit: BTreeMap::new(),
            prices: None,
            cache,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Cache counters.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drops expired cache entries.
    pub fn purge_expired(&self) -> usize {
        self.cache.purge_expired()
    }

    // =========================================================================
    // DATASETS
    // =========================================================================

    /// Loads the Treasury quote table.
    pub fn set_quotes(&mut self, table: QuoteTable) -> EngineResult<()> {
        tracing::info!(records = table.len(), "loaded treasury quotes");
        self.quotes = Some(Dataset::new(table)?);
        Ok(())
    }

    /// Loads the constituents of one credit index. The name must match a
    /// configured index.
    pub fn set_credit_index(&mut self, name: &str, rows: Vec<CreditConstituent>) -> EngineResult<()> {
        let index = self
            .config
            .credit
            .index(name)
            .ok_or_else(|| EngineError::invalid_request(format!("unknown credit index '{name}'")))?;
        tracing::info!(index = %index.name, rows = rows.len(), "loaded credit constituents");
        self.credit.insert(index.name.clone(), Dataset::new(rows)?);
        Ok(())
    }

    /// Loads a price table directly.
    pub fn set_prices(&mut self, table: PriceTable) -> EngineResult<()> {
        tracing::info!(tickers = table.width(), dates = table.dates().len(), "loaded price history");
        self.prices = Some(Dataset::new(table)?);
        Ok(())
    }

    /// Fetches prices for `tickers` over `[start, end]` from a source.
    pub fn load_prices(
        &mut self,
        source: &dyn PriceHistorySource,
        tickers: &[String],
        start: Date,
        end: Date,
    ) -> EngineResult<()> {
        let table = source.price_history(tickers, start, end)?;
        let missing = tickers.len().saturating_sub(table.width());
        if missing > 0 {
            tracing::warn!(source = source.name(), missing, "some tickers have no price history");
        }
        self.set_prices(table)
    }

    fn quotes(&self) -> EngineResult<&Dataset<QuoteTable>> {
        self.quotes
            .as_ref()
            .ok_or_else(|| EngineError::missing_dataset("treasury quotes"))
    }

    fn prices(&self) -> EngineResult<&Dataset<PriceTable>> {
        self.prices
            .as_ref()
            .ok_or_else(|| EngineError::missing_dataset("price history"))
    }

    fn key<P: Serialize + ?Sized>(data: Fingerprint, params: &P) -> EngineResult<Fingerprint> {
        Ok(data.combine(Fingerprint::of(params)?))
    }

    // =========================================================================
    // TREASURY ANALYTICS
    // =========================================================================

    /// Nearest-to-horizon series of one instrument type.
    pub fn tenor_series(&self, instrument_type: &InstrumentType) -> EngineResult<TenorSeries> {
        let quotes = self.quotes()?;
        let tenor = &self.config.tenor;
        let key = Self::key(
            quotes.fingerprint,
            &(instrument_type, tenor.horizon_years, tenor.tie_break),
        )?;
        self.cache.get_or_compute("tenor_series", key, || {
            Ok(tenor_series(
                &quotes.data,
                instrument_type,
                tenor.horizon_years,
                tenor.tie_break,
            )?)
        })
    }

    /// Implied inflation on the latest quote date.
    pub fn implied_inflation(&self) -> EngineResult<Vec<BreakevenPoint>> {
        let quotes = self.quotes()?;
        let params = self.config.breakeven.params();
        let key = Self::key(quotes.fingerprint, &params)?;
        self.cache.get_or_compute("implied_inflation", key, || {
            Ok(implied_inflation_latest(&quotes.data, &params)?)
        })
    }

    /// Curve snapshots for the configured instrument type.
    pub fn curve_snapshots(&self, horizon: CurveHorizon) -> EngineResult<Vec<CurveSnapshot>> {
        let quotes = self.quotes()?;
        let curve = &self.config.curve;
        let offsets: &[NamedOffset] = match horizon {
            CurveHorizon::Short => &curve.short_offsets,
            CurveHorizon::Long => &curve.long_offsets,
        };
        let key = Self::key(quotes.fingerprint, &(&curve.instrument_type, offsets))?;
        self.cache.get_or_compute("curve_snapshots", key, || {
            Ok(curve_snapshots(
                &quotes.data,
                &curve.instrument_type,
                offsets,
                &self.calendar,
            )?)
        })
    }

    /// Histories of the configured history types for maturities in
    /// `years`; the configured default years when `years` is empty.
    pub fn maturity_history(&self, years: &[i32], metric: HistoryMetric) -> EngineResult<Vec<MaturityHistory>> {
        let quotes = self.quotes()?;
        let history = &self.config.history;
        let years = if years.is_empty() {
            history.maturity_years.as_slice()
        } else {
            years
        };
        let key = Self::key(quotes.fingerprint, &(&history.instrument_types, years, metric))?;
        self.cache.get_or_compute("maturity_history", key, || {
            let maturities = maturities_in_years(&quotes.data, &history.instrument_types, years);
            Ok(maturity_history(
                &quotes.data,
                &history.instrument_types,
                &maturities,
                metric,
            ))
        })
    }

    /// The configured real-rate tenor series minus `foreign`, on shared
    /// dates.
    pub fn real_rate_spread(&self, foreign: &Series) -> EngineResult<Series> {
        let quotes = self.quotes()?;
        let tenor = &self.config.tenor;
        let key = Self::key(
            quotes.fingerprint,
            &(&tenor.real_rate_type, tenor.horizon_years, tenor.tie_break, foreign),
        )?;
        self.cache.get_or_compute("real_rate_spread", key, || {
            let real = self.tenor_series(&tenor.real_rate_type)?.to_series();
            Ok(spread_between(&real, foreign))
        })
    }

    // =========================================================================
    // CREDIT
    // =========================================================================

    /// Outer-joined panel of the named credit indices; every loaded index
    /// when `names` is empty. Columns follow configuration order.
    pub fn credit_panel(&self, names: &[String]) -> EngineResult<SeriesPanel> {
        let mut selected: Vec<(IndexSpec, &Dataset<Vec<CreditConstituent>>)> = Vec::new();
        for index in &self.config.credit.indices {
            let wanted = names.is_empty() || names.iter().any(|n| n.eq_ignore_ascii_case(&index.name));
            if !wanted {
                continue;
            }
            match self.credit.get(&index.name) {
                Some(dataset) => selected.push((index.spec(), dataset)),
                None if names.is_empty() => {}
                None => return Err(EngineError::missing_dataset(format!("credit index '{}'", index.name))),
            }
        }
        if let Some(unknown) = names.iter().find(|n| self.config.credit.index(n).is_none()) {
            return Err(EngineError::invalid_request(format!("unknown credit index '{unknown}'")));
        }
        if selected.is_empty() {
            return Err(EngineError::missing_dataset("credit constituents"));
        }

        let key = Fingerprint::of(
            &selected
                .iter()
                .map(|(spec, dataset)| (spec, dataset.fingerprint))
                .collect::<Vec<_>>(),
        )?;
        self.cache.get_or_compute("credit_panel", key, || {
            let inputs: Vec<(IndexSpec, &[CreditConstituent])> = selected
                .iter()
                .map(|(spec, dataset)| (spec.clone(), dataset.data.as_slice()))
                .collect();
            Ok(credit_panel(&inputs))
        })
    }

    // =========================================================================
    // EQUITIES
    // =========================================================================

    /// Ratio statistics of two loaded tickers. `window` defaults to the
    /// configured one and must fall within the configured range.
    pub fn ratio(&self, numerator: &str, denominator: &str, window: Option<usize>) -> EngineResult<RatioMetrics> {
        let prices = self.prices()?;
        let window = window.unwrap_or(self.config.ratio.window);
        if !self.config.ratio.allows(window) {
            return Err(EngineError::invalid_request(format!(
                "ratio window {window} outside {}..={}",
                self.config.ratio.min_window, self.config.ratio.max_window
            )));
        }
        let series = |ticker: &str| {
            prices
                .data
                .series(ticker)
                .ok_or_else(|| EngineError::invalid_request(format!("no price history for '{ticker}'")))
        };
        let (a, b) = (series(numerator)?, series(denominator)?);
        let key = Self::key(prices.fingerprint, &(numerator, denominator, window))?;
        self.cache
            .get_or_compute("ratio", key, || Ok(ratio_metrics(&a, &b, window)?))
    }

    /// Breadth indicator over every loaded ticker.
    pub fn market_breadth(&self) -> EngineResult<BreadthSeries> {
        let prices = self.prices()?;
        let params = self.config.breadth.params();
        let key = Self::key(prices.fingerprint, &params)?;
        self.cache
            .get_or_compute("market_breadth", key, || Ok(market_breadth(&prices.data, &params)?))
    }

    /// Histogram of the breadth indicator with the configured bin count.
    pub fn breadth_distribution(&self) -> EngineResult<BreadthDistribution> {
        Ok(self
            .market_breadth()?
            .histogram(self.config.breadth.histogram_bins)?)
    }
}

impl std::fmt::Debug for AnalyticsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyticsService")
            .field("quotes", &self.quotes.as_ref().map(|d| d.data.len()))
            .field("credit_indices", &self.credit.keys().collect::<Vec<_>>())
            .field("tickers", &self.prices.as_ref().map(|d| d.data.width()))
            .field("cache", &self.cache)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use curvewatch_core::traits::InMemoryPriceSource;
    use curvewatch_core::QuoteRecord;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn quotes() -> QuoteTable {
        let q = d(2025, 6, 2);
        QuoteTable::from_records(vec![
            QuoteRecord::new(InstrumentType::Prefixado, q, d(2035, 1, 1), 10.0, dec!(300)),
            QuoteRecord::new(InstrumentType::Prefixado, q, d(2029, 1, 1), 12.0, dec!(700)),
            QuoteRecord::new(InstrumentType::IpcaJurosSemestrais, q, d(2035, 5, 15), 5.0, dec!(4000)),
            QuoteRecord::new(InstrumentType::Ipca, q, d(2045, 5, 15), 6.0, dec!(1000)),
        ])
    }

    fn prices() -> PriceTable {
        let mut obs = Vec::new();
        for day in 1..=28 {
            obs.push(("A", d(2025, 2, day), 10.0 + f64::from(day)));
            obs.push(("B", d(2025, 2, day), 5.0));
        }
        PriceTable::from_observations(obs)
    }

    fn service() -> AnalyticsService {
        let mut config = AnalyticsConfig::default();
        config.ratio.min_window = 2;
        config.breadth.start_floor = None;
        config.breadth.window = 5;
        let mut service = AnalyticsService::new(config).unwrap();
        service.set_quotes(quotes()).unwrap();
        service.set_prices(prices()).unwrap();
        service
    }

    #[test]
    fn test_missing_datasets() {
        let service = AnalyticsService::new(AnalyticsConfig::default()).unwrap();
        assert!(matches!(service.implied_inflation(), Err(EngineError::MissingDataset(_))));
        assert!(matches!(service.market_breadth(), Err(EngineError::MissingDataset(_))));
        assert!(matches!(service.credit_panel(&[]), Err(EngineError::MissingDataset(_))));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = AnalyticsConfig::default();
        config.breadth.window = 0;
        assert!(matches!(AnalyticsService::new(config), Err(EngineError::Config(_))));
    }

    #[test]
    fn test_breakeven_is_memoized() {
        let service = service();
        let first = service.implied_inflation().unwrap();
        let second = service.implied_inflation().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
        assert_relative_eq!(first[0].breakeven, 4.761_904_761_9, epsilon = 1e-9);
        let stats = service.cache_stats();
        assert_eq!((stats.hits, stats.misses), (1, 1));
    }

    #[test]
    fn test_reloading_data_invalidates() {
        let mut service = service();
        service.implied_inflation().unwrap();
        service.set_quotes(QuoteTable::default()).unwrap();
        assert!(service.implied_inflation().unwrap().is_empty());
        assert_eq!(service.cache_stats().misses, 2);
    }

    #[test]
    fn test_tenor_and_spread() {
        let service = service();
        let tenor = service.tenor_series(&InstrumentType::Prefixado).unwrap();
        assert_eq!(tenor.points[0].maturity_date, d(2035, 1, 1));

        let foreign = Series::from_points("DGS10", vec![(d(2025, 6, 2), 4.0)]);
        let spread = service.real_rate_spread(&foreign).unwrap();
        assert_relative_eq!(spread.get(&d(2025, 6, 2)).unwrap(), 1.0);
    }

    #[test]
    fn test_curve_and_history() {
        let service = service();
        let curves = service.curve_snapshots(CurveHorizon::Short).unwrap();
        assert_eq!(curves.len(), 1);
        assert_eq!(curves[0].points.len(), 2);

        let histories = service.maturity_history(&[], HistoryMetric::PurchaseRate).unwrap();
        assert_eq!(histories.len(), 2);
        let only_2045 = service.maturity_history(&[2045], HistoryMetric::UnitPrice).unwrap();
        assert_eq!(only_2045.len(), 1);
        assert_relative_eq!(only_2045[0].series.values()[0], 1000.0);
    }

    #[test]
    fn test_credit_panel() {
        let mut service = service();
        let q = d(2025, 6, 2);
        service
            .set_credit_index(
                "IDEX CDI General",
                vec![
                    CreditConstituent::new(q, "A", 30.0, 2.0),
                    CreditConstituent::new(q, "B", 70.0, 4.0),
                ],
            )
            .unwrap();
        assert!(service.set_credit_index("Nope", Vec::new()).is_err());

        let panel = service.credit_panel(&[]).unwrap();
        assert_eq!(panel.names(), &["IDEX CDI General".to_string()]);
        assert_relative_eq!(panel.column("IDEX CDI General").unwrap().get(&q).unwrap(), 3.4, epsilon = 1e-12);

        assert!(matches!(
            service.credit_panel(&["IDEX INFRA".to_string()]),
            Err(EngineError::MissingDataset(_))
        ));
        assert!(matches!(
            service.credit_panel(&["Nope".to_string()]),
            Err(EngineError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_ratio_window_bounds() {
        let service = service();
        let metrics = service.ratio("A", "B", Some(5)).unwrap();
        assert_eq!(metrics.window, 5);
        assert!(matches!(service.ratio("A", "B", Some(1)), Err(EngineError::InvalidRequest(_))));
        assert!(matches!(service.ratio("A", "ZZZ", Some(5)), Err(EngineError::InvalidRequest(_))));
    }

    #[test]
    fn test_breadth_from_source() {
        let mut service = service();
        let source = InMemoryPriceSource::new(prices());
        service
            .load_prices(
                &source,
                &["A".to_string(), "B".to_string(), "ZZZ".to_string()],
                d(2025, 2, 1),
                d(2025, 2, 28),
            )
            .unwrap();
        let breadth = service.market_breadth().unwrap();
        // A rises every day, B is flat.
        assert_relative_eq!(breadth.current().unwrap().1, 50.0);
        let dist = service.breadth_distribution().unwrap();
        assert_eq!(dist.histogram.total(), breadth.series.len());
    }
}
