//! Property-based tests for analytics invariants.
//!
//! - The nearest maturity is a member of the input and nothing is closer
//! - Weighted credit spreads lie within the constituent spread range
//! - Curve offsets never resolve later than their target
//! - Breadth readings are percentages
//! - Every transform returns the same result when run twice on the same input

use curvewatch_analytics::prelude::*;
use curvewatch_core::prelude::*;
use proptest::prelude::*;

// =============================================================================
// GENERATORS
// =============================================================================

fn base_date() -> Date {
    Date::from_ymd(2020, 1, 1).unwrap()
}

fn date_strategy() -> impl Strategy<Value = Date> {
    (0i64..20_000).prop_map(|offset| base_date().add_days(offset))
}

fn tie_break_strategy() -> impl Strategy<Value = TieBreak> {
    prop_oneof![
        Just(TieBreak::FirstEncountered),
        Just(TieBreak::EarlierMaturity),
        Just(TieBreak::LaterMaturity),
    ]
}

fn constituent_strategy() -> impl Strategy<Value = CreditConstituent> {
    (0i64..10, 0usize..6, 0.0f64..20.0, -1.0f64..15.0).prop_map(|(day, issuer, weight, spread)| {
        CreditConstituent::new(
            base_date().add_days(day),
            format!("ISSUER{issuer}"),
            weight,
            spread,
        )
    })
}

fn instrument_strategy() -> impl Strategy<Value = InstrumentType> {
    prop_oneof![
        Just(InstrumentType::Prefixado),
        Just(InstrumentType::PrefixadoJurosSemestrais),
        Just(InstrumentType::Ipca),
        Just(InstrumentType::IpcaJurosSemestrais),
    ]
}

fn quote_table_strategy() -> impl Strategy<Value = QuoteTable> {
    prop::collection::vec(
        (instrument_strategy(), 0i64..20, 30i64..15_000, 0.5f64..20.0),
        0..80,
    )
    .prop_map(|rows| {
        QuoteTable::from_records(
            rows.into_iter()
                .map(|(kind, day, to_maturity, rate)| {
                    let quote_date = base_date().add_days(day);
                    QuoteRecord::new(
                        kind,
                        quote_date,
                        quote_date.add_days(to_maturity),
                        rate,
                        rust_decimal::Decimal::from(1000),
                    )
                })
                .collect::<Vec<_>>(),
        )
    })
}

fn price_table_strategy() -> impl Strategy<Value = PriceTable> {
    prop::collection::vec((0usize..5, 0i64..60, 1.0f64..100.0), 0..200).prop_map(|obs| {
        PriceTable::from_observations(
            obs.into_iter()
                .map(|(t, day, price)| (format!("T{t}"), base_date().add_days(day), price)),
        )
    })
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn nearest_is_member_and_minimal(
        maturities in prop::collection::vec(date_strategy(), 1..30),
        target in date_strategy(),
        tie_break in tie_break_strategy(),
    ) {
        let chosen = nearest_to(&maturities, target, tie_break).unwrap();
        prop_assert!(maturities.contains(&chosen));
        let best = chosen.abs_days_between(&target);
        for m in &maturities {
            prop_assert!(m.abs_days_between(&target) >= best);
        }
    }

    #[test]
    fn first_encountered_picks_earliest_index(
        maturities in prop::collection::vec(date_strategy(), 1..30),
        target in date_strategy(),
    ) {
        let chosen = nearest_to(&maturities, target, TieBreak::FirstEncountered).unwrap();
        let best = chosen.abs_days_between(&target);
        let first = maturities
            .iter()
            .find(|m| m.abs_days_between(&target) == best)
            .copied();
        prop_assert_eq!(Some(chosen), first);
    }

    #[test]
    fn credit_spread_within_constituent_range(
        rows in prop::collection::vec(constituent_strategy(), 0..60),
    ) {
        let series = aggregate("index", &rows, &[]);
        for (date, value) in series.iter() {
            let day: Vec<&CreditConstituent> = rows.iter().filter(|r| r.quote_date == date).collect();
            let weight: f64 = day.iter().map(|r| r.weight_pct).sum();
            if weight == 0.0 {
                prop_assert_eq!(value, 0.0);
            } else {
                let lo = day.iter().map(|r| r.spread_value).fold(f64::INFINITY, f64::min);
                let hi = day.iter().map(|r| r.spread_value).fold(f64::NEG_INFINITY, f64::max);
                prop_assert!(value >= lo - 1e-9 && value <= hi + 1e-9);
            }
        }
    }

    #[test]
    fn curve_offsets_never_resolve_late(
        available in prop::collection::vec(date_strategy(), 0..40),
    ) {
        let offsets = long_horizon_offsets();
        let resolved = curvewatch_analytics::curve::resolve_offsets(&available, &offsets).unwrap();
        let mut seen = std::collections::HashSet::new();
        for (_, target, actual) in &resolved {
            prop_assert!(actual <= target);
            prop_assert!(available.contains(actual));
            prop_assert!(seen.insert(*actual));
        }
    }

    #[test]
    fn breadth_is_a_percentage(table in price_table_strategy(), window in 1usize..10) {
        let params = BreadthParams { window, start_floor: None, ..BreadthParams::default() };
        let breadth = market_breadth(&table, &params).unwrap();
        for (_, pct) in breadth.series.iter() {
            prop_assert!((0.0..=100.0).contains(&pct));
        }
        prop_assert_eq!(breadth, market_breadth(&table, &params).unwrap());
    }

    #[test]
    fn ratio_rolling_mean_has_leading_gap(
        prices in prop::collection::vec(1.0f64..50.0, 1..80),
        window in 1usize..20,
    ) {
        let a = Series::from_points(
            "A",
            prices.iter().enumerate().map(|(i, p)| (base_date().add_days(i as i64), *p)),
        );
        let b = Series::from_points(
            "B",
            prices.iter().enumerate().map(|(i, _)| (base_date().add_days(i as i64), 2.0)),
        );
        let metrics = ratio_metrics(&a, &b, window).unwrap();
        for (i, point) in metrics.points.iter().enumerate() {
            prop_assert_eq!(point.rolling_mean.is_some(), i + 1 >= window);
        }
        prop_assert_eq!(metrics.clone(), ratio_metrics(&a, &b, window).unwrap());
    }

    #[test]
    fn tenor_series_is_repeatable(
        table in quote_table_strategy(),
        kind in instrument_strategy(),
        years in 1i32..30,
        tie_break in tie_break_strategy(),
    ) {
        prop_assert_eq!(
            tenor_series(&table, &kind, years, tie_break),
            tenor_series(&table, &kind, years, tie_break)
        );
    }

    #[test]
    fn breakeven_is_repeatable(table in quote_table_strategy(), max_gap_days in 1i64..2000) {
        let params = BreakevenParams { max_gap_days, ..BreakevenParams::default() };
        prop_assert_eq!(
            implied_inflation_latest(&table, &params),
            implied_inflation_latest(&table, &params)
        );
    }

    #[test]
    fn curve_snapshots_are_repeatable(table in quote_table_strategy(), kind in instrument_strategy()) {
        let calendar = WeekendCalendar;
        for offsets in [short_horizon_offsets(), long_horizon_offsets()] {
            prop_assert_eq!(
                curve_snapshots(&table, &kind, &offsets, &calendar),
                curve_snapshots(&table, &kind, &offsets, &calendar)
            );
        }
    }

    #[test]
    fn credit_aggregate_is_repeatable_and_order_free(
        rows in prop::collection::vec(constituent_strategy(), 0..60),
    ) {
        let excluded = vec!["ISSUER0".to_string()];
        let first = aggregate("index", &rows, &excluded);
        prop_assert_eq!(&first, &aggregate("index", &rows, &excluded));

        let reversed: Vec<CreditConstituent> = rows.iter().rev().cloned().collect();
        let shuffled = aggregate("index", &reversed, &excluded);
        prop_assert_eq!(first.dates(), shuffled.dates());
        for ((_, a), (_, b)) in first.iter().zip(shuffled.iter()) {
            prop_assert!((a - b).abs() <= 1e-9 * a.abs().max(1.0));
        }
    }
}
