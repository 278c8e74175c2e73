//! Benchmarks for the market breadth engine.
//!
//! Run with: cargo bench -p curvewatch-analytics

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use curvewatch_analytics::breadth::{market_breadth, BreadthParams};
use curvewatch_core::{Date, PriceTable};

// =============================================================================
// TEST DATA GENERATORS
// =============================================================================

/// A random-walk-like universe with staggered listing dates.
fn create_universe(tickers: usize, days: usize) -> PriceTable {
    let start = Date::from_ymd(2013, 1, 1).unwrap();
    let mut observations = Vec::with_capacity(tickers * days);
    for t in 0..tickers {
        let listed = (t * 7) % 300;
        let mut price = 10.0 + (t % 50) as f64;
        for day in listed..days {
            let step = ((t * 31 + day * 17) % 21) as f64 - 10.0;
            price = (price * (1.0 + step / 1000.0)).max(0.01);
            observations.push((format!("TCK{t:03}"), start.add_days(day as i64), price));
        }
    }
    PriceTable::from_observations(observations)
}

fn bench_breadth(c: &mut Criterion) {
    let params = BreadthParams::default();

    let mut group = c.benchmark_group("market_breadth");
    group.sample_size(20);

    for tickers in [50, 200, 400].iter() {
        let table = create_universe(*tickers, 2500);
        group.throughput(Throughput::Elements(*tickers as u64));
        group.bench_with_input(BenchmarkId::from_parameter(tickers), &table, |b, table| {
            b.iter(|| market_breadth(black_box(table), &params))
        });
    }
    group.finish();
}

criterion_group!(breadth, bench_breadth);
criterion_main!(breadth);
