//! Parse, normalize and store benchmarks over synthetic archive days.
//!
//! Run with: `cargo bench --package klinebase-bench`

use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use klinebase_bench::{Precision, day_csv};
use klinebase_lib::prelude::*;
use klinebase_lib::parse_klines;
use std::hint::black_box;
use tempfile::TempDir;

const CASES: &[(Interval, Precision)] = &[
    (Interval::Hour1, Precision::Millis),
    (Interval::Minute1, Precision::Millis),
    (Interval::Minute1, Precision::Micros),
    (Interval::Second1, Precision::Millis),
];

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn case_name(interval: Interval, precision: Precision) -> String {
    format!("{interval}-{precision:?}").to_lowercase()
}

fn parse_normalize_benchmark(c: &mut Criterion) {
    let normalizer = Normalizer::new();
    let mut group = c.benchmark_group("parse_normalize");

    for &(interval, precision) in CASES {
        let bars = interval.bars_per_day() as u32;
        let csv = day_csv(date(), bars, precision);
        group.throughput(Throughput::Elements(u64::from(bars)));

        group.bench_with_input(
            BenchmarkId::from_parameter(case_name(interval, precision)),
            &csv,
            |b, csv| {
                b.iter(|| {
                    let raw = parse_klines(black_box(csv)).unwrap();
                    normalizer.normalize(&raw, "BTCUSDT").unwrap()
                });
            },
        );
    }

    group.finish();
}

fn store_benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let normalizer = Normalizer::new();
    let mut group = c.benchmark_group("store");
    group.sample_size(20);

    for interval in [Interval::Hour1, Interval::Minute1] {
        let bars = interval.bars_per_day() as u32;
        let raw = parse_klines(&day_csv(date(), bars, Precision::Millis)).unwrap();
        let frame = normalizer.normalize(&raw, "BTCUSDT").unwrap();
        let key = PartitionKey::new("BTCUSDT", interval, date());
        group.throughput(Throughput::Elements(u64::from(bars)));

        let dir = TempDir::new().unwrap();
        let store = PartitionStore::new(dir.path());

        group.bench_with_input(BenchmarkId::new("write", interval), &frame, |b, frame| {
            b.iter(|| store.write(&key, black_box(frame)).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("load_day", interval), &key, |b, key| {
            b.iter(|| {
                runtime
                    .block_on(store.load_day(&key.symbol, key.interval, key.date))
                    .unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, parse_normalize_benchmark, store_benchmark);
criterion_main!(benches);
