//! Criterion benchmarks for the aggregation pipeline

use chrono::{Duration, NaiveDate};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use salesviz::reports::{self, ReportId};
use salesviz::services::{bin_values, Aggregator, BinCount, Config, Deriver};
use salesviz::types::{GroupKey, OrderLine};
use std::hint::black_box;

const GROUPS: [(&str, &str); 5] = [
    ("BOT", "Bột"),
    ("SET", "Set trà"),
    ("THO", "Trà hoa"),
    ("TTC", "Trà củ, quả sấy"),
    ("TMX", "Trà mix"),
];

/// Deterministic synthetic order lines: two lines per order, spread over a year
fn synthetic_lines(count: usize) -> Vec<OrderLine> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(8, 0, 0))
        .unwrap_or_default();

    (0..count)
        .map(|i| {
            let (group_code, group_name) = GROUPS[i % GROUPS.len()];
            let item = i % 23;
            OrderLine {
                order_code: format!("DH{:06}", i / 2),
                created_at: (i % 97 != 0).then(|| start + Duration::minutes((i * 37) as i64)),
                customer_code: format!("KH{:04}", (i * 7) % 1500),
                item_code: format!("{}{:02}", group_code, item),
                item_name: format!("{} {}", group_name, item),
                group_code: group_code.to_string(),
                group_name: group_name.to_string(),
                quantity: (1 + i % 4) as f64,
                amount: (50_000 + (i * 1_337) % 400_000) as f64,
            }
        })
        .collect()
}

fn bench_group_by(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregator");

    for size in [1_000usize, 10_000, 100_000] {
        let lines = synthetic_lines(size);
        let enriched = Deriver::enrich_all(&lines);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("enrich_all", size), &lines, |b, lines| {
            b.iter(|| Deriver::enrich_all(black_box(lines)));
        });

        group.bench_with_input(
            BenchmarkId::new("group_by_item", size),
            &enriched,
            |b, enriched| {
                b.iter(|| Aggregator::group_by(black_box(enriched), &[GroupKey::Item]));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("group_by_group_item_month", size),
            &enriched,
            |b, enriched| {
                b.iter(|| {
                    Aggregator::group_by(
                        black_box(enriched),
                        &[GroupKey::GroupCode, GroupKey::Item, GroupKey::Month],
                    )
                });
            },
        );
    }

    group.finish();
}

fn bench_binning(c: &mut Criterion) {
    let values: Vec<f64> = synthetic_lines(50_000).iter().map(|l| l.amount).collect();

    let mut group = c.benchmark_group("binning");
    group.throughput(Throughput::Elements(values.len() as u64));
    group.bench_function("fixed_88", |b| {
        b.iter(|| bin_values(black_box(&values), BinCount::Fixed(88)));
    });
    group.bench_function("adaptive", |b| {
        b.iter(|| bin_values(black_box(&values), BinCount::Adaptive { min: 10, max: 50 }));
    });
    group.finish();
}

fn bench_reports(c: &mut Criterion) {
    let lines = synthetic_lines(20_000);
    let config = Config::default();

    let mut group = c.benchmark_group("reports");
    group.throughput(Throughput::Elements(lines.len() as u64));
    for id in ReportId::all() {
        let spec = reports::spec(*id);
        group.bench_with_input(BenchmarkId::new("build", id.slug()), &lines, |b, lines| {
            b.iter(|| reports::build(&spec, black_box(lines), &config));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_group_by, bench_binning, bench_reports);
criterion_main!(benches);
