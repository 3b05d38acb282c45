use chrono::NaiveDate;
use criterion::*;
use tick_spider::trades::{aggregate, size_to_numeric, Direction, TradeTriple};

const SIZES: [&str; 10] = [
    "1K-15K",
    "15K–50K",
    "50K - 100K",
    "100K-250K",
    "< 1K",
    "> 50M",
    "1,000,000",
    "1.5M",
    "N/A",
    "whatever",
];

// estimate sizes
// ----------------------------------------------------------
fn benchmark_size_to_numeric(c: &mut Criterion) {
    c.bench_function("size to numeric", |b| {
        b.iter(|| {
            for size in SIZES {
                let _estimate = size_to_numeric(black_box(size));
            }
        })
    });
}

// aggregate by month
// ----------------------------------------------------------
fn triples(n: usize) -> Vec<TradeTriple> {
    let start = NaiveDate::from_ymd_opt(2014, 1, 1).unwrap();
    (0..n)
        .map(|i| {
            let direction = match i % 3 {
                0 => Direction::Buy,
                1 => Direction::Sell,
                _ => Direction::Unknown,
            };
            let traded = start + chrono::Days::new((i % 3650) as u64);
            TradeTriple::new(traded, direction, SIZES[i % SIZES.len()])
        })
        .collect()
}

fn benchmark_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    for n in [1_000, 10_000, 100_000] {
        let triples = triples(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &triples, |b, triples| {
            b.iter(|| aggregate(black_box(triples)))
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_size_to_numeric, benchmark_aggregate);
criterion_main!(benches);
