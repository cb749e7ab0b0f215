//! Reporting core benchmarks.
//!
//! Measures aggregation, range compression and finalization on large error streams.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use infomodels::report::ranges::compress;
use infomodels::{
    ErrorAggregator, ErrorCode, FileReport, Sampler, SamplingStrategy, ValidationError,
};

const FIELDS: &[&str] = &["person_id", "year_of_birth", "birth_date", "gender_concept_id"];

fn error_stream(n: u64) -> Vec<ValidationError> {
    (0..n)
        .map(|i| {
            let line = 2 + i / 2;
            if i % 97 == 0 {
                ValidationError::row(ErrorCode::ColumnCount, line, "3")
            } else {
                let field = FIELDS[(i % FIELDS.len() as u64) as usize];
                ValidationError::field(ErrorCode::Integer, line, field, "x")
            }
        })
        .collect()
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");

    for n in [1_000u64, 10_000, 100_000] {
        let errors = error_stream(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &errors, |b, errors| {
            b.iter(|| {
                let mut agg = ErrorAggregator::new();
                for e in errors {
                    agg.observe(e.clone());
                }
                black_box(agg.len())
            })
        });
    }

    group.finish();
}

fn bench_compress(c: &mut Criterion) {
    let sparse: Vec<u64> = (1..100_000).filter(|n| n % 3 != 0).collect();
    let dense: Vec<u64> = (1..100_000).collect();

    c.bench_function("compress_sparse", |b| b.iter(|| compress(black_box(&sparse))));
    c.bench_function("compress_dense", |b| b.iter(|| compress(black_box(&dense))));
}

fn bench_finalize(c: &mut Criterion) {
    let mut agg = ErrorAggregator::new();
    for e in error_stream(100_000) {
        agg.observe(e);
    }
    let header: Vec<String> = FIELDS.iter().map(|f| f.to_string()).collect();

    c.bench_function("finalize_100k", |b| {
        b.iter(|| {
            let mut sampler = Sampler::with_seed(SamplingStrategy::Distinct, 7);
            black_box(FileReport::finalize("person", "person.csv", &agg, &header, &mut sampler))
        })
    });
}

criterion_group!(benches, bench_aggregate, bench_compress, bench_finalize);
criterion_main!(benches);
