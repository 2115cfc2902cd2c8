//! Benchmarks for search, replace planning and row windowing.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::cast_possible_truncation
)]

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use futures::executor::block_on;
use gridedit::search::{plan_replace, search, similarity, SearchGeneration};
use gridedit::{compute_window, CellValue, Row, SearchOptions};

const FIRST_NAMES: [&str; 8] = ["Jon", "John", "Jane", "Joan", "Mary", "Marie", "Peter", "Petra"];
const CITIES: [&str; 5] = ["New York", "Los Angeles", "Chicago", "Houston", "Phoenix"];

/// Synthetic people table: name, age, city, email.
fn dataset(rows: usize) -> Vec<Arc<Row>> {
    (0..rows)
        .map(|i| {
            let name = FIRST_NAMES[i % FIRST_NAMES.len()];
            let mut row = Row::new();
            row.insert("name".into(), CellValue::from(format!("{name} {i}")));
            row.insert("age".into(), CellValue::Number((20 + i % 50) as f64));
            row.insert("city".into(), CellValue::from(CITIES[i % CITIES.len()]));
            row.insert(
                "email".into(),
                CellValue::from(format!("{}.{i}@example.com", name.to_lowercase())),
            );
            Arc::new(row)
        })
        .collect()
}

fn scope() -> Vec<String> {
    ["name", "age", "city", "email"].map(String::from).to_vec()
}

fn bench_similarity(c: &mut Criterion) {
    c.bench_function("similarity_short", |b| {
        b.iter(|| similarity(black_box("Jonathan"), black_box("Johnathon")))
    });
}

/// Exact vs fuzzy scan across dataset sizes
fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    for rows in [1_000usize, 10_000] {
        let data = dataset(rows);
        let scope = scope();
        group.throughput(Throughput::Elements((rows * scope.len()) as u64));

        for (label, options) in [
            ("exact", SearchOptions::default()),
            ("fuzzy", SearchOptions::fuzzy(0.6)),
        ] {
            group.bench_with_input(BenchmarkId::new(label, rows), &data, |b, data| {
                let generation = SearchGeneration::new();
                b.iter(|| {
                    let ticket = generation.begin();
                    block_on(search(
                        black_box(data),
                        &scope,
                        "Jhon",
                        &options,
                        &ticket,
                        1,
                        |_| {},
                    ))
                    .expect("search failed")
                })
            });
        }
    }
    group.finish();
}

fn bench_replace(c: &mut Criterion) {
    let data = dataset(10_000);
    let scope = scope();
    c.bench_function("plan_replace_exact_10000", |b| {
        b.iter(|| {
            plan_replace(black_box(&data), &scope, "Jon", "Jonathan", &SearchOptions::default())
                .expect("replace failed")
        })
    });
}

fn bench_window(c: &mut Criterion) {
    c.bench_function("compute_window", |b| {
        b.iter(|| compute_window(black_box(100_000), 35.0, black_box(123_456.0), 900.0, 10))
    });
}

criterion_group!(benches, bench_similarity, bench_search, bench_replace, bench_window);

criterion_main!(benches);
