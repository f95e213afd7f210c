//! Engine performance benchmarks.
//!
//! Measures merge, fill and diff throughput across table sizes.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use sheetmatch::input::Parser;
use sheetmatch::{Cell, DataTable, DictionaryFiller, DiffSpec, JoinSpec, KeyedMerger, VersionDiffer};

/// Generate an order table: order id, color code, quantity.
fn generate_orders(rows: usize) -> DataTable {
    let headers = vec!["order".into(), "color_code".into(), "qty".into()];
    let data = (0..rows)
        .map(|row| {
            vec![
                Cell::text(format!("ORD_{:06}", row / 4)),
                Cell::text(format!("C{}", row % 4)),
                Cell::Number((row % 50) as f64),
            ]
        })
        .collect();
    DataTable::new(headers, data)
}

/// Generate a reference table with one color name per (order, code), plus duplicates.
fn generate_colors(rows: usize) -> DataTable {
    let headers = vec!["order".into(), "color_code".into(), "color_name".into()];
    let data = (0..rows + rows / 10)
        .map(|row| {
            let row = row % rows.max(1);
            vec![
                Cell::text(format!("ORD_{:06}", row / 4)),
                Cell::text(format!("C{}", row % 4)),
                Cell::text(format!("Color_{}", row % 17)),
            ]
        })
        .collect();
    DataTable::new(headers, data)
}

/// Generate a table where every other row lacks its name.
fn generate_sparse(rows: usize) -> DataTable {
    let headers = vec!["id".into(), "name".into()];
    let data = (0..rows)
        .map(|row| {
            let name = if row % 2 == 0 {
                Cell::text(format!("Item_{}", row % 100))
            } else {
                Cell::Empty
            };
            vec![Cell::text(format!("ID_{}", row % 100)), name]
        })
        .collect();
    DataTable::new(headers, data)
}

/// Generate CSV text of the order table.
fn generate_csv(rows: usize) -> String {
    let mut data = String::from("order,color_code,qty\n");
    for row in 0..rows {
        data.push_str(&format!("ORD_{:06},C{},{}\n", row / 4, row % 4, row % 50));
    }
    data
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");
    let merger = KeyedMerger::new();
    let spec = JoinSpec::same(["order", "color_code"]);
    let targets = vec!["color_name".to_string()];

    for rows in [100, 1_000, 10_000].iter() {
        let left = generate_orders(*rows);
        let right = generate_colors(*rows);

        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &(left, right), |b, (left, right)| {
            b.iter(|| merger.merge(black_box(left), black_box(right), &spec, &targets));
        });
    }

    group.finish();
}

fn bench_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill");
    let filler = DictionaryFiller::new();
    let match_cols = vec!["id".to_string()];

    for rows in [100, 1_000, 10_000].iter() {
        let table = generate_sparse(*rows);

        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &table, |b, table| {
            b.iter(|| filler.fill(black_box(table), &match_cols, "name"));
        });
    }

    group.finish();
}

fn bench_diff(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff");
    let differ = VersionDiffer::new();
    let spec = DiffSpec::same(["order", "color_code"], ["qty"]);

    for rows in [100, 1_000, 10_000].iter() {
        let old = generate_orders(*rows);
        let mut new = generate_orders(*rows);
        for (i, row) in new.rows.iter_mut().enumerate() {
            if i % 7 == 0 {
                row[2] = Cell::Number(999.0);
            }
        }

        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &(old, new), |b, (old, new)| {
            b.iter(|| differ.diff(black_box(old), black_box(new), &spec));
        });
    }

    group.finish();
}

fn bench_parse_csv(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_csv");
    let parser = Parser::new();

    for rows in [1_000, 10_000].iter() {
        let data = generate_csv(*rows);

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &data, |b, data| {
            b.iter(|| parser.parse_bytes(black_box(data.as_bytes()), 0));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_merge, bench_fill, bench_diff, bench_parse_csv);
criterion_main!(benches);
