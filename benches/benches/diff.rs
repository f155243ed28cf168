//! Benchmarks for unified diff generation.

#![allow(missing_docs)]

use codemate_sdk::{DiffStats, unified_diff};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

fn source(lines: usize) -> String {
    (0..lines)
        .map(|i| format!("    let field_{i} = input.get({i}).copied().unwrap_or_default();"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn bench_single_edit(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff/single_edit");

    for lines in [50usize, 500, 5000] {
        let original = source(lines);
        let modified = original.replacen("field_7 ", "renamed_7 ", 1);
        group.bench_with_input(
            BenchmarkId::from_parameter(lines),
            &(original, modified),
            |b, (o, m)| b.iter(|| unified_diff("src/lib.rs", black_box(o), black_box(m))),
        );
    }

    group.finish();
}

fn bench_scattered_edits(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff/scattered_edits");
    let original = source(2000);
    let modified: String = original
        .lines()
        .enumerate()
        .map(|(i, line)| {
            if i % 40 == 0 {
                format!("{line} // checked")
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    group.bench_function("every_40th_line", |b| {
        b.iter(|| unified_diff("src/lib.rs", black_box(&original), black_box(&modified)));
    });

    let diff = unified_diff("src/lib.rs", &original, &modified);
    group.bench_function("stats", |b| b.iter(|| DiffStats::from_diff(black_box(&diff))));

    group.finish();
}

criterion_group!(benches, bench_single_edit, bench_scattered_edits);
criterion_main!(benches);
