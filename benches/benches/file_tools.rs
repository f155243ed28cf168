//! Benchmarks for path validation and project search.

#![allow(missing_docs)]

use codemate_sdk::{AgentConfig, FileOperations, PathValidator};
use codemate_sdk::config::default_blocked_patterns;
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::path::PathBuf;

fn bench_validate_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("file_tools/validate_path");
    let validator =
        PathValidator::new(Some(PathBuf::from("/workspace/project")), &default_blocked_patterns())
            .unwrap();

    let test_paths = [
        ("simple", "src/main.rs"),
        ("nested", "crates/core/src/engine/state/mod.rs"),
        ("traversal", "../../etc/passwd"),
        ("blocked", "config/.env"),
        ("windows_separators", "src\\lib\\mod.rs"),
    ];

    for (name, path) in test_paths {
        group.bench_with_input(BenchmarkId::from_parameter(name), path, |b, p| {
            b.iter(|| validator.validate(black_box(p)));
        });
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("file_tools/search");
    let dir = tempfile::tempdir().unwrap();
    for i in 0..40 {
        let module = dir.path().join(format!("src/m{i}"));
        std::fs::create_dir_all(&module).unwrap();
        let body: String = (0..300)
            .map(|n| {
                if n % 97 == 0 {
                    format!("// TODO: revisit {n}\n")
                } else {
                    format!("fn item_{n}() -> usize {{ {n} }}\n")
                }
            })
            .collect();
        std::fs::write(module.join("mod.rs"), body).unwrap();
    }
    let files = FileOperations::new(Some(dir.path().to_path_buf()), &AgentConfig::default())
        .unwrap();

    group.bench_function("todo_across_project", |b| {
        b.iter(|| files.search(black_box("todo"), None, Some("**/*.rs")));
    });
    group.bench_function("no_match", |b| {
        b.iter(|| files.search(black_box("does-not-occur"), None, None));
    });

    group.finish();
}

criterion_group!(benches, bench_validate_path, bench_search);
criterion_main!(benches);
