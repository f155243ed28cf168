//! Benchmarks for tool call parsing and result formatting.
//!
//! Performance-critical paths:
//! - `ToolCallParser::parse`: regex extraction over a full model response
//! - `format_tool_results`: rendering a batch for the next request

#![allow(missing_docs)]

use codemate_sdk::tools::format_tool_results;
use codemate_sdk::{ToolCall, ToolCallParser, ToolOutput, ToolResult};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use serde_json::json;

fn block(i: usize) -> String {
    format!(
        "<tool_call>\n<name>read_file</name>\n<parameters>{}</parameters>\n</tool_call>",
        json!({"path": format!("src/module_{i}.rs"), "startLine": 1, "endLine": 200})
    )
}

fn response_with(calls: usize, prose_lines: usize) -> String {
    let mut out = String::new();
    for i in 0..calls {
        for _ in 0..prose_lines {
            out.push_str("Looking at how the module wires its dependencies together.\n");
        }
        out.push_str(&block(i));
        out.push('\n');
    }
    out
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("tool_parsing/parse");
    let parser = ToolCallParser::new();

    for (name, input) in [
        ("prose_only", response_with(0, 1) + &"plain answer text\n".repeat(200)),
        ("single_call", response_with(1, 2)),
        ("ten_calls", response_with(10, 2)),
        ("fifty_calls_verbose", response_with(50, 10)),
    ] {
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &input, |b, input| {
            b.iter(|| parser.parse(black_box(input)));
        });
    }

    group.finish();
}

fn bench_format_results(c: &mut Criterion) {
    let mut group = c.benchmark_group("tool_parsing/format_results");
    let content: String = (1..=200)
        .map(|n| format!("{n:>4}│ let value_{n} = compute({n});"))
        .collect::<Vec<_>>()
        .join("\n");

    for count in [1usize, 10, 50] {
        let results: Vec<ToolResult> = (0..count)
            .map(|i| {
                let params = json!({"path": format!("src/m{i}.rs")})
                    .as_object()
                    .cloned()
                    .unwrap_or_default();
                let call = ToolCall::new("read_file", params);
                ToolResult::ok(
                    &call,
                    ToolOutput::FileContent {
                        path: format!("src/m{i}.rs"),
                        content: content.clone(),
                        line_count: 200,
                        truncated: false,
                    },
                )
            })
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(count), &results, |b, r| {
            b.iter(|| format_tool_results(black_box(r)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_format_results);
criterion_main!(benches);
