//! Parser benchmarks.

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use lumac_lex::tokenize;
use lumac_par::{Parser, Program};
use std::hint::black_box;

fn parse_source(source: &str) -> Program {
    let tokens = tokenize(source).unwrap();
    Parser::new(tokens).parse().unwrap()
}

fn bench_parser_simple(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_simple");

    let source = "func answer() -> i32 { return 42; }";
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("single_function", |b| {
        b.iter(|| parse_source(black_box(source)))
    });

    group.finish();
}

fn bench_parser_control_flow(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_control_flow");

    let source = r#"
        func sum_to(n: i32) -> i32 {
            let s: i32 = 0;
            let i: i32 = 1;
            while (i <= n) {
                s += i;
                i += 1;
            }
            return s;
        }

        func classify(x: i32) -> i32 {
            if (x > 0) {
                return 1;
            } else {
                if (x == 0) {
                    return 0;
                }
                return 0 - 1;
            }
        }
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("loops_and_branches", |b| {
        b.iter(|| parse_source(black_box(source)))
    });

    group.finish();
}

fn bench_parser_memory(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_memory");

    let source = r#"
        func matrix_alloc(rows: i32, cols: i32) -> ptr<i32> {
            let size: i32 = rows * cols;
            return alloc(i32, size);
        }

        func cell(matrix: ptr<i32>, row: i32, col: i32, cols: i32) -> i32 {
            return @(matrix + (row * cols + col) * sizeof(i32));
        }

        func release(matrix: ptr<i32>) -> i32 {
            free(matrix);
            return 0;
        }
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("pointer_sublanguage", |b| {
        b.iter(|| parse_source(black_box(source)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_parser_simple,
    bench_parser_control_flow,
    bench_parser_memory
);
criterion_main!(benches);
