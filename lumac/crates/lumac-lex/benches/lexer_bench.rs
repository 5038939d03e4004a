//! Lexer throughput benchmark.

use criterion::{criterion_group, criterion_main, Criterion};
use lumac_lex::tokenize;
use std::hint::black_box;

const SAMPLE: &str = r#"
// iterative fibonacci
func fib(n: i32) -> i32 {
    let a: i32 = 0;
    let b: i32 = 1;
    let i: i32 = 0;
    while (i < n) {
        let t: i32 = a + b;
        a = b;
        b = t;
        i += 1;
    }
    return a;
}

func sum_squares(n: i32) -> i32 {
    let s: i32 = 0;
    let i: i32 = 1;
    while (i <= n) {
        s += i * i;
        i += 1;
    }
    return s;
}

func buffer(count: i32) -> ptr<i32> {
    return alloc(i32, count);
}
"#;

fn bench_tokenize(c: &mut Criterion) {
    c.bench_function("tokenize_sample", |b| {
        b.iter(|| tokenize(black_box(SAMPLE)).unwrap())
    });
}

criterion_group!(benches, bench_tokenize);
criterion_main!(benches);
