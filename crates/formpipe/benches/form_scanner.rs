//! Benchmarks for the form scanner.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use formpipe::{FormOptions, FormScanner, KeyValueAccumulator};

fn build_body(pairs: usize) -> Vec<u8> {
    let mut body = String::new();
    for i in 0..pairs {
        if i > 0 {
            body.push('&');
        }
        body.push_str(&format!("field{i}=value+{i}%21"));
    }
    body.into_bytes()
}

fn parse(chunks: &[&[u8]]) {
    let options = FormOptions::default();
    let mut scanner = FormScanner::new(&options);
    let mut accumulator = KeyValueAccumulator::new(&options);
    scanner
        .parse_values(black_box(chunks), &mut accumulator, true)
        .expect("bench body is within limits");
    black_box(accumulator.value_count());
}

fn bench_single_segment(c: &mut Criterion) {
    let body = build_body(100);
    c.bench_function("scan_100_pairs_single_segment", |b| {
        b.iter(|| parse(&[&body]));
    });
}

fn bench_multi_segment(c: &mut Criterion) {
    let body = build_body(100);
    let chunks: Vec<&[u8]> = body.chunks(64).collect();
    c.bench_function("scan_100_pairs_64_byte_segments", |b| {
        b.iter(|| parse(&chunks));
    });
}

criterion_group!(benches, bench_single_segment, bench_multi_segment);
criterion_main!(benches);
