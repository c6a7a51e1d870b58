//! Benchmarks for whole-key and suffix lookups on a generated suffix list.
//!
//! Run with: cargo bench -p dafsa-compiler --bench lookup

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use dafsa_compiler::DafsaBuilder;
use dafsa_core::Dafsa;

// =============================================================================
// Helpers
// =============================================================================

/// Deterministic two- and three-component suffixes, e.g. "qrs.abc".
fn generate_suffixes(count: usize) -> Vec<String> {
    let mut state = 0x9E37_79B9_7F4A_7C15u64;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };
    let mut component = |len: usize| -> String {
        (0..len).map(|_| (b'a' + (next() % 26) as u8) as char).collect()
    };

    (0..count)
        .map(|i| match i % 3 {
            0 => component(3),
            1 => format!("{}.{}", component(4), component(3)),
            _ => format!("{}.{}.{}", component(5), component(2), component(3)),
        })
        .collect()
}

fn build(words: &[String], reversed: bool) -> Vec<u8> {
    let mut builder = DafsaBuilder::new().reversed(reversed);
    for (i, word) in words.iter().enumerate() {
        // Every fifth rule is private
        let value = if i % 5 == 0 { 4 } else { 0 };
        let _ = builder.insert(word, value);
    }
    builder.build().expect("bench graph should build")
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    for size in [100, 1_000, 10_000] {
        let words = generate_suffixes(size);
        let bytes = build(&words, false);
        let dafsa = Dafsa::new(&bytes).expect("bench graph should validate");
        group.throughput(Throughput::Elements(words.len() as u64));

        group.bench_with_input(BenchmarkId::new("hit", size), &size, |bench, _| {
            bench.iter(|| {
                words
                    .iter()
                    .filter(|w| dafsa.lookup(black_box(w.as_str())).is_found())
                    .count()
            });
        });

        group.bench_with_input(BenchmarkId::new("miss", size), &size, |bench, _| {
            bench.iter(|| {
                words
                    .iter()
                    .filter(|w| dafsa.lookup(black_box(&w[1..])).is_found())
                    .count()
            });
        });
    }

    group.finish();
}

fn bench_lookup_suffix(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup_suffix");

    let words = generate_suffixes(10_000);
    let bytes = build(&words, true);
    let dafsa = Dafsa::new(&bytes).expect("bench graph should validate");
    let hosts: Vec<String> = words
        .iter()
        .enumerate()
        .map(|(i, w)| format!("www{i}.example.{w}"))
        .collect();
    group.throughput(Throughput::Elements(hosts.len() as u64));

    for include_private in [false, true] {
        group.bench_with_input(
            BenchmarkId::new("include_private", include_private),
            &include_private,
            |bench, &include_private| {
                bench.iter(|| {
                    hosts
                        .iter()
                        .map(|h| dafsa.lookup_suffix(include_private, black_box(h.as_str())).length)
                        .sum::<usize>()
                });
            },
        );
    }

    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let words = generate_suffixes(10_000);
    c.bench_function("build_10000", |bench| {
        bench.iter(|| build(black_box(&words), true).len());
    });
}

criterion_group!(benches, bench_lookup, bench_lookup_suffix, bench_build);
criterion_main!(benches);
