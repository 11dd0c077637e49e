use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use utfconv::{to_utf8, to_utf16, to_utf32, to_wide};

/// A corpus mixing all four UTF-8 sequence lengths.
fn corpus() -> String {
    "quick brown fox 0123456789 ħéllö wörld 水の都 こんにちは мир 🦀🎼🌌 "
        .repeat(64)
}

fn bench_conversions(c: &mut Criterion) {
    let utf8 = corpus();
    let utf16 = to_utf16(&utf8);
    let utf32 = to_utf32(&utf8);

    let mut group = c.benchmark_group("convert");
    group.throughput(Throughput::Bytes(utf8.len() as u64));

    group.bench_with_input(BenchmarkId::new("utf8_to_utf16", utf8.len()), &utf8, |b, s| {
        b.iter(|| to_utf16(black_box(s.as_str())))
    });
    group.bench_with_input(BenchmarkId::new("utf8_to_utf32", utf8.len()), &utf8, |b, s| {
        b.iter(|| to_utf32(black_box(s.as_str())))
    });
    group.bench_with_input(
        BenchmarkId::new("utf16_to_utf8", utf16.len()),
        &utf16,
        |b, s| b.iter(|| to_utf8(black_box(s))),
    );
    group.bench_with_input(
        BenchmarkId::new("utf32_to_utf8", utf32.len()),
        &utf32,
        |b, s| b.iter(|| to_utf8(black_box(s))),
    );
    group.bench_with_input(BenchmarkId::new("utf8_to_wide", utf8.len()), &utf8, |b, s| {
        b.iter(|| to_wide(black_box(s.as_str())))
    });
    // The width-matched short circuit: validate and copy, no re-encoding.
    group.bench_with_input(BenchmarkId::new("utf8_to_utf8", utf8.len()), &utf8, |b, s| {
        b.iter(|| to_utf8(black_box(s.as_str())))
    });
    group.finish();
}

criterion_group!(benches, bench_conversions);
criterion_main!(benches);
