//! Benchmarks for the pricing engine.
//!
//! Run with: `cargo bench --package quantumswap-math`

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use num_bigint::BigUint;
use quantumswap_math::{
    encode_sqrt_price_x96, isqrt, parse_decimal, price_to_tick, tick_to_price, MAX_TICK, MIN_TICK,
};

/// Benchmark: 1.0001^tick at the protocol extremes (20 squarings each).
fn bench_tick_to_price_extremes(c: &mut Criterion) {
    c.bench_function("tick_to_price_max", |b| {
        b.iter(|| tick_to_price(black_box(MAX_TICK)))
    });
    c.bench_function("tick_to_price_min", |b| {
        b.iter(|| tick_to_price(black_box(MIN_TICK)))
    });
}

/// Benchmark: parse a user price and find its tick.
fn bench_price_to_tick(c: &mut Criterion) {
    c.bench_function("parse_and_price_to_tick", |b| {
        b.iter(|| {
            let price = parse_decimal(black_box("2765.1634")).unwrap_or_default();
            price_to_tick(&price)
        })
    });
}

/// Benchmark: floor sqrt of a ~256-bit integer.
fn bench_isqrt_256_bits(c: &mut Criterion) {
    let x = (BigUint::from(1u8) << 255u32) + BigUint::from(12_345u32);
    c.bench_function("isqrt_256_bits", |b| b.iter(|| isqrt(black_box(&x))));
}

/// Benchmark: pool initialization encoding with a 10^12 decimal adjustment.
fn bench_encode_sqrt_price(c: &mut Criterion) {
    let price = BigUint::from(2_765u32);
    c.bench_function("encode_sqrt_price_x96", |b| {
        b.iter(|| encode_sqrt_price_x96(black_box(&price), 18, 6))
    });
}

criterion_group!(
    benches,
    bench_tick_to_price_extremes,
    bench_price_to_tick,
    bench_isqrt_256_bits,
    bench_encode_sqrt_price
);
criterion_main!(benches);
