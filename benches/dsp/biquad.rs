//! Benchmarks for the biquad section and its coefficient design.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use fxcore::dsp::{Biquad, BiquadCoefficients};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_biquad(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/biquad");

    for &size in BLOCK_SIZES {
        // Sawtooth-like ramp
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        let mut filter = Biquad::with_coefficients(BiquadCoefficients::lowpass(1_000.0, 0.707, SAMPLE_RATE));
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("lowpass", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer));
            })
        });

        let mut filter =
            Biquad::with_coefficients(BiquadCoefficients::peaking(4_000.0, 6.0, 1.0, SAMPLE_RATE));
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("peaking", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer));
            })
        });
    }

    // Redesign cost, paid once per parameter change
    group.bench_function("design_peaking", |b| {
        b.iter(|| {
            BiquadCoefficients::peaking(
                black_box(2_500.0),
                black_box(-4.5),
                black_box(0.9),
                SAMPLE_RATE,
            )
        })
    });

    group.finish();
}
