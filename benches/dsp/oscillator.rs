//! Benchmarks for the LFO phase oscillator.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use fxcore::dsp::PhaseOscillator;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f64; size];

        // Typical LFO rate
        let mut osc = PhaseOscillator::new(SAMPLE_RATE, 0.5, 0.0).unwrap();
        group.bench_with_input(BenchmarkId::new("lfo", size), &size, |b, _| {
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    *sample = osc.next_sample();
                }
                black_box(&buffer);
            })
        });

        // Near Nyquist the phase wraps almost every sample
        let mut osc = PhaseOscillator::new(SAMPLE_RATE, 20_000.0, 0.0).unwrap();
        group.bench_with_input(BenchmarkId::new("audio_rate", size), &size, |b, _| {
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    *sample = osc.next_sample();
                }
                black_box(&buffer);
            })
        });
    }

    group.finish();
}
