//! Benchmarks for delay line operations.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use fxcore::dsp::DelayLine;

use crate::BLOCK_SIZES;

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");

    // Delay times in samples
    let delay_times: &[usize] = &[
        480,   // 10ms at 48kHz
        4800,  // 100ms at 48kHz
        47000, // just under the 1 s capacity
    ];

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();

        for &delay_samples in delay_times {
            let delay_ms = delay_samples / 48;

            // Push then integer read, the plain echo path
            let mut line = DelayLine::new(48_000).unwrap();
            let mut buffer = input.clone();
            group.bench_with_input(
                BenchmarkId::new(format!("push_read_{}ms", delay_ms), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        buffer.copy_from_slice(&input);
                        for sample in buffer.iter_mut() {
                            line.push(*sample);
                            *sample = line.read_delayed(black_box(delay_samples));
                        }
                    })
                },
            );
        }

        // Interpolated read (fractional delay - used in chorus/flanger)
        let mut line = DelayLine::new(48_000).unwrap();
        for &sample in &input {
            line.push(sample);
        }
        group.bench_with_input(BenchmarkId::new("read_interpolated", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for i in 0..size {
                    // Modulated delay time, chorus-like
                    let delay_time = 480.0 + (i as f32 * 0.1).sin() * 48.0;
                    sum += line.read_interpolated(black_box(delay_time));
                }
                sum
            })
        });
    }

    group.finish();
}
