//! Full effects on stereo blocks.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use fxcore::effects::{Effect, Equalizer, ModulatedDelay, SaturatingCompressor, StereoWidth};
use fxcore::host;
use fxcore::{ChannelLayout, ProcessSpec};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn effects() -> Vec<(&'static str, Box<dyn Effect>)> {
    vec![
        ("modulated_delay", Box::new(ModulatedDelay::new()) as Box<dyn Effect>),
        ("equalizer", Box::new(Equalizer::new()) as Box<dyn Effect>),
        ("stereo_width", Box::new(StereoWidth::new()) as Box<dyn Effect>),
        ("saturating_compressor", Box::new(SaturatingCompressor::new()) as Box<dyn Effect>),
    ]
}

pub fn bench_effects(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/effects");

    for &size in BLOCK_SIZES {
        let spec = ProcessSpec::new(SAMPLE_RATE, size, ChannelLayout::Stereo).unwrap();
        let left_in: Vec<f32> = (0..size).map(|i| (i as f32 * 0.05).sin() * 0.8).collect();
        let right_in: Vec<f32> = (0..size).map(|i| (i as f32 * 0.07).cos() * 0.8).collect();

        for (name, mut effect) in effects() {
            effect.prepare(&spec).unwrap();
            let mut left = left_in.clone();
            let mut right = right_in.clone();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    left.copy_from_slice(&left_in);
                    right.copy_from_slice(&right_in);
                    effect.process(&mut [&mut left[..], &mut right[..]]);
                    black_box(&left);
                })
            });
        }

        // EQ sweep: one redesign per block through the parameter queue
        let (mut processor, mut sender) = host::channel(Equalizer::new(), 64);
        processor.prepare(&spec).unwrap();
        let freq = sender.params().index_of("band1freq").unwrap();
        let mut left = left_in.clone();
        let mut right = right_in.clone();
        let mut sweep = 0u32;
        group.bench_with_input(BenchmarkId::new("equalizer_sweep", size), &size, |b, _| {
            b.iter(|| {
                sweep = (sweep + 1) % 1_000;
                sender.set(freq, 200.0 + sweep as f32 * 10.0);
                left.copy_from_slice(&left_in);
                right.copy_from_slice(&right_in);
                processor.process(&mut [&mut left[..], &mut right[..]]);
                black_box(&left);
            })
        });
    }

    group.finish();
}
