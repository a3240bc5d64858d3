//! Benchmarks for low-level DSP primitives.

mod biquad;
mod delay;
mod oscillator;

pub use biquad::bench_biquad;
pub use delay::bench_delay;
pub use oscillator::bench_oscillator;
