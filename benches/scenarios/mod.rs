//! Full-effect benchmarks.
//!
//! Each effect runs stereo blocks the way a host would drive it, including
//! the parameter queue between blocks.

mod effects;

pub use effects::bench_effects;
