//! Effects assembled from the DSP primitives.
//!
//! Each effect owns its parameter store and primitive state, sizes that state
//! in `prepare`, and transforms host buffers in place in `process`. None of
//! them allocate after `prepare`.

/// Feed-forward compressor behind a tanh saturation stage.
pub mod dynamics;
/// LFO-modulated feedback delay.
pub mod delay;
/// Series multi-band biquad equalizer.
pub mod equalizer;
/// The `Effect` trait shared by everything in this module.
pub mod node;
/// Mid-side stereo width.
pub mod width;

pub use delay::ModulatedDelay;
pub use dynamics::SaturatingCompressor;
pub use equalizer::{BandConfig, Equalizer, FilterBand};
pub use node::Effect;
pub use width::StereoWidth;
