//! Low-level DSP primitives used by the effects.
//!
//! These components are allocation-free once constructed and realtime-safe,
//! so effects embed them directly. They stay focused on the signal-processing
//! math; parameter handling and channel routing live in `effects`.

/// Second-order IIR section with cookbook coefficient design.
pub mod biquad;
/// Circular delay line with four-point fractional reads.
pub mod delay;
/// Envelope follower, compressor gain computer and soft clipper.
pub mod dynamics;
/// Cosine phase oscillator used as an LFO.
pub mod oscillator;

pub use biquad::{Biquad, BiquadCoefficients, FilterKind};
pub use delay::DelayLine;
pub use oscillator::PhaseOscillator;
