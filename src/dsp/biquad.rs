use std::f64::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Biquad Filter
=============

A second-order IIR section: two poles, two zeros, five coefficients and two
state registers. Coefficients come from Robert Bristow-Johnson's Audio EQ
Cookbook, normalised by a0 so the recursion never divides:

    gain = b0/a0   ff1 = b1/a0   ff2 = b2/a0
                   fb1 = a1/a0   fb2 = a2/a0

Per sample:

    v0 = x - fb1*v1 - fb2*v2
    y  = gain*v0 + ff1*v1 + ff2*v2
    v2 = v1; v1 = v0

Precision
---------

Everything here is f64 even though host buffers are f32. Poles close to the
unit circle (low cutoff, high Q) are sensitive to coefficient rounding and an
f32 biquad can drift into instability.

| kind     | passes            | shapes                   |
| -------- | ----------------- | ------------------------ |
| lowpass  | below cutoff      | -12 dB/oct above cutoff  |
| peaking  | everything        | +/- gain around center   |
*/

/// Lowest frequency the designers accept; 0 Hz collapses the poles onto z = 1.
pub const MIN_FREQUENCY_HZ: f64 = 1.0;

/// Lowest Q the designers accept; Q = 0 divides by zero in alpha.
pub const MIN_Q: f64 = 0.01;

/// Normalised biquad coefficients, published as one value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    pub gain: f64,
    pub ff1: f64,
    pub ff2: f64,
    pub fb1: f64,
    pub fb2: f64,
}

impl BiquadCoefficients {
    /// Passes input straight through.
    pub const IDENTITY: Self = Self {
        gain: 1.0,
        ff1: 0.0,
        ff2: 0.0,
        fb1: 0.0,
        fb2: 0.0,
    };

    pub fn lowpass(cutoff_hz: f64, q: f64, sample_rate: f64) -> Self {
        let (cos_w0, alpha) = angular_terms(cutoff_hz, q, sample_rate);

        let b0 = (1.0 - cos_w0) / 2.0;
        let b1 = 1.0 - cos_w0;
        let b2 = (1.0 - cos_w0) / 2.0;
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cos_w0;
        let a2 = 1.0 - alpha;

        Self::normalized(b0, b1, b2, a0, a1, a2)
    }

    pub fn peaking(center_hz: f64, gain_db: f64, q: f64, sample_rate: f64) -> Self {
        let gain_db = if gain_db.is_finite() { gain_db } else { 0.0 };
        let a = 10.0_f64.powf(gain_db / 40.0);
        let (cos_w0, alpha) = angular_terms(center_hz, q, sample_rate);

        let b0 = 1.0 + alpha * a;
        let b1 = -2.0 * cos_w0;
        let b2 = 1.0 - alpha * a;
        let a0 = 1.0 + alpha / a;
        let a1 = -2.0 * cos_w0;
        let a2 = 1.0 - alpha / a;

        Self::normalized(b0, b1, b2, a0, a1, a2)
    }

    fn normalized(b0: f64, b1: f64, b2: f64, a0: f64, a1: f64, a2: f64) -> Self {
        Self {
            gain: b0 / a0,
            ff1: b1 / a0,
            ff2: b2 / a0,
            fb1: a1 / a0,
            fb2: a2 / a0,
        }
    }
}

impl Default for BiquadCoefficients {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Returns `(cos(w0), alpha)` with frequency and Q clamped to designable values.
fn angular_terms(freq_hz: f64, q: f64, sample_rate: f64) -> (f64, f64) {
    debug_assert!(sample_rate > 0.0, "biquad designed against a non-positive sample rate");

    let nyquist = sample_rate * 0.5;
    let freq = if freq_hz.is_nan() {
        nyquist
    } else {
        freq_hz.clamp(MIN_FREQUENCY_HZ.min(nyquist), nyquist)
    };
    let q = if q.is_nan() { MIN_Q } else { q.max(MIN_Q) };

    let w0 = 2.0 * PI * freq / sample_rate;
    (w0.cos(), w0.sin() / (2.0 * q))
}

/// Filter topologies a band can switch between at run time.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Lowpass,
    Peaking,
}

impl FilterKind {
    /// Choice labels, in selector order.
    pub const NAMES: &'static [&'static str] = &["Lowpass", "Peaking"];

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(FilterKind::Lowpass),
            1 => Some(FilterKind::Peaking),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            FilterKind::Lowpass => 0,
            FilterKind::Peaking => 1,
        }
    }

    /// Design coefficients for this topology. Lowpass ignores `gain_db`.
    pub fn design(self, freq_hz: f64, q: f64, gain_db: f64, sample_rate: f64) -> BiquadCoefficients {
        match self {
            FilterKind::Lowpass => BiquadCoefficients::lowpass(freq_hz, q, sample_rate),
            FilterKind::Peaking => BiquadCoefficients::peaking(freq_hz, gain_db, q, sample_rate),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Biquad {
    coeffs: BiquadCoefficients,
    v1: f64,
    v2: f64,
}

impl Biquad {
    pub fn new() -> Self {
        Self::with_coefficients(BiquadCoefficients::IDENTITY)
    }

    pub fn with_coefficients(coeffs: BiquadCoefficients) -> Self {
        Self {
            coeffs,
            v1: 0.0,
            v2: 0.0,
        }
    }

    pub fn design_lowpass(&mut self, cutoff_hz: f64, q: f64, sample_rate: f64) {
        self.coeffs = BiquadCoefficients::lowpass(cutoff_hz, q, sample_rate);
    }

    pub fn design_peaking(&mut self, center_hz: f64, gain_db: f64, q: f64, sample_rate: f64) {
        self.coeffs = BiquadCoefficients::peaking(center_hz, gain_db, q, sample_rate);
    }

    /// Swap in a new coefficient set. State registers are kept.
    pub fn set_coefficients(&mut self, coeffs: BiquadCoefficients) {
        self.coeffs = coeffs;
    }

    pub fn coefficients(&self) -> BiquadCoefficients {
        self.coeffs
    }

    #[inline]
    pub fn perform_filter(&mut self, input: f64) -> f64 {
        let c = &self.coeffs;
        let v0 = input - c.fb1 * self.v1 - c.fb2 * self.v2;
        let output = c.gain * v0 + c.ff1 * self.v1 + c.ff2 * self.v2;

        self.v2 = self.v1;
        self.v1 = v0;

        output
    }

    /// Filter an f32 block in place, keeping the recursion in f64.
    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.perform_filter(*sample as f64) as f32;
        }
    }

    /// Zero the state registers. Call on topology changes only.
    pub fn clear_state(&mut self) {
        self.v1 = 0.0;
        self.v2 = 0.0;
    }

    pub fn state(&self) -> (f64, f64) {
        (self.v1, self.v2)
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f64 = 48_000.0;

    fn sine(freq: f64, len: usize) -> Vec<f64> {
        (0..len)
            .map(|n| (2.0 * PI * freq * n as f64 / SAMPLE_RATE).sin())
            .collect()
    }

    /// Peak output amplitude once the start-up transient has died down.
    fn steady_state_peak(filter: &mut Biquad, input: &[f64]) -> f64 {
        let skip = input.len() / 2;
        input
            .iter()
            .enumerate()
            .map(|(n, &x)| (n, filter.perform_filter(x)))
            .filter(|(n, _)| *n >= skip)
            .fold(0.0f64, |acc, (_, y)| acc.max(y.abs()))
    }

    #[test]
    fn test_cleared_filter_outputs_silence() {
        let mut filter = Biquad::new();
        filter.design_lowpass(1_000.0, 0.707, SAMPLE_RATE);
        for x in [1.0, -0.5, 0.25, 0.8] {
            filter.perform_filter(x);
        }

        filter.clear_state();
        assert_eq!(filter.perform_filter(0.0), 0.0);
        assert_eq!(filter.perform_filter(0.0), 0.0);
        assert_eq!(filter.state(), (0.0, 0.0));
    }

    #[test]
    fn test_lowpass_attenuates_above_cutoff() {
        let mut filter = Biquad::new();
        filter.design_lowpass(500.0, 0.707, SAMPLE_RATE);
        let stop_peak = steady_state_peak(&mut filter, &sine(SAMPLE_RATE / 4.0, 4_800));

        filter.clear_state();
        let pass_peak = steady_state_peak(&mut filter, &sine(50.0, 9_600));

        assert!(
            stop_peak < 0.01,
            "expected Nyquist/2 to be attenuated, got peak {}",
            stop_peak
        );
        assert!(
            (pass_peak - 1.0).abs() < 0.02,
            "expected 50 Hz to pass near unity, got peak {}",
            pass_peak
        );
    }

    #[test]
    fn test_lowpass_dc_gain_is_unity() {
        let c = BiquadCoefficients::lowpass(2_000.0, 0.707, SAMPLE_RATE);
        let dc = (c.gain + c.ff1 + c.ff2) / (1.0 + c.fb1 + c.fb2);
        assert!((dc - 1.0).abs() < 1e-9, "DC gain {}", dc);
    }

    #[test]
    fn test_peaking_zero_gain_is_identity() {
        let mut filter = Biquad::new();
        filter.design_peaking(1_000.0, 0.0, 1.0, SAMPLE_RATE);

        for (n, x) in sine(440.0, 512).into_iter().enumerate() {
            let y = filter.perform_filter(x);
            assert!((y - x).abs() < 1e-9, "sample {}: {} vs {}", n, y, x);
        }
    }

    #[test]
    fn test_peaking_boosts_center() {
        let mut filter = Biquad::new();
        filter.design_peaking(1_000.0, 12.0, 1.0, SAMPLE_RATE);
        let peak = steady_state_peak(&mut filter, &sine(1_000.0, 9_600));

        // +12 dB is a factor of ~3.98
        assert!((peak - 3.98).abs() < 0.1, "expected ~3.98, got {}", peak);
    }

    #[test]
    fn test_lowpass_at_nyquist_passes_signal() {
        let mut filter = Biquad::new();
        filter.design_lowpass(SAMPLE_RATE, 0.707, SAMPLE_RATE);

        for x in sine(1_000.0, 1_024) {
            let y = filter.perform_filter(x);
            assert!((y - x).abs() < 1e-6);
        }
    }

    #[test]
    fn test_design_clamps_degenerate_inputs() {
        for c in [
            BiquadCoefficients::lowpass(0.0, 0.0, SAMPLE_RATE),
            BiquadCoefficients::lowpass(-100.0, -1.0, SAMPLE_RATE),
            BiquadCoefficients::peaking(f64::NAN, f64::INFINITY, f64::NAN, SAMPLE_RATE),
        ] {
            for v in [c.gain, c.ff1, c.ff2, c.fb1, c.fb2] {
                assert!(v.is_finite(), "non-finite coefficient in {:?}", c);
            }
        }
    }

    #[test]
    fn test_set_coefficients_keeps_state() {
        let mut filter = Biquad::new();
        filter.design_lowpass(1_000.0, 0.707, SAMPLE_RATE);
        filter.perform_filter(1.0);
        let before = filter.state();

        filter.design_lowpass(2_000.0, 0.707, SAMPLE_RATE);
        assert_eq!(filter.state(), before);
    }

    #[test]
    fn test_filter_kind_selector() {
        assert_eq!(FilterKind::from_index(0), Some(FilterKind::Lowpass));
        assert_eq!(FilterKind::from_index(1), Some(FilterKind::Peaking));
        assert_eq!(FilterKind::from_index(2), None);
        for (i, _) in FilterKind::NAMES.iter().enumerate() {
            assert_eq!(FilterKind::from_index(i).map(FilterKind::index), Some(i));
        }
        assert_eq!(
            FilterKind::Lowpass.design(500.0, 0.707, 6.0, SAMPLE_RATE),
            BiquadCoefficients::lowpass(500.0, 0.707, SAMPLE_RATE)
        );
    }

    #[test]
    fn test_render_matches_per_sample_filtering() {
        let input: Vec<f32> = (0..64).map(|i| (i as f32 * 0.3).sin()).collect();
        let mut a = Biquad::with_coefficients(BiquadCoefficients::lowpass(800.0, 2.0, SAMPLE_RATE));
        let mut b = a.clone();

        let mut block = input.clone();
        a.render(&mut block);
        for (x, y) in input.iter().zip(&block) {
            assert_eq!(b.perform_filter(*x as f64) as f32, *y);
        }
    }
}
