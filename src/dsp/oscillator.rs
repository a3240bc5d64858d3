use std::f64::consts::TAU;

use crate::config::ConfigError;

/// Phase-accumulating cosine oscillator, one sample per call.
///
/// Used as the LFO for modulated delays. Frequency is kept within
/// `[0, sample_rate / 2]`: negative requests are folded to their magnitude and
/// anything above Nyquist is capped.
///
/// Two oscillators started a quarter turn apart (`0` and `TAU / 4`) give a
/// quadrature pair for decorrelating left and right channels.
#[derive(Debug, Clone)]
pub struct PhaseOscillator {
    sample_rate: f64,
    frequency: f64,
    phase: f64,
}

impl PhaseOscillator {
    pub fn new(sample_rate: f64, frequency: f64, initial_phase: f64) -> Result<Self, ConfigError> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(ConfigError::InvalidSampleRate(sample_rate));
        }

        let mut osc = Self {
            sample_rate,
            frequency: 0.0,
            phase: wrap_phase(initial_phase),
        };
        osc.set_frequency(frequency);
        Ok(osc)
    }

    pub fn set_frequency(&mut self, frequency_hz: f64) {
        let nyquist = self.sample_rate * 0.5;
        self.frequency = if frequency_hz.is_nan() {
            0.0
        } else {
            frequency_hz.abs().min(nyquist)
        };
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Radians added to the phase per sample at the current frequency.
    #[inline]
    pub fn phase_increment(&self) -> f64 {
        self.frequency / self.sample_rate * TAU
    }

    #[inline]
    pub fn next_sample(&mut self) -> f64 {
        self.phase += self.phase_increment();
        // Increment is at most PI, one subtraction is enough.
        if self.phase >= TAU {
            self.phase -= TAU;
        }
        self.phase.cos()
    }

    pub fn reset_phase(&mut self, phase: f64) {
        self.phase = wrap_phase(phase);
    }
}

fn wrap_phase(phase: f64) -> f64 {
    if phase.is_finite() {
        phase.rem_euclid(TAU)
    } else {
        0.0
    }
}
