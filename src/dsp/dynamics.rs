use std::f32::consts::PI;

/// Converts decibels to linear amplitude.
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Converts linear amplitude to decibels.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    20.0 * linear.max(1e-6).log10()
}

/// Soft clipper used by the saturation stage.
#[inline]
pub fn saturate(sample: f32) -> f32 {
    sample.tanh()
}

/// One-pole smoothing constant for a time in milliseconds.
///
/// Times under a microsecond give 0, i.e. the follower jumps straight to the
/// input.
fn ballistics_constant(time_ms: f32, sample_rate: f32) -> f32 {
    if time_ms < 1.0e-3 {
        0.0
    } else {
        (-2.0 * PI * 1000.0 / (sample_rate * time_ms)).exp()
    }
}

/// Peak envelope follower with separate attack and release.
#[derive(Debug, Clone)]
pub struct EnvelopeFollower {
    envelope: f32,
    attack_coeff: f32,
    release_coeff: f32,
}

impl EnvelopeFollower {
    pub fn new(attack_ms: f32, release_ms: f32, sample_rate: f32) -> Self {
        let mut follower = Self {
            envelope: 0.0,
            attack_coeff: 0.0,
            release_coeff: 0.0,
        };
        follower.set_times(attack_ms, release_ms, sample_rate);
        follower
    }

    pub fn set_times(&mut self, attack_ms: f32, release_ms: f32, sample_rate: f32) {
        self.attack_coeff = ballistics_constant(attack_ms, sample_rate);
        self.release_coeff = ballistics_constant(release_ms, sample_rate);
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let level = input.abs();
        let coeff = if level > self.envelope {
            self.attack_coeff
        } else {
            self.release_coeff
        };

        self.envelope = level + coeff * (self.envelope - level);
        self.envelope
    }

    pub fn envelope(&self) -> f32 {
        self.envelope
    }

    pub fn reset(&mut self) {
        self.envelope = 0.0;
    }
}

/// Hard-knee gain computer: unity below threshold, `ratio`:1 above.
#[derive(Debug, Clone, Copy)]
pub struct GainComputer {
    threshold: f32,
    threshold_inverse: f32,
    ratio_inverse: f32,
}

impl GainComputer {
    pub fn new(threshold_db: f32, ratio: f32) -> Self {
        let mut computer = Self {
            threshold: 1.0,
            threshold_inverse: 1.0,
            ratio_inverse: 1.0,
        };
        computer.set_threshold_db(threshold_db);
        computer.set_ratio(ratio);
        computer
    }

    pub fn set_threshold_db(&mut self, threshold_db: f32) {
        self.threshold = db_to_linear(threshold_db).max(1e-6);
        self.threshold_inverse = 1.0 / self.threshold;
    }

    /// Ratios below 1 would expand, so they are clamped to 1.
    pub fn set_ratio(&mut self, ratio: f32) {
        self.ratio_inverse = 1.0 / ratio.max(1.0);
    }

    #[inline]
    pub fn gain(&self, envelope: f32) -> f32 {
        if envelope < self.threshold {
            1.0
        } else {
            (envelope * self.threshold_inverse).powf(self.ratio_inverse - 1.0)
        }
    }
}
