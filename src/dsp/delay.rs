use crate::config::ConfigError;

/*
Delay Line
==========

A fixed-size ring of past samples. `push` writes the newest sample and moves
the cursor forward; reads look back from the newest sample.

    delay 0  = the sample pushed last
    delay 1  = the one before it
    delay N  = N pushes ago (N < capacity)

Fractional Reads
----------------

Modulated delays (chorus, flanger, vibrato) move the read tap continuously,
so the tap usually lands between two stored samples. Snapping to the nearest
sample makes the modulation sound grainy. `read_interpolated` fits a cubic
through four neighbours (the pd `tabread4~` formula):

        a         b         c         d
    delay i-1  delay i   delay i+1  delay i+2
                  |---f---|

    result = b + f * ((c - b) - 1/6 * (1 - f) * ((d - a - 3(c - b)) * f + (d + 2a - 3b)))

At f = 0 the result is exactly b. The smallest usable delay is 1 sample: tap
`a` sits one sample newer than `b`, and anything newer than delay 0 has not
been written yet.
*/

/// Largest number of samples a line may hold.
pub const MAX_CAPACITY: usize = isize::MAX as usize / std::mem::size_of::<f32>();

pub struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl DelayLine {
    /// Allocate a line holding `capacity` samples of history.
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroDelayCapacity);
        }
        if capacity > MAX_CAPACITY {
            return Err(ConfigError::DelayAllocation { samples: capacity });
        }

        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(capacity)
            .map_err(|_| ConfigError::DelayAllocation { samples: capacity })?;
        buffer.resize(capacity, 0.0);

        Ok(Self {
            buffer,
            write_pos: 0,
        })
    }

    /// Allocate enough history for `seconds` of audio at `sample_rate`.
    pub fn with_duration(seconds: f64, sample_rate: f64) -> Result<Self, ConfigError> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(ConfigError::InvalidSampleRate(sample_rate));
        }
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(ConfigError::InvalidDelayCapacity { seconds });
        }

        let samples = (seconds * sample_rate).ceil();
        if samples < 1.0 || samples > MAX_CAPACITY as f64 {
            return Err(ConfigError::InvalidDelayCapacity { seconds });
        }
        Self::new(samples as usize)
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn push(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos += 1;
        if self.write_pos >= self.buffer.len() {
            self.write_pos = 0;
        }
    }

    /// Sample pushed `delay_samples` pushes ago, clamped to the stored history.
    #[inline]
    pub fn read_delayed(&self, delay_samples: usize) -> f32 {
        let delay = delay_samples.min(self.buffer.len() - 1);
        self.buffer[self.tap_index(delay)]
    }

    /// Four-point interpolated read at a fractional delay.
    ///
    /// The delay is clamped to `[1, capacity - 3]` (or to 1 for lines shorter
    /// than four samples).
    #[inline]
    pub fn read_interpolated(&self, delay_samples: f32) -> f32 {
        let max_delay = self.buffer.len().saturating_sub(3).max(1) as f32;
        let delay = if delay_samples.is_nan() {
            1.0
        } else {
            delay_samples.clamp(1.0, max_delay)
        };

        let whole = delay as usize;
        let frac = delay - whole as f32;

        let a = self.buffer[self.tap_index(whole - 1)];
        let b = self.buffer[self.tap_index(whole)];
        let c = self.buffer[self.tap_index(whole + 1)];
        let d = self.buffer[self.tap_index(whole + 2)];

        let c_minus_b = c - b;
        b + frac
            * (c_minus_b
                - (1.0 / 6.0)
                    * (1.0 - frac)
                    * ((d - a - 3.0 * c_minus_b) * frac + (d + 2.0 * a - 3.0 * b)))
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }

    // Each tap wraps on its own, so a tap past the oldest sample lands back
    // on recent history instead of indexing out of bounds.
    #[inline]
    fn tap_index(&self, delay: usize) -> usize {
        let len = self.buffer.len();
        (self.write_pos + len - 1 - delay % len) % len
    }
}
