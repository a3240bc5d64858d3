//! Test signals for live mode

use clap::ValueEnum;

use fxcore::dsp::DelayLine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// 220 Hz sine
    Sine,
    /// White noise
    Noise,
    /// Plucked string, retriggered twice a second
    Pluck,
}

/// Fast pseudorandom generator for noise (xorshift32)
#[derive(Clone, Copy, Debug)]
struct Xorshift32 {
    state: u32,
}

impl Xorshift32 {
    fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    #[inline]
    fn next_f32(&mut self) -> f32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        (x as f32 / u32::MAX as f32) * 2.0 - 1.0
    }
}

/// Karplus-Strong string: a noise burst circulating through a delay line
/// with a two-tap average in the loop.
struct Pluck {
    line: DelayLine,
    period: usize,
    retrigger: usize,
    counter: usize,
    burst_left: usize,
}

impl Pluck {
    fn new(sample_rate: f32, frequency: f32) -> Option<Self> {
        let period = (sample_rate / frequency).round().max(2.0) as usize;
        Some(Self {
            line: DelayLine::new(period + 1).ok()?,
            period,
            retrigger: (sample_rate * 0.5) as usize,
            counter: 0,
            burst_left: 0,
        })
    }

    fn next_sample(&mut self, rng: &mut Xorshift32) -> f32 {
        if self.counter == 0 {
            self.burst_left = self.period;
        }
        self.counter = (self.counter + 1) % self.retrigger.max(1);

        // The line holds `period` samples of the string; the oldest two are
        // averaged and fed back.
        let out = 0.5 * (self.line.read_delayed(self.period - 1) + self.line.read_delayed(self.period - 2));
        let input = if self.burst_left > 0 {
            self.burst_left -= 1;
            rng.next_f32() * 0.8
        } else {
            out * 0.996
        };
        self.line.push(input);
        out
    }
}

pub struct Source {
    kind: SourceKind,
    phase: f32,
    increment: f32,
    rng: Xorshift32,
    pluck: Option<Pluck>,
}

impl Source {
    pub fn new(kind: SourceKind, sample_rate: f32) -> Self {
        Self {
            kind,
            phase: 0.0,
            increment: 220.0 / sample_rate,
            rng: Xorshift32::new(0x9e37_79b9),
            pluck: Pluck::new(sample_rate, 110.0),
        }
    }

    pub fn fill(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = match self.kind {
                SourceKind::Sine => {
                    let s = (self.phase * std::f32::consts::TAU).sin() * 0.5;
                    self.phase = (self.phase + self.increment).fract();
                    s
                }
                SourceKind::Noise => self.rng.next_f32() * 0.25,
                SourceKind::Pluck => match self.pluck.as_mut() {
                    Some(pluck) => pluck.next_sample(&mut self.rng),
                    None => 0.0,
                },
            };
        }
    }
}
