use std::f64::consts::FRAC_PI_2;
use std::sync::Arc;

use tracing::debug;

use crate::config::{ChannelLayout, ConfigError, ProcessSpec};
use crate::dsp::{DelayLine, PhaseOscillator};
use crate::effects::node::Effect;
use crate::params::{ParamSpec, ParamStore};

/*
Modulated Delay
===============

A feedback delay whose read tap is swept by a slow cosine LFO. Short base
delays with a little depth give chorus and flanger sounds; longer ones give a
wobbly echo.

Per sample, per channel:

    delay = base * rate + lfo * depth * rate        (in samples)
    line.push(input + previous_wet * feedback)
    wet   = line.read_interpolated(delay)
    out   = wet * mix + input * (1 - mix)

Stereo runs two independent lines whose LFOs start a quarter turn apart, so
the two sides sweep out of step and the image widens. Mono-to-stereo copies
the input into the second channel first and then behaves like stereo.
*/

pub const DELAY_LENGTH: usize = 0;
pub const MOD_DEPTH: usize = 1;
pub const FEEDBACK: usize = 2;
pub const LFO_SPEED: usize = 3;
pub const MIX: usize = 4;

/// Capacity used by `ModulatedDelay::new`.
pub const DEFAULT_MAX_DELAY_SECONDS: f64 = 1.0;

/// LFO start phase per output channel.
const LFO_PHASES: [f64; 2] = [0.0, FRAC_PI_2];

struct DelayChannel {
    line: DelayLine,
    lfo: PhaseOscillator,
    previous_wet: f32,
}

pub struct ModulatedDelay {
    params: Arc<ParamStore>,
    max_delay_seconds: f64,
    sample_rate: f64,
    layout: ChannelLayout,
    channels: Vec<DelayChannel>,
}

impl ModulatedDelay {
    pub fn new() -> Self {
        Self::with_max_delay(DEFAULT_MAX_DELAY_SECONDS)
    }

    /// Longest delay the lines can hold. Checked in `prepare`.
    pub fn with_max_delay(seconds: f64) -> Self {
        let params = ParamStore::new(vec![
            ParamSpec::float("delay_length", "Delay Length", 0.001, 0.1, 0.001).with_unit("s"),
            ParamSpec::float("mod_depth", "Modulation Depth", 0.0, 10.0, 1.0).with_unit("ms"),
            ParamSpec::float("feedback", "Feedback", 0.0, 1.0, 0.0),
            ParamSpec::float("lfo_speed", "LFO Speed", 0.0, 1.0, 0.5).with_unit("Hz"),
            ParamSpec::float("mix", "Wet/Dry Mix", 0.0, 1.0, 0.5),
        ]);

        Self {
            params: Arc::new(params),
            max_delay_seconds: seconds,
            sample_rate: 0.0,
            layout: ChannelLayout::Mono,
            channels: Vec::new(),
        }
    }

    pub fn max_delay_seconds(&self) -> f64 {
        self.max_delay_seconds
    }

    /// Current LFO phase of a prepared channel.
    pub fn lfo_phase(&self, channel: usize) -> Option<f64> {
        self.channels.get(channel).map(|ch| ch.lfo.phase())
    }
}

impl Default for ModulatedDelay {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for ModulatedDelay {
    fn params(&self) -> Arc<ParamStore> {
        Arc::clone(&self.params)
    }

    fn prepare(&mut self, spec: &ProcessSpec) -> Result<(), ConfigError> {
        let speed = self.params.get(LFO_SPEED) as f64;

        let mut channels = Vec::with_capacity(spec.layout.output_channels());
        for &phase in LFO_PHASES.iter().take(spec.layout.output_channels()) {
            channels.push(DelayChannel {
                line: DelayLine::with_duration(self.max_delay_seconds, spec.sample_rate)?,
                lfo: PhaseOscillator::new(spec.sample_rate, speed, phase)?,
                previous_wet: 0.0,
            });
        }

        debug!(
            sample_rate = spec.sample_rate,
            layout = ?spec.layout,
            channels = channels.len(),
            capacity = ?channels.first().map(|ch| ch.line.capacity()),
            "modulated delay prepared"
        );

        self.channels = channels;
        self.sample_rate = spec.sample_rate;
        self.layout = spec.layout;
        Ok(())
    }

    fn process(&mut self, channels: &mut [&mut [f32]]) {
        if self.layout == ChannelLayout::MonoToStereo {
            if let [input, copy, ..] = channels {
                copy.copy_from_slice(input);
            }
        }

        let base = self.params.get(DELAY_LENGTH) as f64 * self.sample_rate;
        let depth = self.params.get(MOD_DEPTH) as f64 / 1000.0 * self.sample_rate;
        let feedback = self.params.get(FEEDBACK);
        let speed = self.params.get(LFO_SPEED) as f64;
        let mix = self.params.get(MIX);

        for (state, buffer) in self.channels.iter_mut().zip(channels.iter_mut()) {
            state.lfo.set_frequency(speed);

            for sample in buffer.iter_mut() {
                let dry = *sample;
                let delay = (base + state.lfo.next_sample() * depth) as f32;

                state.line.push(dry + state.previous_wet * feedback);
                let wet = state.line.read_interpolated(delay);

                *sample = wet * mix + dry * (1.0 - mix);
                state.previous_wet = wet;
            }
        }
    }

    fn reset(&mut self) {
        for (state, &phase) in self.channels.iter_mut().zip(LFO_PHASES.iter()) {
            state.line.reset();
            state.lfo.reset_phase(phase);
            state.previous_wet = 0.0;
        }
    }

    fn name(&self) -> &'static str {
        "ModulatedDelay"
    }
}
