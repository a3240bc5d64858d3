use std::sync::Arc;

use tracing::debug;

use crate::config::{ChannelLayout, ConfigError, ProcessSpec};
use crate::dsp::dynamics::{saturate, EnvelopeFollower, GainComputer};
use crate::effects::node::Effect;
use crate::params::{ParamChange, ParamSpec, ParamStore};

/*
Saturating Compressor
=====================

    x -> * saturation -> tanh -> / saturation -> compressor -> y

Driving the tanh harder and scaling back down keeps the level roughly
constant while adding harmonics. The compressor then tames the peaks the
saturation left behind.

Stage settings are cached and only recomputed when a change event names
them, so the per-sample loop never touches the parameter store.
*/

pub const SATURATION: usize = 0;
pub const THRESHOLD: usize = 1;
pub const RATIO: usize = 2;
pub const ATTACK: usize = 3;
pub const RELEASE: usize = 4;

pub struct SaturatingCompressor {
    params: Arc<ParamStore>,
    sample_rate: f32,
    layout: ChannelLayout,
    pre_gain: f32,
    post_gain: f32,
    computer: GainComputer,
    followers: Vec<EnvelopeFollower>,
}

impl SaturatingCompressor {
    pub fn new() -> Self {
        let params = ParamStore::new(vec![
            ParamSpec::float("saturation", "Saturation", 0.01, 100.0, 1.0),
            ParamSpec::float("threshold", "Threshold", -60.0, 0.0, -10.0).with_unit("dB"),
            ParamSpec::float("ratio", "Ratio", 1.0, 20.0, 4.0),
            ParamSpec::float("attack", "Attack", 1.0, 30.0, 12.0).with_unit("ms"),
            ParamSpec::float("release", "Release", 1.0, 300.0, 150.0).with_unit("ms"),
        ]);

        Self {
            computer: GainComputer::new(params.get(THRESHOLD), params.get(RATIO)),
            params: Arc::new(params),
            sample_rate: 0.0,
            layout: ChannelLayout::Mono,
            pre_gain: 1.0,
            post_gain: 1.0,
            followers: Vec::new(),
        }
    }

    /// Copy one parameter (or all of them) into the stage that uses it.
    fn propagate(&mut self, change: ParamChange) {
        let all = change == ParamChange::All;
        let named = |index| all || change == ParamChange::Changed(index);

        if named(SATURATION) {
            self.pre_gain = self.params.get(SATURATION);
            self.post_gain = 1.0 / self.pre_gain;
        }
        if named(THRESHOLD) {
            self.computer.set_threshold_db(self.params.get(THRESHOLD));
        }
        if named(RATIO) {
            self.computer.set_ratio(self.params.get(RATIO));
        }
        if (named(ATTACK) || named(RELEASE)) && self.sample_rate > 0.0 {
            let attack = self.params.get(ATTACK);
            let release = self.params.get(RELEASE);
            for follower in &mut self.followers {
                follower.set_times(attack, release, self.sample_rate);
            }
        }
    }
}

impl Default for SaturatingCompressor {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for SaturatingCompressor {
    fn params(&self) -> Arc<ParamStore> {
        Arc::clone(&self.params)
    }

    fn prepare(&mut self, spec: &ProcessSpec) -> Result<(), ConfigError> {
        self.sample_rate = spec.sample_rate as f32;
        self.layout = spec.layout;
        self.followers = vec![
            EnvelopeFollower::new(
                self.params.get(ATTACK),
                self.params.get(RELEASE),
                self.sample_rate,
            );
            spec.layout.output_channels()
        ];
        self.propagate(ParamChange::All);

        debug!(
            sample_rate = spec.sample_rate,
            layout = ?spec.layout,
            "saturating compressor prepared"
        );
        Ok(())
    }

    fn process(&mut self, channels: &mut [&mut [f32]]) {
        if self.layout == ChannelLayout::MonoToStereo {
            if let [input, copy, ..] = channels {
                copy.copy_from_slice(input);
            }
        }

        for (follower, buffer) in self.followers.iter_mut().zip(channels.iter_mut()) {
            for sample in buffer.iter_mut() {
                let shaped = saturate(*sample * self.pre_gain) * self.post_gain;
                let envelope = follower.process(shaped);
                *sample = shaped * self.computer.gain(envelope);
            }
        }
    }

    fn parameter_changed(&mut self, change: ParamChange) {
        self.propagate(change);
    }

    fn reset(&mut self) {
        for follower in &mut self.followers {
            follower.reset();
        }
    }

    fn name(&self) -> &'static str {
        "SaturatingCompressor"
    }
}
