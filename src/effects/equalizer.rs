use std::sync::Arc;

use tracing::debug;

use crate::config::{ChannelLayout, ConfigError, ProcessSpec};
use crate::dsp::{Biquad, FilterKind};
use crate::effects::node::Effect;
use crate::params::{ParamChange, ParamSpec, ParamStore};

/*
Series Equalizer
================

Bands are biquads run one after another on the same signal:

    x -> band 0 -> band 1 -> ... -> y

Each band has four parameters laid out consecutively in the store:

    index = band * PARAMS_PER_BAND + offset

    offset 0  frequency  20 .. 20000 Hz
    offset 1  Q          0.1 .. 16
    offset 2  gain       -30 .. 30 dB  (peaking only)
    offset 3  type       Lowpass | Peaking

A band keeps one biquad per channel so channels never share state.
Coefficients are recomputed only when a change event names the band; the
state registers are cleared only when the band switches topology, so
sweeping a frequency does not click.
*/

pub const PARAMS_PER_BAND: usize = 4;
pub const FREQUENCY: usize = 0;
pub const Q: usize = 1;
pub const GAIN: usize = 2;
pub const KIND: usize = 3;

/// Initial settings for one band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandConfig {
    pub kind: FilterKind,
    pub frequency: f32,
    pub q: f32,
    pub gain_db: f32,
}

impl BandConfig {
    pub fn lowpass(frequency: f32) -> Self {
        Self {
            kind: FilterKind::Lowpass,
            frequency,
            q: std::f32::consts::FRAC_1_SQRT_2,
            gain_db: 0.0,
        }
    }

    pub fn peaking(frequency: f32, gain_db: f32) -> Self {
        Self {
            kind: FilterKind::Peaking,
            frequency,
            q: std::f32::consts::FRAC_1_SQRT_2,
            gain_db,
        }
    }

    fn param_specs(&self, band: usize) -> [ParamSpec; PARAMS_PER_BAND] {
        [
            ParamSpec::float(
                format!("band{}freq", band),
                format!("Band {} Frequency", band),
                20.0,
                20_000.0,
                self.frequency,
            )
            .with_unit("Hz"),
            ParamSpec::float(format!("band{}q", band), format!("Band {} Q", band), 0.1, 16.0, self.q),
            ParamSpec::float(
                format!("band{}gain", band),
                format!("Band {} Gain", band),
                -30.0,
                30.0,
                self.gain_db,
            )
            .with_unit("dB"),
            ParamSpec::choice(
                format!("band{}type", band),
                format!("Band {} Type", band),
                FilterKind::NAMES,
                self.kind.index(),
            ),
        ]
    }
}

/// One equalizer band: a filter topology and a biquad per channel.
#[derive(Debug, Clone)]
pub struct FilterBand {
    first_param: usize,
    kind: FilterKind,
    filters: Vec<Biquad>,
}

impl FilterBand {
    fn new(band: usize, kind: FilterKind) -> Self {
        Self {
            first_param: band * PARAMS_PER_BAND,
            kind,
            filters: Vec::new(),
        }
    }

    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    pub fn filter(&self, channel: usize) -> Option<&Biquad> {
        self.filters.get(channel)
    }

    /// Redesign every channel's biquad from the current parameter values.
    fn redesign(&mut self, params: &ParamStore, sample_rate: f64) {
        let selector = params.choice(self.first_param + KIND);
        let kind = match FilterKind::from_index(selector) {
            Some(kind) => kind,
            None => {
                debug_assert!(false, "unknown filter selector {}", selector);
                return;
            }
        };

        let coeffs = kind.design(
            params.get(self.first_param + FREQUENCY) as f64,
            params.get(self.first_param + Q) as f64,
            params.get(self.first_param + GAIN) as f64,
            sample_rate,
        );

        let topology_changed = kind != self.kind;
        self.kind = kind;
        for filter in &mut self.filters {
            if topology_changed {
                filter.clear_state();
            }
            filter.set_coefficients(coeffs);
        }
    }
}

pub struct Equalizer {
    params: Arc<ParamStore>,
    bands: Vec<FilterBand>,
    sample_rate: f64,
    layout: ChannelLayout,
}

impl Equalizer {
    /// Two bands: a 1 kHz lowpass followed by a flat 4 kHz peak.
    pub fn new() -> Self {
        Self::with_bands(&[BandConfig::lowpass(1_000.0), BandConfig::peaking(4_000.0, 0.0)])
    }

    pub fn with_bands(configs: &[BandConfig]) -> Self {
        let specs = configs
            .iter()
            .enumerate()
            .flat_map(|(band, config)| config.param_specs(band))
            .collect();
        let bands = configs
            .iter()
            .enumerate()
            .map(|(band, config)| FilterBand::new(band, config.kind))
            .collect();

        Self {
            params: Arc::new(ParamStore::new(specs)),
            bands,
            sample_rate: 0.0,
            layout: ChannelLayout::Mono,
        }
    }

    pub fn bands(&self) -> &[FilterBand] {
        &self.bands
    }

    fn redesign_all(&mut self) {
        for band in &mut self.bands {
            band.redesign(&self.params, self.sample_rate);
        }
    }
}

impl Default for Equalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for Equalizer {
    fn params(&self) -> Arc<ParamStore> {
        Arc::clone(&self.params)
    }

    fn prepare(&mut self, spec: &ProcessSpec) -> Result<(), ConfigError> {
        let channels = spec.layout.output_channels();
        for band in &mut self.bands {
            band.filters = vec![Biquad::new(); channels];
        }
        self.sample_rate = spec.sample_rate;
        self.layout = spec.layout;
        self.redesign_all();

        debug!(
            sample_rate = spec.sample_rate,
            layout = ?spec.layout,
            bands = self.bands.len(),
            "equalizer prepared"
        );
        Ok(())
    }

    fn process(&mut self, channels: &mut [&mut [f32]]) {
        if self.layout == ChannelLayout::MonoToStereo {
            if let [input, copy, ..] = channels {
                copy.copy_from_slice(input);
            }
        }

        for (channel, buffer) in channels.iter_mut().enumerate() {
            for sample in buffer.iter_mut() {
                let mut value = *sample as f64;
                for band in &mut self.bands {
                    if let Some(filter) = band.filters.get_mut(channel) {
                        value = filter.perform_filter(value);
                    }
                }
                *sample = value as f32;
            }
        }
    }

    fn parameter_changed(&mut self, change: ParamChange) {
        if self.sample_rate <= 0.0 {
            return;
        }

        match change {
            ParamChange::Changed(index) => {
                if let Some(band) = self.bands.get_mut(index / PARAMS_PER_BAND) {
                    band.redesign(&self.params, self.sample_rate);
                }
            }
            ParamChange::All => self.redesign_all(),
        }
    }

    fn reset(&mut self) {
        for band in &mut self.bands {
            for filter in &mut band.filters {
                filter.clear_state();
            }
        }
    }

    fn name(&self) -> &'static str {
        "Equalizer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f64 = 48_000.0;

    fn prepared(layout: ChannelLayout) -> Equalizer {
        let mut eq = Equalizer::new();
        eq.prepare(&ProcessSpec::new(SAMPLE_RATE, 512, layout).unwrap())
            .unwrap();
        eq
    }

    fn sine(freq: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|n| (std::f32::consts::TAU * freq * n as f32 / SAMPLE_RATE as f32).sin())
            .collect()
    }

    fn set(eq: &mut Equalizer, id: &str, value: f32) {
        let params = eq.params();
        let index = params.index_of(id).unwrap();
        params.set(index, value);
        eq.parameter_changed(ParamChange::Changed(index));
    }

    #[test]
    fn test_default_bands() {
        let eq = Equalizer::new();
        let params = eq.params();

        assert_eq!(params.len(), 2 * PARAMS_PER_BAND);
        assert_eq!(params.get(params.index_of("band0freq").unwrap()), 1_000.0);
        assert_eq!(params.choice(params.index_of("band0type").unwrap()), 0);
        assert_eq!(params.get(params.index_of("band1freq").unwrap()), 4_000.0);
        assert_eq!(params.choice(params.index_of("band1type").unwrap()), 1);
        assert!((params.get(params.index_of("band1q").unwrap()) - 0.707).abs() < 1e-3);
    }

    #[test]
    fn test_prepare_sizes_filters_per_channel() {
        let eq = prepared(ChannelLayout::Stereo);
        for band in eq.bands() {
            assert!(band.filter(1).is_some());
            assert!(band.filter(2).is_none());
        }
    }

    #[test]
    fn test_default_lowpass_attenuates_highs() {
        let mut eq = prepared(ChannelLayout::Mono);
        let mut buf = sine(12_000.0, 4_096);
        eq.process(&mut [&mut buf[..]]);

        let tail_peak = buf[2_048..].iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
        assert!(tail_peak < 0.05, "12 kHz leaked through: {}", tail_peak);
    }

    #[test]
    fn test_frequency_change_keeps_state() {
        let mut eq = prepared(ChannelLayout::Mono);
        let mut buf = sine(300.0, 256);
        eq.process(&mut [&mut buf[..]]);

        let before = eq.bands()[0].filter(0).map(Biquad::state);
        set(&mut eq, "band0freq", 2_000.0);
        let after = eq.bands()[0].filter(0).map(Biquad::state);

        assert_eq!(before, after);
        assert_ne!(after, Some((0.0, 0.0)));
    }

    #[test]
    fn test_kind_change_clears_state() {
        let mut eq = prepared(ChannelLayout::Stereo);
        let mut left = sine(300.0, 256);
        let mut right = sine(500.0, 256);
        eq.process(&mut [&mut left[..], &mut right[..]]);

        set(&mut eq, "band0type", 1.0);

        let band = &eq.bands()[0];
        assert_eq!(band.kind(), FilterKind::Peaking);
        assert_eq!(band.filter(0).map(Biquad::state), Some((0.0, 0.0)));
        assert_eq!(band.filter(1).map(Biquad::state), Some((0.0, 0.0)));
    }

    #[test]
    fn test_change_only_touches_named_band() {
        let mut eq = prepared(ChannelLayout::Mono);
        let before = eq.bands()[1].filter(0).map(Biquad::coefficients);

        set(&mut eq, "band0freq", 5_000.0);
        assert_eq!(eq.bands()[1].filter(0).map(Biquad::coefficients), before);

        set(&mut eq, "band1gain", 6.0);
        assert_ne!(eq.bands()[1].filter(0).map(Biquad::coefficients), before);
    }

    #[test]
    fn test_all_redesigns_every_band() {
        let mut eq = prepared(ChannelLayout::Mono);
        let params = eq.params();
        params.set(params.index_of("band0type").unwrap(), 1.0);
        params.set(params.index_of("band1gain").unwrap(), -12.0);
        let before = eq.bands()[1].filter(0).map(Biquad::coefficients);

        eq.parameter_changed(ParamChange::All);

        assert_eq!(eq.bands()[0].kind(), FilterKind::Peaking);
        assert_ne!(eq.bands()[1].filter(0).map(Biquad::coefficients), before);
    }

    #[test]
    fn test_block_split_matches_single_block() {
        let input = sine(700.0, 1_000);

        let mut whole = prepared(ChannelLayout::Mono);
        let mut a = input.clone();
        whole.process(&mut [&mut a[..]]);

        let mut split = prepared(ChannelLayout::Mono);
        let mut b = input;
        let (first, second) = b.split_at_mut(333);
        split.process(&mut [first]);
        split.process(&mut [second]);

        assert_eq!(a, b);
    }

    #[test]
    fn test_channels_do_not_share_state() {
        let mut eq = prepared(ChannelLayout::Stereo);
        let mut left = sine(440.0, 512);
        let mut right = vec![0.0; 512];
        eq.process(&mut [&mut left[..], &mut right[..]]);
        assert!(right.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_arbitrary_band_count() {
        let mut eq = Equalizer::with_bands(&[
            BandConfig::peaking(100.0, 3.0),
            BandConfig::peaking(1_000.0, -3.0),
            BandConfig::lowpass(15_000.0),
        ]);
        eq.prepare(&ProcessSpec::new(SAMPLE_RATE, 256, ChannelLayout::Mono).unwrap())
            .unwrap();

        assert_eq!(eq.bands().len(), 3);
        assert_eq!(eq.params().index_of("band2type"), Some(11));
    }
}
