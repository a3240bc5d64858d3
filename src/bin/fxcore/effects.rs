use clap::ValueEnum;

use fxcore::effects::{Effect, Equalizer, ModulatedDelay, SaturatingCompressor, StereoWidth};
use fxcore::ChannelLayout;

/// Effects selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EffectKind {
    Delay,
    Eq,
    Width,
    Compressor,
}

impl EffectKind {
    pub fn build(self) -> Box<dyn Effect> {
        match self {
            EffectKind::Delay => Box::new(ModulatedDelay::new()),
            EffectKind::Eq => Box::new(Equalizer::new()),
            EffectKind::Width => Box::new(StereoWidth::new()),
            EffectKind::Compressor => Box::new(SaturatingCompressor::new()),
        }
    }

    /// Width only makes sense on two independent channels.
    pub fn stereo_only(self) -> bool {
        self == EffectKind::Width
    }

    /// Layout for a source with `input_channels` channels played to
    /// `output_channels` channels.
    ///
    /// Stereo-only effects always get `Stereo`; the caller duplicates a mono
    /// source into both channels.
    pub fn layout(self, input_channels: usize, output_channels: usize) -> ChannelLayout {
        if self.stereo_only() || input_channels >= 2 {
            ChannelLayout::Stereo
        } else if output_channels >= 2 {
            ChannelLayout::MonoToStereo
        } else {
            ChannelLayout::Mono
        }
    }
}
