//! Construction-time configuration shared by every effect.
//!
//! Everything here is validated once, before the first block is processed.
//! Anything that can go wrong later is clamped instead of reported.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::MAX_BLOCK_SIZE;

/// Channel routing negotiated with the host before processing starts.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    /// One channel in, one channel out.
    Mono,
    /// One channel in, two channels out. The host hands the effect two
    /// output slices with the input in the first one.
    MonoToStereo,
    /// Two channels in, two channels out.
    Stereo,
}

impl ChannelLayout {
    pub fn output_channels(self) -> usize {
        match self {
            ChannelLayout::Mono => 1,
            ChannelLayout::MonoToStereo | ChannelLayout::Stereo => 2,
        }
    }
}

/// Sample rate, block size and layout, known before the first process call.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessSpec {
    pub sample_rate: f64,
    pub max_block_size: usize,
    pub layout: ChannelLayout,
}

impl ProcessSpec {
    pub fn new(
        sample_rate: f64,
        max_block_size: usize,
        layout: ChannelLayout,
    ) -> Result<Self, ConfigError> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(ConfigError::InvalidSampleRate(sample_rate));
        }
        if max_block_size == 0 || max_block_size > MAX_BLOCK_SIZE {
            return Err(ConfigError::InvalidBlockSize(max_block_size));
        }

        Ok(Self {
            sample_rate,
            max_block_size,
            layout,
        })
    }
}

/// Errors that can occur while configuring a primitive or preparing an effect
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Sample rate is zero, negative or not finite
    InvalidSampleRate(f64),
    /// Block size is zero or above `MAX_BLOCK_SIZE`
    InvalidBlockSize(usize),
    /// Delay length in seconds is not positive, not finite, or too long
    InvalidDelayCapacity { seconds: f64 },
    /// Delay line asked for zero samples
    ZeroDelayCapacity,
    /// Delay line storage could not be allocated
    DelayAllocation { samples: usize },
    /// The effect cannot run with this channel layout
    UnsupportedLayout {
        effect: &'static str,
        layout: ChannelLayout,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidSampleRate(rate) => {
                write!(f, "Invalid sample rate: {} Hz (must be finite and > 0)", rate)
            }
            ConfigError::InvalidBlockSize(size) => {
                write!(
                    f,
                    "Invalid block size: {} samples (must be between 1 and {})",
                    size, MAX_BLOCK_SIZE
                )
            }
            ConfigError::InvalidDelayCapacity { seconds } => {
                write!(
                    f,
                    "Invalid delay length: {} s (must be finite, hold at least one sample and fit in memory)",
                    seconds
                )
            }
            ConfigError::ZeroDelayCapacity => {
                write!(f, "Invalid delay capacity: a delay line needs at least one sample")
            }
            ConfigError::DelayAllocation { samples } => {
                write!(f, "Could not allocate a delay line of {} samples", samples)
            }
            ConfigError::UnsupportedLayout { effect, layout } => {
                write!(f, "{} does not support the {:?} channel layout", effect, layout)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
