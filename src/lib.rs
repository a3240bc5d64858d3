pub mod config;
pub mod dsp;
pub mod effects; // Delay, EQ, width and dynamics built from the primitives
pub mod host; // Block-boundary parameter delivery
pub mod params; // Shared parameter storage and change events

pub use config::{ChannelLayout, ConfigError, ProcessSpec};

pub const MAX_BLOCK_SIZE: usize = 2048;
