use std::sync::Arc;

use tracing::debug;

use crate::config::{ChannelLayout, ConfigError, ProcessSpec};
use crate::effects::node::Effect;
use crate::params::{ParamSpec, ParamStore};

pub const WIDTH: usize = 0;

/// Mid-side stereo width.
///
/// ```text
/// mid  = (L + R) * (1 - w)
/// side = (L - R) * w
/// L'   = mid + side
/// R'   = mid - side
/// ```
///
/// `w = 0.5` leaves the signal untouched, `0` folds it to mono and `1`
/// keeps only the side signal.
pub struct StereoWidth {
    params: Arc<ParamStore>,
}

impl StereoWidth {
    pub fn new() -> Self {
        let params = ParamStore::new(vec![ParamSpec::float("width", "Width", 0.0, 1.0, 0.5)]);
        Self {
            params: Arc::new(params),
        }
    }
}

impl Default for StereoWidth {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for StereoWidth {
    fn params(&self) -> Arc<ParamStore> {
        Arc::clone(&self.params)
    }

    fn prepare(&mut self, spec: &ProcessSpec) -> Result<(), ConfigError> {
        if spec.layout != ChannelLayout::Stereo {
            return Err(ConfigError::UnsupportedLayout {
                effect: self.name(),
                layout: spec.layout,
            });
        }

        debug!(sample_rate = spec.sample_rate, "stereo width prepared");
        Ok(())
    }

    fn process(&mut self, channels: &mut [&mut [f32]]) {
        let [left, right, ..] = channels else {
            return;
        };

        let side_gain = self.params.get(WIDTH);
        let mid_gain = 1.0 - side_gain;

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let mid = (*l + *r) * mid_gain;
            let side = (*l - *r) * side_gain;
            *l = mid + side;
            *r = mid - side;
        }
    }

    fn reset(&mut self) {}

    fn name(&self) -> &'static str {
        "StereoWidth"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prepared() -> StereoWidth {
        let mut width = StereoWidth::new();
        width
            .prepare(&ProcessSpec::new(48_000.0, 256, ChannelLayout::Stereo).unwrap())
            .unwrap();
        width
    }

    fn signals() -> (Vec<f32>, Vec<f32>) {
        let left = (0..256).map(|i| (i as f32 * 0.1).sin()).collect();
        let right = (0..256).map(|i| (i as f32 * 0.37).cos() * 0.5).collect();
        (left, right)
    }

    #[test]
    fn test_rejects_non_stereo_layouts() {
        let mut width = StereoWidth::new();
        for layout in [ChannelLayout::Mono, ChannelLayout::MonoToStereo] {
            let spec = ProcessSpec::new(48_000.0, 256, layout).unwrap();
            assert_eq!(
                width.prepare(&spec),
                Err(ConfigError::UnsupportedLayout {
                    effect: "StereoWidth",
                    layout
                })
            );
        }
    }

    #[test]
    fn test_half_width_is_identity() {
        let mut width = prepared();
        let (l0, r0) = signals();
        let (mut l, mut r) = (l0.clone(), r0.clone());
        width.process(&mut [&mut l[..], &mut r[..]]);

        for i in 0..l.len() {
            assert!((l[i] - l0[i]).abs() < 1e-6);
            assert!((r[i] - r0[i]).abs() < 1e-6);
        }
    }

    #[test]
    fn test_zero_width_is_mono() {
        let mut width = prepared();
        width.params().set(WIDTH, 0.0);
        let (l0, r0) = signals();
        let (mut l, mut r) = (l0.clone(), r0.clone());
        width.process(&mut [&mut l[..], &mut r[..]]);

        for i in 0..l.len() {
            assert_eq!(l[i], r[i]);
            assert!((l[i] - (l0[i] + r0[i])).abs() < 1e-6);
        }
    }

    #[test]
    fn test_full_width_removes_mid() {
        let mut width = prepared();
        width.params().set(WIDTH, 1.0);
        let (l0, r0) = signals();
        let (mut l, mut r) = (l0.clone(), r0.clone());
        width.process(&mut [&mut l[..], &mut r[..]]);

        for i in 0..l.len() {
            assert!((l[i] + r[i]).abs() < 1e-6);
            assert!((l[i] - (l0[i] - r0[i])).abs() < 1e-6);
        }
    }

    #[test]
    fn test_ignores_single_channel_block() {
        let mut width = prepared();
        let mut mono = vec![0.25f32; 16];
        width.process(&mut [&mut mono[..]]);
        assert!(mono.iter().all(|&s| s == 0.25));
    }
}
