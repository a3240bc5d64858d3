//! Live mode: test source -> effect -> default output device, with a TUI

use std::path::Path;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::RingBuffer;
use tracing::{error, info};

use fxcore::host;
use fxcore::{ChannelLayout, ProcessSpec, MAX_BLOCK_SIZE};

use crate::effects::EffectKind;
use crate::preset;
use crate::source::{Source, SourceKind};
use crate::ui::UiApp;

/// Samples buffered between the audio callback and the UI
const VIS_QUEUE_SIZE: usize = 8192;

pub fn run(kind: EffectKind, source_kind: SourceKind, preset_path: Option<&Path>) -> EyreResult<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = config.sample_rate().0 as f32;
    let device_channels = config.channels() as usize;
    let layout = kind.layout(1, device_channels);

    info!(sample_rate, device_channels, ?layout, "output device ready");

    let effect = kind.build();
    preset::apply_optional(preset_path, &effect.params())?;

    let spec = ProcessSpec::new(sample_rate as f64, MAX_BLOCK_SIZE, layout)
        .wrap_err("invalid processing configuration")?;
    let (mut processor, sender) = host::channel(effect, 256);
    processor
        .prepare(&spec)
        .wrap_err_with(|| format!("failed to prepare {:?}", kind))?;

    let (mut vis_tx, vis_rx) = RingBuffer::<f32>::new(VIS_QUEUE_SIZE);
    let mut source = Source::new(source_kind, sample_rate);
    let mut left = vec![0.0f32; MAX_BLOCK_SIZE];
    let mut right = vec![0.0f32; MAX_BLOCK_SIZE];

    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _| {
            let total_frames = data.len() / device_channels;
            let mut frames_written = 0;

            while frames_written < total_frames {
                let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                let l = &mut left[..frames];
                let r = &mut right[..frames];

                source.fill(l);
                match layout {
                    ChannelLayout::Mono => processor.process(&mut [l]),
                    ChannelLayout::MonoToStereo => processor.process(&mut [l, r]),
                    ChannelLayout::Stereo => {
                        r.copy_from_slice(l);
                        processor.process(&mut [l, r]);
                    }
                }

                let out_off = frames_written * device_channels;
                for i in 0..frames {
                    for ch in 0..device_channels {
                        let sample = if ch == 1 && layout != ChannelLayout::Mono {
                            right[i]
                        } else {
                            left[i]
                        };
                        data[out_off + i * device_channels + ch] = sample;
                    }
                    // UI falls behind rather than blocking audio.
                    let _ = vis_tx.push(left[i]);
                }

                frames_written += frames;
            }
        },
        |err| error!("audio stream error: {}", err),
        None,
    )?;

    stream.play()?;

    let mut terminal = ratatui::init();
    let result = UiApp::new(vis_rx, sender, sample_rate, kind).run(&mut terminal);
    ratatui::restore();

    result
}
