//! Offline rendering through hound

use std::path::Path;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use tracing::info;

use fxcore::host;
use fxcore::{ChannelLayout, ProcessSpec, MAX_BLOCK_SIZE};

use crate::effects::EffectKind;
use crate::preset;

pub fn run(
    kind: EffectKind,
    input: &Path,
    output: &Path,
    preset_path: Option<&Path>,
    block_size: usize,
) -> EyreResult<()> {
    let (mut channels, sample_rate) = read_wav(input)?;
    if channels.is_empty() || channels.len() > 2 {
        return Err(eyre!(
            "{} has {} channels, expected mono or stereo",
            input.display(),
            channels.len()
        ));
    }

    // Files keep their channel count, except mono into a stereo-only effect.
    let layout = kind.layout(channels.len(), channels.len());
    if layout == ChannelLayout::Stereo && channels.len() == 1 {
        let copy = channels[0].clone();
        channels.push(copy);
    }

    let effect = kind.build();
    preset::apply_optional(preset_path, &effect.params())?;

    let block_size = block_size.clamp(1, MAX_BLOCK_SIZE);
    let spec = ProcessSpec::new(sample_rate as f64, block_size, layout)
        .wrap_err("invalid processing configuration")?;

    let (mut processor, _sender) = host::channel(effect, 16);
    processor
        .prepare(&spec)
        .wrap_err_with(|| format!("failed to prepare {:?}", kind))?;

    info!(
        input = %input.display(),
        sample_rate,
        ?layout,
        block_size,
        "rendering"
    );

    let frames = channels[0].len();
    let mut start = 0;
    while start < frames {
        let end = (start + block_size).min(frames);
        let mut block: Vec<&mut [f32]> = channels
            .iter_mut()
            .map(|channel| &mut channel[start..end])
            .collect();
        processor.process(&mut block);
        start = end;
    }

    write_wav(output, &channels, sample_rate)?;
    info!(output = %output.display(), frames, "render finished");
    Ok(())
}

/// Read a WAV file into one `Vec<f32>` per channel.
fn read_wav(path: &Path) -> EyreResult<(Vec<Vec<f32>>, u32)> {
    let mut reader =
        WavReader::open(path).wrap_err_with(|| format!("failed to open {}", path.display()))?;
    let spec = reader.spec();

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .wrap_err("failed to decode samples")?,
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<_, _>>()
                .wrap_err("failed to decode samples")?
        }
    };

    let channel_count = spec.channels as usize;
    let mut channels = vec![Vec::with_capacity(interleaved.len() / channel_count.max(1)); channel_count];
    for frame in interleaved.chunks(channel_count.max(1)) {
        for (channel, &sample) in channels.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }

    Ok((channels, spec.sample_rate))
}

fn write_wav(path: &Path, channels: &[Vec<f32>], sample_rate: u32) -> EyreResult<()> {
    let spec = WavSpec {
        channels: channels.len() as u16,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer =
        WavWriter::create(path, spec).wrap_err_with(|| format!("failed to create {}", path.display()))?;

    let frames = channels.first().map_or(0, Vec::len);
    for i in 0..frames {
        for channel in channels {
            writer.write_sample(channel[i])?;
        }
    }
    writer.finalize()?;
    Ok(())
}
