use anyhow::{Context, Result};
use std::io::Cursor;

use super::backend::AudioFrame;

/// Assemble buffered audio fragments into a single in-memory WAV payload
/// suitable for a speech-to-text upload.
pub fn frames_to_wav(frames: &[AudioFrame], sample_rate: u32, channels: u16) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .context("Failed to create WAV writer")?;

        for frame in frames {
            for &sample in &frame.samples {
                writer
                    .write_sample(sample)
                    .context("Failed to write sample to WAV")?;
            }
        }

        writer.finalize().context("Failed to finalize WAV payload")?;
    }

    Ok(cursor.into_inner())
}
