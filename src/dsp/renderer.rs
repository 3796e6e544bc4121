//! WAV renderer: renders a single sound offline to a WAV byte buffer.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::descriptor::SoundDescriptor;
use crate::error::SfxError;
use crate::graph::SoundGraph;

/// Render `descriptor` to mono f32 samples at `sample_rate`.
pub fn render_samples(
    descriptor: &SoundDescriptor,
    sample_rate: u32,
    seed: u64,
) -> Result<Vec<f32>, SfxError> {
    let sample_rate = sample_rate as f64;
    let mut rng = Pcg32::seed_from_u64(seed);
    let graph = SoundGraph::build(descriptor, 0.0, sample_rate, &mut rng)?;
    Ok(graph.render(sample_rate))
}

/// Render `descriptor` to a WAV file as bytes (16-bit mono PCM).
pub fn render_wav(
    descriptor: &SoundDescriptor,
    sample_rate: u32,
    seed: u64,
) -> Result<Vec<u8>, SfxError> {
    let samples = render_samples(descriptor, sample_rate, seed)?;
    let pcm: Vec<i16> = samples
        .iter()
        .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
        .collect();
    Ok(encode_wav(&pcm, sample_rate, 1))
}

/// Encode interleaved i16 PCM samples to a WAV byte buffer.
fn encode_wav(samples: &[i16], sample_rate: u32, channels: u16) -> Vec<u8> {
    let bits_per_sample: u16 = 16;
    let byte_rate = sample_rate * channels as u32 * (bits_per_sample as u32 / 8);
    let block_align = channels * (bits_per_sample / 8);
    let data_size = (samples.len() * 2) as u32;
    let file_size = 36 + data_size;

    let mut buf = Vec::with_capacity(44 + data_size as usize);

    // RIFF header
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&file_size.to_le_bytes());
    buf.extend_from_slice(b"WAVE");

    // fmt chunk
    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
    buf.extend_from_slice(&channels.to_le_bytes());
    buf.extend_from_slice(&sample_rate.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&bits_per_sample.to_le_bytes());

    // data chunk
    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_size.to_le_bytes());
    for &sample in samples {
        buf.extend_from_slice(&sample.to_le_bytes());
    }

    buf
}
