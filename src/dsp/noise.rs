//! Decaying white-noise buffers for the "whoosh" sounds.

use rand::Rng;

/// Envelope multiplier for sample `index` of a `len`-sample buffer:
/// `(1 - index/len)^power`. Starts at 1, falls monotonically toward 0.
/// Larger powers fade faster at first and leave a longer soft tail.
pub fn decay_gain(index: usize, len: usize, power: f64) -> f64 {
    if len == 0 {
        return 0.0;
    }
    let remaining = 1.0 - (index.min(len) as f64 / len as f64);
    remaining.powf(power)
}

/// Fill a mono buffer with uniform noise in [-1, 1) shaped by [`decay_gain`].
pub fn noise_buffer<R: Rng + ?Sized>(len: usize, power: f64, rng: &mut R) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let white: f64 = rng.random_range(-1.0..1.0);
            (white * decay_gain(i, len, power)) as f32
        })
        .collect()
}

/// Number of frames needed to hold `seconds` of audio.
pub fn frames_for(seconds: f64, sample_rate: f64) -> usize {
    (seconds * sample_rate).round().max(0.0) as usize
}
