//! Mixer: sums overlapping sounds into one output buffer.

/// An additive mixer. Overlapping sounds simply add; the output is
/// clamped to [-1, 1] the way an audio destination clips.
#[derive(Debug, Clone)]
pub struct Mixer {
    pub master_gain: f64,
    buffer: Vec<f64>,
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new()
    }
}

impl Mixer {
    pub fn new() -> Self {
        Mixer {
            master_gain: 1.0,
            buffer: Vec::new(),
        }
    }

    /// Prepare a buffer of `num_samples` filled with zeros.
    pub fn clear(&mut self, num_samples: usize) {
        self.buffer.clear();
        self.buffer.resize(num_samples, 0.0);
    }

    /// Add a sample at the given index. Samples past the end are dropped.
    pub fn add(&mut self, index: usize, sample: f64) {
        if let Some(slot) = self.buffer.get_mut(index) {
            *slot += sample;
        }
    }

    /// Add a whole rendered sound starting at `offset`.
    pub fn add_buffer(&mut self, offset: usize, samples: &[f32]) {
        for (i, &s) in samples.iter().enumerate() {
            self.add(offset + i, s as f64);
        }
    }

    /// The mixed output with master gain and clipping applied.
    pub fn output(&self) -> Vec<f32> {
        self.buffer
            .iter()
            .map(|&s| (s * self.master_gain).clamp(-1.0, 1.0) as f32)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_buffer() {
        let mut m = Mixer::new();
        m.clear(128);
        let out = m.output();
        assert_eq!(out.len(), 128);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn overlapping_sounds_add() {
        let mut m = Mixer::new();
        m.clear(4);
        m.add_buffer(0, &[0.25, 0.25]);
        m.add_buffer(1, &[0.5, 0.5, 0.5, 0.5]);
        let out = m.output();
        assert_eq!(out, vec![0.25, 0.75, 0.5, 0.5]);
    }

    #[test]
    fn output_clips_at_unity() {
        let mut m = Mixer::new();
        m.clear(2);
        m.add(0, 3.0);
        m.add(1, -3.0);
        assert_eq!(m.output(), vec![1.0, -1.0]);
    }
}
