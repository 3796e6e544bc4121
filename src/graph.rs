//! Transient per-trigger audio graph.
//!
//! `source → [filter] → gain → output`. A graph is built from a
//! [`SoundDescriptor`] at the output's current time, scheduled once and
//! then dropped. Nothing is shared between graphs.

use rand::Rng;

use crate::descriptor::{SoundDescriptor, SourceSpec, Sweep};
use crate::dsp::filter::{BiquadFilter, FilterType};
use crate::dsp::noise::{frames_for, noise_buffer};
use crate::dsp::oscillator::{Oscillator, Waveform};
use crate::dsp::param::AudioParam;
use crate::error::SfxError;

/// Lowest sample rate a graph is rendered at (the WebAudio minimum).
pub const MIN_SAMPLE_RATE: f64 = 3000.0;

/// Head of the graph.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceNode {
    Tone {
        waveform: Waveform,
        frequency: AudioParam,
    },
    /// A pre-generated mono buffer played once from `start`.
    Buffer { samples: Vec<f32> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterNode {
    pub filter_type: FilterType,
    pub frequency: AudioParam,
    pub q: f64,
}

/// One scheduled sound.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundGraph {
    pub source: SourceNode,
    pub filter: Option<FilterNode>,
    pub gain: AudioParam,
    /// Output-timeline time the source starts.
    pub start: f64,
    /// Output-timeline time the source stops.
    pub stop: f64,
}

/// Program `param` to follow `sweep` from `start` to `end`.
fn apply_sweep(param: &mut AudioParam, sweep: &Sweep, start: f64, end: f64) -> Result<(), SfxError> {
    match *sweep {
        Sweep::Fixed { value } => {
            param.set_value_at_time(value, start);
        }
        Sweep::Linear { from, to } => {
            param
                .set_value_at_time(from, start)
                .linear_ramp_to_value_at_time(to, end);
        }
        Sweep::Exponential { from, to } => {
            param
                .set_value_at_time(from, start)
                .exponential_ramp_to_value_at_time(to, end)?;
        }
    }
    Ok(())
}

impl SoundGraph {
    /// Wire a fresh graph for `descriptor`, starting at `now`.
    pub fn build<R: Rng + ?Sized>(
        descriptor: &SoundDescriptor,
        now: f64,
        sample_rate: f64,
        rng: &mut R,
    ) -> Result<Self, SfxError> {
        descriptor.validate()?;
        if !(sample_rate >= MIN_SAMPLE_RATE && sample_rate.is_finite()) {
            return Err(SfxError::InvalidSampleRate(sample_rate));
        }
        let stop = now + descriptor.duration;

        let source = match descriptor.source {
            SourceSpec::Tone {
                waveform,
                frequency: sweep,
            } => {
                let mut frequency = AudioParam::new(440.0);
                apply_sweep(&mut frequency, &sweep, now, stop)?;
                SourceNode::Tone {
                    waveform,
                    frequency,
                }
            }
            SourceSpec::Noise { decay_power } => SourceNode::Buffer {
                samples: noise_buffer(
                    frames_for(descriptor.duration, sample_rate),
                    decay_power,
                    rng,
                ),
            },
        };

        let filter = match &descriptor.filter {
            Some(spec) => {
                let mut frequency = AudioParam::new(350.0);
                apply_sweep(&mut frequency, &spec.cutoff, now, stop)?;
                Some(FilterNode {
                    filter_type: spec.filter_type,
                    frequency,
                    q: spec.q,
                })
            }
            None => None,
        };

        let mut gain = AudioParam::new(1.0);
        gain.set_value_at_time(descriptor.gain.peak, now)
            .exponential_ramp_to_value_at_time(descriptor.gain.floor, stop)?;

        Ok(SoundGraph {
            source,
            filter,
            gain,
            start: now,
            stop,
        })
    }

    pub fn duration(&self) -> f64 {
        self.stop - self.start
    }

    /// Render `source → filter → gain` for the whole `[start, stop)` window.
    pub fn render(&self, sample_rate: f64) -> Vec<f32> {
        let frames = frames_for(self.duration(), sample_rate);
        let mut out = Vec::with_capacity(frames);

        let mut osc = match &self.source {
            SourceNode::Tone { waveform, .. } => Some(Oscillator::new(*waveform, sample_rate)),
            SourceNode::Buffer { .. } => None,
        };
        let mut biquad = self.filter.as_ref().map(|f| {
            let mut b = BiquadFilter::new(f.filter_type, sample_rate);
            b.set_q(f.q);
            b
        });

        for i in 0..frames {
            let t = self.start + i as f64 / sample_rate;

            let mut sample = match (&self.source, osc.as_mut()) {
                (SourceNode::Tone { frequency, .. }, Some(osc)) => {
                    osc.set_frequency(frequency.value_at(t));
                    osc.next_sample()
                }
                (SourceNode::Buffer { samples }, _) => {
                    samples.get(i).copied().unwrap_or(0.0) as f64
                }
                (SourceNode::Tone { .. }, None) => 0.0,
            };

            if let (Some(node), Some(b)) = (&self.filter, biquad.as_mut()) {
                b.set_frequency(node.frequency.value_at(t));
                sample = b.process(sample);
            }

            out.push((sample * self.gain.value_at(t)) as f32);
        }

        out
    }
}
