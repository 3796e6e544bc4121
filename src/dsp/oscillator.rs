//! Anti-aliased tone oscillator using PolyBLEP.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Supported waveform shapes (the `OscillatorNode.type` values).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Triangle,
    Sawtooth,
    Square,
}

/// A band-limited oscillator whose frequency may change every sample.
#[derive(Debug, Clone)]
pub struct Oscillator {
    pub waveform: Waveform,
    frequency: f64,
    phase: f64,
    sample_rate: f64,
}

impl Oscillator {
    pub fn new(waveform: Waveform, sample_rate: f64) -> Self {
        Oscillator {
            waveform,
            frequency: 440.0,
            phase: 0.0,
            sample_rate,
        }
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Change the frequency without resetting phase, so sweeps stay continuous.
    pub fn set_frequency(&mut self, frequency: f64) {
        self.frequency = frequency;
    }

    fn phase_inc(&self) -> f64 {
        self.frequency / self.sample_rate
    }

    /// Generate the next sample.
    pub fn next_sample(&mut self) -> f64 {
        let inc = self.phase_inc();
        let sample = match self.waveform {
            Waveform::Sine => (2.0 * PI * self.phase).sin(),
            Waveform::Sawtooth => self.sawtooth(inc),
            Waveform::Square => self.square(inc),
            Waveform::Triangle => self.triangle(),
        };

        self.phase += inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        sample
    }

    /// Naive ramp from -1 to +1; PolyBLEP corrects the wrap.
    fn sawtooth(&self, inc: f64) -> f64 {
        let naive = 2.0 * self.phase - 1.0;
        naive - poly_blep(self.phase, inc)
    }

    fn square(&self, inc: f64) -> f64 {
        let mut value = if self.phase < 0.5 { 1.0 } else { -1.0 };
        value += poly_blep(self.phase, inc);
        value -= poly_blep((self.phase + 0.5) % 1.0, inc);
        value
    }

    /// Piecewise linear: -1 → +1 over the first half, back down over the second.
    fn triangle(&self) -> f64 {
        if self.phase < 0.5 {
            4.0 * self.phase - 1.0
        } else {
            3.0 - 4.0 * self.phase
        }
    }
}

/// PolyBLEP (Polynomial Band-Limited Step) correction.
///
/// `t` is the phase [0, 1), `dt` is the phase increment per sample.
fn poly_blep(t: f64, dt: f64) -> f64 {
    if t < dt {
        let t = t / dt;
        2.0 * t - t * t - 1.0
    } else if t > 1.0 - dt {
        let t = (t - 1.0) / dt;
        t * t + 2.0 * t + 1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sine_zero_at_start() {
        let mut osc = Oscillator::new(Waveform::Sine, 44100.0);
        osc.set_frequency(1000.0);
        let sample = osc.next_sample();
        assert!(sample.abs() < 1e-10, "Sine should start near 0, got {sample}");
    }

    #[test]
    fn waveforms_stay_in_range() {
        for (waveform, limit) in [
            (Waveform::Sine, 1.0),
            (Waveform::Triangle, 1.0),
            (Waveform::Sawtooth, 1.5),
            (Waveform::Square, 1.5),
        ] {
            let mut osc = Oscillator::new(waveform, 44100.0);
            osc.set_frequency(1000.0);
            for _ in 0..4410 {
                let s = osc.next_sample();
                assert!(s.abs() <= limit, "{waveform:?} out of range: {s}");
            }
        }
    }

    #[test]
    fn frequency_change_keeps_phase() {
        let mut osc = Oscillator::new(Waveform::Sine, 48000.0);
        osc.set_frequency(500.0);
        for _ in 0..10 {
            osc.next_sample();
        }
        let before = osc.phase;
        osc.set_frequency(1500.0);
        assert_eq!(osc.phase, before);
        assert_eq!(osc.frequency(), 1500.0);
    }

    #[test]
    fn waveform_names_match_webaudio() {
        let w: Waveform = serde_json::from_str("\"sawtooth\"").unwrap();
        assert_eq!(w, Waveform::Sawtooth);
        assert_eq!(serde_json::to_string(&Waveform::Sine).unwrap(), "\"sine\"");
    }
}
