//! Sound descriptors and the built-in sound sets.
//!
//! A descriptor is the full recipe for one UI sound: which source to use,
//! how to filter it, how loud it starts and how long it lasts. The four
//! built-in [`SoundSet`]s are the constant variants the sounds ship with;
//! callers may also supply their own [`SoundBank`] as JSON.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dsp::filter::FilterType;
use crate::dsp::oscillator::Waveform;
use crate::error::SfxError;

/// Gain floor for the amplitude envelope. Exponential ramps cannot reach 0.
pub const GAIN_FLOOR: f64 = 0.01;

/// Longest sound a descriptor may ask for, in seconds.
pub const MAX_DURATION: f64 = 5.0;

// ── Kinds ───────────────────────────────────────────────────

/// The three UI feedback sounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundKind {
    /// Short, quiet, fixed-pitch tap for generic buttons.
    Click,
    /// Card flip: a state change.
    Flip,
    /// Previous/next navigation.
    Swipe,
}

impl SoundKind {
    pub const ALL: [SoundKind; 3] = [SoundKind::Click, SoundKind::Flip, SoundKind::Swipe];

    pub fn name(self) -> &'static str {
        match self {
            SoundKind::Click => "click",
            SoundKind::Flip => "flip",
            SoundKind::Swipe => "swipe",
        }
    }
}

impl fmt::Display for SoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SoundKind {
    type Err = SfxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "click" => Ok(SoundKind::Click),
            "flip" => Ok(SoundKind::Flip),
            "swipe" => Ok(SoundKind::Swipe),
            _ => Err(SfxError::UnknownSound(s.to_string())),
        }
    }
}

// ── Descriptor ──────────────────────────────────────────────

/// How a frequency (tone pitch or filter cutoff) moves over the sound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "curve", rename_all = "camelCase")]
pub enum Sweep {
    Fixed { value: f64 },
    Linear { from: f64, to: f64 },
    Exponential { from: f64, to: f64 },
}

impl Sweep {
    pub fn fixed(value: f64) -> Self {
        Sweep::Fixed { value }
    }

    pub fn linear(from: f64, to: f64) -> Self {
        Sweep::Linear { from, to }
    }

    pub fn exponential(from: f64, to: f64) -> Self {
        Sweep::Exponential { from, to }
    }

    pub fn start(&self) -> f64 {
        match *self {
            Sweep::Fixed { value } => value,
            Sweep::Linear { from, .. } | Sweep::Exponential { from, .. } => from,
        }
    }

    pub fn end(&self) -> f64 {
        match *self {
            Sweep::Fixed { value } => value,
            Sweep::Linear { to, .. } | Sweep::Exponential { to, .. } => to,
        }
    }

    fn validate(&self, what: &str) -> Result<(), SfxError> {
        let (a, b) = (self.start(), self.end());
        if !(a.is_finite() && b.is_finite() && a > 0.0 && b > 0.0) {
            return Err(SfxError::InvalidDescriptor(format!(
                "{what} must be positive and finite, got {a}..{b}"
            )));
        }
        Ok(())
    }
}

/// The signal source at the head of the graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SourceSpec {
    /// A periodic oscillator.
    Tone { waveform: Waveform, frequency: Sweep },
    /// Generated white noise faded by `(1 - i/len)^decay_power`.
    #[serde(rename_all = "camelCase")]
    Noise { decay_power: f64 },
}

/// Optional resonant filter between source and gain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    pub filter_type: FilterType,
    pub cutoff: Sweep,
    pub q: f64,
}

/// Amplitude envelope: `peak` at the start, exponential decay to `floor`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GainEnvelope {
    pub peak: f64,
    #[serde(default = "default_floor")]
    pub floor: f64,
}

fn default_floor() -> f64 {
    GAIN_FLOOR
}

impl GainEnvelope {
    pub fn new(peak: f64) -> Self {
        GainEnvelope {
            peak,
            floor: GAIN_FLOOR,
        }
    }
}

/// Complete recipe for one sound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundDescriptor {
    pub source: SourceSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterSpec>,
    pub gain: GainEnvelope,
    /// Seconds from start to stop.
    pub duration: f64,
}

impl SoundDescriptor {
    pub fn tone(waveform: Waveform, frequency: Sweep, peak: f64, duration: f64) -> Self {
        SoundDescriptor {
            source: SourceSpec::Tone {
                waveform,
                frequency,
            },
            filter: None,
            gain: GainEnvelope::new(peak),
            duration,
        }
    }

    pub fn noise(decay_power: f64, peak: f64, duration: f64) -> Self {
        SoundDescriptor {
            source: SourceSpec::Noise { decay_power },
            filter: None,
            gain: GainEnvelope::new(peak),
            duration,
        }
    }

    pub fn with_filter(mut self, filter_type: FilterType, cutoff: Sweep, q: f64) -> Self {
        self.filter = Some(FilterSpec {
            filter_type,
            cutoff,
            q,
        });
        self
    }

    /// Reject descriptors that cannot be scheduled.
    pub fn validate(&self) -> Result<(), SfxError> {
        if !(self.duration > 0.0 && self.duration <= MAX_DURATION) {
            return Err(SfxError::InvalidDescriptor(format!(
                "duration must be in (0, {MAX_DURATION}] seconds, got {}",
                self.duration
            )));
        }
        let GainEnvelope { peak, floor } = self.gain;
        if !(floor > 0.0 && peak > floor && peak <= 1.0) {
            return Err(SfxError::InvalidDescriptor(format!(
                "gain must satisfy 0 < floor < peak <= 1, got peak {peak} floor {floor}"
            )));
        }
        match self.source {
            SourceSpec::Tone { frequency, .. } => frequency.validate("tone frequency")?,
            SourceSpec::Noise { decay_power } => {
                if !(decay_power.is_finite() && decay_power > 0.0) {
                    return Err(SfxError::InvalidDescriptor(format!(
                        "noise decay power must be positive, got {decay_power}"
                    )));
                }
            }
        }
        if let Some(filter) = &self.filter {
            filter.cutoff.validate("filter cutoff")?;
            if !(filter.q.is_finite() && filter.q > 0.0) {
                return Err(SfxError::InvalidDescriptor(format!(
                    "filter Q must be positive, got {}",
                    filter.q
                )));
            }
        }
        Ok(())
    }
}

// ── Banks and sets ──────────────────────────────────────────

/// One descriptor per [`SoundKind`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoundBank {
    pub click: SoundDescriptor,
    pub flip: SoundDescriptor,
    pub swipe: SoundDescriptor,
}

impl SoundBank {
    pub fn get(&self, kind: SoundKind) -> &SoundDescriptor {
        match kind {
            SoundKind::Click => &self.click,
            SoundKind::Flip => &self.flip,
            SoundKind::Swipe => &self.swipe,
        }
    }

    pub fn validate(&self) -> Result<(), SfxError> {
        for kind in SoundKind::ALL {
            self.get(kind).validate().map_err(|e| match e {
                SfxError::InvalidDescriptor(msg) => {
                    SfxError::InvalidDescriptor(format!("{kind}: {msg}"))
                }
                other => other,
            })?;
        }
        Ok(())
    }
}

impl Default for SoundBank {
    fn default() -> Self {
        SoundSet::default().bank()
    }
}

/// The built-in constant variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundSet {
    /// Sine tap; band-passed noise sweeps for flip and swipe.
    #[default]
    Whoosh,
    /// Quieter sine tap; low-passed noise sweeps.
    Soft,
    /// Pure tone ramps, no noise.
    Tonal,
    /// Bright sawtooth chirps through a swept low-pass.
    Chirp,
}

impl SoundSet {
    pub const ALL: [SoundSet; 4] = [
        SoundSet::Whoosh,
        SoundSet::Soft,
        SoundSet::Tonal,
        SoundSet::Chirp,
    ];

    pub fn bank(self) -> SoundBank {
        match self {
            SoundSet::Whoosh => SoundBank {
                click: SoundDescriptor::tone(Waveform::Sine, Sweep::fixed(1000.0), 0.08, 0.05),
                flip: SoundDescriptor::noise(2.0, 0.12, 0.15).with_filter(
                    FilterType::Bandpass,
                    Sweep::exponential(2000.0, 500.0),
                    1.0,
                ),
                swipe: SoundDescriptor::noise(2.5, 0.1, 0.2).with_filter(
                    FilterType::Bandpass,
                    Sweep::exponential(1500.0, 400.0),
                    1.5,
                ),
            },
            SoundSet::Soft => SoundBank {
                click: SoundDescriptor::tone(Waveform::Sine, Sweep::fixed(800.0), 0.06, 0.06),
                flip: SoundDescriptor::noise(2.0, 0.1, 0.12).with_filter(
                    FilterType::Lowpass,
                    Sweep::exponential(1800.0, 600.0),
                    0.7,
                ),
                swipe: SoundDescriptor::noise(2.5, 0.08, 0.18).with_filter(
                    FilterType::Lowpass,
                    Sweep::exponential(1200.0, 300.0),
                    1.0,
                ),
            },
            SoundSet::Tonal => SoundBank {
                click: SoundDescriptor::tone(Waveform::Sine, Sweep::fixed(1200.0), 0.05, 0.08),
                flip: SoundDescriptor::tone(
                    Waveform::Triangle,
                    Sweep::exponential(400.0, 800.0),
                    0.1,
                    0.1,
                ),
                swipe: SoundDescriptor::tone(Waveform::Sine, Sweep::linear(900.0, 300.0), 0.08, 0.15),
            },
            SoundSet::Chirp => SoundBank {
                click: SoundDescriptor::tone(Waveform::Sine, Sweep::fixed(1500.0), 0.07, 0.05),
                flip: SoundDescriptor::tone(
                    Waveform::Sawtooth,
                    Sweep::exponential(300.0, 900.0),
                    0.06,
                    0.08,
                )
                .with_filter(FilterType::Lowpass, Sweep::fixed(1500.0), 1.0),
                swipe: SoundDescriptor::tone(
                    Waveform::Sawtooth,
                    Sweep::exponential(1200.0, 200.0),
                    0.05,
                    0.2,
                )
                .with_filter(FilterType::Lowpass, Sweep::exponential(3000.0, 500.0), 2.0),
            },
        }
    }
}

impl FromStr for SoundSet {
    type Err = SfxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "whoosh" => Ok(SoundSet::Whoosh),
            "soft" => Ok(SoundSet::Soft),
            "tonal" => Ok(SoundSet::Tonal),
            "chirp" => Ok(SoundSet::Chirp),
            _ => Err(SfxError::UnknownSoundSet(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_sets_are_valid() {
        for set in SoundSet::ALL {
            set.bank()
                .validate()
                .unwrap_or_else(|e| panic!("{set:?} failed validation: {e}"));
        }
    }

    #[test]
    fn built_in_durations_in_range() {
        for set in SoundSet::ALL {
            let bank = set.bank();
            let click = bank.click.duration;
            assert!((0.05..=0.1).contains(&click), "{set:?} click {click}");
            for d in [bank.flip.duration, bank.swipe.duration] {
                assert!((0.08..=0.2).contains(&d), "{set:?} flip/swipe {d}");
            }
            assert!(bank.click.filter.is_none());
            assert!(matches!(
                bank.click.source,
                SourceSpec::Tone { frequency: Sweep::Fixed { .. }, .. }
            ));
        }
    }

    #[test]
    fn default_set_is_whoosh() {
        let bank = SoundBank::default();
        assert_eq!(bank, SoundSet::Whoosh.bank());
        assert_eq!(bank.flip.source, SourceSpec::Noise { decay_power: 2.0 });
        assert_eq!(bank.swipe.source, SourceSpec::Noise { decay_power: 2.5 });
        let filter = bank.swipe.filter.unwrap();
        assert_eq!(filter.filter_type, FilterType::Bandpass);
        assert_eq!(filter.q, 1.5);
    }

    #[test]
    fn duration_is_bounded() {
        let mut d = SoundSet::Whoosh.bank().flip;
        d.duration = MAX_DURATION;
        d.validate().unwrap();
        for bad in [0.0, -0.1, MAX_DURATION + 0.001, 1e15, f64::INFINITY, f64::NAN] {
            d.duration = bad;
            assert!(
                matches!(d.validate(), Err(SfxError::InvalidDescriptor(_))),
                "duration {bad} accepted"
            );
        }
    }

    #[test]
    fn names_parse() {
        assert_eq!("Flip".parse::<SoundKind>().unwrap(), SoundKind::Flip);
        assert_eq!(" chirp ".parse::<SoundSet>().unwrap(), SoundSet::Chirp);
        assert!(matches!(
            "boop".parse::<SoundKind>(),
            Err(SfxError::UnknownSound(_))
        ));
        assert!(matches!(
            "loud".parse::<SoundSet>(),
            Err(SfxError::UnknownSoundSet(_))
        ));
    }

    #[test]
    fn zero_floor_is_rejected() {
        let mut d = SoundSet::Whoosh.bank().click;
        d.gain.floor = 0.0;
        assert!(matches!(d.validate(), Err(SfxError::InvalidDescriptor(_))));
    }

    #[test]
    fn bank_errors_name_the_sound() {
        let mut bank = SoundBank::default();
        bank.swipe.duration = -1.0;
        let err = bank.validate().unwrap_err();
        assert!(err.to_string().contains("swipe:"), "got: {err}");
    }

    #[test]
    fn descriptor_json_shape() {
        let json = r#"{
            "source": { "type": "noise", "decayPower": 2.0 },
            "filter": {
                "filterType": "bandpass",
                "cutoff": { "curve": "exponential", "from": 2000.0, "to": 500.0 },
                "q": 1.0
            },
            "gain": { "peak": 0.12 },
            "duration": 0.15
        }"#;
        let d: SoundDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(d, SoundSet::Whoosh.bank().flip);
        assert_eq!(d.gain.floor, GAIN_FLOOR);
    }
}
