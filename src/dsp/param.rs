//! Parameter automation with WebAudio `AudioParam` semantics.
//!
//! A timeline of events, each defining the value at a time and how the
//! value gets there from the previous event. Between events the value is
//! interpolated; after the last event it holds.

use crate::error::SfxError;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Automation {
    SetValue { value: f64, time: f64 },
    LinearRamp { value: f64, end_time: f64 },
    ExponentialRamp { value: f64, end_time: f64 },
}

impl Automation {
    fn time(&self) -> f64 {
        match *self {
            Automation::SetValue { time, .. } => time,
            Automation::LinearRamp { end_time, .. } => end_time,
            Automation::ExponentialRamp { end_time, .. } => end_time,
        }
    }

    fn value(&self) -> f64 {
        match *self {
            Automation::SetValue { value, .. }
            | Automation::LinearRamp { value, .. }
            | Automation::ExponentialRamp { value, .. } => value,
        }
    }
}

/// An automatable parameter (frequency, gain, filter cutoff).
#[derive(Debug, Clone, PartialEq)]
pub struct AudioParam {
    default_value: f64,
    events: Vec<Automation>,
}

impl AudioParam {
    pub fn new(default_value: f64) -> Self {
        AudioParam {
            default_value,
            events: Vec::new(),
        }
    }

    /// Jump to `value` at `time`.
    pub fn set_value_at_time(&mut self, value: f64, time: f64) -> &mut Self {
        self.insert(Automation::SetValue { value, time });
        self
    }

    /// Ramp linearly from the previous event's value to `value` at `end_time`.
    pub fn linear_ramp_to_value_at_time(&mut self, value: f64, end_time: f64) -> &mut Self {
        self.insert(Automation::LinearRamp { value, end_time });
        self
    }

    /// Ramp exponentially to `value` at `end_time`.
    ///
    /// Exponential curves never reach zero, so a zero target (or one whose
    /// sign differs from the starting value) is rejected.
    pub fn exponential_ramp_to_value_at_time(
        &mut self,
        value: f64,
        end_time: f64,
    ) -> Result<&mut Self, SfxError> {
        if value == 0.0 || !value.is_finite() {
            return Err(SfxError::InvalidRamp { value });
        }
        let from = self.value_at(end_time);
        if from * value < 0.0 {
            return Err(SfxError::InvalidRamp { value });
        }
        self.insert(Automation::ExponentialRamp { value, end_time });
        Ok(self)
    }

    /// Events are kept sorted by time; an event at the same time as an
    /// existing one goes after it.
    fn insert(&mut self, event: Automation) {
        let at = self
            .events
            .iter()
            .position(|e| e.time() > event.time())
            .unwrap_or(self.events.len());
        self.events.insert(at, event);
    }

    /// Computed value at time `t` (seconds).
    pub fn value_at(&self, t: f64) -> f64 {
        let mut prev_time = 0.0;
        let mut prev_value = self.default_value;

        for event in &self.events {
            let end = event.time();
            if t < end {
                return match *event {
                    // Not reached yet: hold whatever came before.
                    Automation::SetValue { .. } => prev_value,
                    Automation::LinearRamp { value, .. } => {
                        let span = end - prev_time;
                        if span <= 0.0 {
                            return value;
                        }
                        let k = ((t - prev_time) / span).max(0.0);
                        prev_value + (value - prev_value) * k
                    }
                    Automation::ExponentialRamp { value, .. } => {
                        let span = end - prev_time;
                        if span <= 0.0 || prev_value == 0.0 || prev_value * value < 0.0 {
                            return prev_value;
                        }
                        let k = ((t - prev_time) / span).max(0.0);
                        prev_value * (value / prev_value).powf(k)
                    }
                };
            }
            prev_time = end;
            prev_value = event.value();
        }

        prev_value
    }

    /// Whether the value moves monotonically over `[from, to]`.
    pub fn is_monotonic(&self, from: f64, to: f64, steps: usize) -> bool {
        let steps = steps.max(1);
        let first = self.value_at(from);
        let last = self.value_at(to);
        let rising = last >= first;
        let mut prev = first;
        for i in 1..=steps {
            let t = from + (to - from) * i as f64 / steps as f64;
            let v = self.value_at(t);
            let ok = if rising { v >= prev - 1e-12 } else { v <= prev + 1e-12 };
            if !ok {
                return false;
            }
            prev = v;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_value_without_events() {
        let p = AudioParam::new(440.0);
        assert_eq!(p.value_at(0.0), 440.0);
        assert_eq!(p.value_at(10.0), 440.0);
    }

    #[test]
    fn set_value_holds_until_next_event() {
        let mut p = AudioParam::new(1.0);
        p.set_value_at_time(0.5, 1.0);
        assert_eq!(p.value_at(0.5), 1.0);
        assert_eq!(p.value_at(1.0), 0.5);
        assert_eq!(p.value_at(3.0), 0.5);
    }

    #[test]
    fn linear_ramp_interpolates() {
        let mut p = AudioParam::new(0.0);
        p.set_value_at_time(900.0, 1.0)
            .linear_ramp_to_value_at_time(300.0, 1.5);
        assert!((p.value_at(1.25) - 600.0).abs() < 1e-9);
        assert_eq!(p.value_at(2.0), 300.0);
    }

    #[test]
    fn exponential_gain_decay_matches_webaudio() {
        let mut p = AudioParam::new(1.0);
        p.set_value_at_time(0.08, 2.0);
        p.exponential_ramp_to_value_at_time(0.01, 2.05).unwrap();

        assert!((p.value_at(2.0) - 0.08).abs() < 1e-12);
        // Halfway through an exponential ramp is the geometric mean.
        let mid = p.value_at(2.025);
        assert!((mid - (0.08_f64 * 0.01).sqrt()).abs() < 1e-9, "got {mid}");
        assert!((p.value_at(2.05) - 0.01).abs() < 1e-12);
        assert!((p.value_at(5.0) - 0.01).abs() < 1e-12);
    }

    #[test]
    fn exponential_ramp_rejects_zero_and_sign_flip() {
        let mut p = AudioParam::new(1.0);
        p.set_value_at_time(0.1, 0.0);
        assert!(matches!(
            p.exponential_ramp_to_value_at_time(0.0, 0.2),
            Err(SfxError::InvalidRamp { .. })
        ));
        assert!(matches!(
            p.exponential_ramp_to_value_at_time(-0.1, 0.2),
            Err(SfxError::InvalidRamp { .. })
        ));
    }

    #[test]
    fn sweep_is_monotonic() {
        let mut p = AudioParam::new(350.0);
        p.set_value_at_time(2000.0, 0.0);
        p.exponential_ramp_to_value_at_time(500.0, 0.15).unwrap();
        assert!(p.is_monotonic(0.0, 0.15, 64));
        assert!(p.value_at(0.0) > p.value_at(0.1));
    }
}
