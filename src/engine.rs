//! Sound Engine: builds and schedules one graph per trigger.
//!
//! `play` is the explicit API and reports failures. `play_click`,
//! `play_flip` and `play_swipe` are fire-and-forget: a missed UI sound is
//! never worth disturbing the page, so they log and drop every error.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::descriptor::{SoundBank, SoundKind};
use crate::error::SfxError;
use crate::graph::SoundGraph;
use crate::output::{AudioOutput, ContextState};

/// Handle describing a scheduled render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playback {
    pub kind: SoundKind,
    /// Output-timeline start, in seconds.
    pub start: f64,
    /// Output-timeline stop, in seconds.
    pub stop: f64,
}

impl Playback {
    pub fn duration(&self) -> f64 {
        self.stop - self.start
    }

    /// Whether the sound has finished by output time `now`.
    pub fn is_finished_at(&self, now: f64) -> bool {
        now >= self.stop
    }
}

/// The UI sound engine over an injected output.
pub struct SoundEngine<O: AudioOutput> {
    output: O,
    bank: SoundBank,
    rng: Pcg32,
}

impl<O: AudioOutput> SoundEngine<O> {
    pub fn new(output: O, bank: SoundBank) -> Self {
        Self::with_seed(output, bank, 0x5eed_50f7_c11c)
    }

    /// Like `new`, with an explicit seed for the noise generator.
    pub fn with_seed(output: O, bank: SoundBank, seed: u64) -> Self {
        SoundEngine {
            output,
            bank,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Restart the noise generator from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = Pcg32::seed_from_u64(seed);
    }

    pub fn bank(&self) -> &SoundBank {
        &self.bank
    }

    /// Swap the descriptor table. Rejected banks leave the current one in place.
    pub fn set_bank(&mut self, bank: SoundBank) -> Result<(), SfxError> {
        bank.validate()?;
        self.bank = bank;
        Ok(())
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// Build a fresh graph for `kind` at the output's current time and
    /// schedule it.
    pub fn play(&mut self, kind: SoundKind) -> Result<Playback, SfxError> {
        match self.output.state() {
            ContextState::Closed => return Err(SfxError::ContextClosed),
            ContextState::Suspended => {
                // A suspended context still accepts graphs; they sound once it runs.
                if let Err(e) = self.output.resume() {
                    tracing::debug!(%kind, error = %e, "audio output stays suspended");
                }
            }
            ContextState::Running => {}
        }

        let now = self.output.current_time();
        let graph = SoundGraph::build(
            self.bank.get(kind),
            now,
            self.output.sample_rate(),
            &mut self.rng,
        )?;
        let playback = Playback {
            kind,
            start: graph.start,
            stop: graph.stop,
        };
        self.output.schedule(graph)?;
        Ok(playback)
    }

    /// Play `kind`, swallowing any failure.
    pub fn trigger(&mut self, kind: SoundKind) {
        if let Err(e) = self.play(kind) {
            tracing::debug!(%kind, error = %e, "sound dropped");
        }
    }

    pub fn play_click(&mut self) {
        self.trigger(SoundKind::Click);
    }

    pub fn play_flip(&mut self) {
        self.trigger(SoundKind::Flip);
    }

    pub fn play_swipe(&mut self) {
        self.trigger(SoundKind::Swipe);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{SoundSet, SourceSpec};
    use crate::graph::SourceNode;
    use crate::output::OfflineOutput;

    fn engine(set: SoundSet) -> SoundEngine<OfflineOutput> {
        SoundEngine::with_seed(OfflineOutput::new(44100.0), set.bank(), 11)
    }

    fn init_logging() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("uisfx_core=debug")
            .with_test_writer()
            .try_init();
    }

    #[test]
    fn triggers_never_panic_in_any_state() {
        init_logging();
        for state in [
            ContextState::Running,
            ContextState::Suspended,
            ContextState::Closed,
        ] {
            let mut e = engine(SoundSet::Whoosh);
            e.output_mut().set_state(state);
            e.output_mut().allow_resume = false;
            e.play_click();
            e.play_flip();
            e.play_swipe();

            let expected = if state == ContextState::Closed { 0 } else { 3 };
            assert_eq!(e.output().scheduled().len(), expected, "state {state:?}");
        }
    }

    #[test]
    fn closed_output_reports_error() {
        let mut e = engine(SoundSet::Whoosh);
        e.output_mut().set_state(ContextState::Closed);
        assert!(matches!(e.play(SoundKind::Click), Err(SfxError::ContextClosed)));
    }

    #[test]
    fn suspended_output_is_resumed() {
        let mut e = engine(SoundSet::Whoosh);
        e.output_mut().set_state(ContextState::Suspended);
        e.play(SoundKind::Click).unwrap();
        assert_eq!(e.output().state(), ContextState::Running);
    }

    #[test]
    fn click_schedules_one_short_tone() {
        for set in SoundSet::ALL {
            let mut e = engine(set);
            e.output_mut().advance(3.0);
            let p = e.play(SoundKind::Click).unwrap();

            let graphs = e.output().scheduled();
            assert_eq!(graphs.len(), 1);
            let g = &graphs[0];
            assert!(matches!(g.source, SourceNode::Tone { .. }));
            assert_eq!(g.start, 3.0);
            assert!(
                (0.05 - 1e-9..=0.1 + 1e-9).contains(&p.duration()),
                "{set:?} click lasted {}",
                p.duration()
            );
            assert!(g.gain.value_at(g.start) > 0.0);
            assert!(g.gain.value_at(g.stop) <= 0.01 + 1e-12);
        }
    }

    #[test]
    fn flip_and_swipe_sweep_monotonically() {
        for set in SoundSet::ALL {
            let mut e = engine(set);
            for kind in [SoundKind::Flip, SoundKind::Swipe] {
                let descriptor = *e.bank().get(kind);
                let p = e.play(kind).unwrap();
                assert!((p.duration() - descriptor.duration).abs() < 1e-9);
                assert!((0.08 - 1e-9..=0.2 + 1e-9).contains(&p.duration()));

                let g = e.output().scheduled().last().unwrap();
                let mut swept = Vec::new();
                if let SourceNode::Tone { frequency, .. } = &g.source {
                    swept.push(frequency);
                }
                if let Some(filter) = &g.filter {
                    swept.push(&filter.frequency);
                }
                assert!(!swept.is_empty(), "{set:?} {kind}: nothing to sweep");
                for param in swept {
                    assert!(
                        param.is_monotonic(g.start, g.stop, 128),
                        "{set:?} {kind} sweep is not monotonic"
                    );
                }
            }
        }
    }

    #[test]
    fn noise_sounds_use_generated_buffers() {
        let mut e = engine(SoundSet::Whoosh);
        e.play_flip();
        e.play_swipe();
        for g in e.output().scheduled() {
            match &g.source {
                SourceNode::Buffer { samples } => {
                    assert!(samples.iter().all(|s| (-1.0..=1.0).contains(s)));
                }
                other => panic!("expected noise, got {other:?}"),
            }
        }
        assert!(matches!(
            e.bank().flip.source,
            SourceSpec::Noise { decay_power } if decay_power == 2.0
        ));
    }

    #[test]
    fn rapid_clicks_overlap_independently() {
        let mut e = engine(SoundSet::Whoosh);
        let mut playbacks = Vec::new();
        for _ in 0..3 {
            playbacks.push(e.play(SoundKind::Click).unwrap());
            e.output_mut().advance(0.004);
        }

        let graphs = e.output().scheduled();
        assert_eq!(graphs.len(), 3, "no de-duplication");
        for pair in playbacks.windows(2) {
            assert!(pair[1].start > pair[0].start);
            assert!(pair[1].start < pair[0].stop, "renders should overlap");
        }
        assert!(playbacks[2].start - playbacks[0].start < 0.010);

        // All three are heard: the mix is louder than a single click where they overlap.
        let mut single = engine(SoundSet::Whoosh);
        single.play_click();
        let one = single.output().mixdown(0.1);
        let three = e.output().mixdown(0.1);
        let energy = |b: &[f32]| b.iter().map(|s| (*s as f64).powi(2)).sum::<f64>();
        assert!(energy(&three) > energy(&one) * 1.5);
    }

    #[test]
    fn noise_differs_between_calls() {
        let mut e = engine(SoundSet::Whoosh);
        e.play_flip();
        e.play_flip();
        let g = e.output().scheduled();
        assert_ne!(g[0].source, g[1].source, "each flip gets fresh noise");
    }

    #[test]
    fn invalid_bank_is_rejected() {
        let mut e = engine(SoundSet::Whoosh);
        let mut bad = SoundSet::Soft.bank();
        bad.click.gain.peak = 0.0;
        assert!(e.set_bank(bad).is_err());
        assert_eq!(*e.bank(), SoundSet::Whoosh.bank());

        e.set_bank(SoundSet::Tonal.bank()).unwrap();
        assert_eq!(*e.bank(), SoundSet::Tonal.bank());
    }

    #[test]
    fn oversized_bank_is_rejected() {
        let mut e = engine(SoundSet::Whoosh);
        let mut bank = SoundSet::Whoosh.bank();
        bank.flip.duration = 1e15;
        assert!(matches!(e.set_bank(bank), Err(SfxError::InvalidDescriptor(_))));

        e.play_flip();
        let g = &e.output().scheduled()[0];
        assert!((g.duration() - 0.15).abs() < 1e-9);
    }

    #[test]
    fn reseed_repeats_noise() {
        let mut a = engine(SoundSet::Whoosh);
        let mut b = engine(SoundSet::Whoosh);
        b.play_flip();
        a.reseed(99);
        b.reseed(99);
        a.play_flip();
        b.play_flip();
        assert_eq!(a.output().scheduled()[0].source, b.output().scheduled()[1].source);
    }

    #[test]
    fn playback_finishes_at_stop() {
        let mut e = engine(SoundSet::Whoosh);
        let p = e.play(SoundKind::Swipe).unwrap();
        assert!(!p.is_finished_at(p.start + 0.1));
        assert!(p.is_finished_at(p.stop));
    }
}
