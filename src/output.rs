//! Audio output handles.
//!
//! The engine never owns a hidden global device; it is handed an
//! [`AudioOutput`] at construction. The browser build supplies a
//! WebAudio-backed one, tests and offline rendering use [`OfflineOutput`].

use crate::dsp::mixer::Mixer;
use crate::dsp::noise::frames_for;
use crate::error::SfxError;
use crate::graph::SoundGraph;

/// Mirrors `AudioContext.state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    Running,
    /// Created before a user gesture, or paused by the host.
    Suspended,
    Closed,
}

impl ContextState {
    pub fn from_js(state: &str) -> Self {
        match state {
            "running" => ContextState::Running,
            "closed" => ContextState::Closed,
            _ => ContextState::Suspended,
        }
    }
}

/// A shared synthesis/output device.
pub trait AudioOutput {
    fn state(&self) -> ContextState;

    /// Current position of the output timeline in seconds.
    fn current_time(&self) -> f64;

    fn sample_rate(&self) -> f64;

    /// Ask a suspended output to start. Hosts that need a user gesture
    /// may refuse; that is not fatal.
    fn resume(&mut self) -> Result<(), SfxError> {
        Ok(())
    }

    /// Hand a graph to the host. It renders from `graph.start` to
    /// `graph.stop` and is then discarded.
    fn schedule(&mut self, graph: SoundGraph) -> Result<(), SfxError>;
}

/// Discards everything. For hosts with sound turned off.
#[derive(Debug, Clone, Copy)]
pub struct NullOutput {
    pub sample_rate: f64,
}

impl Default for NullOutput {
    fn default() -> Self {
        NullOutput {
            sample_rate: 44100.0,
        }
    }
}

impl AudioOutput for NullOutput {
    fn state(&self) -> ContextState {
        ContextState::Running
    }

    fn current_time(&self) -> f64 {
        0.0
    }

    fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    fn schedule(&mut self, _graph: SoundGraph) -> Result<(), SfxError> {
        Ok(())
    }
}

/// An in-memory output with a manual clock.
///
/// Records every scheduled graph and can mix them into one buffer.
#[derive(Debug, Clone)]
pub struct OfflineOutput {
    sample_rate: f64,
    time: f64,
    state: ContextState,
    /// Whether `resume` succeeds (a host without a user gesture refuses).
    pub allow_resume: bool,
    scheduled: Vec<SoundGraph>,
}

impl OfflineOutput {
    pub fn new(sample_rate: f64) -> Self {
        OfflineOutput {
            sample_rate,
            time: 0.0,
            state: ContextState::Running,
            allow_resume: true,
            scheduled: Vec::new(),
        }
    }

    pub fn with_state(mut self, state: ContextState) -> Self {
        self.state = state;
        self
    }

    pub fn set_state(&mut self, state: ContextState) {
        self.state = state;
    }

    /// Move the clock forward. Only a running output advances.
    pub fn advance(&mut self, seconds: f64) {
        if self.state == ContextState::Running {
            self.time += seconds;
        }
    }

    pub fn scheduled(&self) -> &[SoundGraph] {
        &self.scheduled
    }

    /// Mix every scheduled graph into `seconds` of audio from time 0.
    pub fn mixdown(&self, seconds: f64) -> Vec<f32> {
        let mut mixer = Mixer::new();
        mixer.clear(frames_for(seconds, self.sample_rate));
        for graph in &self.scheduled {
            let offset = frames_for(graph.start, self.sample_rate);
            mixer.add_buffer(offset, &graph.render(self.sample_rate));
        }
        mixer.output()
    }
}

impl AudioOutput for OfflineOutput {
    fn state(&self) -> ContextState {
        self.state
    }

    fn current_time(&self) -> f64 {
        self.time
    }

    fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    fn resume(&mut self) -> Result<(), SfxError> {
        match self.state {
            ContextState::Closed => Err(SfxError::ContextClosed),
            _ if !self.allow_resume => Err(SfxError::ContextUnavailable(
                "resume refused without a user gesture".to_string(),
            )),
            _ => {
                self.state = ContextState::Running;
                Ok(())
            }
        }
    }

    fn schedule(&mut self, graph: SoundGraph) -> Result<(), SfxError> {
        if self.state == ContextState::Closed {
            return Err(SfxError::ContextClosed);
        }
        self.scheduled.push(graph);
        Ok(())
    }
}
