//! DSP: pure Rust synthesis for the UI sounds.
//!
//! The same code renders sounds for the browser (handed to WebAudio as a
//! finished buffer) and offline (tests, WAV export).

pub mod filter;
pub mod mixer;
pub mod noise;
pub mod oscillator;
pub mod param;
pub mod renderer;
