pub mod bind;
pub mod config;
pub mod descriptor;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod graph;
pub mod output;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use crate::config::SfxConfig;
pub use crate::descriptor::{SoundBank, SoundDescriptor, SoundKind, SoundSet};
pub use crate::engine::{Playback, SoundEngine};
pub use crate::error::SfxError;
pub use crate::output::{AudioOutput, ContextState, NullOutput, OfflineOutput};

use wasm_bindgen::prelude::*;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the uisfx-core version string.
#[wasm_bindgen(js_name = coreVersion)]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// Look up the descriptor for `kind` in the built-in set `set`.
pub fn builtin_sound(kind: &str, set: &str) -> Result<SoundDescriptor, SfxError> {
    let kind: SoundKind = kind.parse()?;
    let set: SoundSet = set.parse()?;
    Ok(*set.bank().get(kind))
}

/// WASM-exposed: render a built-in sound to a WAV byte array.
#[wasm_bindgen(js_name = renderSoundWav)]
pub fn render_sound_wav(kind: &str, set: &str, sample_rate: u32) -> Result<Vec<u8>, JsValue> {
    let descriptor = builtin_sound(kind, set).map_err(|e| JsValue::from_str(&format!("{e}")))?;
    dsp::renderer::render_wav(&descriptor, sample_rate, 0)
        .map_err(|e| JsValue::from_str(&format!("{e}")))
}

/// WASM-exposed: render a built-in sound to mono f32 samples.
#[wasm_bindgen(js_name = renderSoundSamples)]
pub fn render_sound_samples(kind: &str, set: &str, sample_rate: u32) -> Result<Vec<f32>, JsValue> {
    let descriptor = builtin_sound(kind, set).map_err(|e| JsValue::from_str(&format!("{e}")))?;
    dsp::renderer::render_samples(&descriptor, sample_rate, 0)
        .map_err(|e| JsValue::from_str(&format!("{e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_lookup() {
        let d = builtin_sound("swipe", "whoosh").unwrap();
        assert_eq!(d.duration, 0.2);
        assert!(matches!(builtin_sound("swipe", "loud"), Err(SfxError::UnknownSoundSet(_))));
        assert!(matches!(builtin_sound("boop", "soft"), Err(SfxError::UnknownSound(_))));
    }

    #[test]
    fn version_is_set() {
        assert_eq!(core_version(), VERSION);
        assert!(!VERSION.is_empty());
    }
}
