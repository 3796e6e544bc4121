use thiserror::Error;

/// Errors raised while building or scheduling a UI sound.
///
/// The fire-and-forget triggers never surface these; they are returned by
/// the explicit APIs (`SoundEngine::play`, rendering, configuration).
#[derive(Debug, Error)]
pub enum SfxError {
    /// The host has no usable audio output (no WebAudio, blocked by policy).
    #[error("audio context unavailable: {0}")]
    ContextUnavailable(String),

    /// The audio context was closed; nothing can be scheduled on it.
    #[error("audio context is closed")]
    ContextClosed,

    /// Exponential ramps cannot reach zero or cross zero.
    #[error("exponential ramp to {value} is not allowed (target must be non-zero and keep the sign)")]
    InvalidRamp { value: f64 },

    /// Too low to render anything meaningful (or not a number).
    #[error("sample rate {0} Hz is out of range")]
    InvalidSampleRate(f64),

    #[error("invalid sound descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("unknown sound '{0}' (expected click, flip or swipe)")]
    UnknownSound(String),

    #[error("unknown sound set '{0}' (expected whoosh, soft, tonal or chirp)")]
    UnknownSoundSet(String),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    /// A JavaScript exception thrown by the host while scheduling.
    #[error("host error: {0}")]
    Host(String),
}
