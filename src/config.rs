//! Sound configuration: which sound set to use, optional custom
//! descriptors, noise seed and the button selector.

use serde::{Deserialize, Serialize};

use crate::bind::BUTTON_SELECTOR;
use crate::descriptor::{SoundBank, SoundSet};
use crate::error::SfxError;

fn default_selector() -> String {
    BUTTON_SELECTOR.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SfxConfig {
    /// Built-in variant to start from.
    #[serde(default)]
    pub sound_set: SoundSet,
    /// Full custom table. Takes precedence over `sound_set`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sounds: Option<SoundBank>,
    /// Noise seed. Unset means "pick one at startup".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default = "default_selector")]
    pub selector: String,
}

impl Default for SfxConfig {
    fn default() -> Self {
        SfxConfig {
            sound_set: SoundSet::default(),
            sounds: None,
            seed: None,
            selector: default_selector(),
        }
    }
}

impl SfxConfig {
    pub fn from_json(json: &str) -> Result<Self, SfxError> {
        let config: SfxConfig = serde_json::from_str(json)?;
        config.bank()?;
        Ok(config)
    }

    /// The descriptor table this config selects, validated.
    pub fn bank(&self) -> Result<SoundBank, SfxError> {
        let bank = self.sounds.unwrap_or_else(|| self.sound_set.bank());
        bank.validate()?;
        Ok(bank)
    }
}
