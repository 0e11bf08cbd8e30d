use std::path::Path;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::NarrationError;
use crate::prosody::ProsodyTable;
use crate::voice::{VoiceSelector, DEFAULT_VOICE_PREFERENCES};

/// Settings for a [`NarrationPlayer`](crate::player::NarrationPlayer).
///
/// Missing JSON fields fall back to their defaults, so a file containing
/// only `{"voice_preferences": ["Karen"]}` keeps the default prosody table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[serde(default)]
#[builder(default, setter(into), build_fn(validate = "Self::validate"))]
pub struct NarrationConfig {
    /// Voice-name substrings, most preferred first.
    pub voice_preferences: Vec<String>,
    pub prosody: ProsodyTable,
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            voice_preferences: DEFAULT_VOICE_PREFERENCES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            prosody: ProsodyTable::default(),
        }
    }
}

impl NarrationConfigBuilder {
    /// Run [`NarrationConfig::validate`] on the values `build()` would use.
    fn validate(&self) -> Result<(), String> {
        let defaults = NarrationConfig::default();
        let candidate = NarrationConfig {
            voice_preferences: self
                .voice_preferences
                .clone()
                .unwrap_or(defaults.voice_preferences),
            prosody: self.prosody.clone().unwrap_or(defaults.prosody),
        };
        candidate.validate().map_err(|e| e.to_string())
    }
}

impl NarrationConfig {
    /// Start building a config in code. `build()` applies the same checks as
    /// the JSON loaders.
    pub fn builder() -> NarrationConfigBuilder {
        NarrationConfigBuilder::default()
    }

    /// Load settings from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, NarrationError> {
        log::info!("Loading narration config from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Parse and validate settings from a JSON document.
    pub fn from_json_str(content: &str) -> Result<Self, NarrationError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject prosody values a backend could not honour.
    pub fn validate(&self) -> Result<(), NarrationError> {
        let table = &self.prosody;
        for (group, prosody) in [
            ("heading", table.heading),
            ("list", table.list),
            ("body", table.body),
        ] {
            let values = [prosody.pitch, prosody.rate, prosody.volume];
            if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
                return Err(NarrationError::Config(format!(
                    "prosody.{group} must be finite and non-negative, got {prosody:?}"
                )));
            }
        }
        if self.voice_preferences.iter().any(|p| p.is_empty()) {
            return Err(NarrationError::Config(
                "voice_preferences must not contain empty names".to_string(),
            ));
        }
        Ok(())
    }

    /// Selector over [`voice_preferences`](Self::voice_preferences).
    pub fn voice_selector(&self) -> VoiceSelector {
        VoiceSelector::new(self.voice_preferences.iter().cloned())
    }
}
