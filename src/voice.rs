use serde::{Deserialize, Serialize};

/// A voice as reported by the speech backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub name: String,
    pub id: String,
}

impl Voice {
    /// Create a voice entry from its display name and backend id.
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }
}

/// Default name-preference order.
pub const DEFAULT_VOICE_PREFERENCES: &[&str] =
    &["Female", "Zira", "Google US English", "Samantha"];

/// Picks a voice by ordered name-substring preference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceSelector {
    preferences: Vec<String>,
}

impl Default for VoiceSelector {
    fn default() -> Self {
        Self::new(DEFAULT_VOICE_PREFERENCES.iter().copied())
    }
}

impl VoiceSelector {
    /// Create a selector from name substrings, most preferred first.
    pub fn new<I, S>(preferences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            preferences: preferences.into_iter().map(Into::into).collect(),
        }
    }

    /// The configured preference order.
    pub fn preferences(&self) -> &[String] {
        &self.preferences
    }

    /// Return the first voice matching the earliest preference.
    ///
    /// Preferences are tried in order and, within one preference, voices in
    /// the order the backend listed them. `None` means the backend default.
    pub fn select<'v>(&self, voices: &'v [Voice]) -> Option<&'v Voice> {
        self.preferences.iter().find_map(|pref| {
            voices
                .iter()
                .find(|voice| voice.name.contains(pref.as_str()))
        })
    }
}
