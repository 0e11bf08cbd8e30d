//! The seam between the narration player and a speech synthesizer.
//!
//! Backends are fire-and-forget: [`SpeechBackend::enqueue_utterance`]
//! returns as soon as the utterance is accepted, and whoever drives the
//! backend later reports its progress by calling
//! [`NarrationPlayer::handle_event`](crate::player::NarrationPlayer::handle_event)
//! with the [`UtteranceTag`] the utterance was enqueued with.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::BackendError;
use crate::prosody::Prosody;
use crate::voice::Voice;

/// Resolved speech parameters for one utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceProfile {
    /// `None` leaves voice choice to the backend.
    pub voice_id: Option<String>,
    pub pitch: f32,
    pub rate: f32,
    pub volume: f32,
}

impl VoiceProfile {
    /// Combine an optional voice with a block's prosody.
    pub fn new(voice: Option<&Voice>, prosody: Prosody) -> Self {
        Self {
            voice_id: voice.map(|v| v.id.clone()),
            pitch: prosody.pitch,
            rate: prosody.rate,
            volume: prosody.volume,
        }
    }
}

/// Identifies which session and block an utterance belongs to.
///
/// Backends must hand the tag back unchanged with every event for the
/// utterance; the player uses it to discard events from cancelled sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UtteranceTag {
    pub generation: u64,
    pub block: usize,
}

/// Backend-assigned identifier for an accepted utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UtteranceHandle(pub u64);

/// Granularity of a boundary event. Only word boundaries move the highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryKind {
    Word,
    Sentence,
}

/// Progress notification for one utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BackendEvent {
    Start,
    /// Speech reached `char_index` (in characters) of the utterance text.
    Boundary {
        char_index: usize,
        kind: BoundaryKind,
    },
    End,
}

/// Common interface for speech synthesizers driven by the player.
///
/// Implementations queue utterances and play them in order. They report
/// progress asynchronously by passing each utterance's [`UtteranceTag`] back
/// with a [`BackendEvent`]. They must not block in any of these methods.
pub trait SpeechBackend {
    /// Queue one utterance for playback.
    fn enqueue_utterance(
        &mut self,
        tag: UtteranceTag,
        text: &str,
        profile: &VoiceProfile,
    ) -> Result<UtteranceHandle, BackendError>;

    /// Drop every pending and in-flight utterance.
    fn cancel_all(&mut self);

    /// Voices currently available, in backend order. May be empty until the
    /// backend finishes loading them.
    fn list_voices(&self) -> Vec<Voice>;
}

/// An utterance accepted by a [`QueuedBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedUtterance {
    pub handle: UtteranceHandle,
    pub tag: UtteranceTag,
    pub text: String,
    pub profile: VoiceProfile,
}

/// A backend that only records what it is asked to do.
///
/// Useful for dry runs and for driving the player from a host that does its
/// own audio: pull utterances with [`QueuedBackend::pop`] and report their
/// progress back to the player.
#[derive(Debug, Default)]
pub struct QueuedBackend {
    voices: Vec<Voice>,
    pending: VecDeque<QueuedUtterance>,
    next_handle: u64,
    cancellations: usize,
}

impl QueuedBackend {
    /// Create a backend with no voices.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend that reports `voices` from the start.
    pub fn with_voices(voices: Vec<Voice>) -> Self {
        Self {
            voices,
            ..Self::default()
        }
    }

    /// Replace the voice list, e.g. when the platform finishes loading it.
    pub fn set_voices(&mut self, voices: Vec<Voice>) {
        self.voices = voices;
    }

    /// Take the oldest utterance not yet played.
    pub fn pop(&mut self) -> Option<QueuedUtterance> {
        self.pending.pop_front()
    }

    /// Utterances waiting to be played, oldest first.
    pub fn pending(&self) -> impl Iterator<Item = &QueuedUtterance> {
        self.pending.iter()
    }

    /// Number of times [`SpeechBackend::cancel_all`] was called.
    pub fn cancellations(&self) -> usize {
        self.cancellations
    }
}

impl SpeechBackend for QueuedBackend {
    fn enqueue_utterance(
        &mut self,
        tag: UtteranceTag,
        text: &str,
        profile: &VoiceProfile,
    ) -> Result<UtteranceHandle, BackendError> {
        let handle = UtteranceHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.push_back(QueuedUtterance {
            handle,
            tag,
            text: text.to_string(),
            profile: profile.clone(),
        });
        Ok(handle)
    }

    fn cancel_all(&mut self) {
        self.pending.clear();
        self.cancellations += 1;
    }

    fn list_voices(&self) -> Vec<Voice> {
        self.voices.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::{
        BackendEvent, BoundaryKind, QueuedBackend, SpeechBackend, UtteranceTag, VoiceProfile,
    };
    use crate::prosody::Prosody;
    use crate::voice::Voice;

    #[test]
    fn queued_backend_records_in_order_and_cancels() {
        let mut backend = QueuedBackend::new();
        let profile = VoiceProfile::new(None, Prosody::new(1.0, 1.0, 1.0));
        let first = backend
            .enqueue_utterance(UtteranceTag { generation: 1, block: 0 }, "a", &profile)
            .expect("enqueue should succeed");
        let second = backend
            .enqueue_utterance(UtteranceTag { generation: 1, block: 1 }, "b", &profile)
            .expect("enqueue should succeed");
        assert_ne!(first, second);
        assert_eq!(backend.pending().count(), 2);
        assert_eq!(backend.pop().map(|u| u.text), Some("a".to_string()));

        backend.cancel_all();
        assert!(backend.pop().is_none());
        assert_eq!(backend.cancellations(), 1);
    }

    #[test]
    fn profile_carries_selected_voice_id() {
        let voice = Voice::new("Samantha", "com.apple.samantha");
        let profile = VoiceProfile::new(Some(&voice), Prosody::new(0.9, 0.85, 1.1));
        assert_eq!(profile.voice_id.as_deref(), Some("com.apple.samantha"));
        assert_eq!(profile.rate, 0.85);
    }

    #[test]
    fn events_serialize_with_tag() {
        let json = serde_json::to_string(&BackendEvent::Boundary {
            char_index: 6,
            kind: BoundaryKind::Word,
        })
        .expect("event should serialize");
        assert_eq!(json, r#"{"event":"boundary","char_index":6,"kind":"word"}"#);
    }
}
