use serde::{Deserialize, Serialize};

use crate::backend::{BackendEvent, BoundaryKind, SpeechBackend, UtteranceTag, VoiceProfile};
use crate::config::NarrationConfig;
use crate::events::{EventSink, SyncEvent};
use crate::segmenter::{segment, Block};
use crate::tracker::WordBoundaryTracker;
use crate::voice::Voice;

/// Whether a narration is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    Idle,
    Playing,
}

/// A block together with the parameters it will be spoken with.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedBlock {
    pub block: Block,
    pub profile: VoiceProfile,
}

/// The ordered, immutable utterance list built from one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Plan {
    blocks: Vec<PlannedBlock>,
}

impl Plan {
    /// Segment `text` and attach a voice profile to every block.
    ///
    /// The voice is chosen once from `voices`; later changes to the backend's
    /// voice list do not affect an existing plan.
    pub fn build(text: &str, config: &NarrationConfig, voices: &[Voice]) -> Self {
        let selector = config.voice_selector();
        let voice = selector.select(voices);
        match voice {
            Some(v) => log::debug!("Selected voice {:?} ({})", v.name, v.id),
            None => log::debug!(
                "No preferred voice among {} available, using backend default",
                voices.len()
            ),
        }

        let blocks = segment(text)
            .into_iter()
            .map(|block| {
                let profile = VoiceProfile::new(voice, config.prosody.for_kind(block.kind));
                PlannedBlock { block, profile }
            })
            .collect();

        Self { blocks }
    }

    /// Number of blocks in the plan.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// `true` when the document had nothing to read.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Block at plan position `index`.
    pub fn get(&self, index: usize) -> Option<&PlannedBlock> {
        self.blocks.get(index)
    }

    /// Blocks in narration order.
    pub fn iter(&self) -> impl Iterator<Item = &PlannedBlock> {
        self.blocks.iter()
    }
}

/// Currently highlighted position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    pub block: usize,
    /// `None` until the first word boundary of the block arrives.
    pub word: Option<usize>,
}

/// State of one narration run. Dropped on stop or completion.
#[derive(Debug)]
struct Session {
    generation: u64,
    plan: Plan,
    /// Block currently submitted to the backend.
    block: usize,
    /// Set once the backend reports the current block started.
    tracker: Option<WordBoundaryTracker>,
    word: Option<usize>,
}

impl Session {
    fn owns(&self, tag: UtteranceTag) -> bool {
        self.generation == tag.generation && self.block == tag.block
    }
}

/// Drives a [`SpeechBackend`] through a document one block at a time and
/// reports progress to an [`EventSink`].
///
/// Every utterance is tagged with the session's generation token. Events
/// carrying any other generation, or naming a block other than the one in
/// flight, are ignored, so late callbacks after [`stop`](Self::stop) or a
/// restart can never revive playback.
///
/// # Example
///
/// ```rust
/// use narrate_rs::{
///     backend::{BackendEvent, QueuedBackend},
///     NarrationConfig, NarrationPlayer, SyncEvent,
/// };
///
/// let mut player = NarrationPlayer::new(
///     QueuedBackend::new(),
///     Vec::<SyncEvent>::new(),
///     NarrationConfig::default(),
/// );
/// player.start("## Welcome\nHello there");
///
/// while let Some(utterance) = player.backend_mut().pop() {
///     player.handle_event(utterance.tag, BackendEvent::Start);
///     player.handle_event(utterance.tag, BackendEvent::End);
/// }
///
/// assert_eq!(
///     player.sink().as_slice(),
///     [
///         SyncEvent::BlockStart { block: 0 },
///         SyncEvent::BlockStart { block: 1 },
///         SyncEvent::PlaybackEnded,
///     ]
/// );
/// ```
pub struct NarrationPlayer<B: SpeechBackend, S: EventSink> {
    backend: B,
    sink: S,
    config: NarrationConfig,
    voices: Vec<Voice>,
    generation: u64,
    session: Option<Session>,
}

impl<B: SpeechBackend, S: EventSink> NarrationPlayer<B, S> {
    /// Create an idle player and take an initial snapshot of the backend's
    /// voices.
    pub fn new(backend: B, sink: S, config: NarrationConfig) -> Self {
        let voices = backend.list_voices();
        log::info!("Narration player ready with {} voices", voices.len());
        Self {
            backend,
            sink,
            config,
            voices,
            generation: 0,
            session: None,
        }
    }

    /// [`PlaybackState::Playing`] while a session is active.
    pub fn state(&self) -> PlaybackState {
        if self.session.is_some() {
            PlaybackState::Playing
        } else {
            PlaybackState::Idle
        }
    }

    /// Shorthand for `state() == PlaybackState::Playing`.
    pub fn is_playing(&self) -> bool {
        self.session.is_some()
    }

    /// Generation token of the current session, or of the last one if idle.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The plan being narrated, if any.
    pub fn plan(&self) -> Option<&Plan> {
        self.session.as_ref().map(|s| &s.plan)
    }

    /// Block and word currently highlighted. `None` before the first block
    /// starts and whenever idle.
    pub fn highlight(&self) -> Option<Highlight> {
        let session = self.session.as_ref()?;
        session.tracker.as_ref().map(|_| Highlight {
            block: session.block,
            word: session.word,
        })
    }

    /// Voices used for the next plan.
    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    /// Settings applied to every plan.
    pub fn config(&self) -> &NarrationConfig {
        &self.config
    }

    /// The backend being driven.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the backend, e.g. to pull queued utterances.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// The sink receiving [`SyncEvent`]s.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Re-read the backend's voice list. Wire this to the backend's
    /// voices-changed notification. Only plans built afterwards see the
    /// new list.
    pub fn refresh_voices(&mut self) {
        self.voices = self.backend.list_voices();
        log::debug!("Voice list refreshed: {} voices", self.voices.len());
    }

    /// Start narrating `text` from its first block, cancelling any current
    /// narration first.
    pub fn start(&mut self, text: &str) {
        self.stop();

        let plan = Plan::build(text, &self.config, &self.voices);
        if plan.is_empty() {
            log::info!("Nothing to narrate");
            self.sink.emit(SyncEvent::PlaybackEnded);
            return;
        }

        self.generation += 1;
        log::info!(
            "Starting narration of {} blocks (generation {})",
            plan.len(),
            self.generation
        );
        self.session = Some(Session {
            generation: self.generation,
            plan,
            block: 0,
            tracker: None,
            word: None,
        });
        self.submit_from(0);
    }

    /// Cancel the current narration. Does nothing when idle.
    pub fn stop(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        self.generation += 1;
        log::info!(
            "Cancelling narration at block {} of {} (generation {})",
            session.block,
            session.plan.len(),
            session.generation
        );
        self.backend.cancel_all();
        self.sink.emit(SyncEvent::PlaybackCancelled);
    }

    /// Stop when playing, otherwise start narrating `text`.
    pub fn toggle(&mut self, text: &str) -> PlaybackState {
        if self.is_playing() {
            self.stop();
        } else {
            self.start(text);
        }
        self.state()
    }

    /// Feed a backend progress event for the utterance tagged `tag`.
    pub fn handle_event(&mut self, tag: UtteranceTag, event: BackendEvent) {
        let Some(session) = self.session.as_mut().filter(|s| s.owns(tag)) else {
            log::trace!("Ignoring stale {event:?} for {tag:?}");
            return;
        };

        match event {
            BackendEvent::Start => {
                let Some(planned) = session.plan.get(session.block) else {
                    return;
                };
                session.tracker = Some(WordBoundaryTracker::new(&planned.block.cleaned));
                session.word = None;
                self.sink.emit(SyncEvent::BlockStart { block: tag.block });
            }
            BackendEvent::Boundary { char_index, kind } => {
                if kind != BoundaryKind::Word {
                    return;
                }
                let Some(tracker) = session.tracker.as_ref() else {
                    log::debug!("Boundary before start for block {}", tag.block);
                    return;
                };
                let Some(word) = tracker.resolve(char_index) else {
                    return;
                };
                if session.word != Some(word) {
                    session.word = Some(word);
                    self.sink.emit(SyncEvent::WordHighlight {
                        block: tag.block,
                        word,
                    });
                }
            }
            BackendEvent::End => self.submit_from(tag.block + 1),
        }
    }

    /// Submit block `next`, skipping ahead past blocks the backend rejects.
    /// Ends the narration once the plan is exhausted.
    fn submit_from(&mut self, mut next: usize) {
        loop {
            let Some(session) = self.session.as_mut() else {
                return;
            };
            let Some(planned) = session.plan.get(next) else {
                break;
            };

            session.block = next;
            session.tracker = None;
            session.word = None;
            let tag = UtteranceTag {
                generation: session.generation,
                block: next,
            };

            match self
                .backend
                .enqueue_utterance(tag, &planned.block.cleaned, &planned.profile)
            {
                Ok(handle) => {
                    log::debug!("Enqueued block {next} as {handle:?}");
                    return;
                }
                Err(e) => {
                    log::warn!("Backend rejected block {next}, skipping: {e}");
                    next += 1;
                }
            }
        }

        self.session = None;
        log::info!("Narration finished (generation {})", self.generation);
        self.sink.emit(SyncEvent::PlaybackEnded);
    }
}

impl<B: SpeechBackend, S: EventSink> Drop for NarrationPlayer<B, S> {
    fn drop(&mut self) {
        if self.session.take().is_some() {
            self.backend.cancel_all();
        }
    }
}
