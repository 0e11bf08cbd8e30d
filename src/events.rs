use serde::{Deserialize, Serialize};

/// Synchronization events emitted to the caller for highlight rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SyncEvent {
    /// The block at `block` (plan index) started speaking.
    BlockStart { block: usize },
    /// Speech reached word `word` of block `block`.
    WordHighlight { block: usize, word: usize },
    /// The last block finished, or the document had nothing to read.
    PlaybackEnded,
    /// An active narration was stopped.
    PlaybackCancelled,
}

/// Receiver for [`SyncEvent`]s.
pub trait EventSink {
    /// Deliver one event. Called synchronously from the player's methods.
    fn emit(&mut self, event: SyncEvent);
}

impl EventSink for Vec<SyncEvent> {
    fn emit(&mut self, event: SyncEvent) {
        self.push(event);
    }
}

impl<T: EventSink + ?Sized> EventSink for Box<T> {
    fn emit(&mut self, event: SyncEvent) {
        (**self).emit(event);
    }
}

/// Sink wrapping a closure, see [`from_fn`].
pub struct FnSink<F>(F);

impl<F: FnMut(SyncEvent)> EventSink for FnSink<F> {
    fn emit(&mut self, event: SyncEvent) {
        (self.0)(event)
    }
}

/// Build a sink that forwards every event to `f`.
pub fn from_fn<F: FnMut(SyncEvent)>(f: F) -> FnSink<F> {
    FnSink(f)
}
