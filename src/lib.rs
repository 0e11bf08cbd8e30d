//! # narrate-rs
//!
//! A Rust library that reads lightly marked-up text aloud through any speech
//! backend, one block at a time, while reporting which block and which word
//! is being spoken so a UI can highlight along.
//!
//! ## Features
//!
//! - **Segmentation**: headings, sub-headings, list items, numbered items,
//!   bold lines and paragraphs, with one canonical cleaned text per block
//! - **Per-block prosody**: pitch, rate and volume chosen by block kind
//! - **Voice preference**: ordered name matching against the backend's voices
//! - **Word highlighting**: backend character offsets resolved to word indices
//! - **Safe restarts**: generation-tagged utterances, so late callbacks from
//!   a cancelled narration are ignored
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! narrate-rs = "2026.10"
//! ```
//!
//! ```rust
//! use narrate_rs::{
//!     backend::{BackendEvent, QueuedBackend},
//!     NarrationConfig, NarrationPlayer, SyncEvent,
//! };
//!
//! let mut player = NarrationPlayer::new(
//!     QueuedBackend::new(),
//!     Vec::<SyncEvent>::new(),
//!     NarrationConfig::default(),
//! );
//! player.start("## Breathing\n- Inhale for four counts");
//!
//! // A real backend reports progress asynchronously; here we play it by hand.
//! let first = player.backend_mut().pop().expect("block 0 is queued");
//! player.handle_event(first.tag, BackendEvent::Start);
//! assert_eq!(player.sink().as_slice(), [SyncEvent::BlockStart { block: 0 }]);
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod events;
pub mod player;
pub mod prosody;
pub mod segmenter;
pub mod tracker;
pub mod voice;

pub use backend::{BackendEvent, BoundaryKind, SpeechBackend, UtteranceTag, VoiceProfile};
pub use config::NarrationConfig;
pub use error::{BackendError, NarrationError};
pub use events::{EventSink, SyncEvent};
pub use player::{NarrationPlayer, Plan, PlaybackState};
pub use segmenter::{clean_text, segment, Block, BlockKind};
pub use voice::{Voice, VoiceSelector};
