use std::collections::HashSet;

use narrate_rs::backend::{QueuedBackend, QueuedUtterance, UtteranceHandle};
use narrate_rs::{
    BackendError, BackendEvent, BoundaryKind, NarrationConfig, NarrationPlayer, PlaybackState,
    SpeechBackend, SyncEvent, UtteranceTag, Voice, VoiceProfile,
};

const DOC: &str = "## Coping Strategies\n\nTake a breath.\n- Walk outside\n\n1. Call a friend";

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn player() -> NarrationPlayer<QueuedBackend, Vec<SyncEvent>> {
    init_logging();
    NarrationPlayer::new(QueuedBackend::new(), Vec::new(), NarrationConfig::default())
}

fn word(char_index: usize) -> BackendEvent {
    BackendEvent::Boundary {
        char_index,
        kind: BoundaryKind::Word,
    }
}

fn pop(player: &mut NarrationPlayer<QueuedBackend, Vec<SyncEvent>>) -> QueuedUtterance {
    player
        .backend_mut()
        .pop()
        .expect("an utterance should be pending")
}

#[test]
fn sequential_ends_start_every_block_in_order() {
    let mut player = player();
    player.start(DOC);
    assert_eq!(player.state(), PlaybackState::Playing);
    assert_eq!(player.plan().map(|p| p.len()), Some(4));

    let mut spoken = Vec::new();
    while let Some(u) = player.backend_mut().pop() {
        spoken.push(u.text.clone());
        player.handle_event(u.tag, BackendEvent::Start);
        player.handle_event(u.tag, BackendEvent::End);
    }

    assert_eq!(
        spoken,
        ["Coping Strategies", "Take a breath.", "Walk outside", "Call a friend"]
    );
    assert_eq!(
        player.sink().as_slice(),
        [
            SyncEvent::BlockStart { block: 0 },
            SyncEvent::BlockStart { block: 1 },
            SyncEvent::BlockStart { block: 2 },
            SyncEvent::BlockStart { block: 3 },
            SyncEvent::PlaybackEnded,
        ]
    );
    assert_eq!(player.state(), PlaybackState::Idle);
}

#[test]
fn events_after_completion_are_ignored() {
    let mut player = player();
    player.start("only line");
    let u = pop(&mut player);
    player.handle_event(u.tag, BackendEvent::Start);
    player.handle_event(u.tag, BackendEvent::End);
    let settled = player.sink().len();

    player.handle_event(u.tag, word(3));
    player.handle_event(u.tag, BackendEvent::Start);
    player.handle_event(u.tag, BackendEvent::End);
    assert_eq!(player.sink().len(), settled);
}

#[test]
fn late_callbacks_after_stop_are_discarded() {
    let mut player = player();
    player.start(DOC);

    let first = pop(&mut player);
    player.handle_event(first.tag, BackendEvent::Start);
    player.handle_event(first.tag, BackendEvent::End);
    let second = pop(&mut player);
    player.handle_event(second.tag, BackendEvent::Start);
    player.handle_event(second.tag, word(5));

    player.stop();
    let after_stop = player.sink().len();
    assert_eq!(player.sink().last(), Some(&SyncEvent::PlaybackCancelled));
    assert_eq!(player.state(), PlaybackState::Idle);

    player.handle_event(second.tag, word(9));
    player.handle_event(second.tag, BackendEvent::End);
    player.handle_event(first.tag, BackendEvent::Start);

    assert_eq!(player.sink().len(), after_stop);
    assert!(player.backend().pending().next().is_none());
    assert!(player.highlight().is_none());
}

#[test]
fn restart_while_playing_begins_fresh_session() {
    let mut player = player();
    player.start(DOC);
    let old = pop(&mut player);
    player.handle_event(old.tag, BackendEvent::Start);

    player.start("New document\nSecond line");
    let fresh = pop(&mut player);
    assert!(fresh.tag.generation > old.tag.generation);
    assert_eq!(fresh.tag.block, 0);
    assert_eq!(fresh.text, "New document");

    // The old session's tag names the same block index as the fresh one.
    player.handle_event(old.tag, word(7));
    player.handle_event(old.tag, BackendEvent::End);
    assert!(player.backend().pending().next().is_none());

    player.handle_event(fresh.tag, BackendEvent::Start);
    player.handle_event(fresh.tag, word(4));

    assert_eq!(
        player.sink().as_slice(),
        [
            SyncEvent::BlockStart { block: 0 },
            SyncEvent::PlaybackCancelled,
            SyncEvent::BlockStart { block: 0 },
            SyncEvent::WordHighlight { block: 0, word: 1 },
        ]
    );
}

#[test]
fn generations_never_repeat_across_sessions() {
    let mut player = player();
    let mut seen = HashSet::new();
    for _ in 0..5 {
        player.start("again");
        let u = pop(&mut player);
        assert!(seen.insert(u.tag.generation));
        player.stop();
    }
}

#[test]
fn offsets_past_block_end_highlight_last_word() {
    let mut player = player();
    player.start("hello world foo");
    let u = pop(&mut player);
    player.handle_event(u.tag, BackendEvent::Start);
    player.handle_event(u.tag, word(6));
    player.handle_event(u.tag, word(200));

    assert_eq!(
        player.sink().as_slice(),
        [
            SyncEvent::BlockStart { block: 0 },
            SyncEvent::WordHighlight { block: 0, word: 1 },
            SyncEvent::WordHighlight { block: 0, word: 2 },
        ]
    );
}

#[test]
fn block_without_boundaries_still_completes() {
    let mut player = player();
    player.start("first block\nsecond block");
    let first = pop(&mut player);
    player.handle_event(first.tag, BackendEvent::Start);
    player.handle_event(first.tag, word(6));
    player.handle_event(first.tag, BackendEvent::End);

    let second = pop(&mut player);
    player.handle_event(second.tag, BackendEvent::Start);
    let highlight = player.highlight().expect("second block is speaking");
    assert_eq!((highlight.block, highlight.word), (1, None));

    player.handle_event(second.tag, BackendEvent::End);
    assert_eq!(player.sink().last(), Some(&SyncEvent::PlaybackEnded));
}

/// Backend that refuses utterances whose text contains a marker word.
struct FlakyBackend {
    reject: &'static str,
    accepted: Vec<(UtteranceTag, String)>,
}

impl SpeechBackend for FlakyBackend {
    fn enqueue_utterance(
        &mut self,
        tag: UtteranceTag,
        text: &str,
        _profile: &VoiceProfile,
    ) -> Result<UtteranceHandle, BackendError> {
        if text.contains(self.reject) {
            return Err(BackendError::Rejected(text.to_string()));
        }
        self.accepted.push((tag, text.to_string()));
        Ok(UtteranceHandle(self.accepted.len() as u64))
    }

    fn cancel_all(&mut self) {
        self.accepted.clear();
    }

    fn list_voices(&self) -> Vec<Voice> {
        Vec::new()
    }
}

#[test]
fn rejected_block_is_skipped() {
    init_logging();
    let backend = FlakyBackend {
        reject: "bad",
        accepted: Vec::new(),
    };
    let mut player =
        NarrationPlayer::new(backend, Vec::<SyncEvent>::new(), NarrationConfig::default());
    player.start("good one\nbad one\nbad two\ngood two");

    let (tag, _) = player.backend().accepted[0].clone();
    player.handle_event(tag, BackendEvent::Start);
    player.handle_event(tag, BackendEvent::End);

    let (tag, text) = player.backend().accepted[1].clone();
    assert_eq!(text, "good two");
    assert_eq!(tag.block, 3);
    player.handle_event(tag, BackendEvent::Start);
    player.handle_event(tag, BackendEvent::End);

    assert_eq!(
        player.sink().as_slice(),
        [
            SyncEvent::BlockStart { block: 0 },
            SyncEvent::BlockStart { block: 3 },
            SyncEvent::PlaybackEnded,
        ]
    );
}

#[test]
fn rejecting_every_block_ends_playback() {
    init_logging();
    let backend = FlakyBackend {
        reject: "",
        accepted: Vec::new(),
    };
    let mut player =
        NarrationPlayer::new(backend, Vec::<SyncEvent>::new(), NarrationConfig::default());
    player.start("one\ntwo");

    assert_eq!(player.sink().as_slice(), [SyncEvent::PlaybackEnded]);
    assert_eq!(player.state(), PlaybackState::Idle);
}

#[test]
fn custom_config_shapes_utterances() {
    init_logging();
    let config = NarrationConfig::from_json_str(
        r#"{
            "voice_preferences": ["Daniel"],
            "prosody": {"heading": {"pitch": 0.8, "rate": 0.7, "volume": 1.0}}
        }"#,
    )
    .expect("config should parse");
    let backend = QueuedBackend::with_voices(vec![
        Voice::new("Samantha", "sam"),
        Voice::new("Daniel", "dan"),
    ]);
    let mut player = NarrationPlayer::new(backend, Vec::<SyncEvent>::new(), config);
    player.start("# Title\nbody");

    let u = pop(&mut player);
    assert_eq!(u.profile.voice_id.as_deref(), Some("dan"));
    assert_eq!((u.profile.pitch, u.profile.rate), (0.8, 0.7));
}

#[test]
fn numbers_and_hashtags_are_spoken_verbatim() {
    let mut player = player();
    player.start("-5 degrees outside\n3.5 hours of sleep helps\n#selfcare matters");

    let mut spoken = Vec::new();
    while let Some(u) = player.backend_mut().pop() {
        spoken.push(u.text.clone());
        player.handle_event(u.tag, BackendEvent::End);
    }
    assert_eq!(
        spoken,
        ["-5 degrees outside", "3.5 hours of sleep helps", "#selfcare matters"]
    );
}
