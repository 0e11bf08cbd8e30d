use std::path::PathBuf;
use std::time::Instant;

use narrate_rs::{
    backend::{BackendEvent, BoundaryKind, QueuedBackend},
    events::from_fn,
    tracker::WordBoundaryTracker,
    NarrationConfig, NarrationPlayer, Voice,
};

const SAMPLE: &str = "## Breathing Exercises

Simple breathing techniques can calm the nervous system.

### 1. Box Breathing
- Inhale for four counts
- Hold for four counts
**Practice daily for best results**";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let text = match args.next() {
        Some(path) => std::fs::read_to_string(PathBuf::from(path))?,
        None => SAMPLE.to_string(),
    };
    let config = match args.next() {
        Some(path) => NarrationConfig::from_json_file(&PathBuf::from(path))?,
        None => NarrationConfig::default(),
    };

    let sink = from_fn(|event| match serde_json::to_string(&event) {
        Ok(line) => println!("{line}"),
        Err(e) => eprintln!("failed to encode {event:?}: {e}"),
    });
    let mut player = NarrationPlayer::new(QueuedBackend::new(), sink, config);

    // Platforms often publish their voices after start-up.
    player.backend_mut().set_voices(vec![
        Voice::new("Microsoft David Desktop", "david"),
        Voice::new("Microsoft Zira Desktop", "zira"),
    ]);
    player.refresh_voices();

    let started = Instant::now();
    player.start(&text);

    // Play each utterance back with one word boundary per word.
    while let Some(utterance) = player.backend_mut().pop() {
        println!(
            "# speaking {:?} voice={:?} pitch={} rate={}",
            utterance.text,
            utterance.profile.voice_id,
            utterance.profile.pitch,
            utterance.profile.rate
        );
        player.handle_event(utterance.tag, BackendEvent::Start);

        let mut offset = 0;
        for word in WordBoundaryTracker::new(&utterance.text).words() {
            let char_index = utterance.text.chars().skip(offset).position(|c| !c.is_whitespace());
            offset += char_index.unwrap_or(0);
            player.handle_event(
                utterance.tag,
                BackendEvent::Boundary {
                    char_index: offset,
                    kind: BoundaryKind::Word,
                },
            );
            offset += word.chars().count();
        }

        player.handle_event(utterance.tag, BackendEvent::End);
    }

    println!("# narrated in {:.2?}", started.elapsed());
    Ok(())
}
