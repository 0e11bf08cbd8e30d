use serde::{Deserialize, Serialize};

use crate::segmenter::BlockKind;

/// Speech parameters applied to one utterance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prosody {
    pub pitch: f32,
    pub rate: f32,
    pub volume: f32,
}

impl Prosody {
    /// Create prosody from pitch, rate and volume multipliers.
    pub const fn new(pitch: f32, rate: f32, volume: f32) -> Self {
        Self {
            pitch,
            rate,
            volume,
        }
    }
}

/// Block kind to prosody lookup.
///
/// Headings read deeper and slower, list entries slightly faster, body text
/// a little higher for engagement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProsodyTable {
    /// Applied to [`BlockKind::Heading`] and [`BlockKind::SubHeading`].
    pub heading: Prosody,
    /// Applied to [`BlockKind::ListItem`] and [`BlockKind::Numbered`].
    pub list: Prosody,
    /// Applied to [`BlockKind::Bold`] and [`BlockKind::Paragraph`].
    pub body: Prosody,
}

impl Default for ProsodyTable {
    fn default() -> Self {
        Self {
            heading: Prosody::new(0.90, 0.85, 1.10),
            list: Prosody::new(1.05, 0.95, 1.00),
            body: Prosody::new(1.10, 0.90, 1.00),
        }
    }
}

impl ProsodyTable {
    /// Prosody for a block of the given kind.
    pub fn for_kind(&self, kind: BlockKind) -> Prosody {
        match kind {
            BlockKind::Heading | BlockKind::SubHeading => self.heading,
            BlockKind::ListItem | BlockKind::Numbered => self.list,
            BlockKind::Bold | BlockKind::Paragraph => self.body,
        }
    }
}
