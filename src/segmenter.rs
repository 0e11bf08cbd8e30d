use serde::{Deserialize, Serialize};

/// Classification of one source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Heading,
    SubHeading,
    ListItem,
    Numbered,
    Bold,
    Paragraph,
}

/// One classified, non-empty line of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Position of the block within its plan (0-based).
    pub index: usize,
    /// Position of the source line within the document (0-based).
    pub line: usize,
    pub kind: BlockKind,
    /// The line as it appeared in the document.
    pub raw: String,
    /// Marker-free text, shared by speech and highlight rendering.
    pub cleaned: String,
}

impl Block {
    /// Whitespace-delimited words of the cleaned text.
    ///
    /// Word indices reported by the player index into this sequence, so
    /// callers rendering per-word highlight spans should split with this
    /// rather than their own tokenizer.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.cleaned.split_whitespace()
    }
}

/// Split a document into blocks.
///
/// Blank lines and lines made only of markup (e.g. `##` or `**`) produce no
/// block. Block indices are assigned densely in document order.
pub fn segment(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();

    for (line, raw) in text.lines().enumerate() {
        if raw.trim().is_empty() {
            continue;
        }

        let cleaned = clean_text(raw);
        if cleaned.is_empty() {
            log::debug!("Dropping markup-only line {line}: {raw:?}");
            continue;
        }

        blocks.push(Block {
            index: blocks.len(),
            line,
            kind: classify(raw),
            raw: raw.to_string(),
            cleaned,
        });
    }

    blocks
}

/// Classify a line by its leading markup.
///
/// A marker only counts when whitespace or the end of the line follows it,
/// so `#selfcare`, `-5 degrees` and `3.5 hours` are paragraphs. Three or
/// more `#` yield [`BlockKind::SubHeading`]; `#` and `##` yield
/// [`BlockKind::Heading`].
pub fn classify(line: &str) -> BlockKind {
    let line = line.trim();

    if let Some(level) = heading_level(line) {
        if level >= 3 {
            BlockKind::SubHeading
        } else {
            BlockKind::Heading
        }
    } else if line.starts_with('-') && strip_marker(line, 1).is_some() {
        BlockKind::ListItem
    } else if numbered_prefix_len(line).is_some() {
        BlockKind::Numbered
    } else if line.len() >= 4 && line.starts_with("**") && line.ends_with("**") {
        BlockKind::Bold
    } else {
        BlockKind::Paragraph
    }
}

/// Strip markdown markers from a line and trim it.
///
/// The strips run in sequence on the remainder of the previous one: leading
/// `#` run, leading `-`, leading `N.`, then every `*`. Each leading marker
/// is removed only when followed by whitespace or the end of the line. This
/// is the only place cleaned text is derived.
pub fn clean_text(line: &str) -> String {
    let mut rest = line.trim();

    if let Some(level) = heading_level(rest) {
        rest = strip_marker(rest, level).unwrap_or(rest);
    }
    if rest.starts_with('-') {
        rest = strip_marker(rest, 1).unwrap_or(rest);
    }
    if let Some(len) = numbered_prefix_len(rest) {
        rest = strip_marker(rest, len).unwrap_or(rest);
    }

    rest.replace('*', "").trim().to_string()
}

/// Number of leading `#` when they form a heading marker.
fn heading_level(text: &str) -> Option<usize> {
    let hashes = text.bytes().take_while(|&b| b == b'#').count();
    if hashes > 0 && strip_marker(text, hashes).is_some() {
        Some(hashes)
    } else {
        None
    }
}

/// Byte length of a leading `\d+\.` marker, if it is followed by whitespace
/// or the end of the line.
fn numbered_prefix_len(text: &str) -> Option<usize> {
    let digits = text.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0 && text.as_bytes().get(digits) == Some(&b'.') {
        strip_marker(text, digits + 1).map(|_| digits + 1)
    } else {
        None
    }
}

/// Text after a `len`-byte marker, provided whitespace or nothing follows it.
fn strip_marker(text: &str, len: usize) -> Option<&str> {
    let rest = text.get(len..)?;
    match rest.chars().next() {
        None => Some(rest),
        Some(ch) if ch.is_whitespace() => Some(rest.trim_start()),
        Some(_) => None,
    }
}
