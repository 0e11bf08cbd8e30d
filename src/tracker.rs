/// Maps backend character offsets to word indices within one block.
///
/// Offsets are counted in characters (Unicode scalar values) of the block's
/// cleaned text. A tracker is built when a block starts speaking and thrown
/// away when the next one starts.
#[derive(Debug, Clone)]
pub struct WordBoundaryTracker {
    words: Vec<String>,
    /// Character offset at which each word starts.
    starts: Vec<usize>,
}

impl WordBoundaryTracker {
    /// Tokenize `text` on whitespace and record where each word starts.
    pub fn new(text: &str) -> Self {
        let mut words = Vec::new();
        let mut starts = Vec::new();
        let mut current = String::new();
        let mut current_start = 0;

        for (offset, ch) in text.chars().enumerate() {
            if ch.is_whitespace() {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                    starts.push(current_start);
                }
                continue;
            }
            if current.is_empty() {
                current_start = offset;
            }
            current.push(ch);
        }
        if !current.is_empty() {
            words.push(current);
            starts.push(current_start);
        }

        Self { words, starts }
    }

    /// Number of words in the tracked text.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// The words, in the order their indices refer to.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Largest word index whose start offset is `<= char_offset`.
    ///
    /// Offsets past the end clamp to the last word; offsets inside the gap
    /// between two words resolve to the earlier one. Returns `None` only for
    /// text without words.
    pub fn resolve(&self, char_offset: usize) -> Option<usize> {
        if self.starts.is_empty() {
            return None;
        }
        let after = self.starts.partition_point(|&start| start <= char_offset);
        Some(after.saturating_sub(1))
    }
}
