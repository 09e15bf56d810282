//! Document text assembled from slide payloads.
//!
//! Run-text from every slide is concatenated into one buffer, normalized to
//! Unicode NFC, and split into words on runs of whitespace. Word indices are
//! the unit of playback position and highlighting.

use unicode_normalization::UnicodeNormalization;

/// The ordered words of a loaded deck.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    words: Vec<String>,
}

impl Document {
    /// Build a document from already-assembled text.
    pub fn from_text(text: &str) -> Self {
        let normalized: String = text.nfc().collect();
        let words = normalized.split_whitespace().map(str::to_string).collect();
        Self { words }
    }

    /// Build a document from per-slide text fragments, in the order given.
    pub fn from_fragments<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut text = String::new();
        for fragment in fragments {
            text.push_str(fragment.as_ref());
        }
        Self::from_text(&text)
    }

    /// All words in order.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Number of words.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// The word at `index`, if any.
    pub fn word(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(String::as_str)
    }

    /// Text of an utterance starting at word `start`, joined by single spaces.
    ///
    /// Returns an empty string when `start` is at or past the last word.
    pub fn utterance_text(&self, start: usize) -> String {
        self.words
            .get(start..)
            .map(|rest| rest.join(" "))
            .unwrap_or_default()
    }

    /// Map a character offset inside an utterance starting at `start` back
    /// to a document word index.
    ///
    /// Walks the utterance's words accumulating `len + 1` per word (the
    /// joining space) until the running total reaches `char_index`. Lengths
    /// are counted in `char`s. Returns `None` when the offset lies past the
    /// final word.
    pub fn word_at_offset(&self, start: usize, char_index: usize) -> Option<usize> {
        let mut position = 0;
        for (index, word) in self.words.iter().enumerate().skip(start) {
            if position >= char_index {
                return Some(index);
            }
            position += word.chars().count() + 1;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_on_whitespace_runs() {
        let doc = Document::from_text("  Hello \t world\n\nfrom   slides ");
        assert_eq!(doc.words(), ["Hello", "world", "from", "slides"]);
        assert_eq!(doc.word_count(), 4);
    }

    #[test]
    fn test_empty_text() {
        let doc = Document::from_text("   \n ");
        assert!(doc.is_empty());
        assert_eq!(doc.utterance_text(0), "");
    }

    #[test]
    fn test_fragments_keep_order() {
        let doc = Document::from_fragments(["Title Slide ", "Second ", "slide body "]);
        assert_eq!(doc.words(), ["Title", "Slide", "Second", "slide", "body"]);
    }

    #[test]
    fn test_nfc_normalization() {
        // "e" followed by a combining acute accent composes to a single char
        let doc = Document::from_text("cafe\u{301}");
        assert_eq!(doc.word(0), Some("caf\u{e9}"));
    }

    #[test]
    fn test_utterance_text() {
        let doc = Document::from_text("Hello world from slides");
        assert_eq!(doc.utterance_text(0), "Hello world from slides");
        assert_eq!(doc.utterance_text(2), "from slides");
        assert_eq!(doc.utterance_text(4), "");
        assert_eq!(doc.utterance_text(9), "");
    }

    #[test]
    fn test_word_at_offset_from_start() {
        let doc = Document::from_text("Hello world from slides");
        assert_eq!(doc.word_at_offset(0, 0), Some(0));
        assert_eq!(doc.word_at_offset(0, 6), Some(1));
        assert_eq!(doc.word_at_offset(0, 12), Some(2));
        assert_eq!(doc.word_at_offset(0, 17), Some(3));
    }

    #[test]
    fn test_word_at_offset_inside_word_rounds_up() {
        let doc = Document::from_text("Hello world from slides");
        // Offset 3 lies inside "Hello"; the first boundary at or past it is "world"
        assert_eq!(doc.word_at_offset(0, 3), Some(1));
    }

    #[test]
    fn test_word_at_offset_relative_to_utterance_start() {
        let doc = Document::from_text("Hello world from slides");
        // Utterance "from slides" starts at word 2
        assert_eq!(doc.word_at_offset(2, 0), Some(2));
        assert_eq!(doc.word_at_offset(2, 5), Some(3));
        assert_eq!(doc.word_at_offset(2, 40), None);
    }

    #[test]
    fn test_word_at_offset_counts_chars() {
        let doc = Document::from_text("über alles");
        assert_eq!(doc.word_at_offset(0, 5), Some(1));
    }
}
