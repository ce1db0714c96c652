//! Line/column to character offset conversion.
//!
//! Structural metadata can lag behind the text it describes, so every
//! conversion here tolerates positions past the end of the document.

use crate::types::Loc;
use std::ops::Range;

/// Character offsets of each line start in a text.
///
/// Lines are split on `\n`; a `\r` before it stays part of the line.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
    char_len: usize,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        let mut char_len = 0;
        for c in text.chars() {
            char_len += 1;
            if c == '\n' {
                line_starts.push(char_len);
            }
        }
        Self {
            text,
            line_starts,
            char_len,
        }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Total length in characters; this is the end-of-document offset.
    pub fn len(&self) -> usize {
        self.char_len
    }

    pub fn is_empty(&self) -> bool {
        self.char_len == 0
    }

    /// Absolute character offset of `loc`.
    ///
    /// Equals the sum of the lengths of all lines before `loc.line`, each
    /// plus one for its terminator, plus `loc.col`. Lines that do not exist
    /// count as empty.
    pub fn offset(&self, loc: Loc) -> usize {
        let known = self.line_count();
        let before = if loc.line < known {
            self.line_starts[loc.line]
        } else {
            // every real line plus its terminator, then one per missing line
            self.char_len
                .saturating_add(1)
                .saturating_add(loc.line - known)
        };
        before.saturating_add(loc.col)
    }

    /// The text between two character offsets, clamped to the document.
    pub fn slice(&self, range: Range<usize>) -> &'a str {
        let end = range.end.min(self.char_len);
        let start = range.start.min(end);
        &self.text[self.byte_offset(start)..self.byte_offset(end)]
    }

    fn byte_offset(&self, char_offset: usize) -> usize {
        if self.text.len() == self.char_len {
            return char_offset;
        }
        self.text
            .char_indices()
            .nth(char_offset)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_first_line() {
        let idx = LineIndex::new("abc\ndef");
        assert_eq!(idx.offset(Loc::new(0, 0)), 0);
        assert_eq!(idx.offset(Loc::new(0, 2)), 2);
    }

    #[test]
    fn test_offset_counts_terminators() {
        let idx = LineIndex::new("abc\nde\nfghi");
        assert_eq!(idx.offset(Loc::new(1, 0)), 4);
        assert_eq!(idx.offset(Loc::new(2, 1)), 8);
        assert_eq!(idx.len(), 11);
    }

    #[test]
    fn test_offset_past_last_line() {
        // "ab\ncd" -> lines of length 2 and 2; line 3 adds (2+1)+(2+1)+(0+1)
        let idx = LineIndex::new("ab\ncd");
        assert_eq!(idx.offset(Loc::new(2, 0)), 6);
        assert_eq!(idx.offset(Loc::new(3, 4)), 11);
    }

    #[test]
    fn test_offset_huge_line_does_not_overflow() {
        let idx = LineIndex::new("ab");
        assert_eq!(idx.offset(Loc::new(usize::MAX, usize::MAX)), usize::MAX);
    }

    #[test]
    fn test_slice_clamps() {
        let idx = LineIndex::new("hello");
        assert_eq!(idx.slice(1..3), "el");
        assert_eq!(idx.slice(3..100), "lo");
        assert_eq!(idx.slice(100..200), "");
        assert_eq!(idx.slice(4..2), "");
    }

    #[test]
    fn test_slice_counts_characters() {
        let idx = LineIndex::new("é\nüber");
        assert_eq!(idx.len(), 6);
        assert_eq!(idx.offset(Loc::new(1, 1)), 3);
        assert_eq!(idx.slice(2..6), "über");
        assert_eq!(idx.slice(3..4), "b");
    }

    #[test]
    fn test_offset_end_of_last_line() {
        assert_eq!(LineIndex::new("a\nb").offset(Loc::new(1, 1)), 3);
    }

    #[test]
    fn test_empty_text() {
        let idx = LineIndex::new("");
        assert!(idx.is_empty());
        assert_eq!(idx.line_count(), 1);
        assert_eq!(idx.offset(Loc::new(0, 0)), 0);
        assert_eq!(idx.slice(0..10), "");
    }
}
