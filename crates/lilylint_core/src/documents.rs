//! Open-document lookup for word-boundary expansion.
//!
//! The resolver never talks to a global editor registry; it is handed a
//! [`DocumentStore`] capability and asks it for open documents by absolute
//! path. This keeps the engine testable against fake document sets.

use std::path::Path;

use unicode_segmentation::UnicodeSegmentation;

use crate::diagnostic::{Point, Range};

/// A text document the resolver can expand positions against.
pub trait Document {
    /// Returns the content of a 0-based line, without its terminator.
    fn line(&self, line: usize) -> Option<&str>;

    /// Returns the span of the word containing the 0-based character
    /// `column` on `line`, or `None` when the position is out of range or
    /// does not fall inside a word.
    ///
    /// Word boundaries follow UAX #29; columns count characters.
    fn word_range_at(&self, line: usize, column: usize) -> Option<Range> {
        let text = self.line(line)?;
        let mut start = 0;
        for (_, word) in text.split_word_bound_indices() {
            let end = start + word.chars().count();
            if column < end {
                if word.chars().any(|c| c.is_alphanumeric()) {
                    return Some(Range::new(Point::new(line, start), Point::new(line, end)));
                }
                // Whitespace or punctuation under the caret.
                return None;
            }
            start = end;
        }
        None
    }
}

/// Lookup from absolute path to currently open document.
pub trait DocumentStore: Sync {
    fn find_open_document(&self, path: &Path) -> Option<&dyn Document>;
}

/// A store with no open documents, for contexts without an editor session.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpenDocuments;

impl DocumentStore for NoOpenDocuments {
    fn find_open_document(&self, _path: &Path) -> Option<&dyn Document> {
        None
    }
}

/// An in-memory document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDocument {
    text: String,
}

impl TextDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Document for TextDocument {
    fn line(&self, line: usize) -> Option<&str> {
        self.text.lines().nth(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_access() {
        let doc = TextDocument::new("first\nsecond\nthird");
        assert_eq!(doc.line(0), Some("first"));
        assert_eq!(doc.line(2), Some("third"));
        assert_eq!(doc.line(3), None);
    }

    #[test]
    fn test_word_range_inside_word() {
        let doc = TextDocument::new("{ error }");
        // Columns 2..7 cover "error"; any column inside maps to the word.
        for column in 2..7 {
            assert_eq!(
                doc.word_range_at(0, column),
                Some(Range::new(Point::new(0, 2), Point::new(0, 7)))
            );
        }
    }

    #[test]
    fn test_word_range_on_whitespace() {
        let doc = TextDocument::new("{ error }");
        assert_eq!(doc.word_range_at(0, 1), None);
    }

    #[test]
    fn test_word_range_on_punctuation() {
        let doc = TextDocument::new("{ error }");
        assert_eq!(doc.word_range_at(0, 0), None);
        assert_eq!(doc.word_range_at(0, 8), None);
    }

    #[test]
    fn test_word_range_past_end_of_line() {
        let doc = TextDocument::new("abc");
        assert_eq!(doc.word_range_at(0, 10), None);
        assert_eq!(doc.word_range_at(5, 0), None);
    }

    #[test]
    fn test_word_range_counts_characters_not_bytes() {
        // Multi-byte text before the word must not skew the columns.
        let doc = TextDocument::new("äöü note");
        assert_eq!(
            doc.word_range_at(0, 5),
            Some(Range::new(Point::new(0, 4), Point::new(0, 8)))
        );
    }

    #[test]
    fn test_word_range_on_later_line() {
        let doc = TextDocument::new("\\version \"2.20.0\"\n{ c' e' g' }");
        assert_eq!(
            doc.word_range_at(1, 2),
            Some(Range::new(Point::new(1, 2), Point::new(1, 3)))
        );
    }

    #[test]
    fn test_no_open_documents_store() {
        let store = NoOpenDocuments;
        assert!(store.find_open_document(Path::new("/tmp/a.ly")).is_none());
    }
}
