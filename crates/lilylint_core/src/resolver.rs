//! Location resolver.
//!
//! Maps a raw [`DiagnosticRecord`] to an absolute file path and a 0-based
//! range, using the linted buffer and the open-document store for
//! word-boundary expansion.

use std::path::{Path, PathBuf};

use crate::diagnostic::{DiagnosticRecord, Location, Point, Range, ResolvedDiagnostic};
use crate::documents::{Document, DocumentStore, TextDocument};
use crate::scanner::STDIN_PATH;

/// Context for resolving the records of one lint pass.
pub struct ResolveContext<'a> {
    /// Absolute path of the linted buffer.
    buffer_path: &'a Path,
    /// The linted buffer's own content; always available for word lookup.
    buffer: &'a TextDocument,
    /// Lookup for other files currently open in the editor.
    store: &'a dyn DocumentStore,
}

impl<'a> ResolveContext<'a> {
    pub fn new(
        buffer_path: &'a Path,
        buffer: &'a TextDocument,
        store: &'a dyn DocumentStore,
    ) -> Self {
        Self {
            buffer_path,
            buffer,
            store,
        }
    }

    /// Resolves one record.
    ///
    /// - `-` targets the linted buffer itself; other paths resolve against
    ///   the buffer's directory.
    /// - A reported column expands to the enclosing word span when the
    ///   target document is open, and degrades to a zero-width point at the
    ///   reported position otherwise.
    /// - Without a column the range is a zero-width point at column 0.
    pub fn resolve(&self, record: &DiagnosticRecord<'_>) -> ResolvedDiagnostic {
        let line = (record.line as usize).saturating_sub(1);
        let column = record.column.map(|c| (c as usize).saturating_sub(1));

        let (file, document): (PathBuf, Option<&dyn Document>) =
            if record.raw_path == STDIN_PATH {
                (self.buffer_path.to_path_buf(), Some(self.buffer))
            } else {
                let raw = Path::new(record.raw_path);
                let file = if raw.is_absolute() {
                    raw.to_path_buf()
                } else {
                    self.buffer_dir().join(raw)
                };
                let document = self.store.find_open_document(&file);
                (file, document)
            };

        let position = match (column, document) {
            (Some(column), Some(document)) => document
                .word_range_at(line, column)
                .unwrap_or_else(|| Range::point(Point::new(line, column))),
            (Some(column), None) => Range::point(Point::new(line, column)),
            (None, _) => Range::point(Point::new(line, 0)),
        };

        ResolvedDiagnostic {
            severity: record.severity,
            location: Location { file, position },
            excerpt: record.text.to_string(),
        }
    }

    fn buffer_dir(&self) -> &Path {
        self.buffer_path.parent().unwrap_or(Path::new(""))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::diagnostic::Severity;

    struct FakeStore(HashMap<PathBuf, TextDocument>);

    impl FakeStore {
        fn empty() -> Self {
            Self(HashMap::new())
        }

        fn with(path: &str, text: &str) -> Self {
            let mut docs = HashMap::new();
            docs.insert(PathBuf::from(path), TextDocument::new(text));
            Self(docs)
        }
    }

    impl DocumentStore for FakeStore {
        fn find_open_document(&self, path: &Path) -> Option<&dyn Document> {
            self.0.get(path).map(|d| d as &dyn Document)
        }
    }

    fn record<'a>(
        raw_path: &'a str,
        line: u32,
        column: Option<u32>,
        text: &'a str,
    ) -> DiagnosticRecord<'a> {
        DiagnosticRecord {
            raw_path,
            line,
            column,
            severity: Severity::Error,
            text,
        }
    }

    #[test]
    fn test_stdin_path_targets_linted_buffer() {
        let buffer = TextDocument::new("{ c' }");
        let store = FakeStore::empty();
        let ctx = ResolveContext::new(Path::new("/tmp/test.ly"), &buffer, &store);

        let resolved = ctx.resolve(&record("-", 1, None, "msg"));
        assert_eq!(resolved.location.file, PathBuf::from("/tmp/test.ly"));
    }

    #[test]
    fn test_coordinate_translation_is_one_based_to_zero_based() {
        let buffer = TextDocument::new("line one\nline two\n{ xyz }");
        let store = FakeStore::empty();
        let ctx = ResolveContext::new(Path::new("/tmp/test.ly"), &buffer, &store);

        let resolved = ctx.resolve(&record("-", 3, Some(3), "msg"));
        assert_eq!(resolved.location.position.start.line, 2);
        assert_eq!(resolved.location.position.start.column, 2);
    }

    #[test]
    fn test_column_on_buffer_expands_to_word() {
        let buffer = TextDocument::new("{ error }");
        let store = FakeStore::empty();
        let ctx = ResolveContext::new(Path::new("/tmp/test.ly"), &buffer, &store);

        let resolved = ctx.resolve(&record("-", 1, Some(3), "not a note name: error"));
        assert_eq!(
            resolved.location.position,
            Range::new(Point::new(0, 2), Point::new(0, 7))
        );
    }

    #[test]
    fn test_column_on_whitespace_falls_back_to_point() {
        let buffer = TextDocument::new("{ error }");
        let store = FakeStore::empty();
        let ctx = ResolveContext::new(Path::new("/tmp/test.ly"), &buffer, &store);

        let resolved = ctx.resolve(&record("-", 1, Some(2), "msg"));
        assert_eq!(resolved.location.position, Range::point(Point::new(0, 1)));
    }

    #[test]
    fn test_relative_path_resolves_against_buffer_directory() {
        let buffer = TextDocument::new("\\include \"include.ly\"");
        let store = FakeStore::empty();
        let ctx = ResolveContext::new(Path::new("/tmp/test.ly"), &buffer, &store);

        let resolved = ctx.resolve(&record("include.ly", 1, Some(3), "msg"));
        assert_eq!(resolved.location.file, PathBuf::from("/tmp/include.ly"));
        // Not open, so the reported position stays a zero-width point.
        assert_eq!(resolved.location.position, Range::point(Point::new(0, 2)));
    }

    #[test]
    fn test_absolute_path_used_as_is() {
        let buffer = TextDocument::new("");
        let store = FakeStore::empty();
        let ctx = ResolveContext::new(Path::new("/tmp/test.ly"), &buffer, &store);

        let resolved = ctx.resolve(&record("/usr/share/lilypond/init.ly", 9, None, "msg"));
        assert_eq!(
            resolved.location.file,
            PathBuf::from("/usr/share/lilypond/init.ly")
        );
    }

    #[test]
    fn test_open_included_file_expands_to_word() {
        let buffer = TextDocument::new("\\include \"include.ly\"");
        let store = FakeStore::with("/tmp/include.ly", "{ foo }");
        let ctx = ResolveContext::new(Path::new("/tmp/test.ly"), &buffer, &store);

        let resolved = ctx.resolve(&record("include.ly", 1, Some(3), "msg"));
        assert_eq!(
            resolved.location.position,
            Range::new(Point::new(0, 2), Point::new(0, 5))
        );
    }

    #[test]
    fn test_no_column_yields_zero_width_point_at_column_zero() {
        let buffer = TextDocument::new("{ c' }");
        let store = FakeStore::empty();
        let ctx = ResolveContext::new(Path::new("/tmp/test.ly"), &buffer, &store);

        let resolved = ctx.resolve(&record("include.ly", 5, None, "msg"));
        assert_eq!(resolved.location.position, Range::point(Point::new(4, 0)));
    }

    #[test]
    fn test_excerpt_and_severity_copied_through() {
        let buffer = TextDocument::new("");
        let store = FakeStore::empty();
        let ctx = ResolveContext::new(Path::new("/tmp/test.ly"), &buffer, &store);

        let mut rec = record("-", 1, None, "barcheck failed");
        rec.severity = Severity::Warning;
        let resolved = ctx.resolve(&rec);
        assert_eq!(resolved.severity, Severity::Warning);
        assert_eq!(resolved.excerpt, "barcheck failed");
    }
}
