//! Diagnostic types produced by the extraction engine.

use std::path::PathBuf;

use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};

/// Severity level of a compiler message.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Error - must be fixed.
    #[default]
    Error,
    /// Warning - should be reviewed.
    Warning,
}

/// A 0-based (line, column) position.
///
/// Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub line: usize,
    pub column: usize,
}

impl Point {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

// Serialized as `[line, column]` to match the editor-facing record shape.
impl Serialize for Point {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(2))?;
        seq.serialize_element(&self.line)?;
        seq.serialize_element(&self.column)?;
        seq.end()
    }
}

/// A `[start, end]` pair of points, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Range {
    pub start: Point,
    pub end: Point,
}

impl Range {
    pub fn new(start: Point, end: Point) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// A zero-width range (a caret rather than a highlighted span).
    pub fn point(at: Point) -> Self {
        Self { start: at, end: at }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl Serialize for Range {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(2))?;
        seq.serialize_element(&self.start)?;
        seq.serialize_element(&self.end)?;
        seq.end()
    }
}

/// One raw diagnostic carved out of the compiler's stderr text.
///
/// Coordinates are exactly as reported: 1-based, with the column optional.
/// Records borrow from the scanned stderr text and live only for the
/// duration of one lint pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticRecord<'a> {
    /// Path exactly as emitted: either [`crate::STDIN_PATH`] or a
    /// filesystem path, absolute or relative to the linted file's directory.
    pub raw_path: &'a str,
    /// 1-based line number.
    pub line: u32,
    /// Optional 1-based column number.
    pub column: Option<u32>,
    pub severity: Severity,
    /// Message text up to the end of the line, not parsed further.
    pub text: &'a str,
}

/// Where a resolved diagnostic points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    /// Absolute path of the file the message refers to.
    pub file: PathBuf,
    /// 0-based `[start, end]` range inside that file.
    pub position: Range,
}

/// A fully resolved diagnostic, ready for an editor or formatter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedDiagnostic {
    pub severity: Severity,
    pub location: Location,
    /// The compiler's message text.
    pub excerpt: String,
}
