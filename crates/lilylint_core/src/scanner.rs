//! Message scanner for compiler stderr.
//!
//! LilyPond reports problems as lines of the shape
//!
//! ```text
//! <path>:<line>:[<column>:] <error|warning>: <message>
//! ```
//!
//! where `<path>` is `-` when the input came from stdin. Everything else on
//! stderr (banners, multi-line continuations, progress chatter) is noise
//! and is skipped.

use std::sync::OnceLock;

use regex::Regex;

use crate::diagnostic::{DiagnosticRecord, Severity};

/// The path LilyPond emits for input it read from standard input.
pub const STDIN_PATH: &str = "-";

static MESSAGE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn message_pattern() -> &'static Regex {
    MESSAGE_PATTERN.get_or_init(|| {
        // Anchored at line starts; the column group is optional.
        Regex::new(r"(?m)^([^:\r\n]+):(\d+):(?:(\d+):)? (error|warning): ([^\r\n]+)")
            .expect("invalid diagnostic message pattern")
    })
}

/// Scans captured stderr text for diagnostic messages, in order.
///
/// Each call produces a fresh iterator over the input; no match state is
/// retained between calls, so scanning the same text twice yields the same
/// records.
pub fn scan(stderr: &str) -> impl Iterator<Item = DiagnosticRecord<'_>> {
    message_pattern().captures_iter(stderr).filter_map(|caps| {
        let severity = match caps.get(4).map(|m| m.as_str()) {
            Some("error") => Severity::Error,
            Some("warning") => Severity::Warning,
            _ => return None,
        };

        Some(DiagnosticRecord {
            raw_path: caps.get(1)?.as_str(),
            line: caps.get(2)?.as_str().parse().ok()?,
            column: caps.get(3).and_then(|m| m.as_str().parse().ok()),
            severity,
            text: caps.get(5)?.as_str(),
        })
    })
}
