//! Output formatters for lint reports.

use std::path::PathBuf;

use lilylint_core::{LintOutcome, Severity};

pub mod json;
pub mod text;

/// One checked file and its outcome.
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: LintOutcome,
}

impl FileReport {
    /// True if any diagnostic has error severity.
    pub fn has_errors(&self) -> bool {
        self.outcome
            .diagnostics()
            .iter()
            .any(|d| d.severity == Severity::Error)
    }
}
