//! Lint pass orchestration.

use std::path::Path;

use tracing::debug;

use crate::compiler::CompilerInvocation;
use crate::config::LinterConfig;
use crate::diagnostic::ResolvedDiagnostic;
use crate::documents::{DocumentStore, TextDocument};
use crate::error::LintError;
use crate::resolver::ResolveContext;
use crate::scanner::scan;

/// Outcome of one lint pass.
///
/// The three variants stay distinguishable for callers: a buffer that was
/// never handed to the compiler, a compiler that had nothing to say, and a
/// compiler that produced stderr (with however many diagnostic lines it
/// contained, possibly zero).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LintOutcome {
    /// The buffer has no path; nothing was checked.
    NotChecked,
    /// The compiler produced no stderr at all.
    Clean,
    /// The compiler produced stderr; one entry per matched message.
    Findings(Vec<ResolvedDiagnostic>),
}

impl LintOutcome {
    /// The resolved diagnostics, empty for `NotChecked` and `Clean`.
    pub fn diagnostics(&self) -> &[ResolvedDiagnostic] {
        match self {
            LintOutcome::Findings(diagnostics) => diagnostics,
            _ => &[],
        }
    }
}

/// Extracts and resolves every diagnostic message in `stderr`, in order.
///
/// Pure and reentrant: no I/O, no shared state, one output entry per
/// matched message.
pub fn extract_diagnostics(stderr: &str, ctx: &ResolveContext<'_>) -> Vec<ResolvedDiagnostic> {
    scan(stderr).map(|record| ctx.resolve(&record)).collect()
}

/// Runs lint passes with a fixed configuration.
#[derive(Debug, Clone)]
pub struct Linter {
    config: LinterConfig,
}

impl Linter {
    pub fn new(config: LinterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LinterConfig {
        &self.config
    }

    /// Checks one buffer.
    ///
    /// `path` is the buffer's absolute path, or `None` for an unsaved
    /// scratch buffer (which is never handed to the compiler). `store`
    /// answers which other files are currently open, for word-boundary
    /// expansion of diagnostics in included files.
    pub async fn check(
        &self,
        path: Option<&Path>,
        text: &str,
        store: &dyn DocumentStore,
    ) -> Result<LintOutcome, LintError> {
        let Some(path) = path else {
            debug!("buffer has no path, skipping");
            return Ok(LintOutcome::NotChecked);
        };

        let stderr = CompilerInvocation::new(&self.config, path).run(text).await?;
        if stderr.is_empty() {
            return Ok(LintOutcome::Clean);
        }

        let buffer = TextDocument::new(text);
        let ctx = ResolveContext::new(path, &buffer, store);
        let diagnostics = extract_diagnostics(&stderr, &ctx);
        debug!(count = diagnostics.len(), "extracted diagnostics");
        Ok(LintOutcome::Findings(diagnostics))
    }
}
