//! LSP type conversion utilities.

use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, Position, Range};

use lilylint_core::{Point, Range as LintRange, ResolvedDiagnostic, Severity};

/// Converts a resolved diagnostic to an LSP diagnostic.
pub fn to_lsp_diagnostic(diag: &ResolvedDiagnostic) -> Diagnostic {
    let severity = match diag.severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
    };

    Diagnostic {
        range: to_lsp_range(&diag.location.position),
        severity: Some(severity),
        source: Some("lilylint".to_string()),
        message: diag.excerpt.clone(),
        ..Default::default()
    }
}

pub fn to_lsp_range(range: &LintRange) -> Range {
    Range::new(to_lsp_position(&range.start), to_lsp_position(&range.end))
}

fn to_lsp_position(point: &Point) -> Position {
    Position::new(point.line as u32, point.column as u32)
}
