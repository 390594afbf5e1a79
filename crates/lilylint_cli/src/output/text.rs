//! Text output formatter

use lilylint_core::Severity;

use super::FileReport;

pub fn output_text(reports: &[FileReport]) {
    for report in reports {
        let diagnostics = report.outcome.diagnostics();
        if diagnostics.is_empty() {
            continue;
        }

        println!("\n{}:", report.path.display());
        for diag in diagnostics {
            let severity = match diag.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
            };
            // Positions are stored zero-based, shown one-based.
            let start = diag.location.position.start;
            println!(
                "  {}:{} {}: {}",
                start.line + 1,
                start.column + 1,
                severity,
                diag.excerpt
            );
        }
    }

    let total_files = reports.len();
    let total_issues: usize = reports
        .iter()
        .map(|r| r.outcome.diagnostics().len())
        .sum();

    println!();
    println!("Checked {} files, found {} issues", total_files, total_issues);
}
