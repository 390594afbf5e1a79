//! JSON output formatter

use miette::{IntoDiagnostic, Result};

use lilylint_core::LintOutcome;

use super::FileReport;

pub fn output_json(reports: &[FileReport]) -> Result<()> {
    let output: Vec<_> = reports
        .iter()
        .map(|report| {
            let status = match &report.outcome {
                LintOutcome::NotChecked => "not-checked",
                LintOutcome::Clean => "clean",
                LintOutcome::Findings(_) => "findings",
            };
            serde_json::json!({
                "path": report.path.display().to_string(),
                "status": status,
                "diagnostics": report.outcome.diagnostics(),
            })
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
    Ok(())
}
