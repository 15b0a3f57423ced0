//! CLI presentation: run report formatting.

use crate::engine::RunReport;
use crate::error::StubgenError;

/// One-line human summary of a run
pub fn format_report_text(report: &RunReport) -> String {
    let summary = &report.summary;
    let mut text = format!(
        "Generated stubs for '{}': {} files discovered, {} invocations, {} skipped",
        report.resolution.name, summary.discovered, summary.invoked, summary.skipped
    );
    if summary.failed_ignored > 0 {
        text.push_str(&format!(", {} failed (ignored)", summary.failed_ignored));
    }
    if !report.pruned.is_empty() {
        text.push_str(&format!(", {} empty directories removed", report.pruned.len()));
    }
    if let Some(ref target) = report.relocated_to {
        text.push_str(&format!(", written to {}", target.display()));
    }
    text
}

pub fn format_report_json(report: &RunReport) -> Result<String, StubgenError> {
    serde_json::to_string_pretty(report)
        .map_err(|e| StubgenError::ConfigError(format!("Failed to serialize report: {}", e)))
}
