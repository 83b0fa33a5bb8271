//! # cw-report
//!
//! Report rendering for Compliance Warden.
//!
//! Turns a [`ComplianceResults`] mapping into Markdown, HTML, and JSON
//! renderings, and writes them to caller-supplied paths. The JSON rendering
//! is the structural artifact: parsing it back reproduces the exact results
//! mapping. Render functions are pure; only [`write_report`] touches the
//! filesystem, writing exactly one file per call.

pub mod html;
pub mod markdown;
pub mod view;

pub use html::render_html;
pub use markdown::render_markdown;
pub use view::{ReportView, SectionBody, SectionView, Subsection, SubsectionBody};

use cw_core::ComplianceResults;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while rendering or writing reports.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to render HTML template: {0}")]
    Template(#[from] askama::Error),

    #[error("Failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Renders the results mapping as pretty-printed JSON.
///
/// The output is structurally identical to the in-memory mapping; parsing it
/// back yields an equal [`ComplianceResults`].
pub fn render_json(results: &ComplianceResults) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(results)?)
}

/// Writes rendered report contents to a path, creating parent directories.
pub fn write_report(path: &Path, contents: &str) -> Result<(), ReportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cw_core::{AuditIssue, CheckResult, PiiFindings};
    use tempfile::TempDir;

    fn sample_results() -> ComplianceResults {
        let mut results = ComplianceResults::new();
        results.insert(CheckResult::ModelAudit(vec![AuditIssue::Drift]));
        results.insert(CheckResult::PiiScan(PiiFindings {
            email: vec!["test@example.com".to_string()],
            ..Default::default()
        }));
        results
    }

    #[test]
    fn test_json_round_trip() {
        let results = sample_results();
        let json = render_json(&results).unwrap();
        let back: ComplianceResults = serde_json::from_str(&json).unwrap();

        assert_eq!(back, results);
    }

    #[test]
    fn test_write_report_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/results/report.md");

        write_report(&path, "# Compliance Report").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "# Compliance Report");
    }

    #[test]
    fn test_write_report_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.json");

        write_report(&path, "{}").unwrap();
        write_report(&path, "{\"a\": 1}").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_json_of_empty_results() {
        let json = render_json(&ComplianceResults::new()).unwrap();
        assert_eq!(json, "{}");
    }
}
