//! Check orchestration for the Compliance Warden CLI.
//!
//! Runs the four checks strictly sequentially over constructor-injected
//! collaborators and assembles the per-run results mapping. Each check is
//! isolated: a failure is logged and excluded from the mapping while the
//! remaining checks still run and still produce a report.

use anyhow::Result;
use chrono::Utc;
use cw_connectors::{
    clean_markdown, ConnectorResult, ReportPublisher, ResourceProvider, Summarizer,
};
use cw_core::{
    audit_model, check_required_tags, default_required_tags, generate_summary_report,
    scan_resources, AuditIssue, AuditThresholds, CheckKind, CheckResult, ComplianceResults,
    InfraReport, ModelMetadata, PiiError, PiiFindings, PiiScanner, TagViolation,
};
use cw_observability::check_span;
use cw_report::{render_html, render_json, render_markdown, write_report, ReportView};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Drives the compliance checks and report generation for one run.
pub struct Orchestrator {
    provider: Box<dyn ResourceProvider>,
    summarizer: Option<Box<dyn Summarizer>>,
    publisher: Option<Box<dyn ReportPublisher>>,
    required_tags: Vec<String>,
    thresholds: AuditThresholds,
    model_metadata: ModelMetadata,
    pii_log_path: PathBuf,
    pii_scanner: PiiScanner,
}

/// Paths written by [`Orchestrator::save_reports`], plus the publish URL if
/// the upload happened.
#[derive(Debug)]
pub struct SavedReports {
    pub json_path: PathBuf,
    pub markdown_path: PathBuf,
    pub html_path: PathBuf,
    pub published_url: Option<String>,
}

impl Orchestrator {
    /// Creates an orchestrator over the given resource provider with default
    /// settings; collaborators and overrides attach via the `with_` methods.
    pub fn new(provider: Box<dyn ResourceProvider>) -> Self {
        Self {
            provider,
            summarizer: None,
            publisher: None,
            required_tags: default_required_tags(),
            thresholds: AuditThresholds::default(),
            model_metadata: sample_model_metadata(),
            pii_log_path: PathBuf::from("data/sample_log.txt"),
            pii_scanner: PiiScanner::new(),
        }
    }

    /// Attaches an executive summarizer.
    pub fn with_summarizer(mut self, summarizer: Box<dyn Summarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    /// Attaches a report publisher.
    pub fn with_publisher(mut self, publisher: Box<dyn ReportPublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Overrides the required-tag list.
    pub fn with_required_tags(mut self, tags: Vec<String>) -> Self {
        self.required_tags = tags;
        self
    }

    /// Overrides the model audit thresholds.
    pub fn with_thresholds(mut self, thresholds: AuditThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Sets the model metadata to audit.
    pub fn with_model_metadata(mut self, metadata: ModelMetadata) -> Self {
        self.model_metadata = metadata;
        self
    }

    /// Sets the log file the PII scan reads.
    pub fn with_pii_log_path(mut self, path: PathBuf) -> Self {
        self.pii_log_path = path;
        self
    }

    /// Runs the infrastructure compliance scan.
    pub fn run_infra_scan(&self) -> ConnectorResult<InfraReport> {
        let _span = check_span!(CheckKind::Infrastructure).entered();
        let resources = self.provider.list_resources()?;
        let issues = scan_resources(&resources);
        Ok(generate_summary_report(issues, resources.len()))
    }

    /// Runs the model governance audit.
    pub fn run_model_audit(&self) -> Vec<AuditIssue> {
        let _span = check_span!(CheckKind::ModelAudit).entered();
        audit_model(&self.model_metadata, &self.thresholds)
    }

    /// Runs the required-tag policy check.
    pub fn run_tag_policy(&self) -> ConnectorResult<Vec<TagViolation>> {
        let _span = check_span!(CheckKind::TagPolicy).entered();
        let resources = self.provider.list_resources()?;
        Ok(check_required_tags(&resources, &self.required_tags))
    }

    /// Runs the PII scan over the configured log file.
    pub fn run_pii_scan(&self) -> Result<PiiFindings, PiiError> {
        self.run_pii_scan_at(&self.pii_log_path)
    }

    /// Runs the PII scan over an explicit file.
    pub fn run_pii_scan_at(&self, path: &Path) -> Result<PiiFindings, PiiError> {
        let _span = check_span!(CheckKind::PiiScan).entered();
        self.pii_scanner.scan_file(path)
    }

    /// Runs every check sequentially and collects results.
    ///
    /// A failing check is logged and left out of the mapping; the other
    /// checks still run. The model audit is a pure function of its inputs
    /// and cannot fail.
    pub fn run_all(&self) -> ComplianceResults {
        let mut results = ComplianceResults::new();

        info!("running infrastructure scan");
        match self.run_infra_scan() {
            Ok(report) => results.insert(CheckResult::Infrastructure(report)),
            Err(e) => warn!(error = %e, "infrastructure scan failed; continuing"),
        }

        info!("running model governance audit");
        results.insert(CheckResult::ModelAudit(self.run_model_audit()));

        info!("running tag policy check");
        match self.run_tag_policy() {
            Ok(violations) => results.insert(CheckResult::TagPolicy(violations)),
            Err(e) => warn!(error = %e, "tag policy check failed; continuing"),
        }

        info!("running PII scan");
        match self.run_pii_scan() {
            Ok(findings) => results.insert(CheckResult::PiiScan(findings)),
            Err(e) => warn!(error = %e, "PII scan failed; continuing"),
        }

        results
    }

    /// Generates the executive summary, if a summarizer is attached.
    ///
    /// Summarizer failure degrades to no summary; the report is still
    /// generated without that section.
    pub fn executive_summary(&self, results: &ComplianceResults) -> Option<String> {
        let summarizer = self.summarizer.as_ref()?;
        match summarizer.summarize(results) {
            Ok(raw) => Some(clean_markdown(&raw)),
            Err(e) => {
                warn!(
                    summarizer = summarizer.name(),
                    error = %e,
                    "summary generation failed; omitting summary section"
                );
                None
            }
        }
    }

    /// Writes the JSON, Markdown, and HTML reports and publishes the HTML if
    /// a publisher is attached.
    ///
    /// Publish failure is logged and reflected as `published_url: None`; the
    /// already-written local files are unaffected.
    pub fn save_reports(
        &self,
        results: &ComplianceResults,
        output_dir: &Path,
    ) -> Result<SavedReports> {
        let generated_at = Utc::now();
        let stamp = generated_at.format("%Y%m%d_%H%M%S");

        let summary = self.executive_summary(results);
        let view = ReportView::build(results, generated_at, summary);

        let json_path = output_dir.join(format!("compliance_report_{stamp}.json"));
        write_report(&json_path, &render_json(results)?)?;
        info!(path = %json_path.display(), "JSON report saved");

        let markdown_path = output_dir.join(format!("compliance_report_{stamp}.md"));
        write_report(&markdown_path, &render_markdown(&view))?;
        info!(path = %markdown_path.display(), "Markdown report saved");

        let html = render_html(&view)?;
        let html_path = output_dir.join("index.html");
        write_report(&html_path, &html)?;
        info!(path = %html_path.display(), "HTML report saved");

        let published_url = self.publisher.as_ref().and_then(|publisher| {
            match publisher.publish(html.as_bytes()) {
                Ok(url) => Some(url),
                Err(e) => {
                    warn!(
                        publisher = publisher.name(),
                        error = %e,
                        "publish failed; local reports are unaffected"
                    );
                    None
                }
            }
        });

        Ok(SavedReports {
            json_path,
            markdown_path,
            html_path,
            published_url,
        })
    }
}

/// Built-in model metadata for demo runs without a model registry.
///
/// Deliberately non-compliant so a first run shows all three audit findings.
pub fn sample_model_metadata() -> ModelMetadata {
    ModelMetadata {
        last_trained: Some("2024-11-15T12:00:00".to_string()),
        metrics: HashMap::from([
            ("precision_group_A".to_string(), 0.90),
            ("precision_group_B".to_string(), 0.75),
        ]),
        explainability_tools: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cw_connectors::{MockPublisher, MockResourceProvider, MockSummarizer};
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn sample_orchestrator(log: &NamedTempFile) -> Orchestrator {
        Orchestrator::new(Box::new(MockResourceProvider::with_sample_data("sample")))
            .with_pii_log_path(log.path().to_path_buf())
    }

    fn pii_log() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"Email: jane.doe@company.com\nSSN: 111-22-3333")
            .unwrap();
        file
    }

    #[test]
    fn test_run_all_collects_every_check_in_order() {
        let log = pii_log();
        let orchestrator = sample_orchestrator(&log);

        let results = orchestrator.run_all();

        let kinds: Vec<CheckKind> = results.iter().map(|r| r.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                CheckKind::Infrastructure,
                CheckKind::ModelAudit,
                CheckKind::TagPolicy,
                CheckKind::PiiScan,
            ]
        );
    }

    #[test]
    fn test_failing_provider_isolates_infra_and_tag_checks() {
        let log = pii_log();
        let orchestrator =
            Orchestrator::new(Box::new(MockResourceProvider::new("sample").failing()))
                .with_pii_log_path(log.path().to_path_buf());

        let results = orchestrator.run_all();

        assert!(results.get(CheckKind::Infrastructure).is_none());
        assert!(results.get(CheckKind::TagPolicy).is_none());
        assert!(results.get(CheckKind::ModelAudit).is_some());
        assert!(results.get(CheckKind::PiiScan).is_some());
    }

    #[test]
    fn test_missing_pii_log_isolates_pii_check() {
        let orchestrator =
            Orchestrator::new(Box::new(MockResourceProvider::with_sample_data("sample")))
                .with_pii_log_path(PathBuf::from("/nonexistent/log.txt"));

        let results = orchestrator.run_all();

        assert!(results.get(CheckKind::PiiScan).is_none());
        assert!(results.get(CheckKind::Infrastructure).is_some());
    }

    #[test]
    fn test_infra_scan_over_sample_inventory() {
        let log = pii_log();
        let orchestrator = sample_orchestrator(&log);

        let report = orchestrator.run_infra_scan().unwrap();
        assert_eq!(report.summary.total, 3);
        assert_eq!(report.summary.non_compliant, 2);
    }

    #[test]
    fn test_sample_model_metadata_triggers_all_findings() {
        let log = pii_log();
        let orchestrator = sample_orchestrator(&log);

        let issues = orchestrator.run_model_audit();
        assert_eq!(
            issues,
            vec![
                AuditIssue::Drift,
                AuditIssue::Bias,
                AuditIssue::MissingExplainability
            ]
        );
    }

    #[test]
    fn test_executive_summary_cleans_markdown() {
        let log = pii_log();
        let orchestrator = sample_orchestrator(&log)
            .with_summarizer(Box::new(MockSummarizer::new("# Summary\n- all clear")));

        let summary = orchestrator.executive_summary(&ComplianceResults::new());
        assert_eq!(summary.as_deref(), Some("Summary all clear"));
    }

    #[test]
    fn test_executive_summary_degrades_on_failure() {
        let log = pii_log();
        let orchestrator = sample_orchestrator(&log)
            .with_summarizer(Box::new(MockSummarizer::new("x").failing()));

        assert!(orchestrator
            .executive_summary(&ComplianceResults::new())
            .is_none());
    }

    #[test]
    fn test_executive_summary_absent_without_summarizer() {
        let log = pii_log();
        let orchestrator = sample_orchestrator(&log);
        assert!(orchestrator
            .executive_summary(&ComplianceResults::new())
            .is_none());
    }

    #[test]
    fn test_save_reports_writes_all_formats() {
        let log = pii_log();
        let dir = TempDir::new().unwrap();
        let orchestrator = sample_orchestrator(&log);

        let results = orchestrator.run_all();
        let saved = orchestrator
            .save_reports(&results, dir.path())
            .unwrap();

        assert!(saved.json_path.exists());
        assert!(saved.markdown_path.exists());
        assert!(saved.html_path.exists());
        assert!(saved.published_url.is_none());

        // JSON report round-trips to the results that produced it.
        let json = std::fs::read_to_string(&saved.json_path).unwrap();
        let back: ComplianceResults = serde_json::from_str(&json).unwrap();
        assert_eq!(back, results);
    }

    #[test]
    fn test_publish_failure_keeps_local_reports() {
        let log = pii_log();
        let dir = TempDir::new().unwrap();
        let orchestrator =
            sample_orchestrator(&log).with_publisher(Box::new(MockPublisher::new().failing()));

        let results = orchestrator.run_all();
        let saved = orchestrator.save_reports(&results, dir.path()).unwrap();

        assert!(saved.published_url.is_none());
        assert!(saved.html_path.exists());
    }

    #[test]
    fn test_publish_success_returns_url() {
        let log = pii_log();
        let dir = TempDir::new().unwrap();
        let orchestrator =
            sample_orchestrator(&log).with_publisher(Box::new(MockPublisher::new()));

        let results = orchestrator.run_all();
        let saved = orchestrator.save_reports(&results, dir.path()).unwrap();

        assert_eq!(
            saved.published_url.as_deref(),
            Some("https://example.test/index.html")
        );
    }
}
