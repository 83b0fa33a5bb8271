//! Section view model shared by the Markdown and HTML renderers.
//!
//! Rendering dispatches on the explicit [`CheckResult`] tag and flattens
//! each check into a small set of section shapes, so the two output formats
//! stay structurally identical and neither inspects value shapes at run
//! time.

use chrono::{DateTime, SecondsFormat, Utc};
use cw_core::{CheckResult, ComplianceResults, InfraReport, PiiFindings};

/// A fully-prepared report, ready for either renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportView {
    /// Generation timestamp, RFC 3339 in UTC.
    pub generated_at: String,
    /// Optional executive summary paragraph (opaque, untrusted text).
    pub executive_summary: Option<String>,
    /// One section per check, in results-mapping insertion order.
    pub sections: Vec<SectionView>,
}

/// One report section.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionView {
    /// Section heading.
    pub title: String,
    /// Section content.
    pub body: SectionBody,
}

/// Content shapes a section can take.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionBody {
    /// The check ran and found nothing.
    NoIssues,
    /// A flat bullet list of findings.
    Bullets(Vec<String>),
    /// Titled subsections (infrastructure summary, PII categories).
    Subsections(Vec<Subsection>),
}

/// A titled subsection within a section.
#[derive(Debug, Clone, PartialEq)]
pub struct Subsection {
    /// Subsection heading.
    pub title: String,
    /// Subsection content.
    pub body: SubsectionBody,
}

/// Content shapes a subsection can take.
#[derive(Debug, Clone, PartialEq)]
pub enum SubsectionBody {
    /// A single line.
    Line(String),
    /// A bullet list.
    Bullets(Vec<String>),
}

impl ReportView {
    /// Builds the view for a results mapping.
    ///
    /// Checks absent from the mapping get no section at all; an absent check
    /// is not the same as a check that ran and found nothing.
    pub fn build(
        results: &ComplianceResults,
        generated_at: DateTime<Utc>,
        executive_summary: Option<String>,
    ) -> Self {
        Self {
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            executive_summary,
            sections: results.iter().map(section_for).collect(),
        }
    }
}

fn section_for(result: &CheckResult) -> SectionView {
    let title = format!("{} Scan Results", result.kind().title());
    let body = match result {
        CheckResult::Infrastructure(report) => infra_body(report),
        CheckResult::ModelAudit(issues) => {
            if issues.is_empty() {
                SectionBody::NoIssues
            } else {
                SectionBody::Bullets(issues.iter().map(|i| i.message().to_string()).collect())
            }
        }
        CheckResult::TagPolicy(violations) => {
            if violations.is_empty() {
                SectionBody::NoIssues
            } else {
                SectionBody::Bullets(
                    violations
                        .iter()
                        .map(|v| {
                            format!(
                                "resource_name: {}, resource_type: {}, missing_tags: {}",
                                v.resource_name,
                                v.resource_type,
                                v.missing_tags.join(", ")
                            )
                        })
                        .collect(),
                )
            }
        }
        CheckResult::PiiScan(findings) => pii_body(findings),
    };

    SectionView { title, body }
}

fn infra_body(report: &InfraReport) -> SectionBody {
    let summary = Subsection {
        title: "summary".to_string(),
        body: SubsectionBody::Line(format!(
            "total: {}, non_compliant: {}",
            report.summary.total, report.summary.non_compliant
        )),
    };

    let resources = Subsection {
        title: "non_compliant_resources".to_string(),
        body: if report.non_compliant_resources.is_empty() {
            SubsectionBody::Line("none".to_string())
        } else {
            SubsectionBody::Bullets(
                report
                    .non_compliant_resources
                    .iter()
                    .map(|issue| {
                        format!(
                            "resource_name: {}, resource_type: {}, issues: {}",
                            issue.resource_name,
                            issue.resource_type,
                            issue.issues.join("; ")
                        )
                    })
                    .collect(),
            )
        },
    };

    SectionBody::Subsections(vec![summary, resources])
}

fn pii_body(findings: &PiiFindings) -> SectionBody {
    // Fixed category order, matching the scanner's evaluation order.
    let categories = [
        ("email", &findings.email),
        ("phone", &findings.phone),
        ("credit_card", &findings.credit_card),
        ("ssn", &findings.ssn),
    ];

    SectionBody::Subsections(
        categories
            .into_iter()
            .map(|(name, matches)| Subsection {
                title: name.to_string(),
                body: if matches.is_empty() {
                    SubsectionBody::Line("none".to_string())
                } else {
                    SubsectionBody::Bullets(matches.clone())
                },
            })
            .collect(),
    )
}
