//! Infrastructure compliance scanning.
//!
//! Applies the environment-tag rule to a resource inventory and wraps the
//! findings in a summary report. Resource retrieval is a collaborator
//! concern (`cw-connectors`); this module only sees in-memory records.

use crate::resource::{InfraIssue, InfraReport, InfraSummary, Resource};
use tracing::debug;

/// Scans resources for infrastructure compliance issues.
///
/// A resource is non-compliant when it has no tags at all or lacks an `env`
/// tag with a non-empty value. Returns one [`InfraIssue`] per non-compliant
/// resource, in input order.
pub fn scan_resources(resources: &[Resource]) -> Vec<InfraIssue> {
    let mut issues = Vec::new();

    for resource in resources {
        let mut resource_issues = Vec::new();
        if !resource.has_tag("env") {
            resource_issues.push("Missing 'env' tag".to_string());
        }
        if !resource_issues.is_empty() {
            issues.push(InfraIssue {
                resource_name: resource.name.clone(),
                resource_type: resource.resource_type.clone(),
                issues: resource_issues,
            });
        }
    }

    debug!(
        scanned = resources.len(),
        non_compliant = issues.len(),
        "infrastructure scan complete"
    );
    issues
}

/// Wraps scan issues in a summary report.
///
/// `total` is the number of resources scanned, supplied by the caller rather
/// than derived from `issues`, so the report can also state how many
/// resources were compliant.
pub fn generate_summary_report(issues: Vec<InfraIssue>, total: usize) -> InfraReport {
    InfraReport {
        summary: InfraSummary {
            total,
            non_compliant: issues.len(),
        },
        non_compliant_resources: issues,
    }
}
