//! The per-run compliance results mapping.
//!
//! Collects the outcome of each check under its well-known key, preserving
//! the order checks were run in. The renderers dispatch on [`CheckResult`]'s
//! explicit tag rather than inspecting value shapes at run time, and the
//! JSON serialization is a map that round-trips losslessly back into the
//! same structure.

use crate::model::AuditIssue;
use crate::pii::PiiFindings;
use crate::resource::{InfraReport, TagViolation};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The four compliance checks, in canonical report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckKind {
    Infrastructure,
    ModelAudit,
    TagPolicy,
    PiiScan,
}

impl CheckKind {
    /// Wire key for this check in the results mapping.
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckKind::Infrastructure => "infrastructure",
            CheckKind::ModelAudit => "model_audit",
            CheckKind::TagPolicy => "tag_policy",
            CheckKind::PiiScan => "pii_scan",
        }
    }

    /// Parses a check kind from its wire key.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "infrastructure" => Some(CheckKind::Infrastructure),
            "model_audit" => Some(CheckKind::ModelAudit),
            "tag_policy" => Some(CheckKind::TagPolicy),
            "pii_scan" => Some(CheckKind::PiiScan),
            _ => None,
        }
    }

    /// Human-readable section title.
    pub fn title(&self) -> &'static str {
        match self {
            CheckKind::Infrastructure => "Infrastructure",
            CheckKind::ModelAudit => "Model Audit",
            CheckKind::TagPolicy => "Tag Policy",
            CheckKind::PiiScan => "PII Scan",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of one compliance check.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckResult {
    Infrastructure(InfraReport),
    ModelAudit(Vec<AuditIssue>),
    TagPolicy(Vec<TagViolation>),
    PiiScan(PiiFindings),
}

impl CheckResult {
    /// The check this result belongs to.
    pub fn kind(&self) -> CheckKind {
        match self {
            CheckResult::Infrastructure(_) => CheckKind::Infrastructure,
            CheckResult::ModelAudit(_) => CheckKind::ModelAudit,
            CheckResult::TagPolicy(_) => CheckKind::TagPolicy,
            CheckResult::PiiScan(_) => CheckKind::PiiScan,
        }
    }
}

/// Insertion-ordered mapping from check kind to result.
///
/// Built once per run by the orchestrator and consumed by the renderers.
/// Re-inserting a kind replaces its value but keeps the original position,
/// so repeated runs from the interactive menu do not reshuffle the report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComplianceResults {
    entries: Vec<CheckResult>,
}

impl ComplianceResults {
    /// Creates an empty results mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the result for its check kind.
    pub fn insert(&mut self, result: CheckResult) {
        let kind = result.kind();
        match self.entries.iter_mut().find(|e| e.kind() == kind) {
            Some(existing) => *existing = result,
            None => self.entries.push(result),
        }
    }

    /// Returns the result for a check, if that check has run.
    pub fn get(&self, kind: CheckKind) -> Option<&CheckResult> {
        self.entries.iter().find(|e| e.kind() == kind)
    }

    /// Iterates results in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CheckResult> {
        self.entries.iter()
    }

    /// Number of checks with a recorded result.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no check has run yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ComplianceResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            let key = entry.kind().as_str();
            match entry {
                CheckResult::Infrastructure(report) => map.serialize_entry(key, report)?,
                CheckResult::ModelAudit(issues) => map.serialize_entry(key, issues)?,
                CheckResult::TagPolicy(violations) => map.serialize_entry(key, violations)?,
                CheckResult::PiiScan(findings) => map.serialize_entry(key, findings)?,
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ComplianceResults {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ResultsVisitor;

        impl<'de> Visitor<'de> for ResultsVisitor {
            type Value = ComplianceResults;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of check results keyed by check name")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> Result<ComplianceResults, A::Error> {
                let mut results = ComplianceResults::new();
                while let Some(key) = map.next_key::<String>()? {
                    let kind = CheckKind::from_key(&key)
                        .ok_or_else(|| de::Error::custom(format!("unknown check: {key}")))?;
                    let result = match kind {
                        CheckKind::Infrastructure => {
                            CheckResult::Infrastructure(map.next_value()?)
                        }
                        CheckKind::ModelAudit => CheckResult::ModelAudit(map.next_value()?),
                        CheckKind::TagPolicy => CheckResult::TagPolicy(map.next_value()?),
                        CheckKind::PiiScan => CheckResult::PiiScan(map.next_value()?),
                    };
                    results.insert(result);
                }
                Ok(results)
            }
        }

        deserializer.deserialize_map(ResultsVisitor)
    }
}
