//! Model governance auditing.
//!
//! Evaluates a model's metadata against three independent predicates —
//! drift, bias, and missing explainability — and aggregates the triggered
//! findings. Pure functions of the metadata; no external state.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Metadata describing a trained model, supplied by an external registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// ISO-8601 timestamp of the last training run, if recorded.
    #[serde(default)]
    pub last_trained: Option<String>,
    /// Evaluation metrics by name (e.g. `precision_group_A`).
    #[serde(default)]
    pub metrics: HashMap<String, f64>,
    /// Explainability tools documented for this model (e.g. `SHAP`).
    #[serde(default)]
    pub explainability_tools: Vec<String>,
}

/// Thresholds for the audit predicates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AuditThresholds {
    /// Days since last training before a model counts as drifted.
    pub drift_threshold_days: i64,
    /// Maximum allowed spread between group precision metrics.
    pub bias_threshold: f64,
}

impl Default for AuditThresholds {
    fn default() -> Self {
        Self {
            drift_threshold_days: 30,
            bias_threshold: 0.1,
        }
    }
}

/// A finding produced by the model audit.
///
/// Closed set of three findings, each independent. Serializes as its fixed
/// message string so the report shape stays a plain list of descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditIssue {
    /// Model trained too long ago, or training date unusable.
    Drift,
    /// Group precision metrics spread beyond the bias threshold.
    Bias,
    /// No explainability tooling documented.
    MissingExplainability,
}

impl AuditIssue {
    /// Returns the fixed report message for this finding.
    pub fn message(&self) -> &'static str {
        match self {
            AuditIssue::Drift => "Model may be outdated (drift risk).",
            AuditIssue::Bias => "Possible model bias detected in precision/recall across groups.",
            AuditIssue::MissingExplainability => {
                "Explainability tools not documented for this model."
            }
        }
    }

    /// Parses a finding from its report message.
    pub fn from_message(s: &str) -> Option<Self> {
        match s {
            "Model may be outdated (drift risk)." => Some(AuditIssue::Drift),
            "Possible model bias detected in precision/recall across groups." => {
                Some(AuditIssue::Bias)
            }
            "Explainability tools not documented for this model." => {
                Some(AuditIssue::MissingExplainability)
            }
            _ => None,
        }
    }
}

impl fmt::Display for AuditIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl Serialize for AuditIssue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.message())
    }
}

impl<'de> Deserialize<'de> for AuditIssue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MessageVisitor;

        impl Visitor<'_> for MessageVisitor {
            type Value = AuditIssue;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a model audit issue message")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<AuditIssue, E> {
                AuditIssue::from_message(value)
                    .ok_or_else(|| E::custom(format!("unknown audit issue: {value}")))
            }
        }

        deserializer.deserialize_str(MessageVisitor)
    }
}

/// Checks whether the model is outdated based on its last training date.
///
/// Returns true when `last_trained` is absent, does not parse as an ISO-8601
/// timestamp, or lies more than `threshold_days` in the past. Parse failures
/// are absorbed as drift rather than surfaced: an unusable training date is
/// treated as the worst case.
pub fn check_model_drift(metadata: &ModelMetadata, threshold_days: i64) -> bool {
    let last_trained = match metadata.last_trained.as_deref() {
        Some(value) if !value.is_empty() => value,
        _ => return true,
    };

    match parse_iso8601(last_trained) {
        Some(trained_at) => {
            let days_since = (Utc::now().naive_utc() - trained_at).num_days();
            days_since > threshold_days
        }
        None => true,
    }
}

/// Checks for spread in group precision metrics.
///
/// Collects every metric whose key contains `precision` (case-insensitive).
/// With fewer than two such values bias cannot be evaluated and the check
/// returns false; otherwise it returns whether `max - min` exceeds the
/// threshold. This is a range proxy over whatever precision slices the
/// registry reports, not a statistical fairness test.
pub fn check_model_bias(metrics: &HashMap<String, f64>, bias_threshold: f64) -> bool {
    let precision_values: Vec<f64> = metrics
        .iter()
        .filter(|(k, _)| k.to_lowercase().contains("precision"))
        .map(|(_, v)| *v)
        .collect();

    if precision_values.len() < 2 {
        return false;
    }

    let max = precision_values.iter().cloned().fold(f64::MIN, f64::max);
    let min = precision_values.iter().cloned().fold(f64::MAX, f64::min);
    (max - min) > bias_threshold
}

/// Checks whether explainability tooling is documented.
pub fn check_model_explainability(metadata: &ModelMetadata) -> bool {
    metadata.explainability_tools.is_empty()
}

/// Audits a model's metadata against all three predicates.
///
/// Every predicate is evaluated unconditionally; triggered findings are
/// returned in drift → bias → explainability order.
pub fn audit_model(metadata: &ModelMetadata, thresholds: &AuditThresholds) -> Vec<AuditIssue> {
    let mut issues = Vec::new();

    if check_model_drift(metadata, thresholds.drift_threshold_days) {
        issues.push(AuditIssue::Drift);
    }

    if check_model_bias(&metadata.metrics, thresholds.bias_threshold) {
        issues.push(AuditIssue::Bias);
    }

    if check_model_explainability(metadata) {
        issues.push(AuditIssue::MissingExplainability);
    }

    issues
}

/// Parses an ISO-8601 timestamp, with or without an offset, date-only allowed.
fn parse_iso8601(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}
