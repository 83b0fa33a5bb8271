//! Resource and finding data models for Compliance Warden.
//!
//! This module defines the records the checkers operate on: the cloud
//! resource descriptor supplied by a resource provider, and the per-check
//! finding shapes embedded in the compliance report.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// A cloud resource descriptor as supplied by a resource provider.
///
/// Read-only to all checkers; no identity beyond `name`. Inventory sources
/// occasionally emit entries without a name or type, and emit `null` for an
/// empty tag set — those normalize to `"unknown"` and an empty map on
/// deserialization so the checkers never see partial records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Resource name.
    #[serde(default = "unknown_field")]
    pub name: String,
    /// Fully-qualified resource type (e.g. `Microsoft.Storage/storageAccounts`).
    #[serde(rename = "type", default = "unknown_field")]
    pub resource_type: String,
    /// Key/value labels attached to the resource. May be empty.
    #[serde(default, deserialize_with = "nullable_tags")]
    pub tags: HashMap<String, String>,
}

impl Resource {
    /// Creates a resource from name, type, and tag pairs.
    pub fn new(
        name: impl Into<String>,
        resource_type: impl Into<String>,
        tags: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        Self {
            name: name.into(),
            resource_type: resource_type.into(),
            tags: tags.into_iter().collect(),
        }
    }

    /// Returns true when the given tag is present with a non-empty value.
    ///
    /// Absence and a blank value both count as missing: a present-but-empty
    /// tag signals non-compliance the same way an absent one does.
    pub fn has_tag(&self, key: &str) -> bool {
        self.tags.get(key).is_some_and(|v| !v.is_empty())
    }
}

fn unknown_field() -> String {
    "unknown".to_string()
}

fn nullable_tags<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags: Option<HashMap<String, String>> = Option::deserialize(deserializer)?;
    Ok(tags.unwrap_or_default())
}

/// A resource missing one or more required tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagViolation {
    /// Name of the non-compliant resource.
    pub resource_name: String,
    /// Type of the non-compliant resource.
    pub resource_type: String,
    /// Tags that are absent or blank, in required-tag-list order.
    pub missing_tags: Vec<String>,
}

/// A resource flagged by the infrastructure compliance scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfraIssue {
    /// Name of the non-compliant resource.
    pub resource_name: String,
    /// Type of the non-compliant resource.
    pub resource_type: String,
    /// Issues detected on this resource, in detection order.
    pub issues: Vec<String>,
}

/// Aggregate counts for an infrastructure scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfraSummary {
    /// Total number of resources scanned.
    pub total: usize,
    /// Number of resources with at least one issue.
    pub non_compliant: usize,
}

/// The infrastructure scan report.
///
/// Invariant: `summary.non_compliant == non_compliant_resources.len()
/// <= summary.total`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfraReport {
    /// Scan totals.
    pub summary: InfraSummary,
    /// Every non-compliant resource with its issues.
    pub non_compliant_resources: Vec<InfraIssue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_tag_truthiness() {
        let resource = Resource::new(
            "vm-1",
            "Microsoft.Compute/virtualMachines",
            [
                ("env".to_string(), "prod".to_string()),
                ("owner".to_string(), String::new()),
            ],
        );

        assert!(resource.has_tag("env"));
        assert!(!resource.has_tag("owner"), "blank value counts as missing");
        assert!(!resource.has_tag("cost_center"));
    }

    #[test]
    fn test_deserialize_defaults_missing_fields_to_unknown() {
        let resource: Resource = serde_json::from_str(r#"{"tags": {"env": "dev"}}"#).unwrap();
        assert_eq!(resource.name, "unknown");
        assert_eq!(resource.resource_type, "unknown");
        assert!(resource.has_tag("env"));
    }

    #[test]
    fn test_deserialize_null_tags_as_empty() {
        let resource: Resource =
            serde_json::from_str(r#"{"name": "vm-1", "type": "vm", "tags": null}"#).unwrap();
        assert!(resource.tags.is_empty());
    }

    #[test]
    fn test_resource_type_wire_name() {
        let resource = Resource::new("db-1", "Microsoft.Sql/servers", []);
        let json = serde_json::to_value(&resource).unwrap();
        assert_eq!(json["type"], "Microsoft.Sql/servers");
        assert!(json.get("resource_type").is_none());
    }
}
