//! Required-tag policy evaluation.
//!
//! Flags resources missing any of a required set of tags. A tag only counts
//! as present when its value is non-empty; absence and blank both signal
//! non-compliance.

use crate::resource::{Resource, TagViolation};

/// Tags every resource must carry unless the caller overrides the list.
pub const DEFAULT_REQUIRED_TAGS: [&str; 3] = ["env", "owner", "cost_center"];

/// Returns the default required-tag list as owned strings.
pub fn default_required_tags() -> Vec<String> {
    DEFAULT_REQUIRED_TAGS.iter().map(|t| t.to_string()).collect()
}

/// Checks resources for missing required tags.
///
/// Emits one [`TagViolation`] per resource with at least one missing tag.
/// `missing_tags` preserves the order of `required_tags`, regardless of the
/// resource's own tag iteration order.
pub fn check_required_tags<S: AsRef<str>>(
    resources: &[Resource],
    required_tags: &[S],
) -> Vec<TagViolation> {
    let mut violations = Vec::new();

    for resource in resources {
        let missing: Vec<String> = required_tags
            .iter()
            .map(|t| t.as_ref())
            .filter(|t| !resource.has_tag(t))
            .map(|t| t.to_string())
            .collect();

        if !missing.is_empty() {
            violations.push(TagViolation {
                resource_name: resource.name.clone(),
                resource_type: resource.resource_type.clone(),
                missing_tags: missing,
            });
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_resources() -> Vec<Resource> {
        vec![
            Resource::new(
                "vm-prod-1",
                "Microsoft.Compute/virtualMachines",
                [
                    ("env".to_string(), "prod".to_string()),
                    ("owner".to_string(), "teamA".to_string()),
                ],
            ),
            Resource::new(
                "storage-logs",
                "Microsoft.Storage/storageAccounts",
                [("owner".to_string(), "teamB".to_string())],
            ),
            Resource::new(
                "db-backup",
                "Microsoft.Sql/servers",
                [
                    ("env".to_string(), "dev".to_string()),
                    ("cost_center".to_string(), "1234".to_string()),
                ],
            ),
            Resource::new("vm-unlabeled", "Microsoft.Compute/virtualMachines", []),
        ]
    }

    #[test]
    fn test_default_required_tags() {
        let violations = check_required_tags(&sample_resources(), &DEFAULT_REQUIRED_TAGS);

        let expected = vec![
            TagViolation {
                resource_name: "vm-prod-1".to_string(),
                resource_type: "Microsoft.Compute/virtualMachines".to_string(),
                missing_tags: vec!["cost_center".to_string()],
            },
            TagViolation {
                resource_name: "storage-logs".to_string(),
                resource_type: "Microsoft.Storage/storageAccounts".to_string(),
                missing_tags: vec!["env".to_string(), "cost_center".to_string()],
            },
            TagViolation {
                resource_name: "db-backup".to_string(),
                resource_type: "Microsoft.Sql/servers".to_string(),
                missing_tags: vec!["owner".to_string()],
            },
            TagViolation {
                resource_name: "vm-unlabeled".to_string(),
                resource_type: "Microsoft.Compute/virtualMachines".to_string(),
                missing_tags: vec![
                    "env".to_string(),
                    "owner".to_string(),
                    "cost_center".to_string(),
                ],
            },
        ];

        assert_eq!(violations, expected);
    }

    #[test]
    fn test_custom_required_tags() {
        let custom = ["project", "department"];
        let violations = check_required_tags(&sample_resources(), &custom);

        assert_eq!(violations.len(), 4);
        for violation in &violations {
            assert_eq!(violation.missing_tags, vec!["project", "department"]);
        }
    }

    #[test]
    fn test_missing_tags_follow_required_order() {
        // Resource tag iteration order must not leak into the violation.
        let resource = Resource::new("vm-1", "vm", [("owner".to_string(), "x".to_string())]);
        let violations = check_required_tags(&[resource], &["cost_center", "env"]);

        assert_eq!(violations[0].missing_tags, vec!["cost_center", "env"]);
    }

    #[test]
    fn test_blank_tag_value_is_a_violation() {
        let resource = Resource::new(
            "vm-1",
            "vm",
            [
                ("env".to_string(), String::new()),
                ("owner".to_string(), "teamA".to_string()),
                ("cost_center".to_string(), "42".to_string()),
            ],
        );
        let violations = check_required_tags(&[resource], &DEFAULT_REQUIRED_TAGS);

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].missing_tags, vec!["env"]);
    }

    #[test]
    fn test_compliant_resources_emit_nothing() {
        let resource = Resource::new(
            "db-prod",
            "Microsoft.Sql/servers/databases",
            [
                ("env".to_string(), "prod".to_string()),
                ("owner".to_string(), "teamB".to_string()),
                ("cost_center".to_string(), "1234".to_string()),
            ],
        );
        assert!(check_required_tags(&[resource], &DEFAULT_REQUIRED_TAGS).is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(check_required_tags(&[], &DEFAULT_REQUIRED_TAGS).is_empty());
    }
}
