//! # cw-core
//!
//! Core compliance checks and data models for Compliance Warden.
//!
//! This crate provides the check layer: the resource tag evaluator, the
//! infrastructure compliance scanner, the model governance auditor, the PII
//! scanner, and the typed results mapping consumed by the report renderers.
//! Every check is a pure, single-pass function over in-memory records;
//! resource retrieval and report publishing live in `cw-connectors`.

pub mod infra;
pub mod model;
pub mod pii;
pub mod resource;
pub mod results;
pub mod tags;

pub use infra::{generate_summary_report, scan_resources};
pub use model::{
    audit_model, check_model_bias, check_model_drift, check_model_explainability, AuditIssue,
    AuditThresholds, ModelMetadata,
};
pub use pii::{PiiError, PiiFindings, PiiScanner};
pub use resource::{InfraIssue, InfraReport, InfraSummary, Resource, TagViolation};
pub use results::{CheckKind, CheckResult, ComplianceResults};
pub use tags::{check_required_tags, default_required_tags, DEFAULT_REQUIRED_TAGS};
