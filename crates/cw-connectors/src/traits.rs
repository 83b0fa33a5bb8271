//! Connector trait definitions for Compliance Warden.
//!
//! This module defines the interfaces the external collaborators implement,
//! providing a consistent API the orchestrator can drive without knowing
//! which vendor sits behind it.

use cw_core::{ComplianceResults, Resource};
use thiserror::Error;

/// Errors that can occur in connectors.
#[derive(Error, Debug, Clone)]
pub enum ConnectorError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("External service failure: {0}")]
    ExternalServiceFailure(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for connector operations.
pub type ConnectorResult<T> = Result<T, ConnectorError>;

/// Supplies the resource inventory the infrastructure and tag checks run
/// over.
///
/// The checks depend only on the three [`Resource`] fields; how the
/// inventory is obtained (cloud API, CLI, fixture data) is the provider's
/// business.
pub trait ResourceProvider {
    /// Returns the provider name for logging and error attribution.
    fn name(&self) -> &str;

    /// Lists every resource in scope for this run.
    fn list_resources(&self) -> ConnectorResult<Vec<Resource>>;
}

/// Produces a one-paragraph executive summary of a results mapping.
///
/// The summary is untrusted opaque text: the renderer escapes it and makes
/// no assumption about phrasing or language. A failing summarizer degrades
/// to a report without a summary section.
pub trait Summarizer {
    /// Returns the summarizer name for logging and error attribution.
    fn name(&self) -> &str;

    /// Summarizes the results mapping into plain text.
    fn summarize(&self, results: &ComplianceResults) -> ConnectorResult<String>;
}

/// Publishes a rendered HTML report to a hosting target.
///
/// Publish failures must not affect already-written local report files; the
/// orchestrator reports them and moves on.
pub trait ReportPublisher {
    /// Returns the publisher name for logging and error attribution.
    fn name(&self) -> &str;

    /// Uploads the report and returns the public URL it is reachable at.
    fn publish(&self, html: &[u8]) -> ConnectorResult<String>;
}
