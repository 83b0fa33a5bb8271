//! Mock connectors for testing and offline demo runs.
//!
//! Each mock mirrors its real counterpart's trait surface with configurable
//! fixture data and a failure switch, so orchestrator behavior — including
//! check isolation on collaborator failure — can be exercised without any
//! external service.

use crate::traits::{
    ConnectorError, ConnectorResult, ReportPublisher, ResourceProvider, Summarizer,
};
use cw_core::{ComplianceResults, Resource};
use std::sync::Mutex;

/// Mock resource provider serving in-memory fixture data.
pub struct MockResourceProvider {
    name: String,
    resources: Vec<Resource>,
    failing: bool,
}

impl MockResourceProvider {
    /// Creates an empty mock provider.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            resources: Vec::new(),
            failing: false,
        }
    }

    /// Creates a mock provider with a representative sample inventory.
    pub fn with_sample_data(name: &str) -> Self {
        let resources = vec![
            Resource::new(
                "storage-logs",
                "Microsoft.Storage/storageAccounts",
                [("owner".to_string(), "teamA".to_string())],
            ),
            Resource::new("vm-unlabeled", "Microsoft.Compute/virtualMachines", []),
            Resource::new(
                "db-prod",
                "Microsoft.SQL/servers/databases",
                [
                    ("env".to_string(), "prod".to_string()),
                    ("owner".to_string(), "teamB".to_string()),
                    ("cost_center".to_string(), "1234".to_string()),
                ],
            ),
        ];

        Self {
            name: name.to_string(),
            resources,
            failing: false,
        }
    }

    /// Adds a resource to the fixture inventory.
    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resources.push(resource);
        self
    }

    /// Makes every `list_resources` call fail.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }
}

impl ResourceProvider for MockResourceProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn list_resources(&self) -> ConnectorResult<Vec<Resource>> {
        if self.failing {
            return Err(ConnectorError::ExternalServiceFailure(
                "mock provider failure".to_string(),
            ));
        }
        Ok(self.resources.clone())
    }
}

/// Mock summarizer returning a canned paragraph.
pub struct MockSummarizer {
    summary: String,
    failing: bool,
}

impl MockSummarizer {
    /// Creates a mock summarizer with the given canned output.
    pub fn new(summary: &str) -> Self {
        Self {
            summary: summary.to_string(),
            failing: false,
        }
    }

    /// Makes every `summarize` call fail.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }
}

impl Summarizer for MockSummarizer {
    fn name(&self) -> &str {
        "mock_summarizer"
    }

    fn summarize(&self, _results: &ComplianceResults) -> ConnectorResult<String> {
        if self.failing {
            return Err(ConnectorError::ExternalServiceFailure(
                "mock summarizer failure".to_string(),
            ));
        }
        Ok(self.summary.clone())
    }
}

/// Mock publisher that records published payloads.
pub struct MockPublisher {
    failing: bool,
    published: Mutex<Vec<Vec<u8>>>,
}

impl MockPublisher {
    /// Creates a mock publisher.
    pub fn new() -> Self {
        Self {
            failing: false,
            published: Mutex::new(Vec::new()),
        }
    }

    /// Makes every `publish` call fail.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Returns the payloads published so far, for test verification.
    pub fn published(&self) -> Vec<Vec<u8>> {
        self.published
            .lock()
            .expect("mock publisher state lock poisoned")
            .clone()
    }
}

impl Default for MockPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPublisher for MockPublisher {
    fn name(&self) -> &str {
        "mock_publisher"
    }

    fn publish(&self, html: &[u8]) -> ConnectorResult<String> {
        if self.failing {
            return Err(ConnectorError::ExternalServiceFailure(
                "mock publisher failure".to_string(),
            ));
        }
        self.published
            .lock()
            .expect("mock publisher state lock poisoned")
            .push(html.to_vec());
        Ok("https://example.test/index.html".to_string())
    }
}
