//! # cw-connectors
//!
//! External collaborator connectors for Compliance Warden.
//!
//! This crate defines the interfaces the orchestrator depends on — resource
//! provider, executive summarizer, report publisher — together with the real
//! implementations (Azure CLI inventory, OpenAI-compatible summarization,
//! Azure Blob upload) and in-memory mocks for testing. Connector handles are
//! constructed once by the CLI and injected explicitly; nothing in this
//! crate holds process-global state.

pub mod azure;
pub mod llm;
pub mod mock;
pub mod traits;

pub use azure::{AzureBlobPublisher, AzureCliResourceProvider};
pub use llm::{clean_markdown, OpenAiSummarizer};
pub use mock::{MockPublisher, MockResourceProvider, MockSummarizer};
pub use traits::{
    ConnectorError, ConnectorResult, ReportPublisher, ResourceProvider, Summarizer,
};
