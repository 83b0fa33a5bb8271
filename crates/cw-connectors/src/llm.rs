//! Executive summary generation via an OpenAI-compatible chat API.
//!
//! The summarizer turns a results mapping into one plain-English paragraph.
//! Its output is untrusted text: the caller escapes it before embedding and
//! drops the summary section entirely when the call fails.

use crate::traits::{ConnectorError, ConnectorResult, Summarizer};
use cw_core::ComplianceResults;
use regex::Regex;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

const SYSTEM_PROMPT: &str = "You are a compliance and governance expert.";

const SUMMARY_INSTRUCTION: &str = "You are a compliance and governance expert. \
Write a one-paragraph executive summary of the compliance scan results provided below. \
Use formal plain English with no formatting - do not use markdown, bullet points, \
headings, or tables. Just a professional paragraph summarizing the results.";

/// Summarizer backed by an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiSummarizer {
    model: String,
    api_key: String,
    base_url: String,
    client: reqwest::blocking::Client,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

impl OpenAiSummarizer {
    /// Creates a summarizer for the given model and endpoint.
    ///
    /// `base_url` is the API root (e.g. `https://api.openai.com/v1`); a
    /// local OpenAI-compatible server works the same way.
    pub fn new(
        model: impl Into<String>,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> ConnectorResult<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(ConnectorError::ConfigError(
                "summarizer requires an API key".to_string(),
            ));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| ConnectorError::ConfigError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            model: model.into(),
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }
}

impl Summarizer for OpenAiSummarizer {
    fn name(&self) -> &str {
        "openai"
    }

    fn summarize(&self, results: &ComplianceResults) -> ConnectorResult<String> {
        let results_json = serde_json::to_string_pretty(results).map_err(|e| {
            ConnectorError::InvalidResponse(format!("failed to serialize results: {e}"))
        })?;
        let prompt = format!("{SUMMARY_INSTRUCTION}\n\n{results_json}");

        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": prompt},
            ],
            "max_tokens": 300,
            "temperature": 0.5,
        });

        debug!(model = %self.model, "requesting executive summary");
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                ConnectorError::ExternalServiceFailure(format!("summary request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ConnectorError::ExternalServiceFailure(format!(
                "summary request returned {status}: {}",
                body.trim()
            )));
        }

        let parsed: ChatResponse = response.json().map_err(|e| {
            ConnectorError::InvalidResponse(format!("failed to parse summary response: {e}"))
        })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| {
                ConnectorError::InvalidResponse("summary response had no choices".to_string())
            })?;

        Ok(content.trim().to_string())
    }
}

/// Flattens markdown-formatted model output into one plain paragraph.
///
/// Models ignore the no-formatting instruction often enough that the output
/// is normalized here: table rows, heading markers, and bullet prefixes are
/// stripped, and all whitespace collapses to single spaces.
pub fn clean_markdown(summary: &str) -> String {
    // Validated literal patterns
    let table_rows = Regex::new(r"\|.*?\|\n?").expect("Invalid table row pattern");
    let separators = Regex::new(r"(?m)^[-|:]+$").expect("Invalid separator pattern");
    let headings = Regex::new(r"(?m)^#+\s*").expect("Invalid heading pattern");
    let bullets = Regex::new(r"(?m)^\s*[-*+]\s*").expect("Invalid bullet pattern");
    let newlines = Regex::new(r"\s*\n\s*").expect("Invalid newline pattern");
    let spaces = Regex::new(r"\s{2,}").expect("Invalid space pattern");

    let cleaned = table_rows.replace_all(summary, "");
    let cleaned = separators.replace_all(&cleaned, "");
    let cleaned = headings.replace_all(&cleaned, "");
    let cleaned = bullets.replace_all(&cleaned, "");
    let cleaned = newlines.replace_all(&cleaned, " ");
    let cleaned = spaces.replace_all(&cleaned, " ");

    cleaned.trim().to_string()
}
