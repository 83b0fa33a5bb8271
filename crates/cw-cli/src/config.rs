//! Configuration loading for the Compliance Warden CLI.

use anyhow::{Context, Result};
use cw_core::{default_required_tags, AuditThresholds};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Tags every resource must carry for the tag policy check.
    #[serde(default = "default_required_tags")]
    pub required_tags: Vec<String>,

    /// Model audit thresholds and metadata source.
    #[serde(default)]
    pub audit: AuditConfig,

    /// PII scan input.
    #[serde(default)]
    pub pii: PiiConfig,

    /// Resource inventory source.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Executive summary generation.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Report publishing target.
    #[serde(default)]
    pub publisher: PublisherConfig,

    /// Directory report files are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            required_tags: default_required_tags(),
            audit: AuditConfig::default(),
            pii: PiiConfig::default(),
            provider: ProviderConfig::default(),
            llm: LlmConfig::default(),
            publisher: PublisherConfig::default(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data/results")
}

impl AppConfig {
    /// Loads configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Creates a copy with secrets redacted.
    pub fn redact_secrets(&self) -> Self {
        let mut config = self.clone();
        if !config.llm.api_key.is_empty() {
            config.llm.api_key = "***REDACTED***".to_string();
        }
        if !config.publisher.sas_token.is_empty() {
            config.publisher.sas_token = "***REDACTED***".to_string();
        }
        config
    }
}

/// Model audit configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Days since last training before a model counts as drifted.
    #[serde(default = "default_drift_threshold_days")]
    pub drift_threshold_days: i64,

    /// Maximum allowed spread between group precision metrics.
    #[serde(default = "default_bias_threshold")]
    pub bias_threshold: f64,

    /// Optional JSON file with the model metadata to audit. When absent, a
    /// built-in sample model is audited.
    #[serde(default)]
    pub metadata_path: Option<PathBuf>,
}

fn default_drift_threshold_days() -> i64 {
    30
}

fn default_bias_threshold() -> f64 {
    0.1
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            drift_threshold_days: default_drift_threshold_days(),
            bias_threshold: default_bias_threshold(),
            metadata_path: None,
        }
    }
}

impl AuditConfig {
    /// Converts to the core thresholds type.
    pub fn thresholds(&self) -> AuditThresholds {
        AuditThresholds {
            drift_threshold_days: self.drift_threshold_days,
            bias_threshold: self.bias_threshold,
        }
    }
}

/// PII scan configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PiiConfig {
    /// Log file scanned for PII.
    #[serde(default = "default_pii_log_path")]
    pub log_path: PathBuf,
}

fn default_pii_log_path() -> PathBuf {
    PathBuf::from("data/sample_log.txt")
}

impl Default for PiiConfig {
    fn default() -> Self {
        Self {
            log_path: default_pii_log_path(),
        }
    }
}

/// Resource inventory source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Which provider supplies the inventory.
    #[serde(default)]
    pub kind: ProviderKind,

    /// Path to the `az` binary, for the Azure provider.
    #[serde(default = "default_az_path")]
    pub az_path: String,
}

fn default_az_path() -> String {
    "az".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            az_path: default_az_path(),
        }
    }
}

/// Available resource providers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Built-in sample inventory for offline demo runs.
    #[default]
    Sample,
    /// Live inventory through the Azure CLI.
    Azure,
}

/// Executive summary configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Whether to request an executive summary at report time.
    #[serde(default)]
    pub enabled: bool,

    /// Model name.
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// API key.
    #[serde(default)]
    pub api_key: String,

    /// API base URL (for local/custom providers).
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
}

fn default_llm_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            model: default_llm_model(),
            api_key: String::new(),
            base_url: default_llm_base_url(),
        }
    }
}

/// Report publishing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublisherConfig {
    /// Whether to upload the HTML report after saving it locally.
    #[serde(default)]
    pub enabled: bool,

    /// Storage account name.
    #[serde(default)]
    pub account: String,

    /// Target container.
    #[serde(default = "default_publisher_container")]
    pub container: String,

    /// Blob name for the uploaded report.
    #[serde(default = "default_publisher_blob")]
    pub blob_name: String,

    /// SAS token with write permission on the container.
    #[serde(default)]
    pub sas_token: String,
}

fn default_publisher_container() -> String {
    "$web".to_string()
}

fn default_publisher_blob() -> String {
    "index.html".to_string()
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            account: String::new(),
            container: default_publisher_container(),
            blob_name: default_publisher_blob(),
            sas_token: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.required_tags, vec!["env", "owner", "cost_center"]);
        assert_eq!(config.audit.drift_threshold_days, 30);
        assert_eq!(config.audit.bias_threshold, 0.1);
        assert_eq!(config.provider.kind, ProviderKind::Sample);
        assert_eq!(config.output_dir, PathBuf::from("data/results"));
        assert!(!config.llm.enabled);
        assert!(!config.publisher.enabled);
    }

    #[test]
    fn test_load_valid_yaml() {
        let yaml = r#"
required_tags:
  - env
  - owner
audit:
  drift_threshold_days: 60
provider:
  kind: azure
  az_path: /usr/local/bin/az
llm:
  enabled: true
  api_key: sk-test
output_dir: out/reports
"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.required_tags, vec!["env", "owner"]);
        assert_eq!(config.audit.drift_threshold_days, 60);
        assert_eq!(config.audit.bias_threshold, 0.1, "unset fields keep defaults");
        assert_eq!(config.provider.kind, ProviderKind::Azure);
        assert_eq!(config.provider.az_path, "/usr/local/bin/az");
        assert!(config.llm.enabled);
        assert_eq!(config.output_dir, PathBuf::from("out/reports"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = AppConfig::load(Path::new("/nonexistent/config.yaml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_invalid_yaml() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"required_tags: [unterminated").unwrap();

        assert!(AppConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_redact_secrets() {
        let mut config = AppConfig::default();
        config.llm.api_key = "sk-secret".to_string();
        config.publisher.sas_token = "sig=secret".to_string();

        let redacted = config.redact_secrets();
        assert_eq!(redacted.llm.api_key, "***REDACTED***");
        assert_eq!(redacted.publisher.sas_token, "***REDACTED***");
        // Original untouched
        assert_eq!(config.llm.api_key, "sk-secret");
    }

    #[test]
    fn test_thresholds_conversion() {
        let audit = AuditConfig {
            drift_threshold_days: 7,
            bias_threshold: 0.05,
            metadata_path: None,
        };
        let thresholds = audit.thresholds();
        assert_eq!(thresholds.drift_threshold_days, 7);
        assert_eq!(thresholds.bias_threshold, 0.05);
    }
}
