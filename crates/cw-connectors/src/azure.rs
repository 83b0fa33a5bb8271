//! Azure connectors.
//!
//! Resource inventory via the `az` CLI (reusing the operator's existing CLI
//! login rather than carrying a credential flow of our own), and report
//! publishing via an Azure Blob Storage SAS URL.

use crate::traits::{
    ConnectorError, ConnectorResult, ReportPublisher, ResourceProvider,
};
use cw_core::Resource;
use std::process::Command;
use std::time::Duration;
use tracing::{debug, info};

/// Lists resources in the current Azure subscription through the `az` CLI.
pub struct AzureCliResourceProvider {
    az_path: String,
}

impl AzureCliResourceProvider {
    /// Creates a provider that invokes `az` from the PATH.
    pub fn new() -> Self {
        Self::with_az_path("az")
    }

    /// Creates a provider with an explicit path to the `az` binary.
    pub fn with_az_path(az_path: impl Into<String>) -> Self {
        Self {
            az_path: az_path.into(),
        }
    }

    /// Returns the current subscription ID from the Azure CLI.
    pub fn subscription_id(&self) -> ConnectorResult<String> {
        let output = self
            .run_az(&["account", "show", "--query", "id", "-o", "tsv"])?;
        Ok(output.trim().to_string())
    }

    fn run_az(&self, args: &[&str]) -> ConnectorResult<String> {
        let output = Command::new(&self.az_path)
            .args(args)
            .output()
            .map_err(|e| {
                ConnectorError::ExternalServiceFailure(format!(
                    "failed to invoke {}: {e}",
                    self.az_path
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ConnectorError::ExternalServiceFailure(format!(
                "az {} exited with {}: {}",
                args.join(" "),
                output.status,
                stderr.trim()
            )));
        }

        String::from_utf8(output.stdout).map_err(|e| {
            ConnectorError::InvalidResponse(format!("az output is not UTF-8: {e}"))
        })
    }
}

impl Default for AzureCliResourceProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceProvider for AzureCliResourceProvider {
    fn name(&self) -> &str {
        "azure_cli"
    }

    fn list_resources(&self) -> ConnectorResult<Vec<Resource>> {
        let subscription = self.subscription_id()?;
        debug!(subscription = %subscription, "listing Azure resources");

        let raw = self.run_az(&["resource", "list", "-o", "json"])?;
        let resources: Vec<Resource> = serde_json::from_str(&raw).map_err(|e| {
            ConnectorError::InvalidResponse(format!("failed to parse az resource list: {e}"))
        })?;

        info!(count = resources.len(), "fetched Azure resource inventory");
        Ok(resources)
    }
}

/// Publishes rendered HTML to an Azure Blob Storage container via SAS URL.
pub struct AzureBlobPublisher {
    account: String,
    container: String,
    blob_name: String,
    sas_token: String,
    client: reqwest::blocking::Client,
}

impl AzureBlobPublisher {
    /// Creates a publisher for the given account, container, and blob name.
    ///
    /// `sas_token` is the query-string portion of a SAS grant with write
    /// permission on the container.
    pub fn new(
        account: impl Into<String>,
        container: impl Into<String>,
        blob_name: impl Into<String>,
        sas_token: impl Into<String>,
    ) -> ConnectorResult<Self> {
        let account = account.into();
        let sas_token = sas_token.into();
        if account.is_empty() || sas_token.is_empty() {
            return Err(ConnectorError::ConfigError(
                "blob publisher requires a storage account name and SAS token".to_string(),
            ));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ConnectorError::ConfigError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            account,
            container: container.into(),
            blob_name: blob_name.into(),
            sas_token,
            client,
        })
    }

    fn blob_url(&self) -> String {
        format!(
            "https://{}.blob.core.windows.net/{}/{}",
            self.account, self.container, self.blob_name
        )
    }

    /// URL the published report is readable at.
    ///
    /// Blobs in the `$web` container are served by the account's static
    /// website endpoint instead of the blob endpoint.
    pub fn public_url(&self) -> String {
        if self.container == "$web" {
            format!(
                "https://{}.z8.web.core.windows.net/{}",
                self.account, self.blob_name
            )
        } else {
            self.blob_url()
        }
    }
}

impl ReportPublisher for AzureBlobPublisher {
    fn name(&self) -> &str {
        "azure_blob"
    }

    fn publish(&self, html: &[u8]) -> ConnectorResult<String> {
        let url = format!("{}?{}", self.blob_url(), self.sas_token);

        let response = self
            .client
            .put(&url)
            .header("x-ms-blob-type", "BlockBlob")
            .header("Content-Type", "text/html")
            .body(html.to_vec())
            .send()
            .map_err(|e| {
                ConnectorError::ExternalServiceFailure(format!("blob upload failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ConnectorError::ExternalServiceFailure(format!(
                "blob upload returned {status}: {}",
                body.trim()
            )));
        }

        info!(url = %self.public_url(), "report published");
        Ok(self.public_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_reports_invocation_failure() {
        let provider = AzureCliResourceProvider::with_az_path("/nonexistent/az-binary");
        let result = provider.list_resources();

        assert!(matches!(
            result,
            Err(ConnectorError::ExternalServiceFailure(_))
        ));
    }

    #[test]
    fn test_resource_parsing_from_az_json() {
        // Shape of `az resource list -o json`, including null tags.
        let raw = r#"[
            {"name": "vm-1", "type": "Microsoft.Compute/virtualMachines", "tags": {"env": "prod"}},
            {"name": "st-1", "type": "Microsoft.Storage/storageAccounts", "tags": null}
        ]"#;
        let resources: Vec<Resource> = serde_json::from_str(raw).unwrap();

        assert_eq!(resources.len(), 2);
        assert!(resources[0].has_tag("env"));
        assert!(resources[1].tags.is_empty());
    }

    #[test]
    fn test_publisher_requires_account_and_token() {
        let result = AzureBlobPublisher::new("", "$web", "index.html", "sig=abc");
        assert!(matches!(result, Err(ConnectorError::ConfigError(_))));

        let result = AzureBlobPublisher::new("acct", "$web", "index.html", "");
        assert!(matches!(result, Err(ConnectorError::ConfigError(_))));
    }

    #[test]
    fn test_public_url_for_web_container() {
        let publisher =
            AzureBlobPublisher::new("demost", "$web", "index.html", "sig=abc").unwrap();
        assert_eq!(
            publisher.public_url(),
            "https://demost.z8.web.core.windows.net/index.html"
        );
    }

    #[test]
    fn test_public_url_for_plain_container() {
        let publisher =
            AzureBlobPublisher::new("demost", "reports", "report.html", "sig=abc").unwrap();
        assert_eq!(
            publisher.public_url(),
            "https://demost.blob.core.windows.net/reports/report.html"
        );
    }
}
