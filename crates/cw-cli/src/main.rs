//! Compliance Warden CLI
//!
//! Command-line interface for the Compliance Warden compliance checker.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

mod config;
mod menu;
mod orchestrator;

use config::{AppConfig, ProviderKind};
use cw_connectors::{
    AzureBlobPublisher, AzureCliResourceProvider, MockResourceProvider, OpenAiSummarizer,
    ResourceProvider,
};
use cw_core::ModelMetadata;
use orchestrator::{sample_model_metadata, Orchestrator};

#[derive(Parser)]
#[command(name = "compliance-warden")]
#[command(version)]
#[command(about = "Compliance checks for cloud resources, ML models, and logs", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run every check and write the JSON, Markdown, and HTML reports
    Check,

    /// Run the infrastructure compliance scan
    Infra {
        /// Also save the scan report as JSON to this path
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Run the model governance audit
    Model,

    /// Run the PII scan
    Pii {
        /// Log file to scan (overrides the configured path)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Run the required-tag policy check
    Tags,

    /// Show the current configuration
    Config {
        /// Show secrets (redacted by default)
        #[arg(long)]
        show_secrets: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    cw_observability::init_logging_with_config(cw_observability::LoggingConfig {
        level: log_level,
        json_format: cli.format == OutputFormat::Json,
        ..Default::default()
    });

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let config = AppConfig::load(&config_path).unwrap_or_else(|_| {
        if cli.verbose {
            eprintln!("Using default configuration (no config file found)");
        }
        AppConfig::default()
    });

    let orchestrator = build_orchestrator(&config)?;

    match cli.command {
        None => menu::run_menu(&orchestrator, &config.output_dir),
        Some(Commands::Check) => cmd_check(&orchestrator, &config, cli.format),
        Some(Commands::Infra { output }) => cmd_infra(&orchestrator, output, cli.format),
        Some(Commands::Model) => cmd_model(&orchestrator, cli.format),
        Some(Commands::Pii { file }) => cmd_pii(&orchestrator, file, cli.format),
        Some(Commands::Tags) => cmd_tags(&orchestrator, cli.format),
        Some(Commands::Config { show_secrets }) => cmd_config(&config, show_secrets, cli.format),
    }
}

fn default_config_path() -> PathBuf {
    PathBuf::from("config/default.yaml")
}

/// Builds the orchestrator from configuration, constructing collaborator
/// handles once and injecting them explicitly.
fn build_orchestrator(config: &AppConfig) -> Result<Orchestrator> {
    let provider: Box<dyn ResourceProvider> = match config.provider.kind {
        ProviderKind::Azure => Box::new(AzureCliResourceProvider::with_az_path(
            &config.provider.az_path,
        )),
        ProviderKind::Sample => Box::new(MockResourceProvider::with_sample_data("sample")),
    };

    let model_metadata = load_model_metadata(config)?;

    let mut orchestrator = Orchestrator::new(provider)
        .with_required_tags(config.required_tags.clone())
        .with_thresholds(config.audit.thresholds())
        .with_model_metadata(model_metadata)
        .with_pii_log_path(config.pii.log_path.clone());

    if config.llm.enabled {
        match OpenAiSummarizer::new(&config.llm.model, &config.llm.api_key, &config.llm.base_url) {
            Ok(summarizer) => orchestrator = orchestrator.with_summarizer(Box::new(summarizer)),
            Err(e) => tracing::warn!(error = %e, "summarizer disabled"),
        }
    }

    if config.publisher.enabled {
        match AzureBlobPublisher::new(
            &config.publisher.account,
            &config.publisher.container,
            &config.publisher.blob_name,
            &config.publisher.sas_token,
        ) {
            Ok(publisher) => orchestrator = orchestrator.with_publisher(Box::new(publisher)),
            Err(e) => tracing::warn!(error = %e, "publisher disabled"),
        }
    }

    Ok(orchestrator)
}

fn load_model_metadata(config: &AppConfig) -> Result<ModelMetadata> {
    match &config.audit.metadata_path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read model metadata: {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse model metadata: {}", path.display()))
        }
        None => Ok(sample_model_metadata()),
    }
}

fn cmd_check(orchestrator: &Orchestrator, config: &AppConfig, format: OutputFormat) -> Result<()> {
    let results = orchestrator.run_all();

    if format == OutputFormat::Json {
        println!("{}", cw_report::render_json(&results)?);
    } else {
        println!("{}", "Compliance Check Results".bold());
        println!("────────────────────────");
        menu::print_results_summary(&results);
    }

    let saved = orchestrator.save_reports(&results, &config.output_dir)?;
    if format == OutputFormat::Text {
        println!();
        println!("JSON report saved to {}", saved.json_path.display());
        println!("Markdown report saved to {}", saved.markdown_path.display());
        println!("HTML report saved to {}", saved.html_path.display());
        if let Some(url) = saved.published_url {
            println!("Report published to {}", url.cyan());
        }
    }

    Ok(())
}

fn cmd_infra(
    orchestrator: &Orchestrator,
    output: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let report = match orchestrator.run_infra_scan() {
        Ok(report) => report,
        Err(e) => {
            println!("{}: {e}", "Infrastructure scan failed".red());
            std::process::exit(1);
        }
    };

    if let Some(path) = &output {
        cw_report::write_report(path, &serde_json::to_string_pretty(&report)?)?;
        println!("Infrastructure report saved to {}", path.display());
    }

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", "Infrastructure Scan".bold());
        println!("───────────────────");
        println!("Total resources: {}", report.summary.total);
        println!("Non-compliant:   {}", report.summary.non_compliant);
        for resource in &report.non_compliant_resources {
            println!(
                "  {} ({}): {}",
                resource.resource_name.cyan(),
                resource.resource_type,
                resource.issues.join("; ")
            );
        }
    }

    Ok(())
}

fn cmd_model(orchestrator: &Orchestrator, format: OutputFormat) -> Result<()> {
    let issues = orchestrator.run_model_audit();

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&issues)?);
    } else {
        println!("{}", "Model Governance Audit".bold());
        println!("──────────────────────");
        if issues.is_empty() {
            println!("{}", "No issues detected.".green());
        } else {
            for issue in &issues {
                println!("  - {issue}");
            }
        }
    }

    Ok(())
}

fn cmd_pii(
    orchestrator: &Orchestrator,
    file: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let result = match &file {
        Some(path) => orchestrator.run_pii_scan_at(path),
        None => orchestrator.run_pii_scan(),
    };

    let findings = match result {
        Ok(findings) => findings,
        Err(e) => {
            println!("{}: {e}", "PII scan failed".red());
            std::process::exit(1);
        }
    };

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&findings)?);
    } else {
        println!("{}", "PII Scan".bold());
        println!("────────");
        let categories = [
            ("email", &findings.email),
            ("phone", &findings.phone),
            ("credit_card", &findings.credit_card),
            ("ssn", &findings.ssn),
        ];
        for (name, matches) in categories {
            if matches.is_empty() {
                println!("  {}: none", name.cyan());
            } else {
                println!("  {}: {}", name.cyan(), matches.join(", "));
            }
        }
    }

    Ok(())
}

fn cmd_tags(orchestrator: &Orchestrator, format: OutputFormat) -> Result<()> {
    let violations = match orchestrator.run_tag_policy() {
        Ok(violations) => violations,
        Err(e) => {
            println!("{}: {e}", "Tag policy check failed".red());
            std::process::exit(1);
        }
    };

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&violations)?);
    } else {
        println!("{}", "Tag Policy Check".bold());
        println!("────────────────");
        if violations.is_empty() {
            println!("{}", "No issues detected.".green());
        } else {
            for violation in &violations {
                println!(
                    "  {} ({}): missing {}",
                    violation.resource_name.cyan(),
                    violation.resource_type,
                    violation.missing_tags.join(", ")
                );
            }
        }
    }

    Ok(())
}

fn cmd_config(config: &AppConfig, show_secrets: bool, format: OutputFormat) -> Result<()> {
    let display_config = if show_secrets {
        config.clone()
    } else {
        config.redact_secrets()
    };

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&display_config)?);
    } else {
        println!("{}", serde_yaml::to_string(&display_config)?);
    }

    Ok(())
}
