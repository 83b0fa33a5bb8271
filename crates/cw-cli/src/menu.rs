//! Interactive menu for the Compliance Warden CLI.
//!
//! A five-choice loop: run the infrastructure scan, the model audit, or the
//! PII scan; generate the compliance report (with an optional save); exit.
//! Results accumulate across choices within the session, so the generated
//! report covers whatever checks have been run so far.

use crate::orchestrator::Orchestrator;
use anyhow::Result;
use colored::Colorize;
use cw_core::{CheckResult, ComplianceResults};
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Runs the interactive menu loop until the user exits.
pub fn run_menu(orchestrator: &Orchestrator, output_dir: &Path) -> Result<()> {
    println!(
        "{}",
        "Welcome to the Compliance Warden assistant".bold()
    );

    let mut results = ComplianceResults::new();
    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        println!();
        println!("Please choose an option:");
        println!("1. Run Infrastructure Scan");
        println!("2. Run Model Governance Audit");
        println!("3. Run PII Data Exposure Scan");
        println!("4. Generate Compliance Report");
        println!("5. Exit");

        let choice = prompt(&mut input, "Enter choice [1-5]: ")?;

        match choice.as_str() {
            "1" => run_infra(orchestrator, &mut results),
            "2" => run_model(orchestrator, &mut results),
            "3" => run_pii(orchestrator, &mut results),
            "4" => generate_report(orchestrator, &results, output_dir, &mut input)?,
            "5" => {
                println!("Exiting assistant. Goodbye!");
                return Ok(());
            }
            _ => println!("Invalid choice, please try again."),
        }
    }
}

fn run_infra(orchestrator: &Orchestrator, results: &mut ComplianceResults) {
    println!("Running Infrastructure Scan...");
    match orchestrator.run_infra_scan() {
        Ok(report) => {
            println!(
                "Infrastructure Scan completed: {} of {} resources non-compliant.",
                report.summary.non_compliant, report.summary.total
            );
            results.insert(CheckResult::Infrastructure(report));
        }
        Err(e) => println!("{}: {e}", "Infrastructure scan failed".red()),
    }
}

fn run_model(orchestrator: &Orchestrator, results: &mut ComplianceResults) {
    println!("Running Model Governance Audit...");
    let issues = orchestrator.run_model_audit();
    if issues.is_empty() {
        println!("Model Audit completed: no issues detected.");
    } else {
        println!("Model Audit completed: {} issue(s) detected.", issues.len());
        for issue in &issues {
            println!("  - {issue}");
        }
    }
    results.insert(CheckResult::ModelAudit(issues));
}

fn run_pii(orchestrator: &Orchestrator, results: &mut ComplianceResults) {
    println!("Running PII Data Exposure Scan...");
    match orchestrator.run_pii_scan() {
        Ok(findings) => {
            println!(
                "PII Scan completed: {} match(es) found.",
                findings.total_matches()
            );
            results.insert(CheckResult::PiiScan(findings));
        }
        Err(e) => println!("{}: {e}", "PII scan failed".red()),
    }
}

fn generate_report(
    orchestrator: &Orchestrator,
    results: &ComplianceResults,
    output_dir: &Path,
    input: &mut impl BufRead,
) -> Result<()> {
    if results.is_empty() {
        println!("No scan results available. Please run scans first.");
        return Ok(());
    }

    println!();
    println!("{}", "=== Compliance Report Summary ===".bold());
    print_results_summary(results);
    println!("{}", "=================================".bold());

    loop {
        let save = prompt(input, "Save report to file? (y/n): ")?;
        match save.to_lowercase().as_str() {
            "y" => {
                let saved = orchestrator.save_reports(results, output_dir)?;
                println!("JSON report saved to {}", saved.json_path.display());
                println!("Markdown report saved to {}", saved.markdown_path.display());
                println!("HTML report saved to {}", saved.html_path.display());
                if let Some(url) = saved.published_url {
                    println!("Report published to {}", url.cyan());
                }
                break;
            }
            "n" => break,
            _ => println!("Please enter 'y' or 'n'."),
        }
    }

    Ok(())
}

/// Prints one status line per recorded check.
pub fn print_results_summary(results: &ComplianceResults) {
    for result in results.iter() {
        let status = match result {
            CheckResult::Infrastructure(report) => format!(
                "{} resources scanned, {} non-compliant",
                report.summary.total, report.summary.non_compliant
            ),
            CheckResult::ModelAudit(issues) => format!("{} issue(s)", issues.len()),
            CheckResult::TagPolicy(violations) => format!("{} violation(s)", violations.len()),
            CheckResult::PiiScan(findings) => format!("{} match(es)", findings.total_matches()),
        };
        println!("{}: {status}", result.kind().as_str().cyan());
    }
}

fn prompt(input: &mut impl BufRead, message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        anyhow::bail!("input stream closed");
    }
    Ok(line.trim().to_string())
}
