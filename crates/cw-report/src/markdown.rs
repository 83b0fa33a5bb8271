//! Markdown rendering of a report view.

use crate::view::{ReportView, SectionBody, SubsectionBody};

/// Renders the report view as Markdown text.
pub fn render_markdown(view: &ReportView) -> String {
    let mut lines = vec![
        "# Compliance Report".to_string(),
        format!("Generated: {}", view.generated_at),
        "---".to_string(),
    ];

    if let Some(summary) = &view.executive_summary {
        lines.push("## Executive Summary".to_string());
        lines.push(summary.clone());
        lines.push(String::new());
    }

    for section in &view.sections {
        lines.push(format!("## {}", section.title));

        match &section.body {
            SectionBody::NoIssues => {
                lines.push("No issues detected.".to_string());
                lines.push(String::new());
            }
            SectionBody::Bullets(items) => {
                for item in items {
                    lines.push(format!("- {item}"));
                }
                lines.push(String::new());
            }
            SectionBody::Subsections(subsections) => {
                for subsection in subsections {
                    lines.push(format!("### {}", subsection.title));
                    match &subsection.body {
                        SubsectionBody::Line(line) => lines.push(format!("- {line}")),
                        SubsectionBody::Bullets(items) => {
                            for item in items {
                                lines.push(format!("- {item}"));
                            }
                        }
                    }
                    lines.push(String::new());
                }
            }
        }
    }

    lines.join("\n")
}
