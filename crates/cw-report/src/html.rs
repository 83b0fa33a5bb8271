//! HTML rendering of a report view.
//!
//! Rendered through an Askama template; every interpolation is escaped by
//! the template engine, so scanned content (a PII match, a resource name, an
//! LLM-written summary) cannot inject markup into the report page.

use crate::view::{ReportView, SectionView};
use crate::ReportError;
use askama::Template;

#[allow(unused_imports)]
use crate::view::{SectionBody, Subsection, SubsectionBody};

#[derive(Template)]
#[template(path = "report.html")]
struct ReportTemplate<'a> {
    generated_at: &'a str,
    executive_summary: Option<&'a str>,
    sections: &'a [SectionView],
}

/// Renders the report view as a standalone HTML page.
pub fn render_html(view: &ReportView) -> Result<String, ReportError> {
    let template = ReportTemplate {
        generated_at: &view.generated_at,
        executive_summary: view.executive_summary.as_deref(),
        sections: &view.sections,
    };
    Ok(template.render()?)
}
