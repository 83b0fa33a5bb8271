//! PII scanning for log text.
//!
//! Applies a fixed set of regular-expression patterns — email, phone,
//! credit-card-like digit run, SSN — and collects every matching substring
//! per category. Patterns are compiled once into the scanner and are part of
//! the report contract: downstream consumers compare matched substrings
//! across runs, so the patterns must not be tightened or reordered.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while scanning files for PII.
#[derive(Error, Debug)]
pub enum PiiError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

/// PII matches by category.
///
/// Every category is always present; an empty list means nothing matched.
/// Matches are literal substrings in order of occurrence, duplicates
/// preserved, with no cross-category suppression — the same digit run can
/// legitimately show up as both a phone number and a credit card number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiiFindings {
    pub email: Vec<String>,
    pub phone: Vec<String>,
    pub credit_card: Vec<String>,
    pub ssn: Vec<String>,
}

impl PiiFindings {
    /// Returns true when no category matched anything.
    pub fn is_empty(&self) -> bool {
        self.email.is_empty()
            && self.phone.is_empty()
            && self.credit_card.is_empty()
            && self.ssn.is_empty()
    }

    /// Total number of matches across all categories.
    pub fn total_matches(&self) -> usize {
        self.email.len() + self.phone.len() + self.credit_card.len() + self.ssn.len()
    }
}

/// Scanner with the four PII patterns compiled once.
pub struct PiiScanner {
    email: Regex,
    phone: Regex,
    credit_card: Regex,
    ssn: Regex,
}

impl PiiScanner {
    const EMAIL_PATTERN: &'static str = r"[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+";
    const PHONE_PATTERN: &'static str =
        r"\b(?:\+?\d{1,3})?[-.\s]?(?:\(?\d{2,4}\)?)[-.\s]?\d{3,4}[-.\s]?\d{4}\b";
    // Intentionally loose: matches arbitrary 13-16 digit runs (including some
    // phone numbers and timestamps). Report output depends on this behavior.
    const CREDIT_CARD_PATTERN: &'static str = r"\b(?:\d[ -]*?){13,16}\b";
    const SSN_PATTERN: &'static str = r"\b\d{3}-\d{2}-\d{4}\b";

    /// Creates a scanner with the default patterns.
    pub fn new() -> Self {
        // Safe to expect since these are compile-time validated patterns
        Self {
            email: Regex::new(Self::EMAIL_PATTERN).expect("Invalid email pattern"),
            phone: Regex::new(Self::PHONE_PATTERN).expect("Invalid phone pattern"),
            credit_card: Regex::new(Self::CREDIT_CARD_PATTERN)
                .expect("Invalid credit card pattern"),
            ssn: Regex::new(Self::SSN_PATTERN).expect("Invalid SSN pattern"),
        }
    }

    /// Scans text for PII, evaluating categories in fixed order.
    ///
    /// Each category collects all non-overlapping matches of its pattern
    /// against the full text.
    pub fn scan_text(&self, text: &str) -> PiiFindings {
        PiiFindings {
            email: collect_matches(&self.email, text),
            phone: collect_matches(&self.phone, text),
            credit_card: collect_matches(&self.credit_card, text),
            ssn: collect_matches(&self.ssn, text),
        }
    }

    /// Reads a file as UTF-8 text and scans it for PII.
    ///
    /// Fails with [`PiiError::NotFound`] when the path does not resolve to
    /// an existing regular file.
    pub fn scan_file(&self, path: &Path) -> Result<PiiFindings, PiiError> {
        if !path.is_file() {
            return Err(PiiError::NotFound(path.display().to_string()));
        }
        let text = std::fs::read_to_string(path)?;
        Ok(self.scan_text(&text))
    }
}

impl Default for PiiScanner {
    fn default() -> Self {
        Self::new()
    }
}

fn collect_matches(pattern: &Regex, text: &str) -> Vec<String> {
    pattern
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_clean_text_yields_all_empty_categories() {
        let scanner = PiiScanner::new();
        let findings = scanner.scan_text("This is a clean log with no PII.");

        assert_eq!(findings, PiiFindings::default());
        assert!(findings.is_empty());
    }

    #[test]
    fn test_empty_text_is_representable() {
        let scanner = PiiScanner::new();
        let findings = scanner.scan_text("");

        assert!(findings.email.is_empty());
        assert!(findings.phone.is_empty());
        assert!(findings.credit_card.is_empty());
        assert!(findings.ssn.is_empty());
    }

    #[test]
    fn test_detects_email_and_ssn() {
        let scanner = PiiScanner::new();
        let findings =
            scanner.scan_text("Email: jane.doe@company.com\nSSN: 111-22-3333");

        assert_eq!(findings.email, vec!["jane.doe@company.com"]);
        assert_eq!(findings.ssn, vec!["111-22-3333"]);
        assert!(findings.phone.is_empty());
        assert!(findings.credit_card.is_empty());
    }

    #[test]
    fn test_matches_in_order_of_occurrence_with_duplicates() {
        let scanner = PiiScanner::new();
        let findings =
            scanner.scan_text("a@b.com then c@d.org then a@b.com again");

        assert_eq!(findings.email, vec!["a@b.com", "c@d.org", "a@b.com"]);
    }

    #[test]
    fn test_ssn_requires_exact_grouping() {
        let scanner = PiiScanner::new();
        assert!(scanner.scan_text("12-345-6789").ssn.is_empty());
        assert!(scanner.scan_text("123-45-678").ssn.is_empty());
        assert_eq!(scanner.scan_text("123-45-6789").ssn, vec!["123-45-6789"]);
    }

    #[test]
    fn test_phone_formats() {
        let scanner = PiiScanner::new();
        let findings = scanner.scan_text("Call +1 (555) 123-4567 or 555.123.4567");

        assert_eq!(findings.phone.len(), 2);
        assert!(findings.phone[0].contains("555"));
    }

    #[test]
    fn test_credit_card_over_matching_is_preserved() {
        // The digit-run pattern deliberately over-matches: a 13-digit run that
        // is not a card number still reports as credit_card.
        let scanner = PiiScanner::new();
        let findings = scanner.scan_text("ref 1234567890123 end");

        assert_eq!(findings.credit_card, vec!["1234567890123"]);
    }

    #[test]
    fn test_no_cross_category_suppression() {
        // A separated card number also satisfies the phone pattern; both
        // categories report it.
        let scanner = PiiScanner::new();
        let findings = scanner.scan_text("Card: 1234 5678 9012 3456");

        assert!(!findings.credit_card.is_empty());
        assert!(!findings.phone.is_empty());
    }

    #[test]
    fn test_scan_file_reads_contents() {
        let scanner = PiiScanner::new();
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"Contact: john@example.com").unwrap();

        let findings = scanner.scan_file(file.path()).unwrap();
        assert_eq!(findings.email, vec!["john@example.com"]);
    }

    #[test]
    fn test_scan_file_missing_path() {
        let scanner = PiiScanner::new();
        let result = scanner.scan_file(Path::new("/nonexistent/log.txt"));

        assert!(matches!(result, Err(PiiError::NotFound(_))));
    }

    #[test]
    fn test_scan_file_directory_is_not_found() {
        let scanner = PiiScanner::new();
        let dir = tempfile::tempdir().unwrap();

        let result = scanner.scan_file(dir.path());
        assert!(matches!(result, Err(PiiError::NotFound(_))));
    }

    #[test]
    fn test_findings_serialize_all_categories() {
        let findings = PiiFindings {
            email: vec!["a@b.com".to_string()],
            ..Default::default()
        };
        let json = serde_json::to_value(&findings).unwrap();

        // Empty categories stay present in the wire shape.
        assert!(json["phone"].as_array().unwrap().is_empty());
        assert!(json["credit_card"].as_array().unwrap().is_empty());
        assert!(json["ssn"].as_array().unwrap().is_empty());
    }
}
