use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::document::ExtractionMethod;

pub const UNKNOWN_ROLE: &str = "Unknown Role";
pub const UNKNOWN_COMPANY: &str = "Unknown Company";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedHeader {
    pub name: String,
    pub title: String,
}

/// Contact fields found anywhere in the document. Every field is independent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
}

impl ContactInfo {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.phone.is_none()
            && self.linkedin.is_none()
            && self.github.is_none()
            && self.website.is_none()
            && self.location.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceItem {
    pub role: String,
    pub company: String,
    /// Free-form date range exactly as written, e.g. `Jan 2020 - Present`.
    pub period: String,
    pub bullets: Vec<String>,
    /// Short client or engagement note, e.g. from a `Client: Globex` line.
    pub client: Option<String>,
}

impl ExperienceItem {
    /// Identity used to merge repeated mentions of one position.
    /// Literal match on trimmed, lowercased fields; no fuzzy matching.
    pub fn dedup_key(&self) -> String {
        dedup_key(&self.company, &self.role, &self.period)
    }
}

pub fn dedup_key(company: &str, role: &str, period: &str) -> String {
    format!(
        "{}|{}|{}",
        company.trim().to_lowercase(),
        role.trim().to_lowercase(),
        period.trim().to_lowercase()
    )
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationItem {
    pub degree: String,
    pub institution: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillCategory {
    pub category: String,
    /// Comma-delimited skill list.
    pub skills: String,
}

/// Which optional sections produced any content. Drives what the editor shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionVisibility {
    pub summary: bool,
    pub experience: bool,
    pub education: bool,
    pub skills: bool,
}

/// The structured record handed to callers. Everything else in the pipeline
/// is created and dropped inside one parse call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    pub header: ParsedHeader,
    pub contact: ContactInfo,
    pub summary: String,
    pub skills: Vec<SkillCategory>,
    pub experience: Vec<ExperienceItem>,
    pub education: Vec<EducationItem>,
    pub visibility: SectionVisibility,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionDiagnostics {
    pub method: ExtractionMethod,
    pub page_count: Option<u32>,
    pub char_count: usize,
    pub line_count: usize,
    /// Set when the raw-stream fallback produced the text; section detection
    /// on such input is best-effort.
    pub low_confidence: bool,
    /// Detected section kinds in document order, e.g. `["summary", "experience"]`.
    pub sections_detected: Vec<String>,
    pub parsed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_key_is_case_and_whitespace_insensitive() {
        assert_eq!(
            dedup_key(" Acme Corp ", "Senior Engineer", "Jan 2020 - Present"),
            dedup_key("acme corp", "SENIOR ENGINEER ", "jan 2020 - present")
        );
    }

    #[test]
    fn test_dedup_key_keeps_punctuation_differences_distinct() {
        assert_ne!(
            dedup_key("Acme Corp.", "Engineer", "2020 - 2021"),
            dedup_key("Acme Corp", "Engineer", "2020 - 2021")
        );
    }

    #[test]
    fn test_visibility_serializes_flat() {
        let json = serde_json::to_value(SectionVisibility {
            summary: true,
            experience: false,
            education: true,
            skills: false,
        })
        .unwrap();
        assert_eq!(json["summary"], true);
        assert_eq!(json["experience"], false);
    }

    #[test]
    fn test_contact_info_is_empty() {
        assert!(ContactInfo::default().is_empty());
        let contact = ContactInfo {
            email: Some("a@b.co".to_string()),
            ..Default::default()
        };
        assert!(!contact.is_empty());
    }
}
