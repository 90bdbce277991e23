//! Parse pipeline — bytes in, `ParseResult` out.
//!
//! extract → normalize → segment → contact/header → experience, education,
//! skills, summary → assemble. Every stage is a pure function over the
//! previous stage's output; nothing is shared between calls.

pub mod contact;
pub mod education;
pub mod experience;
pub mod handlers;
pub mod normalize;
pub mod patterns;
pub mod sections;
pub mod skills;

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::errors::ParseError;
use crate::extract::extract_text;
use crate::models::document::{ExtractedText, RawDocument};
use crate::models::resume::{ExtractionDiagnostics, ParseResult, SectionVisibility};
use crate::parser::sections::SectionKind;

/// Normalized text shorter than this is not worth segmenting.
pub const MIN_CONTENT_CHARS: usize = 20;

#[derive(Debug, Clone, Serialize)]
pub struct ParseOutcome {
    pub result: ParseResult,
    pub diagnostics: ExtractionDiagnostics,
}

/// Runs the whole pipeline on the blocking pool as one awaited unit.
pub async fn parse_document(doc: RawDocument) -> Result<ParseOutcome, ParseError> {
    tokio::task::spawn_blocking(move || parse_blocking(&doc))
        .await
        .map_err(|e| ParseError::TaskFailed(e.to_string()))?
}

pub fn parse_blocking(doc: &RawDocument) -> Result<ParseOutcome, ParseError> {
    let extracted = extract_text(doc)?;
    parse_extracted(extracted)
}

/// Everything after extraction.
pub fn parse_extracted(extracted: ExtractedText) -> Result<ParseOutcome, ParseError> {
    let normalized = normalize::normalize(&extracted.text);
    if normalized.is_empty() {
        return Err(ParseError::EmptyExtraction);
    }
    let chars = normalized.char_count();
    if chars < MIN_CONTENT_CHARS {
        return Err(ParseError::InsufficientContent { chars });
    }

    let lines = normalized.lines();
    let sections = sections::segment(lines);
    let first_section = sections.first_start();

    let header = contact::extract_header(lines, first_section);
    let contact = contact::extract_contact(lines, first_section);
    let summary =
        skills::reconstruct_summary(sections.lines_until_boundary(SectionKind::Summary, lines));
    let experience =
        experience::reconstruct_experience(sections.lines(SectionKind::Experience, lines));
    let education =
        education::reconstruct_education(sections.lines_until_boundary(SectionKind::Education, lines));
    let skills =
        skills::reconstruct_skills(sections.lines_until_boundary(SectionKind::Skills, lines));

    let visibility = SectionVisibility {
        summary: !summary.is_empty(),
        experience: !experience.is_empty(),
        education: !education.is_empty(),
        skills: !skills.is_empty(),
    };

    let diagnostics = ExtractionDiagnostics {
        method: extracted.method,
        page_count: extracted.page_count,
        char_count: chars,
        line_count: normalized.len(),
        low_confidence: extracted.method.is_low_confidence(),
        sections_detected: sections
            .kinds()
            .iter()
            .map(|kind| kind.as_str().to_string())
            .collect(),
        parsed_at: Utc::now(),
    };

    info!(
        method = %extracted.method,
        pages = ?extracted.page_count,
        chars,
        sections = ?diagnostics.sections_detected,
        experience = experience.len(),
        education = education.len(),
        skills = skills.len(),
        "résumé parsed"
    );

    Ok(ParseOutcome {
        result: ParseResult {
            header,
            contact,
            summary,
            skills,
            experience,
            education,
            visibility,
        },
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::docx::tests::docx_fixture;
    use crate::extract::raw_stream::tests::malformed_pdf_with_text;
    use crate::models::document::{DocumentFormat, ExtractionMethod};

    const SAMPLE: &str = "Jane Doe
Senior Software Engineer
jane.doe@example.com | (555) 123-4567 | Austin, TX
Summary
Backend engineer with ten years of experience.
Experience
Senior Engineer | Acme Corp
Jan 2020 - Present
• Led a team of 5
• Shipped feature X
2017 - 2019
Data Analyst - Beta Inc
• Built dashboards
Education
B.S. Computer Science
University of Texas
Skills
Languages: Python, Go
Languages: Rust
";

    #[tokio::test]
    async fn test_text_document_full_pipeline() {
        let doc = RawDocument::new(SAMPLE.as_bytes().to_vec(), DocumentFormat::Text);
        let outcome = parse_document(doc).await.unwrap();
        let result = outcome.result;

        assert_eq!(result.header.name, "Jane Doe");
        assert_eq!(result.header.title, "Senior Software Engineer");
        assert_eq!(result.contact.email.as_deref(), Some("jane.doe@example.com"));
        assert_eq!(result.contact.location.as_deref(), Some("Austin, TX"));
        assert_eq!(result.summary, "Backend engineer with ten years of experience.");

        assert_eq!(result.experience.len(), 2);
        assert_eq!(result.experience[0].role, "Senior Engineer");
        assert_eq!(result.experience[0].company, "Acme Corp");
        assert_eq!(result.experience[0].period, "Jan 2020 - Present");
        assert_eq!(result.experience[0].bullets, vec!["Led a team of 5", "Shipped feature X"]);
        assert_eq!(result.experience[1].role, "Data Analyst");
        assert_eq!(result.experience[1].company, "Beta Inc");
        assert_eq!(result.experience[1].period, "2017 - 2019");

        assert_eq!(result.education.len(), 1);
        assert_eq!(result.education[0].institution, "University of Texas");

        assert_eq!(result.skills.len(), 1);
        assert_eq!(result.skills[0].skills, "Python, Go, Rust");

        assert!(result.visibility.summary);
        assert!(result.visibility.experience);
        assert!(result.visibility.education);
        assert!(result.visibility.skills);

        let diagnostics = outcome.diagnostics;
        assert_eq!(diagnostics.method, ExtractionMethod::PlainText);
        assert!(!diagnostics.low_confidence);
        assert_eq!(
            diagnostics.sections_detected,
            vec!["summary", "experience", "education", "skills"]
        );
    }

    #[tokio::test]
    async fn test_docx_document_parses() {
        let bytes = docx_fixture(&[
            "John Smith",
            "Experience",
            "Platform Engineer | Globex",
            "2018 - 2022",
            "• Ran the on-call rotation",
        ]);
        let doc = RawDocument::from_file_name("resume.docx", bytes).unwrap();
        let outcome = parse_document(doc).await.unwrap();

        assert_eq!(outcome.diagnostics.method, ExtractionMethod::Docx);
        assert_eq!(outcome.result.header.name, "John Smith");
        assert_eq!(outcome.result.experience.len(), 1);
        assert_eq!(outcome.result.experience[0].company, "Globex");
        assert_eq!(outcome.result.experience[0].bullets, vec!["Ran the on-call rotation"]);
        assert!(!outcome.result.visibility.education);
    }

    #[tokio::test]
    async fn test_malformed_pdf_uses_low_confidence_fallback() {
        let doc = RawDocument::new(malformed_pdf_with_text(), DocumentFormat::Pdf);
        let outcome = parse_document(doc).await.unwrap();

        assert_eq!(outcome.diagnostics.method, ExtractionMethod::PdfRawStream);
        assert!(outcome.diagnostics.low_confidence);
        assert!(outcome.diagnostics.char_count >= MIN_CONTENT_CHARS);
        assert_eq!(outcome.diagnostics.page_count, None);
    }

    #[tokio::test]
    async fn test_corrupted_pdf_is_a_single_extraction_failure() {
        let doc = RawDocument::new(b"%PDF-1.4\n(x) garbage\n%%EOF".to_vec(), DocumentFormat::Pdf);
        let err = parse_document(doc).await.unwrap_err();
        assert!(matches!(err, ParseError::ExtractionFailure(_)));
    }

    #[test]
    fn test_short_text_is_insufficient_content() {
        let extracted = ExtractedText::new("Jane Doe".to_string(), ExtractionMethod::PlainText);
        assert!(matches!(
            parse_extracted(extracted),
            Err(ParseError::InsufficientContent { chars: 8 })
        ));
    }

    #[test]
    fn test_whitespace_only_text_is_empty_extraction() {
        let extracted = ExtractedText::new("  \n\t\n---\n".to_string(), ExtractionMethod::PlainText);
        assert!(matches!(parse_extracted(extracted), Err(ParseError::EmptyExtraction)));
    }

    #[test]
    fn test_missing_sections_hide_their_flags() {
        let extracted = ExtractedText::new(
            "Jane Doe\nWriter of long and careful letters".to_string(),
            ExtractionMethod::PlainText,
        );
        let outcome = parse_extracted(extracted).unwrap();
        assert_eq!(outcome.result.visibility, SectionVisibility::default());
        assert!(outcome.diagnostics.sections_detected.is_empty());
    }
}
