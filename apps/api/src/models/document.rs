use std::fmt;
use std::path::Path;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::errors::ParseError;

/// Declared format of an uploaded résumé. Restricted to the three inputs the
/// extractors understand; anything else is rejected before extraction begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Text,
}

impl DocumentFormat {
    /// Parses an extension or explicit format tag (`pdf`, `docx`, `txt`, `text`).
    /// A leading dot and ASCII case are ignored.
    pub fn from_tag(tag: &str) -> Result<Self, ParseError> {
        let normalized = tag.trim().trim_start_matches('.').to_ascii_lowercase();
        match normalized.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            "txt" | "text" => Ok(DocumentFormat::Text),
            _ => Err(ParseError::UnsupportedFormat(tag.trim().to_string())),
        }
    }

    /// Derives the format from the extension of a file name such as `cv.PDF`.
    pub fn from_file_name(file_name: &str) -> Result<Self, ParseError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ParseError::UnsupportedFormat(file_name.to_string()))?;
        Self::from_tag(extension)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
            DocumentFormat::Text => "text",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable upload buffer plus its declared format.
/// Consumed once by the matching extractor chain.
#[derive(Debug, Clone)]
pub struct RawDocument {
    bytes: Bytes,
    format: DocumentFormat,
}

impl RawDocument {
    pub fn new(bytes: impl Into<Bytes>, format: DocumentFormat) -> Self {
        Self {
            bytes: bytes.into(),
            format,
        }
    }

    pub fn from_file_name(file_name: &str, bytes: impl Into<Bytes>) -> Result<Self, ParseError> {
        let format = DocumentFormat::from_file_name(file_name)?;
        Ok(Self::new(bytes, format))
    }

    /// Reads a file from disk. The format check runs before the read so an
    /// unsupported extension never touches the filesystem.
    pub async fn from_path(path: &Path) -> anyhow::Result<Self> {
        let file_name = path.to_string_lossy();
        let format = DocumentFormat::from_file_name(&file_name)?;
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::new(bytes, format))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Which extractor produced the text. `PdfRawStream` output is unordered and
/// lower-confidence; diagnostics carry that flag through to the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    PlainText,
    Docx,
    PdfTextLayer,
    PdfRawStream,
}

impl ExtractionMethod {
    pub fn is_low_confidence(&self) -> bool {
        matches!(self, ExtractionMethod::PdfRawStream)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMethod::PlainText => "plain_text",
            ExtractionMethod::Docx => "docx",
            ExtractionMethod::PdfTextLayer => "pdf_text_layer",
            ExtractionMethod::PdfRawStream => "pdf_raw_stream",
        }
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plain text produced by one extractor, with the metadata needed for diagnostics.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub text: String,
    pub method: ExtractionMethod,
    /// Only known when the PDF text layer was read.
    pub page_count: Option<u32>,
}

impl ExtractedText {
    pub fn new(text: String, method: ExtractionMethod) -> Self {
        Self {
            text,
            method,
            page_count: None,
        }
    }

    pub fn with_page_count(mut self, pages: u32) -> Self {
        self.page_count = Some(pages);
        self
    }

    /// Character count of the trimmed text; the unit every threshold is expressed in.
    pub fn char_count(&self) -> usize {
        self.text.trim().chars().count()
    }
}
