//! Format extractors — turn a `RawDocument` into plain text.
//!
//! Each format maps to an ordered chain of strategies. The chain tries them in
//! order and stops at the first result that clears the minimum-length bar.
//! Intermediate failures are logged and swallowed; only the terminal outcome
//! is surfaced as a `ParseError`.
//!
//! Everything here is synchronous and CPU-bound. Callers run it inside
//! `tokio::task::spawn_blocking`.

pub mod docx;
pub mod pdf;
pub mod raw_stream;

use std::panic::{catch_unwind, AssertUnwindSafe};

use thiserror::Error;
use tracing::{debug, warn};

use crate::errors::{ParseError, DOCX_EXTRACTION_FAILURE_MESSAGE, PDF_EXTRACTION_FAILURE_MESSAGE};
use crate::models::document::{DocumentFormat, ExtractedText, ExtractionMethod, RawDocument};

pub use docx::DocxExtractor;
pub use pdf::PdfTextLayerExtractor;
pub use raw_stream::RawStreamExtractor;

/// Below this, PDF output from either strategy counts as a failure.
pub const MIN_PDF_CHARS: usize = 50;
/// Below this, DOCX output counts as a failure.
pub const MIN_DOCX_CHARS: usize = 20;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("unreadable input: {0}")]
    Unreadable(String),

    #[error("{method} produced {chars} characters (minimum {min})")]
    TooShort {
        method: ExtractionMethod,
        chars: usize,
        min: usize,
    },

    #[error("extractor panicked: {0}")]
    Panicked(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Strategy trait
// ────────────────────────────────────────────────────────────────────────────

/// One way of getting text out of a byte buffer.
pub trait TextExtractor: Send + Sync {
    fn method(&self) -> ExtractionMethod;

    fn extract(&self, bytes: &[u8]) -> Result<ExtractedText, ExtractionError>;
}

/// UTF-8 text with lossy replacement. A leading byte-order mark is dropped.
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::PlainText
    }

    fn extract(&self, bytes: &[u8]) -> Result<ExtractedText, ExtractionError> {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        let text = String::from_utf8_lossy(bytes).into_owned();
        Ok(ExtractedText::new(text, ExtractionMethod::PlainText))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Chain
// ────────────────────────────────────────────────────────────────────────────

/// Ordered strategies plus the minimum char count a result must reach.
pub struct ExtractorChain {
    strategies: Vec<Box<dyn TextExtractor>>,
    min_chars: usize,
}

/// What went wrong with the chain as a whole. `best_chars` is the longest
/// output any strategy managed, used to tell "nothing at all" from "too little".
#[derive(Debug)]
pub struct ChainFailure {
    pub attempts: Vec<(ExtractionMethod, ExtractionError)>,
    pub best_chars: usize,
}

impl ExtractorChain {
    pub fn new(min_chars: usize) -> Self {
        Self {
            strategies: Vec::new(),
            min_chars,
        }
    }

    pub fn with_strategy(mut self, strategy: Box<dyn TextExtractor>) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// The strategy list for a declared format.
    pub fn for_format(format: DocumentFormat) -> Self {
        match format {
            DocumentFormat::Pdf => Self::new(MIN_PDF_CHARS)
                .with_strategy(Box::new(PdfTextLayerExtractor))
                .with_strategy(Box::new(RawStreamExtractor)),
            DocumentFormat::Docx => {
                Self::new(MIN_DOCX_CHARS).with_strategy(Box::new(DocxExtractor))
            }
            DocumentFormat::Text => Self::new(1).with_strategy(Box::new(PlainTextExtractor)),
        }
    }

    pub fn methods(&self) -> Vec<ExtractionMethod> {
        self.strategies.iter().map(|s| s.method()).collect()
    }

    /// Tries each strategy once, in order. No strategy is retried.
    pub fn run(&self, bytes: &[u8]) -> Result<ExtractedText, ChainFailure> {
        let mut attempts = Vec::new();
        let mut best_chars = 0;

        for strategy in &self.strategies {
            let method = strategy.method();
            let outcome = catch_unwind(AssertUnwindSafe(|| strategy.extract(bytes)))
                .unwrap_or_else(|panic| Err(ExtractionError::Panicked(panic_message(&panic))));

            match outcome {
                Ok(extracted) => {
                    let chars = extracted.char_count();
                    best_chars = best_chars.max(chars);
                    if chars >= self.min_chars {
                        debug!(method = %method, chars, "extraction strategy succeeded");
                        return Ok(extracted);
                    }
                    warn!(
                        method = %method,
                        chars,
                        min = self.min_chars,
                        "extraction strategy under-produced; trying next"
                    );
                    attempts.push((
                        method,
                        ExtractionError::TooShort {
                            method,
                            chars,
                            min: self.min_chars,
                        },
                    ));
                }
                Err(e) => {
                    warn!(method = %method, error = %e, "extraction strategy failed; trying next");
                    attempts.push((method, e));
                }
            }
        }

        Err(ChainFailure {
            attempts,
            best_chars,
        })
    }
}

fn panic_message(panic: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Runs the chain for the document's format and maps the terminal failure to
/// the single user-facing error for that format.
pub fn extract_text(doc: &RawDocument) -> Result<ExtractedText, ParseError> {
    let chain = ExtractorChain::for_format(doc.format());
    chain.run(doc.bytes()).map_err(|failure| {
        warn!(
            format = %doc.format(),
            attempts = failure.attempts.len(),
            best_chars = failure.best_chars,
            "all extraction strategies failed"
        );
        match doc.format() {
            DocumentFormat::Pdf => {
                ParseError::ExtractionFailure(PDF_EXTRACTION_FAILURE_MESSAGE.to_string())
            }
            DocumentFormat::Docx if failure.best_chars > 0 => {
                ParseError::ExtractionFailure(DOCX_EXTRACTION_FAILURE_MESSAGE.to_string())
            }
            DocumentFormat::Docx => {
                let unreadable = failure
                    .attempts
                    .iter()
                    .any(|(_, e)| !matches!(e, ExtractionError::TooShort { .. }));
                if unreadable {
                    ParseError::ExtractionFailure(DOCX_EXTRACTION_FAILURE_MESSAGE.to_string())
                } else {
                    ParseError::EmptyExtraction
                }
            }
            DocumentFormat::Text => ParseError::EmptyExtraction,
        }
    })
}
