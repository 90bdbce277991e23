//! PDF text layer — positioned glyphs from `pdf-extract`, rebuilt into reading order.
//!
//! # Architecture
//! - `lopdf` loads the document; `pdf_extract::output_doc` walks every page's
//!   content stream and reports each glyph with its text rendering matrix.
//! - `FragmentCollector` merges glyphs that sit on one baseline into fragments,
//!   each anchored at its `(x, y)` origin.
//! - `page_text` sorts a page's fragments top-to-bottom (descending `y`) then
//!   left-to-right (ascending `x`) and breaks lines on vertical jumps.

use std::cmp::Ordering;

use lopdf::Document;
use pdf_extract::{output_doc, MediaBox, OutputDev, OutputError, Transform};

use super::{ExtractionError, TextExtractor};
use crate::models::document::{ExtractedText, ExtractionMethod};

/// Vertical displacement (PDF units) above which consecutive fragments go on new lines.
const LINE_BREAK_THRESHOLD: f64 = 5.0;
/// Glyphs whose baselines differ by less than this belong to the same fragment.
const BASELINE_TOLERANCE: f64 = 0.5;
/// A gap wider than this fraction of the font size gets a space inside a fragment.
const WORD_GAP_RATIO: f64 = 0.15;
/// A gap wider than this many font sizes starts a new fragment.
const FRAGMENT_GAP_RATIO: f64 = 2.0;

pub struct PdfTextLayerExtractor;

impl TextExtractor for PdfTextLayerExtractor {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::PdfTextLayer
    }

    fn extract(&self, bytes: &[u8]) -> Result<ExtractedText, ExtractionError> {
        let doc = Document::load_mem(bytes)
            .map_err(|e| ExtractionError::Unreadable(format!("cannot load PDF: {e}")))?;

        let mut collector = FragmentCollector::default();
        output_doc(&doc, &mut collector)
            .map_err(|e| ExtractionError::Unreadable(format!("text layer walk failed: {e:?}")))?;

        let page_count = collector.pages.len() as u32;
        let text = collector
            .pages
            .iter()
            .map(|fragments| page_text(fragments.clone()))
            .collect::<Vec<_>>()
            .join("\n\n");

        Ok(ExtractedText::new(text, ExtractionMethod::PdfTextLayer).with_page_count(page_count))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Glyph → fragment collection
// ────────────────────────────────────────────────────────────────────────────

/// A run of text sharing one baseline, anchored at its first glyph.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFragment {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone)]
struct OpenFragment {
    text: String,
    x: f64,
    y: f64,
    end_x: f64,
    font_size: f64,
}

#[derive(Debug, Default)]
struct FragmentCollector {
    pages: Vec<Vec<TextFragment>>,
    open: Option<OpenFragment>,
}

impl FragmentCollector {
    fn flush(&mut self) {
        if let Some(open) = self.open.take() {
            if !open.text.trim().is_empty() {
                if self.pages.is_empty() {
                    self.pages.push(Vec::new());
                }
                if let Some(page) = self.pages.last_mut() {
                    page.push(TextFragment {
                        text: open.text.trim_end().to_string(),
                        x: open.x,
                        y: open.y,
                    });
                }
            }
        }
    }

    fn push_glyph(&mut self, x: f64, y: f64, advance: f64, font_size: f64, glyph: &str) {
        if let Some(open) = self.open.as_mut() {
            let gap = x - open.end_x;
            let size = open.font_size.max(font_size).max(1.0);
            let same_baseline = (y - open.y).abs() < BASELINE_TOLERANCE;
            if same_baseline && gap > -size && gap < size * FRAGMENT_GAP_RATIO {
                if gap > size * WORD_GAP_RATIO && !open.text.ends_with(' ') && glyph != " " {
                    open.text.push(' ');
                }
                open.text.push_str(glyph);
                open.end_x = x + advance;
                return;
            }
        }

        self.flush();
        if glyph.trim().is_empty() {
            return;
        }
        self.open = Some(OpenFragment {
            text: glyph.to_string(),
            x,
            y,
            end_x: x + advance,
            font_size,
        });
    }
}

impl OutputDev for FragmentCollector {
    fn begin_page(
        &mut self,
        _page_num: u32,
        _media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> Result<(), OutputError> {
        self.flush();
        self.pages.push(Vec::new());
        Ok(())
    }

    fn end_page(&mut self) -> Result<(), OutputError> {
        self.flush();
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        _spacing: f64,
        font_size: f64,
        char: &str,
    ) -> Result<(), OutputError> {
        // Effective size: the font size vector pushed through the rendering matrix.
        let sx = font_size * trm.m11 + font_size * trm.m21;
        let sy = font_size * trm.m12 + font_size * trm.m22;
        let size = (sx * sy).abs().sqrt();
        self.push_glyph(trm.m31, trm.m32, width * size, size, char);
        Ok(())
    }

    fn begin_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_line(&mut self) -> Result<(), OutputError> {
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Reading-order reconstruction
// ────────────────────────────────────────────────────────────────────────────

/// Orders one page's fragments and joins them into text.
///
/// Consecutive fragments more than `LINE_BREAK_THRESHOLD` apart vertically are
/// split by a newline; otherwise they share a line separated by one space.
pub fn page_text(mut fragments: Vec<TextFragment>) -> String {
    fragments.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal))
    });

    let mut out = String::new();
    let mut last_y: Option<f64> = None;

    for fragment in &fragments {
        let text = fragment.text.trim();
        if text.is_empty() {
            continue;
        }
        match last_y {
            Some(y) if (y - fragment.y).abs() > LINE_BREAK_THRESHOLD => out.push('\n'),
            Some(_) => {
                if !out.ends_with(' ') && !out.ends_with('\n') {
                    out.push(' ');
                }
            }
            None => {}
        }
        out.push_str(text);
        last_y = Some(fragment.y);
    }

    out
}
