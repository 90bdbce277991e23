//! DOCX text — reads `word/document.xml` out of the zip container and walks
//! its WordprocessingML events.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader as XmlReader;
use zip::ZipArchive;

use super::{ExtractionError, TextExtractor};
use crate::models::document::{ExtractedText, ExtractionMethod};

const DOCUMENT_XML: &str = "word/document.xml";

pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::Docx
    }

    fn extract(&self, bytes: &[u8]) -> Result<ExtractedText, ExtractionError> {
        let xml = read_document_xml(bytes)?;
        let text = document_xml_to_text(&xml)?;
        Ok(ExtractedText::new(text, ExtractionMethod::Docx))
    }
}

fn read_document_xml(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractionError::Unreadable(format!("not a zip archive: {e}")))?;
    let mut entry = archive
        .by_name(DOCUMENT_XML)
        .map_err(|e| ExtractionError::Unreadable(format!("missing {DOCUMENT_XML}: {e}")))?;
    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|e| ExtractionError::Unreadable(format!("cannot read {DOCUMENT_XML}: {e}")))?;
    Ok(xml)
}

fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().rposition(|b| *b == b':') {
        Some(idx) => &name[idx + 1..],
        None => name,
    }
}

/// Paragraphs become lines; runs inside a paragraph are concatenated.
fn document_xml_to_text(xml: &str) -> Result<String, ExtractionError> {
    let mut reader = XmlReader::from_str(xml);
    reader.trim_text(false);
    let mut buf = Vec::new();
    let mut out = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if local_name(e.name().as_ref()) == b"t" {
                    in_text = true;
                }
            }
            Ok(Event::Empty(ref e)) => match local_name(e.name().as_ref()) {
                b"tab" => out.push('\t'),
                b"br" | b"cr" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) => {
                if in_text {
                    let text = t
                        .unescape()
                        .unwrap_or_else(|_| String::from_utf8_lossy(t.as_ref()));
                    out.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"t" => in_text = false,
                b"p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractionError::Unreadable(format!(
                    "malformed document.xml at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Write;

    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    use super::*;

    /// Builds a minimal DOCX archive with one paragraph per entry in `paragraphs`.
    pub(crate) fn docx_fixture(paragraphs: &[&str]) -> Vec<u8> {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<w:p><w:r><w:t xml:space=\"preserve\">{p}</w:t></w:r></w:p>"))
            .collect();
        let xml = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
             <w:body>{body}</w:body></w:document>"
        );
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = ZipWriter::new(&mut cursor);
            writer
                .start_file(DOCUMENT_XML, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(xml.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_paragraphs_become_lines() {
        let bytes = docx_fixture(&["Jane Doe", "Senior Engineer | Acme Corp"]);
        let out = DocxExtractor.extract(&bytes).unwrap();
        assert_eq!(out.text, "Jane Doe\nSenior Engineer | Acme Corp\n");
        assert_eq!(out.method, ExtractionMethod::Docx);
    }

    #[test]
    fn test_runs_tabs_and_breaks() {
        let xml = "<w:document xmlns:w=\"x\"><w:body>\
                   <w:p><w:r><w:t>Skills:</w:t></w:r><w:r><w:tab/><w:t>Rust</w:t></w:r>\
                   <w:r><w:br/><w:t>Go &amp; Python</w:t></w:r></w:p>\
                   </w:body></w:document>";
        let text = document_xml_to_text(xml).unwrap();
        assert_eq!(text, "Skills:\tRust\nGo & Python\n");
    }

    #[test]
    fn test_text_outside_w_t_is_ignored() {
        let xml = "<w:document xmlns:w=\"x\"><w:body><w:p>\
                   <w:pPr><w:pStyle w:val=\"Heading1\"/></w:pPr>\
                   <w:r><w:instrText>HYPERLINK</w:instrText><w:t>Experience</w:t></w:r>\
                   </w:p></w:body></w:document>";
        assert_eq!(document_xml_to_text(xml).unwrap(), "Experience\n");
    }

    #[test]
    fn test_archive_without_document_xml_is_unreadable() {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = ZipWriter::new(&mut cursor);
            writer
                .start_file("word/styles.xml", SimpleFileOptions::default())
                .unwrap();
            writer.write_all(b"<styles/>").unwrap();
            writer.finish().unwrap();
        }
        let err = DocxExtractor.extract(&cursor.into_inner()).unwrap_err();
        assert!(matches!(err, ExtractionError::Unreadable(_)));
    }

    #[test]
    fn test_non_zip_bytes_are_unreadable() {
        assert!(matches!(
            DocxExtractor.extract(b"PK not really"),
            Err(ExtractionError::Unreadable(_))
        ));
    }
}
