//! Raw PDF byte-stream tokenizer — the last-resort fallback.
//!
//! No object model, no fonts, no layout. Two passes over the bytes:
//! 1. Inside `BT … ET` text blocks, collect strings shown by `Tj`, `'`, `"`
//!    and the string members of `[…] TJ` arrays.
//! 2. Anywhere outside those blocks, collect parenthesised strings that are
//!    printable and contain a letter.
//!
//! `FlateDecode` stream bodies are inflated and scanned the same way.
//! Output is deduplicated by exact match and joined with single spaces; line
//! structure is not preserved and structural noise can slip through.

use std::collections::HashSet;
use std::io::Read;
use std::ops::Range;

use flate2::read::{DeflateDecoder, ZlibDecoder};
use tracing::debug;

use super::{ExtractionError, TextExtractor};
use crate::models::document::{ExtractedText, ExtractionMethod};

/// Literal strings longer than this are treated as binary noise.
const MAX_LITERAL_BYTES: usize = 1024;
/// A `BT` with no `ET` within this many bytes is abandoned.
const MAX_BLOCK_BYTES: usize = 64 * 1024;
/// Loose (out-of-block) strings shorter than this are ignored.
const MIN_LOOSE_CHARS: usize = 3;
/// `TJ` adjustments at or below this (thousandths of an em) read as a word space.
const TJ_SPACE_ADJUSTMENT: f64 = -250.0;
/// Cap on inflated stream size.
const MAX_INFLATED_BYTES: u64 = 8 * 1024 * 1024;
/// How far before a `stream` keyword to look for its `/FlateDecode` filter.
const FILTER_LOOKBEHIND: usize = 1024;

pub struct RawStreamExtractor;

impl TextExtractor for RawStreamExtractor {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::PdfRawStream
    }

    fn extract(&self, bytes: &[u8]) -> Result<ExtractedText, ExtractionError> {
        Ok(ExtractedText::new(
            scan_pdf_bytes(bytes),
            ExtractionMethod::PdfRawStream,
        ))
    }
}

/// Scans the raw file and every inflatable stream body.
pub fn scan_pdf_bytes(bytes: &[u8]) -> String {
    let mut tokens = TokenSet::default();
    scan_buffer(bytes, &mut tokens);

    let mut inflated = 0usize;
    for body in flate_stream_bodies(bytes) {
        inflated += 1;
        scan_buffer(&body, &mut tokens);
    }

    debug!(tokens = tokens.len(), inflated, "raw stream scan finished");
    tokens.join()
}

fn scan_buffer(buf: &[u8], tokens: &mut TokenSet) {
    let blocks = text_block_pass(buf, tokens);
    loose_string_pass(buf, &blocks, tokens);
}

// ────────────────────────────────────────────────────────────────────────────
// Ordered, deduplicated token collection
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct TokenSet {
    ordered: Vec<String>,
    seen: HashSet<String>,
}

impl TokenSet {
    fn push(&mut self, raw: String) {
        let token = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if token.is_empty() || !token.chars().any(char::is_alphabetic) {
            return;
        }
        if self.seen.insert(token.clone()) {
            self.ordered.push(token);
        }
    }

    fn len(&self) -> usize {
        self.ordered.len()
    }

    fn join(&self) -> String {
        self.ordered.join(" ")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Lexer
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, PartialEq)]
enum Token<'a> {
    Str(Vec<u8>),
    Number(f64),
    ArrayStart,
    ArrayEnd,
    Operator(&'a [u8]),
    Other,
}

fn is_delimiter(b: u8) -> bool {
    matches!(b, b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%')
}

struct Lexer<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }
}

impl<'a> Iterator for Lexer<'a> {
    /// `(start, end, token)`
    type Item = (usize, usize, Token<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        let buf = self.buf;
        while self.pos < buf.len() && (buf[self.pos].is_ascii_whitespace() || buf[self.pos] == 0) {
            self.pos += 1;
        }
        if self.pos >= buf.len() {
            return None;
        }

        let start = self.pos;
        let token = match buf[start] {
            b'%' => {
                while self.pos < buf.len() && buf[self.pos] != b'\n' && buf[self.pos] != b'\r' {
                    self.pos += 1;
                }
                Token::Other
            }
            b'(' => match parse_literal(buf, start) {
                Some((bytes, end)) => {
                    self.pos = end;
                    Token::Str(bytes)
                }
                None => {
                    self.pos += 1;
                    Token::Other
                }
            },
            b'<' if buf.get(start + 1) == Some(&b'<') => {
                self.pos += 2;
                Token::Other
            }
            b'<' => match parse_hex(buf, start) {
                Some((bytes, end)) => {
                    self.pos = end;
                    Token::Str(bytes)
                }
                None => {
                    self.pos += 1;
                    Token::Other
                }
            },
            b'[' => {
                self.pos += 1;
                Token::ArrayStart
            }
            b']' => {
                self.pos += 1;
                Token::ArrayEnd
            }
            b'/' => {
                self.pos += 1;
                while self.pos < buf.len()
                    && !buf[self.pos].is_ascii_whitespace()
                    && !is_delimiter(buf[self.pos])
                {
                    self.pos += 1;
                }
                Token::Other
            }
            b if is_delimiter(b) => {
                self.pos += 1;
                Token::Other
            }
            _ => {
                while self.pos < buf.len()
                    && !buf[self.pos].is_ascii_whitespace()
                    && !is_delimiter(buf[self.pos])
                {
                    self.pos += 1;
                }
                let word = &buf[start..self.pos];
                if word.iter().all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+')) {
                    std::str::from_utf8(word)
                        .ok()
                        .and_then(|s| s.parse::<f64>().ok())
                        .map(Token::Number)
                        .unwrap_or(Token::Other)
                } else {
                    Token::Operator(word)
                }
            }
        };

        Some((start, self.pos, token))
    }
}

/// Parses a literal string starting at the `(` at `start`, decoding escapes.
/// Returns the decoded bytes and the index just past the closing `)`.
fn parse_literal(buf: &[u8], start: usize) -> Option<(Vec<u8>, usize)> {
    let mut depth = 1usize;
    let mut out = Vec::new();
    let mut i = start + 1;

    while i < buf.len() {
        if i - start > MAX_LITERAL_BYTES {
            return None;
        }
        match buf[i] {
            b'\\' => {
                i += 1;
                let escaped = *buf.get(i)?;
                match escaped {
                    b'n' => out.push(b'\n'),
                    b'r' => out.push(b'\r'),
                    b't' => out.push(b'\t'),
                    b'b' => out.push(0x08),
                    b'f' => out.push(0x0C),
                    b'0'..=b'7' => {
                        let mut value: u32 = 0;
                        let mut digits = 0;
                        while digits < 3 && i < buf.len() && (b'0'..=b'7').contains(&buf[i]) {
                            value = value * 8 + u32::from(buf[i] - b'0');
                            i += 1;
                            digits += 1;
                        }
                        out.push((value & 0xFF) as u8);
                        continue;
                    }
                    b'\r' => {
                        if buf.get(i + 1) == Some(&b'\n') {
                            i += 1;
                        }
                    }
                    b'\n' => {}
                    other => out.push(other),
                }
                i += 1;
            }
            b'(' => {
                depth += 1;
                out.push(b'(');
                i += 1;
            }
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some((out, i + 1));
                }
                out.push(b')');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    None
}

/// Parses `<48656C6C6F>`; any non-hex, non-space byte aborts.
fn parse_hex(buf: &[u8], start: usize) -> Option<(Vec<u8>, usize)> {
    let mut digits = Vec::new();
    let mut i = start + 1;
    while i < buf.len() {
        let b = buf[i];
        if b == b'>' {
            if digits.len() % 2 == 1 {
                digits.push(b'0');
            }
            let bytes = digits
                .chunks(2)
                .filter_map(|pair| {
                    std::str::from_utf8(pair)
                        .ok()
                        .and_then(|s| u8::from_str_radix(s, 16).ok())
                })
                .collect();
            return Some((bytes, i + 1));
        }
        if b.is_ascii_hexdigit() {
            digits.push(b);
        } else if !b.is_ascii_whitespace() {
            return None;
        }
        if i - start > MAX_LITERAL_BYTES {
            return None;
        }
        i += 1;
    }
    None
}

/// PDF strings are bytes. UTF-16BE when they carry a BOM, Latin-1 otherwise.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks(2)
            .map(|pair| u16::from_be_bytes([pair[0], *pair.get(1).unwrap_or(&0)]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    bytes.iter().map(|&b| char::from(b)).collect()
}

fn is_printable(text: &str) -> bool {
    text.chars()
        .all(|c| matches!(c, ' '..='~' | '\t' | '\n' | '\r') || (c >= '\u{A0}' && !c.is_control()))
}

// ────────────────────────────────────────────────────────────────────────────
// Pass 1: text-showing operators inside BT … ET
// ────────────────────────────────────────────────────────────────────────────

enum Piece {
    Text(Vec<u8>),
    Adjust(f64),
}

fn join_tj_pieces(pieces: &[Piece]) -> String {
    let mut out = String::new();
    for piece in pieces {
        match piece {
            Piece::Text(bytes) => out.push_str(&decode_pdf_string(bytes)),
            Piece::Adjust(n) if *n <= TJ_SPACE_ADJUSTMENT => {
                if !out.is_empty() && !out.ends_with(' ') {
                    out.push(' ');
                }
            }
            Piece::Adjust(_) => {}
        }
    }
    out
}

/// Collects shown strings and returns the byte ranges of the text blocks found.
fn text_block_pass(buf: &[u8], tokens: &mut TokenSet) -> Vec<Range<usize>> {
    let mut blocks = Vec::new();
    let mut block_start: Option<usize> = None;
    let mut pending: Option<Vec<u8>> = None;
    let mut array: Option<Vec<Piece>> = None;
    let mut pending_array: Option<Vec<Piece>> = None;

    for (start, end, token) in Lexer::new(buf) {
        let Some(open) = block_start else {
            if token == Token::Operator(b"BT") {
                block_start = Some(start);
                pending = None;
                array = None;
                pending_array = None;
            }
            continue;
        };

        if end - open > MAX_BLOCK_BYTES {
            block_start = None;
            continue;
        }

        match token {
            Token::Operator(b"ET") => {
                blocks.push(open..end);
                block_start = None;
            }
            Token::Str(bytes) => match array.as_mut() {
                Some(pieces) => pieces.push(Piece::Text(bytes)),
                None => pending = Some(bytes),
            },
            Token::Number(n) => {
                if let Some(pieces) = array.as_mut() {
                    pieces.push(Piece::Adjust(n));
                }
            }
            Token::ArrayStart => array = Some(Vec::new()),
            Token::ArrayEnd => pending_array = array.take(),
            Token::Operator(b"Tj") | Token::Operator(b"'") | Token::Operator(b"\"") => {
                if let Some(bytes) = pending.take() {
                    tokens.push(decode_pdf_string(&bytes));
                }
            }
            Token::Operator(b"TJ") => {
                if let Some(pieces) = pending_array.take() {
                    tokens.push(join_tj_pieces(&pieces));
                }
            }
            Token::Operator(_) => {
                pending = None;
                pending_array = None;
            }
            Token::Other => {}
        }
    }

    if let Some(open) = block_start {
        if buf.len() - open <= MAX_BLOCK_BYTES {
            blocks.push(open..buf.len());
        }
    }

    blocks
}

// ────────────────────────────────────────────────────────────────────────────
// Pass 2: loose parenthesised strings outside text blocks
// ────────────────────────────────────────────────────────────────────────────

fn loose_string_pass(buf: &[u8], blocks: &[Range<usize>], tokens: &mut TokenSet) {
    let mut i = 0;
    let mut block_iter = blocks.iter().peekable();

    while i < buf.len() {
        while let Some(block) = block_iter.peek() {
            if block.end <= i {
                block_iter.next();
            } else {
                break;
            }
        }
        if let Some(block) = block_iter.peek() {
            if block.contains(&i) {
                i = block.end;
                continue;
            }
        }

        if buf[i] != b'(' {
            i += 1;
            continue;
        }

        match parse_literal(buf, i) {
            Some((bytes, end)) => {
                let text = decode_pdf_string(&bytes);
                let trimmed = text.trim();
                if trimmed.chars().count() >= MIN_LOOSE_CHARS && is_printable(trimmed) {
                    tokens.push(trimmed.to_string());
                }
                i = end;
            }
            None => i += 1,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// FlateDecode stream bodies
// ────────────────────────────────────────────────────────────────────────────

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from >= haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).rposition(|w| w == needle)
}

/// Bodies of `stream … endstream` sections whose dictionary names `FlateDecode`,
/// inflated. Streams that do not inflate cleanly are skipped.
fn flate_stream_bodies(bytes: &[u8]) -> Vec<Vec<u8>> {
    let mut bodies = Vec::new();
    let mut cursor = 0;

    while let Some(pos) = find(bytes, b"stream", cursor) {
        cursor = pos + b"stream".len();
        if pos >= 3 && &bytes[pos - 3..pos] == b"end" {
            continue;
        }

        let window_start = pos.saturating_sub(FILTER_LOOKBEHIND);
        let window = &bytes[window_start..pos];
        let dict = match rfind(window, b"obj") {
            Some(obj) => &window[obj..],
            None => window,
        };
        if find(dict, b"FlateDecode", 0).is_none() {
            continue;
        }

        let mut body_start = cursor;
        if bytes.get(body_start) == Some(&b'\r') {
            body_start += 1;
        }
        if bytes.get(body_start) == Some(&b'\n') {
            body_start += 1;
        }
        let Some(body_end) = find(bytes, b"endstream", body_start) else {
            break;
        };

        if let Some(inflated) = inflate(&bytes[body_start..body_end]) {
            bodies.push(inflated);
        }
        cursor = body_end + b"endstream".len();
    }

    bodies
}

fn inflate(data: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::new();
    if ZlibDecoder::new(data)
        .take(MAX_INFLATED_BYTES)
        .read_to_end(&mut out)
        .is_ok()
        && !out.is_empty()
    {
        return Some(out);
    }

    out.clear();
    if DeflateDecoder::new(data)
        .take(MAX_INFLATED_BYTES)
        .read_to_end(&mut out)
        .is_ok()
        && !out.is_empty()
    {
        return Some(out);
    }
    None
}
