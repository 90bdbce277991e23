//! Contact and header extraction.
//!
//! Contact fields are searched across the whole text, first match wins.
//! The header (name, title) only looks at the lines above the first section.

use crate::models::resume::{ContactInfo, ParsedHeader};
use crate::parser::patterns::{
    is_location_line, CITY_REGION, CITY_STATE, EMAIL, GITHUB, LINKEDIN, PHONE, WEBSITE,
};

/// Lines considered for name and title.
pub const HEADER_WINDOW_LINES: usize = 8;
const MAX_NAME_WORDS: usize = 5;
const MAX_TITLE_CHARS: usize = 150;
const MIN_PHONE_DIGITS: usize = 7;
const MAX_PHONE_DIGITS: usize = 15;

fn trim_link(link: &str) -> String {
    link.trim_end_matches(['.', ',', ';', ')', '/']).to_string()
}

fn find_phone(text: &str) -> Option<String> {
    PHONE
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .find(|candidate| {
            let digits = candidate.chars().filter(char::is_ascii_digit).count();
            (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits)
        })
        .map(str::to_string)
}

fn find_website(text: &str) -> Option<String> {
    WEBSITE
        .find_iter(text)
        .filter(|m| {
            let preceding = text[..m.start()].chars().next_back();
            !matches!(preceding, Some(c) if c == '@' || c == '.' || c.is_alphanumeric())
        })
        .map(|m| m.as_str())
        .find(|candidate| {
            let lower = candidate.to_lowercase();
            !lower.contains("linkedin.com") && !lower.contains("github.com") && !lower.contains('@')
        })
        .map(trim_link)
}

/// Location from the header window first, then any `City, ST` in the text.
fn find_location(header_lines: &[String], text: &str) -> Option<String> {
    for line in header_lines {
        if is_location_line(line) {
            return Some(line.trim().to_string());
        }
        for part in line.split('|') {
            let part = part.trim();
            if EMAIL.is_match(part) {
                continue;
            }
            if let Some(m) = CITY_REGION.find(part) {
                return Some(m.as_str().to_string());
            }
        }
    }
    CITY_STATE.find(text).map(|m| m.as_str().to_string())
}

pub fn extract_contact(lines: &[String], first_section: Option<usize>) -> ContactInfo {
    let text = lines.join("\n");
    let window_end = header_window_end(lines, first_section);

    ContactInfo {
        email: EMAIL.find(&text).map(|m| m.as_str().to_string()),
        phone: find_phone(&text),
        linkedin: LINKEDIN.find(&text).map(|m| trim_link(m.as_str())),
        github: GITHUB.find(&text).map(|m| trim_link(m.as_str())),
        website: find_website(&text),
        location: find_location(&lines[..window_end], &text),
    }
}

fn header_window_end(lines: &[String], first_section: Option<usize>) -> usize {
    first_section
        .unwrap_or(lines.len())
        .min(HEADER_WINDOW_LINES)
        .min(lines.len())
}

fn is_contact_line(line: &str) -> bool {
    EMAIL.is_match(line)
        || LINKEDIN.is_match(line)
        || GITHUB.is_match(line)
        || find_phone(line).is_some()
        || find_website(line).is_some()
        || is_location_line(line)
}

fn is_name_line(line: &str) -> bool {
    let words = line.split_whitespace().count();
    (1..=MAX_NAME_WORDS).contains(&words)
        && line.chars().any(char::is_alphabetic)
        && line
            .chars()
            .all(|c| c.is_alphabetic() || c.is_whitespace() || matches!(c, '.' | '\'' | '-' | ','))
}

pub fn extract_header(lines: &[String], first_section: Option<usize>) -> ParsedHeader {
    let window = &lines[..header_window_end(lines, first_section)];
    let mut candidates = window
        .iter()
        .map(|line| line.trim())
        .filter(|line| line.chars().any(char::is_alphanumeric))
        .filter(|line| !is_contact_line(line));

    let mut header = ParsedHeader::default();
    for line in candidates.by_ref() {
        if is_name_line(line) {
            header.name = line.to_string();
            break;
        }
    }
    if !header.name.is_empty() {
        if let Some(title) = candidates.find(|line| line.chars().count() < MAX_TITLE_CHARS) {
            header.title = title.to_string();
        }
    }
    header
}
