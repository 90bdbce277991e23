//! Pattern tables — every regex the reconstructors classify lines with.
//!
//! Section vocabulary is data (`SECTION_HEADERS`, `BOUNDARY_HEADERS`) so new
//! phrasings can be added without touching the scan logic.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::parser::sections::SectionKind;

/// Lines longer than this are never section headers.
pub const MAX_HEADER_LINE_CHARS: usize = 50;

const MONTH: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?";

fn date_point() -> String {
    format!(r"(?:{MONTH},?\s*(?:19|20)\d{{2}}|\d{{1,2}}[/.](?:19|20)\d{{2}}|(?:19|20)\d{{2}})")
}

// ────────────────────────────────────────────────────────────────────────────
// Dates
// ────────────────────────────────────────────────────────────────────────────

/// `Jan 2020 - Present`, `2019 – 2021`, `03/2018 to 06/2020`, `Sept. 2021 - Current`.
pub static DATE_RANGE: Lazy<Regex> = Lazy::new(|| {
    let point = date_point();
    Regex::new(&format!(
        r"(?i)\b{point}(?:\s*[-–—]{{1,2}}\s*|\s+(?:to|until|through)\s+)(?:{point}|present|current|now|today|ongoing)\b"
    ))
    .expect("date range pattern")
});

/// A line holding one date and nothing else (`May 2020`, `Expected 2025`).
pub static SINGLE_DATE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)^(?:(?:expected|graduated|graduation|class of)\s*:?\s*)?{}$",
        date_point()
    ))
    .expect("single date pattern")
});

/// Any single date point or four-digit year, for stripping from education lines.
pub static DATE_POINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i)\b{}\b", date_point())).expect("date point pattern"));

// ────────────────────────────────────────────────────────────────────────────
// Line shapes
// ────────────────────────────────────────────────────────────────────────────

/// Leading bullet glyph or numbered-list marker.
pub static BULLET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[•●○◦▪▫■□‣⁃∙·➢➤►▶✓✔❖]\s*|[-*+>]\s+|\d{1,2}[.)]\s+)")
        .expect("bullet pattern")
});

/// `City, ST`, `City, Region`, or a bare work-mode marker.
pub static LOCATION_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:[A-Z][A-Za-z.'-]+(?:\s+[A-Z][A-Za-z.'-]+){0,3},\s*(?:[A-Z]{2}|[A-Z][a-z]{2,}(?:\s+[A-Z][a-z]{2,}){0,2})(?:,\s*[A-Z][a-z]{2,})?|(?i:remote|hybrid|on-?site))$",
    )
    .expect("location line pattern")
});

/// Job-title vocabulary. Distinguishes `Data Analyst, Beta Inc` from `Austin, Texas`.
pub static ROLE_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:engineer|developer|programmer|analyst|scientist|researcher|architect|designer|manager|director|president|vp|head|lead|principal|founder|co-founder|cto|ceo|cfo|coo|officer|intern|consultant|specialist|administrator|associate|coordinator|technician|assistant|advisor|strategist|accountant|editor|writer|instructor|teacher|professor|fellow|owner|partner|recruiter|nurse)\b",
    )
    .expect("role word pattern")
});

/// `Client: Globex` / `Customer: Initech` / `Project: Apollo` as a whole line.
pub static CLIENT_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:client|customer|project)\s*:\s*(.+)$").expect("client line pattern")
});

/// `(Client: Globex)` embedded in a header line.
pub static CLIENT_NOTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\(\s*(?:client|customer)\s*:\s*([^)]+)\)").expect("client note pattern")
});

/// The word `at` (or `@`) joining a role and a company.
pub static AT_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(.+?)\s+(?:at|@)\s+(.+)$").expect("at separator pattern"));

pub static DEGREE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:^|[^a-z])(?:bachelor'?s?|master'?s?|doctor(?:ate)?|associate'?s?|diploma|degree|certificate|high school|mba|ph\.?\s?d|b\.\s?s|b\.\s?a|m\.\s?s|m\.\s?a|b\.?\s?sc|m\.?\s?sc|b\.?\s?eng|m\.?\s?eng|b\.?\s?tech|m\.?\s?tech|bs|ba|ms|bfa|mfa|llb|llm|jd|md)(?:[^a-z]|$)",
    )
    .expect("degree pattern")
});

// ────────────────────────────────────────────────────────────────────────────
// Contact
// ────────────────────────────────────────────────────────────────────────────

pub static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("email pattern")
});

pub static PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+\d{1,3}[\s.-]?)?(?:\(\d{2,4}\)|\d{2,4})[\s.-]?\d{3,4}[\s.-]?\d{3,4}")
        .expect("phone pattern")
});

pub static LINKEDIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:[a-z]{2,3}\.)?linkedin\.com/[A-Za-z0-9_%/.-]+")
        .expect("linkedin pattern")
});

pub static GITHUB: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:www\.)?github\.com/[A-Za-z0-9_./-]+").expect("github pattern")
});

pub static WEBSITE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:https?://)?(?:www\.)?[a-z0-9][a-z0-9-]*(?:\.[a-z0-9-]+)*\.(?:com|io|dev|me|net|org|co|ai|app|tech|site|xyz|page)(?:/[^\s|,]*)?",
    )
    .expect("website pattern")
});

/// `City, ST` anywhere in a line. Used on the whole text when the header
/// window had no location.
pub static CITY_STATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z][a-z]+(?:\s[A-Z][a-z]+){0,2},\s*[A-Z]{2}\b").expect("city state pattern")
});

/// `City, Region` anywhere in a line.
pub static CITY_REGION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z][a-z]+(?:\s[A-Z][a-z]+){0,2},\s*(?:[A-Z]{2}|[A-Z][a-z]+(?:\s[A-Z][a-z]+)?)\b")
        .expect("city region pattern")
});

// ────────────────────────────────────────────────────────────────────────────
// Section vocabulary
// ────────────────────────────────────────────────────────────────────────────

/// `{kind, pattern}` rows, tested in order against a cleaned header line.
pub static SECTION_HEADERS: Lazy<Vec<(SectionKind, Regex)>> = Lazy::new(|| {
    [
        (
            SectionKind::Summary,
            r"^(?:(?:professional|executive|career)\s+)?summary$|^(?:professional\s+)?profile$|^about(?:\s+me)?$|^(?:career\s+)?objective$",
        ),
        (
            SectionKind::Experience,
            r"^(?:(?:work|professional|relevant)\s+)?experience$|^employment(?:\s+history)?$|^(?:work|career)\s+history$",
        ),
        (
            SectionKind::Education,
            r"^education$|^academic\s+background$|^education\s*(?:&|and)\s*training$|^qualifications$",
        ),
        (
            SectionKind::Skills,
            r"^(?:(?:technical|core|key)\s+)?skills$|^(?:core\s+)?competencies$|^technologies$|^technical\s+expertise$|^skills\s*(?:&|and)\s*tools$",
        ),
    ]
    .into_iter()
    .map(|(kind, pattern)| {
        (
            kind,
            Regex::new(&format!("(?i){pattern}")).expect("section header pattern"),
        )
    })
    .collect()
});

/// Headers of sections this parser does not reconstruct. Together with the
/// tracked kinds they end any section's content.
pub static BOUNDARY_HEADERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:(?:personal|key|selected|side)\s+)?projects?$|^(?:licenses?\s*(?:&|and)\s*)?certifications?(?:\s*(?:&|and)\s*licenses?)?$|^(?:honors?\s*(?:&|and)\s*)?awards?$|^achievements$|^publications$|^volunteer(?:ing|\s+experience|\s+work)?$|^languages$|^interests$|^hobbies(?:\s*(?:&|and)\s*interests)?$|^references$",
    )
    .expect("boundary header pattern")
});

/// Strips a trailing colon and collapses inner whitespace. `None` when the line
/// is too long or has text after a colon (`Skills: Rust` is content, not a header).
fn header_text(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() || line.chars().count() > MAX_HEADER_LINE_CHARS {
        return None;
    }
    let stripped = line.trim_end_matches(':').trim();
    if stripped.contains(':') {
        return None;
    }
    Some(stripped.split_whitespace().collect::<Vec<_>>().join(" "))
}

pub fn section_kind(line: &str) -> Option<SectionKind> {
    let text = header_text(line)?;
    SECTION_HEADERS
        .iter()
        .find(|(_, pattern)| pattern.is_match(&text))
        .map(|(kind, _)| *kind)
}

/// True for any section header line, tracked or not.
pub fn is_boundary_header(line: &str) -> bool {
    match header_text(line) {
        Some(text) => {
            BOUNDARY_HEADERS.is_match(&text)
                || SECTION_HEADERS.iter().any(|(_, p)| p.is_match(&text))
        }
        None => false,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Line helpers shared by the reconstructors
// ────────────────────────────────────────────────────────────────────────────

pub fn is_bullet(line: &str) -> bool {
    BULLET.is_match(line.trim_start())
}

/// The bullet's text with its leading marker removed, otherwise untouched.
pub fn strip_bullet(line: &str) -> &str {
    let line = line.trim();
    match BULLET.find(line) {
        Some(m) => line[m.end()..].trim(),
        None => line,
    }
}

/// `City, Region` shaped, and not a `Title, Company` header.
pub fn is_location_line(line: &str) -> bool {
    LOCATION_LINE.is_match(line.trim()) && role_company_split(line).is_none()
}

/// `Software Engineer, Google` → `("Software Engineer", "Google")`.
/// Only when the left side carries a job-title word.
pub fn role_company_split(line: &str) -> Option<(&str, &str)> {
    let (role, company) = line.trim().split_once(',')?;
    let (role, company) = (role.trim(), company.trim());
    (!role.is_empty() && !company.is_empty() && ROLE_WORD.is_match(role))
        .then_some((role, company))
}

/// The period, when the line is a date range plus at most punctuation or a
/// location (`San Francisco, CA | Jan 2020 - Present`).
pub fn standalone_date(line: &str) -> Option<String> {
    let m = DATE_RANGE.find(line)?;
    let before = trim_separators(&line[..m.start()]);
    let after = trim_separators(&line[m.end()..]);
    let residue_ok = |part: &str| part.is_empty() || is_location_line(part);
    if residue_ok(before) && residue_ok(after) {
        Some(m.as_str().trim().to_string())
    } else {
        None
    }
}

/// Trims separator punctuation and whitespace from both ends.
pub fn trim_separators(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || "|,;-–—()[]•·/".contains(c))
}

pub fn client_line(line: &str) -> Option<String> {
    CLIENT_LINE
        .captures(line.trim())
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}
