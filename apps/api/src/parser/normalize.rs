//! Text normalizer — turns extracted text into clean, trimmed, non-empty lines.
//!
//! Steps run in a fixed order: horizontal rules, emphasis markers and
//! markdown links, icon glyphs and unicode punctuation, then per-line prefixes and
//! whitespace.
//! The output is stable under a second pass.

use once_cell::sync::Lazy;
use regex::Regex;

static MARKDOWN_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]\n]+)\]\(([^)\s]+)\)").expect("markdown link pattern"));

static STRONG_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*|__|`+").expect("strong marker pattern"));

/// `*text*` with no space just inside the asterisks; list markers (`* item`) survive.
static EMPHASIS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*([^*\s](?:[^*\n]*[^*\s])?)\*").expect("emphasis pattern"));

static HORIZONTAL_RULE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[-*_=~─━—]\s*){3,}$").expect("horizontal rule pattern"));

static HEADING_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:#{1,6}\s*|>\s*)+").expect("heading prefix pattern"));

/// Any bullet glyph, or `-`/`*`/`+` followed by a space.
static LIST_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[•●○◦▪▫■□‣⁃∙·➢➤►▶✓✔❖]|[-*+](?:\s|$))\s*").expect("list prefix pattern")
});

/// `E X P E R I E N C E`, optionally with wider gaps between words.
static LETTER_SPACED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z&](?: {1,3}[A-Za-z&]){3,}$").expect("letter spaced pattern")
});

static WORD_GAP: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").expect("word gap pattern"));

/// Glyphs from icon fonts and emoji that résumé templates put before contact fields.
const CONTACT_ICONS: &[char] = &[
    '✉', '☎', '✆', '☏', '⌂', '📞', '📧', '📱', '🌐', '📍', '🏠', '🔗', '💼', '📩', '📨', '🖂',
    '\u{FE0F}',
];

/// Ordered, non-empty, trimmed lines. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedText {
    lines: Vec<String>,
}

impl NormalizedText {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Characters across all lines, newlines excluded.
    pub fn char_count(&self) -> usize {
        self.lines.iter().map(|l| l.chars().count()).sum()
    }

    pub fn joined(&self) -> String {
        self.lines.join("\n")
    }
}

pub fn normalize(text: &str) -> NormalizedText {
    let text = text
        .lines()
        .filter(|line| !HORIZONTAL_RULE.is_match(line.trim()))
        .collect::<Vec<_>>()
        .join("\n");
    let text = strip_markdown(&text);
    let text = map_unicode(&text);

    let lines = text.lines().filter_map(normalize_line).collect();

    NormalizedText { lines }
}

/// Emphasis markers, then links, repeated until nothing changes. Nested links
/// (`[![badge](img)](url)`) and links split by markers (`[a]**(b)`) need more
/// than one round. Every round that changes the text shortens it.
fn strip_markdown(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = STRONG_MARKER.replace_all(&current, "");
        let next = EMPHASIS.replace_all(&next, "$1");
        let next = MARKDOWN_LINK.replace_all(&next, "$1 $2").into_owned();
        if next == current {
            return next;
        }
        current = next;
    }
}

fn normalize_line(line: &str) -> Option<String> {
    let line = line.trim();
    let line = HEADING_PREFIX.replace(line, "");
    let line = line.trim();

    let line = match LIST_PREFIX.find(line) {
        Some(m) => {
            let rest = line[m.end()..].trim();
            if rest.is_empty() {
                return None;
            }
            format!("• {rest}")
        }
        None => line.to_string(),
    };

    let line = if LETTER_SPACED.is_match(&line) {
        collapse_letter_spacing(&line)
    } else {
        line
    };

    let line = WORD_GAP.replace_all(&line, " ");
    let line = line.trim();
    if line.is_empty() || HORIZONTAL_RULE.is_match(line) {
        None
    } else {
        Some(line.to_string())
    }
}

/// Gaps of two or more spaces separate words; single spaces separate letters.
fn collapse_letter_spacing(line: &str) -> String {
    WORD_GAP
        .split(line)
        .map(|word| word.split(' ').collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_private_use(c: char) -> bool {
    matches!(c, '\u{E000}'..='\u{F8FF}' | '\u{F0000}'..='\u{FFFFD}' | '\u{100000}'..='\u{10FFFD}')
}

/// Punctuation to ASCII, odd spaces to plain spaces, tabs to spaces, icons dropped.
fn map_unicode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}' => out.push('"'),
            '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2015}'
            | '\u{2212}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            '\u{FB00}' => out.push_str("ff"),
            '\u{FB01}' => out.push_str("fi"),
            '\u{FB02}' => out.push_str("fl"),
            '\u{FB03}' => out.push_str("ffi"),
            '\u{FB04}' => out.push_str("ffl"),
            '\t' | '\u{00A0}' | '\u{2007}' | '\u{202F}' | '\u{2002}' | '\u{2003}' | '\u{2009}' => {
                out.push(' ')
            }
            '\r' => out.push('\n'),
            '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}' | '\u{00AD}' => {}
            c if is_private_use(c) || CONTACT_ICONS.contains(&c) => {}
            c => out.push(c),
        }
    }
    out
}
