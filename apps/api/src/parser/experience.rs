//! Experience reconstruction — recovers work-history records from the
//! Experience section with date-anchored heuristics.
//!
//! # Scan
//! One left-to-right pass over the section's lines. A boolean mask marks
//! lines already claimed by a record so nothing is processed twice.
//! - A header line (role/company) opens a record, looks for its date on the
//!   line above or up to `LOOKAHEAD_LINES` below, then collects bullets.
//! - A date line nobody claimed either completes the previous record (when
//!   that record has no period yet) or looks back up to `LOOKBACK_LINES` for
//!   a header the forward scan skipped. With no header above or directly
//!   below, it opens a placeholder record.
//! - Records are keyed by `(company, role, period)`; a repeated key merges
//!   bullets into the existing record instead of adding a new one.
//! - Any section header line ends the scan.

use std::collections::HashMap;

use tracing::debug;

use crate::models::resume::{ExperienceItem, UNKNOWN_COMPANY, UNKNOWN_ROLE};
use crate::parser::patterns::{
    client_line, is_boundary_header, is_bullet, is_location_line, role_company_split,
    standalone_date, strip_bullet, trim_separators, AT_SEPARATOR, CLIENT_NOTE, DATE_RANGE,
};

pub const LOOKAHEAD_LINES: usize = 3;
pub const LOOKBACK_LINES: usize = 5;
/// Non-bullet lines checked for a date when deciding whether a plain line starts an entry.
const ENTRY_DATE_WINDOW: usize = 2;
const MAX_HEADER_CHARS: usize = 120;
const MAX_PLAIN_HEADER_WORDS: usize = 8;
const MAX_PLAIN_HEADER_CHARS: usize = 80;
const MAX_AT_SIDE_WORDS: usize = 6;

// ────────────────────────────────────────────────────────────────────────────
// Header decomposition
// ────────────────────────────────────────────────────────────────────────────

/// A header line split into its parts. `company` is empty when the line did
/// not name one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderParts {
    pub role: String,
    pub company: String,
    pub period: Option<String>,
    pub client: Option<String>,
}

fn has_separator(line: &str) -> bool {
    line.contains('|') || line.contains(" - ") || at_split(line).is_some()
}

fn at_split(line: &str) -> Option<(String, String)> {
    let caps = AT_SEPARATOR.captures(line)?;
    let role = caps.get(1)?.as_str().trim();
    let company = caps.get(2)?.as_str().trim();
    let short = |s: &str| {
        let words = s.split_whitespace().count();
        words > 0 && words <= MAX_AT_SIDE_WORDS
    };
    (short(role) && short(company)).then(|| (role.to_string(), company.to_string()))
}

/// Splits a header using, in order: `Role | Company`, `Role - Company`,
/// `Role at Company`, `Title, Company`. Otherwise the whole line is the role.
pub fn decompose_header(line: &str) -> HeaderParts {
    let mut text = line.trim().to_string();
    let mut parts = HeaderParts::default();

    if let Some(caps) = CLIENT_NOTE.captures(&text) {
        parts.client = caps.get(1).map(|m| m.as_str().trim().to_string());
        text = CLIENT_NOTE.replace(&text, "").into_owned();
    }

    if let Some(m) = DATE_RANGE.find(&text) {
        parts.period = Some(m.as_str().trim().to_string());
        text = format!("{} {}", &text[..m.start()], &text[m.end()..]);
        text = text.replace("( )", "").replace("()", "").replace("[]", "");
    }
    let text = trim_separators(&text).to_string();

    let pipe_parts: Vec<&str> = text
        .split('|')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if pipe_parts.len() >= 2 {
        let named: Vec<&str> = pipe_parts
            .iter()
            .copied()
            .filter(|p| !is_location_line(p))
            .collect();
        let named = if named.is_empty() { pipe_parts } else { named };
        parts.role = named[0].to_string();
        parts.company = named.get(1).map(|s| s.to_string()).unwrap_or_default();
        return parts;
    }

    if let Some((role, company)) = text.split_once(" - ") {
        let (role, company) = (trim_separators(role), trim_separators(company));
        if !role.is_empty() && !company.is_empty() {
            parts.role = role.to_string();
            parts.company = company.to_string();
            return parts;
        }
    }

    if let Some((role, company)) = at_split(&text) {
        parts.role = role;
        parts.company = company;
        return parts;
    }

    if let Some((role, company)) = role_company_split(&text) {
        parts.role = role.to_string();
        parts.company = company.to_string();
        return parts;
    }

    parts.role = text;
    parts
}

// ────────────────────────────────────────────────────────────────────────────
// Line classification
// ────────────────────────────────────────────────────────────────────────────

fn is_plain_title(line: &str) -> bool {
    let words = line.split_whitespace().count();
    (1..=MAX_PLAIN_HEADER_WORDS).contains(&words)
        && line.chars().count() <= MAX_PLAIN_HEADER_CHARS
        && line.chars().any(char::is_alphabetic)
        && !line.ends_with(['.', ':', ';', ','])
}

/// Plausibly a role/company line.
pub fn is_header_candidate(line: &str) -> bool {
    let line = line.trim();
    if line.is_empty()
        || line.chars().count() > MAX_HEADER_CHARS
        || is_bullet(line)
        || standalone_date(line).is_some()
        || is_boundary_header(line)
        || client_line(line).is_some()
        || is_location_line(line)
    {
        return false;
    }
    is_strong_header(line) || is_plain_title(line)
}

/// A header that carries a separator or an embedded date.
fn is_strong_header(line: &str) -> bool {
    (has_separator(line) || DATE_RANGE.is_match(line)) && line.chars().any(char::is_alphabetic)
}

fn is_plain_header(line: &str) -> bool {
    is_header_candidate(line) && !is_strong_header(line)
}

// ────────────────────────────────────────────────────────────────────────────
// Scan
// ────────────────────────────────────────────────────────────────────────────

struct ExperienceScan<'a> {
    lines: &'a [String],
    consumed: Vec<bool>,
    records: Vec<Option<ExperienceItem>>,
    by_key: HashMap<String, usize>,
    /// Bullets seen before any record exists.
    orphans: Vec<String>,
    /// Most recent record and the last line it claimed.
    tail: Option<(usize, usize)>,
    halted: bool,
}

impl<'a> ExperienceScan<'a> {
    fn new(lines: &'a [String]) -> Self {
        Self {
            lines,
            consumed: vec![false; lines.len()],
            records: Vec::new(),
            by_key: HashMap::new(),
            orphans: Vec::new(),
            tail: None,
            halted: false,
        }
    }

    fn run(&mut self) {
        let lines = self.lines;
        let mut i = 0;
        while i < lines.len() && !self.halted {
            if self.consumed[i] {
                i += 1;
                continue;
            }
            let line = lines[i].as_str();
            if is_boundary_header(line) {
                break;
            }

            if let Some(period) = standalone_date(line) {
                self.on_date(i, period);
            } else if is_bullet(line) {
                self.consumed[i] = true;
                let text = strip_bullet(line).to_string();
                match self.tail {
                    Some((rec, _)) => {
                        self.push_bullet(rec, text);
                        self.tail = Some((rec, i));
                    }
                    None => self.orphans.push(text),
                }
            } else if self.is_entry_start(i) {
                self.on_header(i);
            } else if let (Some(note), Some((rec, _))) = (client_line(line), self.tail) {
                self.consumed[i] = true;
                self.set_client(rec, note);
            }
            i += 1;
        }
    }

    fn finish(self) -> Vec<ExperienceItem> {
        if !self.orphans.is_empty() && self.records.is_empty() {
            debug!(count = self.orphans.len(), "dropping bullets with no experience entry");
        }
        self.records.into_iter().flatten().collect()
    }

    /// Whether the line at `i` opens a new entry rather than continuing one.
    fn is_entry_start(&self, i: usize) -> bool {
        let line = self.lines[i].as_str();
        if !is_header_candidate(line) {
            return false;
        }
        if is_strong_header(line) {
            return true;
        }
        if i > 0 && !self.consumed[i - 1] && standalone_date(&self.lines[i - 1]).is_some() {
            return true;
        }

        let mut checked = 0;
        for next in &self.lines[i + 1..] {
            if checked == ENTRY_DATE_WINDOW || is_boundary_header(next) {
                break;
            }
            // A date past the bullets belongs to the next entry.
            if is_bullet(next) {
                break;
            }
            if standalone_date(next).is_some() {
                return true;
            }
            if is_strong_header(next) {
                return false;
            }
            checked += 1;
        }
        false
    }

    fn on_header(&mut self, i: usize) {
        let lines = self.lines;
        let mut parts = decompose_header(&lines[i]);
        self.consumed[i] = true;
        let mut end = i;

        // Role on one line, company on the next.
        if parts.company.is_empty() && parts.period.is_none() {
            if let Some(next) = lines.get(i + 1) {
                if !self.consumed[i + 1] && is_plain_header(next) {
                    parts.company = next.trim().to_string();
                    self.consumed[i + 1] = true;
                    end = i + 1;
                }
            }
        }

        let mut period = parts.period.take();
        if period.is_none() && i > 0 && !self.consumed[i - 1] {
            if let Some(above) = standalone_date(&lines[i - 1]) {
                self.consumed[i - 1] = true;
                period = Some(above);
            }
        }
        if period.is_none() {
            period = self.look_ahead_for_date(end);
        }

        let Some(rec) = self.open_record(parts.role, parts.company, period, parts.client) else {
            return;
        };
        let last = self.last_consumed_from(end);
        self.collect_bullets(rec, end + 1, last);
    }

    fn look_ahead_for_date(&mut self, end: usize) -> Option<String> {
        let lines = self.lines;
        let stop = (end + LOOKAHEAD_LINES).min(lines.len().saturating_sub(1));
        for j in end + 1..=stop {
            if self.consumed[j] {
                continue;
            }
            let line = lines[j].as_str();
            if let Some(period) = standalone_date(line) {
                self.consumed[j] = true;
                return Some(period);
            }
            if is_bullet(line) || is_boundary_header(line) || is_header_candidate(line) {
                return None;
            }
        }
        None
    }

    fn on_date(&mut self, i: usize, period: String) {
        if let Some((rec, last)) = self.tail {
            let lacks_period = self.record(rec).is_some_and(|r| r.period.is_empty());
            if lacks_period && i == last + 1 {
                self.consumed[i] = true;
                let rec = self.attach_period(rec, period);
                self.collect_bullets(rec, i + 1, i);
                return;
            }
        }

        let floor = i.saturating_sub(LOOKBACK_LINES);
        let mut found = None;
        for j in (floor..i).rev() {
            if self.consumed[j] {
                break;
            }
            if is_header_candidate(&self.lines[j]) {
                found = Some(j);
                break;
            }
        }
        let Some(h) = found else {
            self.on_headless_date(i, period);
            return;
        };

        self.consumed[i] = true;
        self.consumed[h] = true;
        let mut parts = decompose_header(&self.lines[h]);
        if parts.company.is_empty()
            && h > 0
            && !self.consumed[h - 1]
            && is_plain_header(&self.lines[h - 1])
        {
            self.consumed[h - 1] = true;
            parts.company = std::mem::take(&mut parts.role);
            parts.role = self.lines[h - 1].trim().to_string();
        }

        let period = parts.period.take().or(Some(period));
        if let Some(rec) = self.open_record(parts.role, parts.company, period, parts.client) {
            self.collect_bullets(rec, h + 1, i);
        }
    }

    /// A date with no header above. Left for the header directly below when
    /// there is one, otherwise it opens a placeholder record.
    fn on_headless_date(&mut self, i: usize, period: String) {
        if self
            .lines
            .get(i + 1)
            .is_some_and(|next| is_header_candidate(next))
        {
            return;
        }
        self.consumed[i] = true;
        if let Some(rec) = self.open_record(String::new(), String::new(), Some(period), None) {
            self.collect_bullets(rec, i + 1, i);
        }
    }

    /// Bullets run until the next entry, a standalone date, or a section header.
    /// Unmarked lines that do not start an entry are kept verbatim.
    fn collect_bullets(&mut self, rec: usize, from: usize, mut last: usize) {
        let lines = self.lines;
        let mut j = from;
        while j < lines.len() {
            if self.consumed[j] {
                j += 1;
                continue;
            }
            let line = lines[j].as_str();
            if is_boundary_header(line) {
                self.halted = true;
                break;
            }
            if is_bullet(line) {
                self.push_bullet(rec, strip_bullet(line).to_string());
            } else if standalone_date(line).is_some() {
                break;
            } else if let Some(note) = client_line(line) {
                self.set_client(rec, note);
            } else if is_location_line(line) {
                // location lines carry no record field
            } else if self.is_entry_start(j) {
                break;
            } else {
                self.push_bullet(rec, line.trim().to_string());
            }
            self.consumed[j] = true;
            last = last.max(j);
            j += 1;
        }
        self.tail = Some((rec, last));
    }

    fn last_consumed_from(&self, from: usize) -> usize {
        let mut last = from;
        for (j, consumed) in self.consumed.iter().enumerate().skip(from + 1) {
            if !consumed {
                break;
            }
            last = j;
        }
        last
    }

    // ── records ────────────────────────────────────────────────────────────

    fn record(&self, rec: usize) -> Option<&ExperienceItem> {
        self.records.get(rec).and_then(Option::as_ref)
    }

    fn record_mut(&mut self, rec: usize) -> Option<&mut ExperienceItem> {
        self.records.get_mut(rec).and_then(Option::as_mut)
    }

    /// Creates a record or returns the existing one with the same key.
    /// Returns `None` when role, company and period are all empty.
    fn open_record(
        &mut self,
        role: String,
        company: String,
        period: Option<String>,
        client: Option<String>,
    ) -> Option<usize> {
        let period = period.unwrap_or_default();
        if role.trim().is_empty() && company.trim().is_empty() && period.trim().is_empty() {
            return None;
        }

        let item = ExperienceItem {
            role: non_empty_or(role, UNKNOWN_ROLE),
            company: non_empty_or(company, UNKNOWN_COMPANY),
            period,
            bullets: Vec::new(),
            client: None,
        };
        let key = item.dedup_key();

        if let Some(&existing) = self.by_key.get(&key) {
            debug!(key = %key, "repeated experience entry merged");
            if let Some(note) = client {
                self.set_client(existing, note);
            }
            return Some(existing);
        }

        let rec = self.records.len();
        let mut item = item;
        item.client = client;
        if rec == 0 {
            item.bullets = std::mem::take(&mut self.orphans);
        }
        self.records.push(Some(item));
        self.by_key.insert(key, rec);
        Some(rec)
    }

    /// Sets the period on a record and re-keys it, merging into an existing
    /// record when the new key is already taken.
    fn attach_period(&mut self, rec: usize, period: String) -> usize {
        let Some(item) = self.record_mut(rec) else {
            return rec;
        };
        let old_key = item.dedup_key();
        item.period = period;
        let new_key = item.dedup_key();
        self.by_key.remove(&old_key);

        match self.by_key.get(&new_key).copied() {
            Some(target) if target != rec => {
                if let Some(moved) = self.records.get_mut(rec).and_then(Option::take) {
                    for bullet in moved.bullets {
                        self.push_bullet(target, bullet);
                    }
                    if let Some(note) = moved.client {
                        self.set_client(target, note);
                    }
                }
                target
            }
            _ => {
                self.by_key.insert(new_key, rec);
                rec
            }
        }
    }

    /// Appends unless the record already has the identical bullet.
    fn push_bullet(&mut self, rec: usize, bullet: String) {
        if bullet.is_empty() {
            return;
        }
        if let Some(item) = self.record_mut(rec) {
            if !item.bullets.contains(&bullet) {
                item.bullets.push(bullet);
            }
        }
    }

    fn set_client(&mut self, rec: usize, note: String) {
        if let Some(item) = self.record_mut(rec) {
            if item.client.is_none() {
                item.client = Some(note);
            }
        }
    }
}

fn non_empty_or(value: String, placeholder: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        placeholder.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Reconstructs work-history records from the Experience section's lines.
pub fn reconstruct_experience(lines: &[String]) -> Vec<ExperienceItem> {
    let mut scan = ExperienceScan::new(lines);
    scan.run();
    scan.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::normalize::normalize;

    fn parse(text: &str) -> Vec<ExperienceItem> {
        reconstruct_experience(normalize(text).lines())
    }

    #[test]
    fn test_pipe_header_with_date_below() {
        let items = parse("Senior Engineer | Acme Corp\nJan 2020 - Present\n• Led a team of 5\n• Shipped feature X");
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.role, "Senior Engineer");
        assert_eq!(item.company, "Acme Corp");
        assert_eq!(item.period, "Jan 2020 - Present");
        assert_eq!(item.bullets, vec!["Led a team of 5", "Shipped feature X"]);
    }

    #[test]
    fn test_date_above_dash_header() {
        let items = parse("2019 - 2021\nData Analyst - Beta Inc\n• Built dashboards");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].role, "Data Analyst");
        assert_eq!(items[0].company, "Beta Inc");
        assert_eq!(items[0].period, "2019 - 2021");
        assert_eq!(items[0].bullets, vec!["Built dashboards"]);
    }

    #[test]
    fn test_repeated_block_merges_bullets() {
        let items = parse(
            "Senior Engineer | Acme Corp\nJan 2020 - Present\n• Led a team of 5\n\
             Senior Engineer | Acme Corp\nJan 2020 - Present\n• Shipped feature X",
        );
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].bullets, vec!["Led a team of 5", "Shipped feature X"]);
    }

    #[test]
    fn test_dedup_key_is_case_insensitive() {
        let items = parse(
            "Engineer | Acme\n2019 - 2020\n• a\nENGINEER | ACME\n2019 - 2020\n• b",
        );
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].bullets, vec!["a", "b"]);
    }

    #[test]
    fn test_two_distinct_entries() {
        let items = parse(
            "Staff Engineer | Acme\n2021 - Present\n• Platform\n\
             Engineer at Beta\n2018 - 2021\n• Payments",
        );
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].role, "Engineer");
        assert_eq!(items[1].company, "Beta");
        assert_eq!(items[1].bullets, vec!["Payments"]);
    }

    #[test]
    fn test_embedded_date_in_header() {
        let items = parse("Senior Engineer | Acme Corp | Jan 2020 - Present\n• Led");
        assert_eq!(items[0].company, "Acme Corp");
        assert_eq!(items[0].period, "Jan 2020 - Present");
        assert_eq!(items[0].bullets, vec!["Led"]);
    }

    #[test]
    fn test_role_and_company_on_separate_lines() {
        let items = parse("Senior Engineer\nAcme Corp\nJan 2020 - Present\n• Led");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].role, "Senior Engineer");
        assert_eq!(items[0].company, "Acme Corp");
        assert_eq!(items[0].period, "Jan 2020 - Present");
    }

    #[test]
    fn test_header_without_company_gets_placeholder() {
        let items = parse("Freelance Developer\n2017 - 2018\n• Built sites");
        assert_eq!(items[0].role, "Freelance Developer");
        assert_eq!(items[0].company, UNKNOWN_COMPANY);
    }

    #[test]
    fn test_location_residue_on_date_line() {
        let items = parse("Engineer | Acme\nSan Francisco, CA | Jan 2020 - Present\n• Led");
        assert_eq!(items[0].period, "Jan 2020 - Present");
        assert_eq!(items[0].bullets, vec!["Led"]);
    }

    #[test]
    fn test_trailing_date_completes_previous_record() {
        let items = parse("Engineer | Acme\n• a\n2019 - 2020\n• b");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].period, "2019 - 2020");
        assert_eq!(items[0].bullets, vec!["a", "b"]);
    }

    #[test]
    fn test_look_back_finds_header_far_above_date() {
        let items = parse("Acme Corp\nPlatform team\nAustin, TX\nRemote\n2019 - 2021\n• Shipped");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].role, "Acme Corp");
        assert_eq!(items[0].company, "Platform team");
        assert_eq!(items[0].period, "2019 - 2021");
        assert_eq!(items[0].bullets, vec!["Shipped"]);
    }

    #[test]
    fn test_boundary_header_stops_collection() {
        let items = parse("Engineer | Acme\n2019 - 2020\n• a\nEducation\n• b\nEngineer | Beta\n2020 - 2021");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].bullets, vec!["a"]);
    }

    #[test]
    fn test_untracked_boundary_header_stops_scan() {
        let items = parse("Engineer | Acme\n2019 - 2020\n• a\nProjects\nCompiler | Rust\n2020 - 2021");
        assert_eq!(items.len(), 1);
        assert!(!items[0].bullets.iter().any(|b| b.contains("Compiler")));
    }

    #[test]
    fn test_orphan_bullets_go_to_first_record() {
        let items = parse("• early note\nEngineer | Acme\n2019 - 2020\n• a");
        assert_eq!(items[0].bullets, vec!["early note", "a"]);
    }

    #[test]
    fn test_client_lines_and_notes() {
        let items = parse("Consultant | Initech (Client: Globex)\n2019 - 2020\n• a");
        assert_eq!(items[0].client.as_deref(), Some("Globex"));
        assert_eq!(items[0].company, "Initech");

        let items = parse("Consultant | Initech\n2019 - 2020\nClient: Umbrella\n• a");
        assert_eq!(items[0].client.as_deref(), Some("Umbrella"));
        assert_eq!(items[0].bullets, vec!["a"]);
    }

    #[test]
    fn test_unmarked_description_kept_verbatim() {
        let items = parse("Engineer | Acme\n2019 - 2020\nOwned the billing platform end to end.\n• a");
        assert_eq!(
            items[0].bullets,
            vec!["Owned the billing platform end to end.", "a"]
        );
    }

    #[test]
    fn test_no_header_no_record() {
        assert!(parse("• just a bullet\n• another").is_empty());
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_every_bullet_lands_in_exactly_one_record() {
        let text = "Senior Engineer | Acme Corp\nJan 2020 - Present\n• Led a team of 5\n• Shipped feature X\n\
                    2018 - 2019\nData Analyst - Beta Inc\n• Built dashboards\n• Cut costs 20%\n\
                    Intern at Gamma\nJun 2017 - Aug 2017\n1. Wrote tests";
        let items = parse(text);
        for bullet in ["Led a team of 5", "Shipped feature X", "Built dashboards", "Cut costs 20%", "Wrote tests"] {
            let holders = items.iter().filter(|i| i.bullets.iter().any(|b| b == bullet)).count();
            assert_eq!(holders, 1, "{bullet}");
        }
    }

    #[test]
    fn test_title_comma_company_header() {
        let items = parse("Software Engineer, Google\nJan 2020 - Present\n• Led migrations\n• Cut latency");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].role, "Software Engineer");
        assert_eq!(items[0].company, "Google");
        assert_eq!(items[0].period, "Jan 2020 - Present");
        assert_eq!(items[0].bullets, vec!["Led migrations", "Cut latency"]);
    }

    #[test]
    fn test_title_comma_company_after_previous_entry() {
        let items = parse(
            "Senior Engineer | Acme\n2021 - Present\n• a\n\
             Software Engineer, Google\n2019 - 2021\n• Built search",
        );
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].bullets, vec!["a"]);
        assert_eq!(items[1].company, "Google");
        assert_eq!(items[1].period, "2019 - 2021");
        assert_eq!(items[1].bullets, vec!["Built search"]);
    }

    #[test]
    fn test_sub_heading_does_not_take_next_entry_date() {
        let items = parse(
            "Engineer | Acme\n2019 - 2021\nKey achievements\n• a\n• b\n\
             2017 - 2019\nAnalyst | Beta\n• c",
        );
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].company, "Acme");
        assert_eq!(items[0].period, "2019 - 2021");
        assert_eq!(items[0].bullets, vec!["Key achievements", "a", "b"]);
        assert_eq!(items[1].company, "Beta");
        assert_eq!(items[1].period, "2017 - 2019");
        assert_eq!(items[1].bullets, vec!["c"]);
    }

    #[test]
    fn test_date_without_header_opens_placeholder_record() {
        let items = parse("Jan 2020 - Present\n• Led X");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].role, UNKNOWN_ROLE);
        assert_eq!(items[0].company, UNKNOWN_COMPANY);
        assert_eq!(items[0].period, "Jan 2020 - Present");
        assert_eq!(items[0].bullets, vec!["Led X"]);
    }

    #[test]
    fn test_decompose_header_forms() {
        let p = decompose_header("Senior Engineer | Acme Corp | Austin, TX");
        assert_eq!((p.role.as_str(), p.company.as_str()), ("Senior Engineer", "Acme Corp"));

        let p = decompose_header("Data Analyst - Beta Inc (2019 - 2021)");
        assert_eq!((p.role.as_str(), p.company.as_str()), ("Data Analyst", "Beta Inc"));
        assert_eq!(p.period.as_deref(), Some("2019 - 2021"));

        let p = decompose_header("Product Manager at Initech");
        assert_eq!((p.role.as_str(), p.company.as_str()), ("Product Manager", "Initech"));

        let p = decompose_header("Data Analyst, Beta Inc");
        assert_eq!((p.role.as_str(), p.company.as_str()), ("Data Analyst", "Beta Inc"));

        let p = decompose_header("Software Engineer");
        assert_eq!((p.role.as_str(), p.company.as_str()), ("Software Engineer", ""));
    }
}
