//! Section segmentation over normalized lines.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::parser::patterns;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Summary,
    Experience,
    Education,
    Skills,
}

impl SectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Summary => "summary",
            SectionKind::Experience => "experience",
            SectionKind::Education => "education",
            SectionKind::Skills => "skills",
        }
    }
}

/// `start` is the header line. Content is `start + 1..=end` and may be empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionRange {
    pub start: usize,
    pub end: usize,
}

impl SectionRange {
    pub fn content(&self) -> Range<usize> {
        self.start + 1..self.end + 1
    }
}

/// Detected sections ordered by header position. Each kind appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionMap {
    ranges: Vec<(SectionKind, SectionRange)>,
}

impl SectionMap {
    pub fn get(&self, kind: SectionKind) -> Option<SectionRange> {
        self.ranges
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, range)| *range)
    }

    /// Header line of the earliest section, if any.
    pub fn first_start(&self) -> Option<usize> {
        self.ranges.first().map(|(_, range)| range.start)
    }

    pub fn kinds(&self) -> Vec<SectionKind> {
        self.ranges.iter().map(|(kind, _)| *kind).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(SectionKind, SectionRange)> {
        self.ranges.iter()
    }

    /// The section's content lines. Missing sections yield an empty slice.
    pub fn lines<'a>(&self, kind: SectionKind, lines: &'a [String]) -> &'a [String] {
        match self.get(kind) {
            Some(range) => {
                let content = range.content();
                let end = content.end.min(lines.len());
                let start = content.start.min(end);
                &lines[start..end]
            }
            None => &[],
        }
    }

    /// Like `lines`, cut at the first header of any kind, tracked or not.
    pub fn lines_until_boundary<'a>(&self, kind: SectionKind, lines: &'a [String]) -> &'a [String] {
        let content = self.lines(kind, lines);
        let cut = content
            .iter()
            .position(|line| patterns::is_boundary_header(line))
            .unwrap_or(content.len());
        &content[..cut]
    }
}

/// One pass over the lines. The first header per kind wins; each section ends
/// on the line before the next detected header, the last one at end of input.
pub fn segment(lines: &[String]) -> SectionMap {
    let mut starts: Vec<(SectionKind, usize)> = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        if let Some(kind) = patterns::section_kind(line) {
            if starts.iter().all(|(k, _)| *k != kind) {
                starts.push((kind, index));
            }
        }
    }

    let ranges = starts
        .iter()
        .enumerate()
        .map(|(i, (kind, start))| {
            let end = match starts.get(i + 1) {
                Some((_, next)) => next - 1,
                None => lines.len().saturating_sub(1),
            };
            (*kind, SectionRange { start: *start, end })
        })
        .collect();

    SectionMap { ranges }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_ranges_follow_header_positions() {
        let lines = owned(&[
            "Jane Doe",
            "Summary",
            "Builder of things.",
            "Experience",
            "Senior Engineer | Acme",
            "2020 - 2021",
            "Skills",
            "Rust, Go",
        ]);
        let map = segment(&lines);
        assert_eq!(map.kinds(), vec![SectionKind::Summary, SectionKind::Experience, SectionKind::Skills]);
        assert_eq!(map.get(SectionKind::Summary), Some(SectionRange { start: 1, end: 2 }));
        assert_eq!(map.get(SectionKind::Experience), Some(SectionRange { start: 3, end: 5 }));
        assert_eq!(map.get(SectionKind::Skills), Some(SectionRange { start: 6, end: 7 }));
        assert_eq!(map.lines(SectionKind::Skills, &lines), &["Rust, Go".to_string()]);
        assert_eq!(map.first_start(), Some(1));
    }

    #[test]
    fn test_missing_section_is_absent_not_error() {
        let lines = owned(&["Jane Doe", "Experience", "Engineer"]);
        let map = segment(&lines);
        assert_eq!(map.get(SectionKind::Education), None);
        assert!(map.lines(SectionKind::Education, &lines).is_empty());
    }

    #[test]
    fn test_first_header_per_kind_wins() {
        let lines = owned(&["Experience", "a", "Skills", "b", "Experience", "c"]);
        let map = segment(&lines);
        assert_eq!(map.get(SectionKind::Experience), Some(SectionRange { start: 0, end: 1 }));
        assert_eq!(map.get(SectionKind::Skills), Some(SectionRange { start: 2, end: 5 }));
    }

    #[test]
    fn test_ranges_never_overlap_and_are_ordered() {
        let lines = owned(&[
            "Skills", "Education", "x", "Summary", "Experience", "y", "z", "Education", "Projects", "w",
        ]);
        let map = segment(&lines);
        let ranges: Vec<_> = map.iter().map(|(_, r)| *r).collect();
        for pair in ranges.windows(2) {
            assert!(pair[0].start < pair[1].start);
            assert!(pair[0].end < pair[1].start);
        }
        for range in &ranges {
            assert!(range.start <= range.end);
        }
    }

    #[test]
    fn test_header_on_last_line_has_empty_content() {
        let lines = owned(&["Jane", "Skills"]);
        let map = segment(&lines);
        assert!(map.lines(SectionKind::Skills, &lines).is_empty());
    }

    #[test]
    fn test_lines_until_boundary_stops_at_untracked_header() {
        let lines = owned(&["Skills", "Rust, Go", "Projects", "Compiler in Rust"]);
        let map = segment(&lines);
        assert_eq!(map.lines(SectionKind::Skills, &lines).len(), 3);
        assert_eq!(
            map.lines_until_boundary(SectionKind::Skills, &lines),
            &["Rust, Go".to_string()]
        );
    }
}
