//! Education reconstruction.

use crate::models::resume::EducationItem;
use crate::parser::patterns::{
    is_boundary_header, is_bullet, is_location_line, standalone_date, trim_separators, DATE_POINT,
    DATE_RANGE, DEGREE, SINGLE_DATE_LINE,
};

const MAX_OPENING_LINE_WORDS: usize = 8;

struct OpenRecord {
    item: EducationItem,
    opened_by_degree: bool,
}

impl OpenRecord {
    fn new(opening: String, opened_by_degree: bool) -> Self {
        Self {
            item: EducationItem {
                degree: opening,
                ..EducationItem::default()
            },
            opened_by_degree,
        }
    }

    /// Only the opening line so far.
    fn is_bare(&self) -> bool {
        self.item.institution.is_empty() && self.item.location.is_empty()
    }

    fn fill(&mut self, text: String) {
        let item = &mut self.item;
        if is_location_line(&text) && item.location.is_empty() {
            item.location = text;
        } else if item.institution.is_empty() {
            item.institution = text;
        } else if item.location.is_empty() {
            item.location = text;
        }
    }
}

fn is_date_only(line: &str) -> bool {
    standalone_date(line).is_some() || SINGLE_DATE_LINE.is_match(line.trim())
}

fn strip_dates(line: &str) -> String {
    let text = DATE_RANGE.replace_all(line, "");
    let text = DATE_POINT.replace_all(&text, "");
    let text = text.replace("()", "").replace("( )", "");
    let text = trim_separators(&text);
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_degree_line(text: &str) -> bool {
    !is_location_line(text) && DEGREE.is_match(text)
}

/// One record per degree line; following lines fill institution, then location.
pub fn reconstruct_education(lines: &[String]) -> Vec<EducationItem> {
    let mut items = Vec::new();
    let mut open: Option<OpenRecord> = None;

    for line in lines {
        if is_boundary_header(line) {
            break;
        }
        if is_bullet(line) || is_date_only(line) {
            continue;
        }
        let text = strip_dates(line);
        if text.is_empty() {
            continue;
        }

        if text.contains('|') {
            if let Some(record) = open.take() {
                items.push(record.item);
            }
            let mut parts = text.split('|').map(str::trim).filter(|p| !p.is_empty());
            items.push(EducationItem {
                degree: parts.next().unwrap_or_default().to_string(),
                institution: parts.next().unwrap_or_default().to_string(),
                location: parts.next().unwrap_or_default().to_string(),
            });
            continue;
        }

        if is_degree_line(&text) {
            let reinterpret = matches!(&open, Some(r) if !r.opened_by_degree && r.is_bare());
            let mut record = OpenRecord::new(text, true);
            match open.take() {
                // `Stanford University` then `M.S. Computer Science`
                Some(previous) if reinterpret => record.item.institution = previous.item.degree,
                Some(previous) => items.push(previous.item),
                None => {}
            }
            open = Some(record);
            continue;
        }

        match open.as_mut() {
            Some(record) => record.fill(text),
            None if text.split_whitespace().count() <= MAX_OPENING_LINE_WORDS => {
                open = Some(OpenRecord::new(text, false));
            }
            None => {}
        }
    }

    if let Some(record) = open {
        items.push(record.item);
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_degree_institution_location_positional() {
        let items = reconstruct_education(&owned(&[
            "B.S. Computer Science",
            "Massachusetts Institute of Technology",
            "Cambridge, MA",
            "2016 - 2020",
        ]));
        assert_eq!(
            items,
            vec![EducationItem {
                degree: "B.S. Computer Science".into(),
                institution: "Massachusetts Institute of Technology".into(),
                location: "Cambridge, MA".into(),
            }]
        );
    }

    #[test]
    fn test_each_degree_line_starts_a_record() {
        let items = reconstruct_education(&owned(&[
            "Master of Science in Physics",
            "University of Chicago",
            "Bachelor of Arts in Mathematics, 2014",
            "Reed College",
        ]));
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].degree, "Bachelor of Arts in Mathematics");
        assert_eq!(items[1].institution, "Reed College");
    }

    #[test]
    fn test_institution_first_layout_is_reinterpreted() {
        let items = reconstruct_education(&owned(&["Stanford University", "M.S. in Computer Science", "May 2018"]));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].degree, "M.S. in Computer Science");
        assert_eq!(items[0].institution, "Stanford University");
    }

    #[test]
    fn test_pipe_line_fills_all_fields() {
        let items = reconstruct_education(&owned(&["BSc Economics | LSE | London, United Kingdom | 2012 - 2015"]));
        assert_eq!(items[0].degree, "BSc Economics");
        assert_eq!(items[0].institution, "LSE");
        assert_eq!(items[0].location, "London, United Kingdom");
    }

    #[test]
    fn test_location_lines_are_never_degrees() {
        let items = reconstruct_education(&owned(&["Bachelor of Science", "Boston, MA", "Tufts University"]));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].location, "Boston, MA");
        assert_eq!(items[0].institution, "Tufts University");
    }

    #[test]
    fn test_bullets_and_boundary() {
        let items = reconstruct_education(&owned(&[
            "PhD, Neuroscience",
            "• Thesis on sleep",
            "Harvard University",
            "Certifications",
            "AWS Certified Solutions Architect",
        ]));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].institution, "Harvard University");
    }
}
