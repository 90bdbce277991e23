//! Skills and summary reconstruction.

use crate::models::resume::SkillCategory;
use crate::parser::patterns::{is_boundary_header, strip_bullet};

/// Label for skill lines with no `Category:` prefix.
pub const GENERIC_SKILLS_LABEL: &str = "Skills";
const MAX_CATEGORY_CHARS: usize = 40;
const MAX_CATEGORY_WORDS: usize = 5;

/// `Languages: Python, Go` → `("Languages", "Python, Go")`.
fn split_category(line: &str) -> Option<(&str, &str)> {
    let (label, items) = line.split_once(':')?;
    let label = label.trim();
    let words = label.split_whitespace().count();
    let plausible = !label.is_empty()
        && label.chars().count() <= MAX_CATEGORY_CHARS
        && words <= MAX_CATEGORY_WORDS
        && !label.to_lowercase().starts_with("http");
    plausible.then_some((label, items))
}

/// Unifies item delimiters to `, ` and drops empty items.
fn normalize_items(items: &str) -> String {
    items
        .replace(" | ", ",")
        .replace(" • ", ",")
        .replace(" · ", ",")
        .replace(';', ",")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// One category per `Category: items` line, the rest under `Skills`.
/// Repeated labels (case-insensitive) are merged in order of first appearance.
pub fn reconstruct_skills(lines: &[String]) -> Vec<SkillCategory> {
    let mut categories: Vec<SkillCategory> = Vec::new();

    for line in lines {
        if is_boundary_header(line) {
            break;
        }
        let text = strip_bullet(line);
        if text.is_empty() {
            continue;
        }
        let (label, items) = split_category(text).unwrap_or((GENERIC_SKILLS_LABEL, text));
        let items = normalize_items(items);
        if items.is_empty() {
            continue;
        }

        match categories
            .iter_mut()
            .find(|c| c.category.eq_ignore_ascii_case(label))
        {
            Some(existing) => {
                existing.skills.push_str(", ");
                existing.skills.push_str(&items);
            }
            None => categories.push(SkillCategory {
                category: label.to_string(),
                skills: items,
            }),
        }
    }

    categories
}

/// The Summary section's lines joined into one paragraph.
pub fn reconstruct_summary(lines: &[String]) -> String {
    lines
        .iter()
        .take_while(|line| !is_boundary_header(line))
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_same_category_lines_consolidate() {
        let skills = reconstruct_skills(&owned(&["Languages: Python, Go", "Languages: Rust"]));
        assert_eq!(
            skills,
            vec![SkillCategory {
                category: "Languages".into(),
                skills: "Python, Go, Rust".into(),
            }]
        );
    }

    #[test]
    fn test_uncategorized_lines_use_generic_label() {
        let skills = reconstruct_skills(&owned(&["• Rust | Go | SQL", "Kubernetes; Terraform"]));
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].category, GENERIC_SKILLS_LABEL);
        assert_eq!(skills[0].skills, "Rust, Go, SQL, Kubernetes, Terraform");
    }

    #[test]
    fn test_category_match_is_case_insensitive_and_keeps_first_spelling() {
        let skills = reconstruct_skills(&owned(&[
            "Cloud: AWS",
            "Languages: Rust",
            "cloud: GCP · Azure",
        ]));
        assert_eq!(skills.len(), 2);
        assert_eq!(skills[0].category, "Cloud");
        assert_eq!(skills[0].skills, "AWS, GCP, Azure");
        assert_eq!(skills[1].category, "Languages");
    }

    #[test]
    fn test_empty_category_lines_skipped() {
        let skills = reconstruct_skills(&owned(&["Frameworks:", "Tools: git"]));
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].category, "Tools");
    }

    #[test]
    fn test_skills_stop_at_boundary() {
        let skills = reconstruct_skills(&owned(&["Rust, Go", "Projects", "Compiler, VM"]));
        assert_eq!(skills[0].skills, "Rust, Go");
        assert_eq!(skills.len(), 1);
    }

    #[test]
    fn test_summary_joined_with_spaces() {
        let summary = reconstruct_summary(&owned(&["Engineer with ten years", "of platform work."]));
        assert_eq!(summary, "Engineer with ten years of platform work.");
        assert_eq!(reconstruct_summary(&[]), "");
    }
}
