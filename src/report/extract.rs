//! Score, section-presence, and severity heuristics over the report text
//!
//! This is pattern matching over natural-language model output, not a
//! grammar. Categories live in a table of label aliases so adding one is a
//! data change, not new control flow.
//!
//! A category counts as present when its score is nonzero OR a heading
//! mentioning one of its aliases exists. The OR keeps a section visible when
//! the model wrote it up without a parseable number; whether that masks score
//! parse failures is an open product question, so the behavior is kept as-is.

use regex::Regex;

/// Analysis category, one per fixed report section
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    /// UX heuristics
    Ux,
    /// Accessibility / WCAG
    Wcag,
    /// Flow efficiency
    Flow,
    /// Conversion
    Conversion,
    /// Information architecture
    Ia,
    /// Visual hierarchy
    Visual,
}

struct CategoryLabels {
    category: Category,
    /// Labels accepted before the word "Score" and in section headings
    aliases: &'static [&'static str],
}

const CATEGORIES: &[CategoryLabels] = &[
    CategoryLabels {
        category: Category::Ux,
        aliases: &["UX", "Heuristics"],
    },
    CategoryLabels {
        category: Category::Wcag,
        aliases: &["Accessibility", "WCAG"],
    },
    CategoryLabels {
        category: Category::Flow,
        aliases: &["Flow Efficiency", "Flow"],
    },
    CategoryLabels {
        category: Category::Conversion,
        aliases: &["Conversion"],
    },
    CategoryLabels {
        category: Category::Ia,
        aliases: &["Information Architecture", "IA"],
    },
    CategoryLabels {
        category: Category::Visual,
        aliases: &["Visual Hierarchy", "Visual"],
    },
];

/// Per-category numeric scores, 0 when no score was found
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CategoryScores {
    pub ux: u32,
    pub wcag: u32,
    pub flow: u32,
    pub conversion: u32,
    pub ia: u32,
    pub visual: u32,
}

/// Per-category section-presence flags
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SectionFlags {
    pub ux: bool,
    pub wcag: bool,
    pub flow: bool,
    pub conversion: bool,
    pub ia: bool,
    pub visual: bool,
}

/// Global severity marker counts across the whole report
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeverityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// Everything the heuristic pass recovers from the report text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReportMetrics {
    pub scores: CategoryScores,
    pub has_section: SectionFlags,
    pub issues: SeverityCounts,
}

/// First integer following `<alias> ... Score` on one line, or 0
fn score_for(text: &str, aliases: &[&str]) -> u32 {
    let alternation = aliases.join("|");
    let pattern = format!(r"(?i)(?:{alternation})[^\d\n]*Score[^\d\n]*(\d+)");
    let Ok(re) = Regex::new(&pattern) else {
        log::error!("bad score pattern for aliases {aliases:?}");
        return 0;
    };
    re.captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Whether a markdown heading anywhere in the text mentions one of the aliases
fn heading_for(text: &str, aliases: &[&str]) -> bool {
    let alternation = aliases.join("|");
    let pattern = format!(r"(?im)^\s*#{{1,6}}[^\n]*\b(?:{alternation})\b");
    let Ok(re) = Regex::new(&pattern) else {
        log::error!("bad heading pattern for aliases {aliases:?}");
        return false;
    };
    re.is_match(text)
}

/// Count `Severity ... <level>` markers, tolerating punctuation and bold
/// markers between the word and the level
fn severity_counts(text: &str) -> SeverityCounts {
    let Ok(re) = Regex::new(r"(?i)Severity[\s:*_\-]*(High|Medium|Low)") else {
        log::error!("bad severity pattern");
        return SeverityCounts::default();
    };
    let mut counts = SeverityCounts::default();
    for caps in re.captures_iter(text) {
        match caps[1].to_ascii_lowercase().as_str() {
            "high" => counts.high += 1,
            "medium" => counts.medium += 1,
            "low" => counts.low += 1,
            _ => {}
        }
    }
    counts
}

/// Run the full heuristic pass over the report text
pub fn extract_metrics(text: &str) -> ReportMetrics {
    let mut metrics = ReportMetrics {
        issues: severity_counts(text),
        ..Default::default()
    };

    for labels in CATEGORIES {
        let score = score_for(text, labels.aliases);
        // Present when scored, or when the section heading exists at all
        let present = score != 0 || heading_for(text, labels.aliases);

        match labels.category {
            Category::Ux => {
                metrics.scores.ux = score;
                metrics.has_section.ux = present;
            }
            Category::Wcag => {
                metrics.scores.wcag = score;
                metrics.has_section.wcag = present;
            }
            Category::Flow => {
                metrics.scores.flow = score;
                metrics.has_section.flow = present;
            }
            Category::Conversion => {
                metrics.scores.conversion = score;
                metrics.has_section.conversion = present;
            }
            Category::Ia => {
                metrics.scores.ia = score;
                metrics.has_section.ia = present;
            }
            Category::Visual => {
                metrics.scores.visual = score;
                metrics.has_section.visual = present;
            }
        }
    }

    log::debug!(
        "report metrics: scores {:?}, issues {:?}",
        metrics.scores,
        metrics.issues
    );
    metrics
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessibility_score_sets_score_and_presence() {
        let metrics = extract_metrics("Accessibility Score: 82");
        assert_eq!(metrics.scores.wcag, 82);
        assert!(metrics.has_section.wcag);
    }

    #[test]
    fn test_no_mention_means_zero_and_absent() {
        let metrics = extract_metrics("A report about something else entirely.");
        assert_eq!(metrics.scores.wcag, 0);
        assert!(!metrics.has_section.wcag);
    }

    #[test]
    fn test_heading_alone_marks_section_present() {
        let metrics = extract_metrics("## WCAG\nNo numbers here, just prose.");
        assert_eq!(metrics.scores.wcag, 0);
        assert!(metrics.has_section.wcag);
    }

    #[test]
    fn test_alias_variants_match_the_same_category() {
        let metrics = extract_metrics("WCAG Score - 64");
        assert_eq!(metrics.scores.wcag, 64);

        let metrics = extract_metrics("UX Heuristics Score: 71");
        assert_eq!(metrics.scores.ux, 71);
    }

    #[test]
    fn test_first_match_wins() {
        let metrics = extract_metrics("Conversion Score: 40\nConversion Score: 90");
        assert_eq!(metrics.scores.conversion, 40);
    }

    #[test]
    fn test_scores_do_not_cross_lines() {
        // The label and the score must sit on one line
        let metrics = extract_metrics("Conversion\nScore: 55");
        assert_eq!(metrics.scores.conversion, 0);
    }

    #[test]
    fn test_all_six_categories_extracted_independently() {
        let text = "\
## UX Heuristics Score: 80
## Accessibility Score: 70
## Flow Efficiency Score: 60
## Conversion Score: 50
## Information Architecture Score: 40
## Visual Hierarchy Score: 30
";
        let metrics = extract_metrics(text);
        assert_eq!(metrics.scores.ux, 80);
        assert_eq!(metrics.scores.wcag, 70);
        assert_eq!(metrics.scores.flow, 60);
        assert_eq!(metrics.scores.conversion, 50);
        assert_eq!(metrics.scores.ia, 40);
        assert_eq!(metrics.scores.visual, 30);
        assert!(metrics.has_section.ux && metrics.has_section.visual);
    }

    #[test]
    fn test_severity_counts_are_global_and_per_level() {
        let text = "\
**Severity: High** something
later **Severity: High** again
and Severity - Medium once
";
        let metrics = extract_metrics(text);
        assert_eq!(metrics.issues.high, 2);
        assert_eq!(metrics.issues.medium, 1);
        assert_eq!(metrics.issues.low, 0);
    }

    #[test]
    fn test_severity_matching_is_case_insensitive() {
        let metrics = extract_metrics("severity: low\nSEVERITY: LOW");
        assert_eq!(metrics.issues.low, 2);
    }
}
