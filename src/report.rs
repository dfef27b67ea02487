//! Outcome of a pipeline run and its Markdown preview.

use comfy_table::Table;
use comfy_table::presets::ASCII_MARKDOWN;

use crate::relation::{RelationRecord, TableRow};

/// Rows produced by the diff stage.
#[derive(Debug, Clone, Default)]
pub struct Report {
    /// Every Wikidata relation missing from ROR.
    pub diff: Vec<RelationRecord>,
    /// The subset whose predicate ROR already models.
    pub suggestions: Vec<RelationRecord>,
}

impl Report {
    /// Suggestions whose subject and object both resolve to ROR records.
    pub fn resolved_suggestions(&self) -> impl Iterator<Item = &RelationRecord> {
        self.suggestions.iter().filter(|r| r.is_fully_labeled())
    }

    /// GitHub-flavoured Markdown table of the first `rows` resolved suggestions.
    pub fn preview(&self, rows: usize) -> String {
        let mut table = Table::new();
        table.load_preset(ASCII_MARKDOWN);
        table.set_header(RelationRecord::COLUMNS.to_vec());
        for r in self.resolved_suggestions().take(rows) {
            table.add_row(vec![
                cell(Some(&r.subject)),
                cell(r.subject_label.as_ref()),
                cell(Some(&r.predicate)),
                cell(r.predicate_label.as_ref()),
                cell(Some(&r.object)),
                cell(r.object_label.as_ref()),
            ]);
        }
        table.to_string()
    }
}

fn cell(value: Option<&String>) -> String {
    value.map(|v| v.replace('|', "\\|")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestion(subject: &str, subject_label: Option<&str>) -> RelationRecord {
        RelationRecord {
            subject: subject.into(),
            subject_label: subject_label.map(Into::into),
            predicate: "P361".into(),
            predicate_label: Some("part of".into()),
            object: "00njsd438".into(),
            object_label: Some("Google (United States)".into()),
        }
    }

    #[test]
    fn preview_skips_unresolved_rows() {
        let report = Report {
            diff: Vec::new(),
            suggestions: vec![
                suggestion("04unknown", None),
                suggestion("03nmefy27", Some("Google (Ireland)")),
            ],
        };
        let preview = report.preview(5);
        assert!(preview.contains("subjectROR"));
        assert!(preview.contains("Google (Ireland)"));
        assert!(!preview.contains("04unknown"));
        assert_eq!(report.suggestions.len(), 2);
    }

    #[test]
    fn preview_is_limited_to_requested_rows() {
        let report = Report {
            diff: Vec::new(),
            suggestions: (0..10)
                .map(|i| suggestion(&format!("0{i}aaaaaa"), Some("Org")))
                .collect(),
        };
        let preview = report.preview(3);
        assert!(preview.contains("00aaaaaa"));
        assert!(preview.contains("02aaaaaa"));
        assert!(!preview.contains("03aaaaaa"));
    }

    #[test]
    fn pipes_in_names_are_escaped() {
        let report = Report {
            diff: Vec::new(),
            suggestions: vec![suggestion("03nmefy27", Some("A | B"))],
        };
        assert!(report.preview(1).contains("A \\| B"));
    }
}
