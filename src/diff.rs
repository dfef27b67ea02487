//! Set difference between Wikidata and ROR relations.

use std::collections::BTreeSet;

use crate::relation::{RelationKey, RelationRecord};

/// Keys of relations Wikidata asserts that ROR does not, in key order.
///
/// Only (subject, predicate, object) takes part in the comparison; labels are
/// ignored.
pub fn missing_from_registry(
    wikidata: &[RelationRecord],
    registry: &[RelationRecord],
) -> BTreeSet<RelationKey> {
    let known: BTreeSet<RelationKey> = registry.iter().map(RelationRecord::key).collect();
    wikidata
        .iter()
        .map(RelationRecord::key)
        .filter(|key| !known.contains(key))
        .collect()
}

/// Rows whose predicate is one ROR already models, so the missing relation is
/// a content gap rather than a schema gap.
pub fn suggestions(diff: &[RelationRecord], suggestible: &BTreeSet<String>) -> Vec<RelationRecord> {
    diff.iter()
        .filter(|r| suggestible.contains(&r.predicate))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(subject: &str, predicate: &str, object: &str, label: Option<&str>) -> RelationRecord {
        RelationRecord {
            subject: subject.into(),
            subject_label: label.map(Into::into),
            predicate: predicate.into(),
            predicate_label: None,
            object: object.into(),
            object_label: label.map(Into::into),
        }
    }

    #[test]
    fn difference_is_wikidata_minus_registry() {
        let wikidata = vec![
            rel("a", "P361", "b", Some("x")),
            rel("a", "P749", "b", None),
            rel("c", "P361", "d", None),
        ];
        let registry = vec![rel("a", "P361", "b", None), rel("z", "P361", "y", None)];

        let diff = missing_from_registry(&wikidata, &registry);
        assert_eq!(
            diff.into_iter().collect::<Vec<_>>(),
            vec![
                RelationKey::new("a", "P749", "b"),
                RelationKey::new("c", "P361", "d"),
            ]
        );
    }

    #[test]
    fn labels_do_not_affect_comparison() {
        let wikidata = vec![rel("a", "P361", "b", Some("Alpha"))];
        let registry = vec![rel("a", "P361", "b", Some("Different name"))];
        assert!(missing_from_registry(&wikidata, &registry).is_empty());
    }

    #[test]
    fn duplicates_collapse() {
        let wikidata = vec![rel("a", "P361", "b", None), rel("a", "P361", "b", None)];
        assert_eq!(missing_from_registry(&wikidata, &[]).len(), 1);
    }

    #[test]
    fn suggestions_keep_only_suggestible_predicates() {
        let diff = vec![
            rel("a", "P361", "b", None),
            rel("a", "P749", "b", None),
            rel("a", "P527", "c", None),
        ];
        let suggestible: BTreeSet<String> = ["P361".to_string(), "P527".to_string()].into();
        let kept = suggestions(&diff, &suggestible);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|r| suggestible.contains(&r.predicate)));
    }
}
