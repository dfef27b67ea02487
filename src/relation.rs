//! Table row types shared by the pipeline stages.
//!
//! Wikidata-sourced and ROR-sourced relations share [`RelationRecord`] so the
//! two provenances can be compared on their [`RelationKey`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A table row with a fixed column order, persisted as one checkpoint line.
pub trait TableRow: Serialize + serde::de::DeserializeOwned {
    /// Header names, in serialization order.
    const COLUMNS: &'static [&'static str];
}

/// Stage 1 row: a predicate URI and how many triples between two
/// ROR-linked items use it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CensusRecord {
    pub predicate: String,
    pub count: u64,
}

impl TableRow for CensusRecord {
    const COLUMNS: &'static [&'static str] = &["predicate", "count"];
}

/// Stage 2 row: census entry keyed by local predicate id, with its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicateRecord {
    pub predicate: String,
    pub count: u64,
    #[serde(rename = "predicateLabel")]
    pub label: Option<String>,
}

impl TableRow for PredicateRecord {
    const COLUMNS: &'static [&'static str] = &["predicate", "count", "predicateLabel"];
}

/// A labeled (subject, predicate, object) relation between two ROR ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationRecord {
    #[serde(rename = "subjectROR")]
    pub subject: String,
    #[serde(rename = "subjectLabel")]
    pub subject_label: Option<String>,
    pub predicate: String,
    #[serde(rename = "predicateLabel")]
    pub predicate_label: Option<String>,
    #[serde(rename = "objectROR")]
    pub object: String,
    #[serde(rename = "objectLabel")]
    pub object_label: Option<String>,
}

impl TableRow for RelationRecord {
    const COLUMNS: &'static [&'static str] = &[
        "subjectROR",
        "subjectLabel",
        "predicate",
        "predicateLabel",
        "objectROR",
        "objectLabel",
    ];
}

impl RelationRecord {
    /// Comparison key; labels are enrichment only.
    pub fn key(&self) -> RelationKey {
        RelationKey {
            subject: self.subject.clone(),
            predicate: self.predicate.clone(),
            object: self.object.clone(),
        }
    }

    /// Both ends resolve to a known ROR record.
    pub fn is_fully_labeled(&self) -> bool {
        self.subject_label.is_some() && self.object_label.is_some()
    }
}

/// Identity of a relation. Ordering sorts by subject, then predicate, then object.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelationKey {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl RelationKey {
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

/// Predicate id → human-readable label, built from the stage 2 table.
#[derive(Debug, Clone, Default)]
pub struct PredicateLabels(BTreeMap<String, String>);

impl PredicateLabels {
    pub fn get(&self, predicate: &str) -> Option<String> {
        self.0.get(predicate).cloned()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> FromIterator<&'a PredicateRecord> for PredicateLabels {
    fn from_iter<I: IntoIterator<Item = &'a PredicateRecord>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .filter_map(|r| Some((r.predicate.clone(), r.label.clone()?)))
                .collect(),
        )
    }
}

impl FromIterator<(String, String)> for PredicateLabels {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_order_by_subject_then_predicate_then_object() {
        let mut keys = vec![
            RelationKey::new("b", "P1", "a"),
            RelationKey::new("a", "P2", "a"),
            RelationKey::new("a", "P1", "z"),
            RelationKey::new("a", "P1", "b"),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                RelationKey::new("a", "P1", "b"),
                RelationKey::new("a", "P1", "z"),
                RelationKey::new("a", "P2", "a"),
                RelationKey::new("b", "P1", "a"),
            ]
        );
    }

    #[test]
    fn labels_skip_unlabeled_predicates() {
        let records = [
            PredicateRecord {
                predicate: "P361".into(),
                count: 10,
                label: Some("part of".into()),
            },
            PredicateRecord {
                predicate: "P9999".into(),
                count: 3,
                label: None,
            },
        ];
        let labels: PredicateLabels = records.iter().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels.get("P361").as_deref(), Some("part of"));
        assert_eq!(labels.get("P9999"), None);
    }
}
