//! Mapping from ROR's internal relation terms to Wikidata properties.
//!
//! ROR exports its relationships with OBO-style relation terms. Only terms
//! with a Wikidata counterpart take part in the comparison; the rest are
//! kept in the table with no predicate so that an unknown term can be told
//! apart from an intentionally unmapped one.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::VocabularyError;

/// A relation term as (namespace, local identifier), e.g. `bfo:0000050`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelationTerm {
    pub namespace: String,
    pub identifier: String,
}

impl RelationTerm {
    pub fn new(namespace: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            identifier: identifier.into(),
        }
    }
}

impl std::fmt::Display for RelationTerm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.namespace, self.identifier)
    }
}

/// What a relation term means and which Wikidata property it corresponds to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularyEntry {
    pub label: String,
    /// Wikidata property id, or `None` when deliberately left unmapped.
    pub predicate: Option<String>,
}

/// Immutable relation-term mapping table.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    entries: BTreeMap<RelationTerm, VocabularyEntry>,
}

impl Vocabulary {
    /// The table for the relation terms ROR uses.
    pub fn ror() -> Self {
        Self::default()
            .with(("bfo", "0000062"), "preceded by", None)
            .with(("bfo", "0000050"), "part of", Some("P361"))
            .with(("bfo", "0000051"), "has part", Some("P527"))
            .with(("bfo", "0000063"), "precedes", None)
            // could be mapped, but is not needed for suggestions
            .with(("rdfs", "seeAlso"), "see also", None)
    }

    /// Add or replace an entry.
    pub fn with(
        mut self,
        (namespace, identifier): (&str, &str),
        label: &str,
        predicate: Option<&str>,
    ) -> Self {
        self.entries.insert(
            RelationTerm::new(namespace, identifier),
            VocabularyEntry {
                label: label.to_string(),
                predicate: predicate.map(str::to_string),
            },
        );
        self
    }

    /// Look up a term. Terms missing from the table are an error.
    pub fn lookup(&self, term: &RelationTerm) -> Result<&VocabularyEntry, VocabularyError> {
        self.entries
            .get(term)
            .ok_or_else(|| VocabularyError::UnknownRelation {
                namespace: term.namespace.clone(),
                identifier: term.identifier.clone(),
            })
    }

    /// Wikidata properties that can be suggested back to ROR: every mapping
    /// target in the table.
    pub fn suggestible(&self) -> BTreeSet<String> {
        self.entries
            .values()
            .filter_map(|e| e.predicate.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
