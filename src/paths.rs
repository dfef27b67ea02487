//! Checkpoint file layout inside the data directory.
//!
//! Each pipeline stage persists its output as one tab-separated table. The
//! file names are fixed so that runs can be resumed from whatever stage last
//! completed.

use std::path::{Path, PathBuf};

use crate::error::{CheckpointError, CheckpointResult};

/// Locations of the six checkpoint tables.
#[derive(Debug, Clone)]
pub struct CheckpointPaths {
    /// Data directory holding all checkpoints.
    pub data_dir: PathBuf,
    /// `1-counts.tsv`: predicate census with full predicate URIs.
    pub counts: PathBuf,
    /// `2-counts.tsv`: census with local predicate ids and labels.
    pub labeled_counts: PathBuf,
    /// `3-wikidata-ror-relations.tsv`: relations harvested from Wikidata.
    pub wikidata_relations: PathBuf,
    /// `4-ror-relations.tsv`: relations declared by ROR itself.
    pub ror_relations: PathBuf,
    /// `5-diff-all.tsv`: Wikidata relations missing from ROR.
    pub diff_all: PathBuf,
    /// `5-diff-suggestions.tsv`: the diff restricted to suggestible predicates.
    pub diff_suggestions: PathBuf,
}

impl CheckpointPaths {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            counts: data_dir.join("1-counts.tsv"),
            labeled_counts: data_dir.join("2-counts.tsv"),
            wikidata_relations: data_dir.join("3-wikidata-ror-relations.tsv"),
            ror_relations: data_dir.join("4-ror-relations.tsv"),
            diff_all: data_dir.join("5-diff-all.tsv"),
            diff_suggestions: data_dir.join("5-diff-suggestions.tsv"),
            data_dir,
        }
    }

    /// All checkpoint files in stage order.
    pub fn all(&self) -> [&Path; 6] {
        [
            self.counts.as_path(),
            self.labeled_counts.as_path(),
            self.wikidata_relations.as_path(),
            self.ror_relations.as_path(),
            self.diff_all.as_path(),
            self.diff_suggestions.as_path(),
        ]
    }

    /// Create the data directory. Idempotent.
    pub fn ensure_dir(&self) -> CheckpointResult<()> {
        std::fs::create_dir_all(&self.data_dir).map_err(|e| CheckpointError::Io {
            path: self.data_dir.display().to_string(),
            source: e,
        })
    }
}
