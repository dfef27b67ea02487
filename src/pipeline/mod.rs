//! The five-stage reconciliation pipeline.
//!
//! 1. **Census**: count predicates linking two ROR-identified Wikidata items.
//! 2. **Labeling**: shorten predicate URIs to property ids and fetch labels.
//! 3. **Harvest**: fetch every ROR-to-ROR pair for each frequent predicate.
//! 4. **Registry extraction**: ROR's own relations, mapped to Wikidata properties.
//! 5. **Diff**: relations in Wikidata but not in ROR, and the suggestible subset.
//!
//! Stages 1-4 are checkpointed (see [`checkpoint::stage`]); stage 5 always runs.

use std::collections::BTreeSet;

use indicatif::{ProgressBar, ProgressStyle};

use crate::checkpoint::{self, stage};
use crate::config::PipelineConfig;
use crate::diff;
use crate::error::{QueryError, ReconcileResult};
use crate::registry::Registry;
use crate::relation::{CensusRecord, PredicateLabels, PredicateRecord, RelationKey, RelationRecord};
use crate::report::Report;
use crate::sparql::{templates, Row, SparqlClient, WDT_NS};

/// One reconciliation run over a Wikidata client and a ROR registry.
pub struct Pipeline<'a> {
    config: PipelineConfig,
    suggestible: BTreeSet<String>,
    client: &'a dyn SparqlClient,
    registry: &'a dyn Registry,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: PipelineConfig,
        client: &'a dyn SparqlClient,
        registry: &'a dyn Registry,
    ) -> Self {
        let suggestible = config.vocabulary.suggestible();
        Self {
            config,
            suggestible,
            client,
            registry,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage, resuming from existing checkpoints.
    pub fn run(&self) -> ReconcileResult<Report> {
        self.config.paths.ensure_dir()?;

        // Predicate labels feed stages 4 and 5, so stage 2 is resolved even
        // when stage 3 is already cached.
        let predicates = self.labeled_predicates()?;
        let labels: PredicateLabels = predicates.iter().collect();

        let wikidata = self.harvest(&predicates, &labels)?;
        let registry = self.registry_relations(&labels)?;
        self.diff(&wikidata, &registry, &labels)
    }

    /// Stage 1: predicate census.
    pub fn census(&self) -> ReconcileResult<Vec<CensusRecord>> {
        stage("census", &self.config.paths.counts, || {
            let rows = self.client.select(templates::PREDICATE_CENSUS)?;
            tracing::info!(predicates = rows.len(), "predicate census complete");
            Ok(rows
                .iter()
                .map(census_record)
                .collect::<Result<Vec<_>, _>>()?)
        })
    }

    /// Stage 2: census with local predicate ids and labels.
    pub fn labeled_predicates(&self) -> ReconcileResult<Vec<PredicateRecord>> {
        stage("labels", &self.config.paths.labeled_counts, || {
            let census = self.census()?;
            self.label_predicates(census)
        })
    }

    fn label_predicates(&self, census: Vec<CensusRecord>) -> ReconcileResult<Vec<PredicateRecord>> {
        let ids: Vec<String> = census
            .iter()
            .map(|c| local_predicate(&c.predicate).to_string())
            .collect();

        let labels: PredicateLabels = if ids.is_empty() {
            PredicateLabels::default()
        } else {
            let rows = self.client.select(&templates::predicate_labels(&ids))?;
            rows.iter()
                .map(|row| -> Result<_, QueryError> {
                    let predicate = row.require("predicate")?;
                    Ok(row
                        .get("predicateLabel")
                        .map(|label| (predicate.to_string(), label.to_string())))
                })
                .filter_map(Result::transpose)
                .collect::<Result<_, QueryError>>()?
        };
        tracing::info!(labeled = labels.len(), predicates = ids.len(), "predicate labels fetched");

        Ok(census
            .into_iter()
            .zip(ids)
            .map(|(c, predicate)| PredicateRecord {
                label: labels.get(&predicate),
                predicate,
                count: c.count,
            })
            .collect())
    }

    /// Stage 3: relations asserted by Wikidata.
    pub fn harvest(
        &self,
        predicates: &[PredicateRecord],
        labels: &PredicateLabels,
    ) -> ReconcileResult<Vec<RelationRecord>> {
        stage("harvest", &self.config.paths.wikidata_relations, || {
            self.collect_relations(predicates, labels)
        })
    }

    /// Predicates frequent enough to be harvested.
    pub fn harvestable<'p>(&self, predicates: &'p [PredicateRecord]) -> Vec<&'p str> {
        predicates
            .iter()
            .filter(|p| p.count >= self.config.count_threshold)
            .map(|p| p.predicate.as_str())
            .collect()
    }

    fn collect_relations(
        &self,
        predicates: &[PredicateRecord],
        labels: &PredicateLabels,
    ) -> ReconcileResult<Vec<RelationRecord>> {
        let selected = self.harvestable(predicates);
        tracing::info!(
            predicates = selected.len(),
            threshold = self.config.count_threshold,
            "harvesting relations"
        );

        let progress = ProgressBar::new(selected.len() as u64);
        progress.set_style(
            ProgressStyle::with_template("{msg:>6} [{bar:40}] {pos}/{len} ({elapsed})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("##-"),
        );

        let mut keys = Vec::new();
        for predicate in selected {
            progress.set_message(predicate.to_string());
            let rows = self.client.select(&templates::ror_relations(predicate))?;
            for row in &rows {
                keys.push(RelationKey::new(
                    row.require("subjectROR")?,
                    predicate,
                    row.require("objectROR")?,
                ));
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        keys.sort();
        tracing::info!(relations = keys.len(), "harvest complete");
        Ok(self.enrich(keys, labels))
    }

    /// Stage 4: relations declared by ROR, in Wikidata terms.
    pub fn registry_relations(&self, labels: &PredicateLabels) -> ReconcileResult<Vec<RelationRecord>> {
        stage("registry", &self.config.paths.ror_relations, || {
            let mut keys = Vec::new();
            let mut unmapped = 0usize;
            for relation in self.registry.relations()? {
                if !relation.targets_registry() {
                    continue;
                }
                let entry = self.config.vocabulary.lookup(&relation.term())?;
                let Some(predicate) = &entry.predicate else {
                    unmapped += 1;
                    continue;
                };
                keys.push(RelationKey::new(
                    relation.source_id,
                    predicate.as_str(),
                    relation.target_id,
                ));
            }
            keys.sort();
            tracing::info!(relations = keys.len(), unmapped, "registry relations extracted");
            Ok(self.enrich(keys, labels))
        })
    }

    /// Stage 5: diff and suggestions. Always recomputed and rewritten.
    pub fn diff(
        &self,
        wikidata: &[RelationRecord],
        registry: &[RelationRecord],
        labels: &PredicateLabels,
    ) -> ReconcileResult<Report> {
        let missing = diff::missing_from_registry(wikidata, registry);
        let all = self.enrich(missing, labels);
        checkpoint::write(&self.config.paths.diff_all, &all)?;

        let suggestions = diff::suggestions(&all, &self.suggestible);
        checkpoint::write(&self.config.paths.diff_suggestions, &suggestions)?;

        tracing::info!(
            diff = all.len(),
            suggestions = suggestions.len(),
            "diff complete"
        );
        Ok(Report {
            diff: all,
            suggestions,
        })
    }

    /// Attach ROR display names and predicate labels to bare keys.
    fn enrich(
        &self,
        keys: impl IntoIterator<Item = RelationKey>,
        labels: &PredicateLabels,
    ) -> Vec<RelationRecord> {
        keys.into_iter()
            .map(|k| RelationRecord {
                subject_label: self.registry.name(&k.subject),
                predicate_label: labels.get(&k.predicate),
                object_label: self.registry.name(&k.object),
                subject: k.subject,
                predicate: k.predicate,
                object: k.object,
            })
            .collect()
    }
}

/// Strip the direct-claim namespace, leaving the property id.
pub fn local_predicate(predicate: &str) -> &str {
    predicate.strip_prefix(WDT_NS).unwrap_or(predicate)
}

fn census_record(row: &Row) -> Result<CensusRecord, QueryError> {
    let predicate = row.require("predicate")?;
    let count = row.require("count")?;
    Ok(CensusRecord {
        predicate: predicate.to_string(),
        count: count.parse().map_err(|_| QueryError::BadCount {
            predicate: predicate.to_string(),
            value: count.to_string(),
        })?,
    })
}
