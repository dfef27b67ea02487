//! # ror-reconcile
//!
//! Finds organization relations that Wikidata asserts but the Research
//! Organization Registry (ROR) does not, and shortlists those that could be
//! proposed back to ROR.
//!
//! ## Architecture
//!
//! - **SPARQL client** (`sparql`): blocking queries against the Wikidata query service
//! - **Registry** (`registry`): ROR display names and declared relations from a data dump,
//!   fetched from Zenodo on first use
//! - **Vocabulary** (`vocabulary`): ROR relation terms → Wikidata properties
//! - **Checkpoints** (`checkpoint`): tab-separated stage outputs, reused across runs
//! - **Pipeline** (`pipeline`): census → labels → harvest → registry → diff
//!
//! ## Library usage
//!
//! ```no_run
//! use ror_reconcile::config::ReconcileConfig;
//! use ror_reconcile::pipeline::Pipeline;
//! use ror_reconcile::registry::{DumpSource, RorDump};
//! use ror_reconcile::sparql::WikidataClient;
//!
//! let config = ReconcileConfig::default();
//! let client = WikidataClient::new(&config.endpoint, &config.user_agent, config.timeout());
//! let source = DumpSource::new(&config.ror_record, &config.user_agent, config.timeout());
//! let registry = RorDump::open_or_fetch(&config.ror_dump_path(), &source).unwrap();
//! let report = Pipeline::new(config.pipeline_config(), &client, &registry)
//!     .run()
//!     .unwrap();
//! println!("{}", report.preview(5));
//! ```

pub mod checkpoint;
pub mod config;
pub mod diff;
pub mod error;
pub mod paths;
pub mod pipeline;
pub mod registry;
pub mod relation;
pub mod report;
pub mod sparql;
pub mod vocabulary;
