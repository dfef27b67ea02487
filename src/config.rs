//! Run configuration, persisted as TOML.
//!
//! Every field has a default, so the pipeline runs without any config file.
//! [`ReconcileConfig`] is the user-facing file format; [`PipelineConfig`] is
//! the immutable value the pipeline is built from.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::paths::CheckpointPaths;
use crate::vocabulary::Vocabulary;

/// Config file picked up from the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "reconcile.toml";

/// File name of the ROR dump inside the data directory when `ror_dump` is unset.
pub const DEFAULT_ROR_DUMP_FILE: &str = "ror-data.json";

/// User-facing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// Directory holding the checkpoint tables.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// SPARQL endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// User agent sent with every query.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Per-query timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Minimum census count for a predicate to be harvested.
    #[serde(default = "default_count_threshold")]
    pub count_threshold: u64,
    /// Number of suggestions shown in the preview table.
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
    /// Unpacked ROR data dump (JSON). Resolves to `<data_dir>/ror-data.json`
    /// when unset; downloaded there if missing.
    #[serde(default)]
    pub ror_dump: Option<PathBuf>,
    /// Zenodo record whose latest version holds the ROR data dump.
    #[serde(default = "default_ror_record")]
    pub ror_record: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_endpoint() -> String {
    "https://query.wikidata.org/sparql".into()
}
fn default_user_agent() -> String {
    concat!("ror-reconcile/", env!("CARGO_PKG_VERSION")).into()
}
fn default_timeout_secs() -> u64 {
    300
}
fn default_count_threshold() -> u64 {
    50
}
fn default_preview_rows() -> usize {
    5
}
fn default_ror_record() -> String {
    "https://zenodo.org/api/records/6347574/versions/latest".into()
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            endpoint: default_endpoint(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            count_threshold: default_count_threshold(),
            preview_rows: default_preview_rows(),
            ror_dump: None,
            ror_record: default_ror_record(),
        }
        .resolved()
    }
}

impl ReconcileConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(config.resolved())
    }

    /// Fill in the ROR dump location if the file left it unset.
    pub fn resolved(mut self) -> Self {
        if self.ror_dump.is_none() {
            self.ror_dump = Some(self.data_dir.join(DEFAULT_ROR_DUMP_FILE));
        }
        self
    }

    /// Move the data directory. A dump location that was defaulted into the
    /// old data directory follows it.
    pub fn set_data_dir(&mut self, data_dir: PathBuf) {
        let defaulted = self.data_dir.join(DEFAULT_ROR_DUMP_FILE);
        if self.ror_dump.as_deref() == Some(defaulted.as_path()) {
            self.ror_dump = Some(data_dir.join(DEFAULT_ROR_DUMP_FILE));
        }
        self.data_dir = data_dir;
    }

    /// Where the ROR dump is read from.
    pub fn ror_dump_path(&self) -> PathBuf {
        self.ror_dump
            .clone()
            .unwrap_or_else(|| self.data_dir.join(DEFAULT_ROR_DUMP_FILE))
    }

    /// Load `path` if given; otherwise `reconcile.toml` in the working
    /// directory if it exists, else defaults.
    pub fn discover(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build the pipeline configuration with the built-in ROR vocabulary.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::new(
            CheckpointPaths::new(&self.data_dir),
            self.count_threshold,
            self.preview_rows,
            Vocabulary::ror(),
        )
    }
}

/// Immutable inputs of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub paths: CheckpointPaths,
    pub count_threshold: u64,
    pub preview_rows: usize,
    pub vocabulary: Vocabulary,
}

impl PipelineConfig {
    pub fn new(
        paths: CheckpointPaths,
        count_threshold: u64,
        preview_rows: usize,
        vocabulary: Vocabulary,
    ) -> Self {
        Self {
            paths,
            count_threshold,
            preview_rows,
            vocabulary,
        }
    }
}
