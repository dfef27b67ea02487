//! Rich diagnostic error types for the reconciliation pipeline.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so users know exactly what
//! went wrong and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the pipeline.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum ReconcileError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Checkpoint(#[from] CheckpointError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Vocabulary(#[from] VocabularyError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

pub type ReconcileResult<T> = std::result::Result<T, ReconcileError>;

// ---------------------------------------------------------------------------
// Query errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum QueryError {
    #[error("transport error talking to {endpoint}: {message}")]
    #[diagnostic(
        code(reconcile::query::transport),
        help(
            "The SPARQL endpoint could not be reached. Check network access \
             and the configured `endpoint`."
        )
    )]
    Transport { endpoint: String, message: String },

    #[error("SPARQL endpoint returned HTTP {status}: {body}")]
    #[diagnostic(
        code(reconcile::query::status),
        help(
            "The endpoint rejected the query. A 429 or 403 usually means the \
             user agent is missing or rate limited; a 500 often means the query timed out."
        )
    )]
    Status { status: u16, body: String },

    #[error("malformed SPARQL results document: {message}")]
    #[diagnostic(
        code(reconcile::query::malformed),
        help("The endpoint did not answer with SPARQL 1.1 JSON results.")
    )]
    Malformed { message: String },

    #[error("result row is missing the `{variable}` binding")]
    #[diagnostic(
        code(reconcile::query::missing_binding),
        help("Every row of this query is expected to bind `{variable}`.")
    )]
    MissingBinding { variable: String },

    #[error("invalid count `{value}` for predicate {predicate}")]
    #[diagnostic(
        code(reconcile::query::bad_count),
        help("The census query must return an integer count per predicate.")
    )]
    BadCount { predicate: String, value: String },
}

pub type QueryResult<T> = std::result::Result<T, QueryError>;

// ---------------------------------------------------------------------------
// Checkpoint errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum CheckpointError {
    #[error("I/O error on checkpoint {path}")]
    #[diagnostic(
        code(reconcile::checkpoint::io),
        help(
            "A filesystem operation failed. Check that the data directory exists, \
             has correct permissions, and that the disk is not full."
        )
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse checkpoint {path}: {message}")]
    #[diagnostic(
        code(reconcile::checkpoint::parse),
        help(
            "The checkpoint is not a valid tab-separated table. Delete it to \
             force the stage to be recomputed."
        )
    )]
    Parse { path: String, message: String },

    #[error("checkpoint {path} has columns [{found}], expected [{expected}]")]
    #[diagnostic(
        code(reconcile::checkpoint::columns),
        help(
            "The header row does not match this stage's table shape. Delete the \
             file to force the stage to be recomputed."
        )
    )]
    Columns {
        path: String,
        expected: String,
        found: String,
    },
}

pub type CheckpointResult<T> = std::result::Result<T, CheckpointError>;

// ---------------------------------------------------------------------------
// Registry errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum RegistryError {
    #[error("failed to download the ROR data dump from {url}: {message}")]
    #[diagnostic(
        code(reconcile::registry::download),
        help(
            "Zenodo could not be reached or did not list a dump archive. Download \
             the dump by hand, unpack the JSON file and pass it with `--ror-dump <file>`."
        )
    )]
    Download { url: String, message: String },

    #[error("invalid ROR dump archive: {message}")]
    #[diagnostic(
        code(reconcile::registry::archive),
        help("The downloaded archive must be a zip holding the ROR JSON dump.")
    )]
    Archive { message: String },

    #[error("failed to read ROR data dump {path}")]
    #[diagnostic(
        code(reconcile::registry::io),
        help("Check that the file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse ROR data dump {path}: {message}")]
    #[diagnostic(
        code(reconcile::registry::parse),
        help("The dump must be the unpacked JSON array of ROR organization records.")
    )]
    Parse { path: String, message: String },
}

pub type RegistryResult<T> = std::result::Result<T, RegistryError>;

// ---------------------------------------------------------------------------
// Vocabulary errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum VocabularyError {
    #[error("registry relation {namespace}:{identifier} is not in the vocabulary table")]
    #[diagnostic(
        code(reconcile::vocabulary::unknown_relation),
        help(
            "The registry uses a relation type the mapping table does not know. \
             Add an entry for it to `Vocabulary::ror()`, with no predicate if it \
             has no Wikidata counterpart."
        )
    )]
    UnknownRelation {
        namespace: String,
        identifier: String,
    },
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(reconcile::config::read),
        help("Ensure the config file exists and is valid TOML.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {path}: {message}")]
    #[diagnostic(
        code(reconcile::config::parse),
        help("Check the TOML syntax in the config file.")
    )]
    Parse { path: String, message: String },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
