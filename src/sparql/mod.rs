//! SPARQL access to the Wikidata query service.
//!
//! The pipeline only needs SELECT queries, so a client is anything that turns
//! a query string into rows of variable bindings. [`WikidataClient`] does this
//! over HTTP; tests substitute an in-memory implementation.

mod client;
pub mod templates;

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{QueryError, QueryResult};

pub use client::WikidataClient;

/// Namespace of Wikidata items and properties. Values in it are shortened to
/// their local id (`P361`, `Q42`).
pub const WD_ENTITY_NS: &str = "http://www.wikidata.org/entity/";

/// Namespace of direct-claim properties, as bound by `?s ?predicate ?o`.
pub const WDT_NS: &str = "http://www.wikidata.org/prop/direct/";

/// One result row: variable name → scalar value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row(BTreeMap<String, String>);

impl Row {
    pub fn get(&self, variable: &str) -> Option<&str> {
        self.0.get(variable).map(String::as_str)
    }

    /// Get a binding every row of the query is expected to have.
    pub fn require(&self, variable: &str) -> QueryResult<&str> {
        self.get(variable).ok_or_else(|| QueryError::MissingBinding {
            variable: variable.to_string(),
        })
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Executes SPARQL SELECT queries.
///
/// Calls are blocking; a failed call aborts the stage that issued it.
pub trait SparqlClient {
    fn select(&self, query: &str) -> QueryResult<Vec<Row>>;
}

// SPARQL 1.1 Query Results JSON Format.

#[derive(Debug, Deserialize)]
struct ResultsDocument {
    results: Bindings,
}

#[derive(Debug, Deserialize)]
struct Bindings {
    bindings: Vec<BTreeMap<String, Term>>,
}

#[derive(Debug, Deserialize)]
struct Term {
    #[serde(rename = "type")]
    kind: String,
    value: String,
}

/// Decode a SPARQL JSON results document into rows.
pub fn parse_results(body: &str) -> QueryResult<Vec<Row>> {
    let doc: ResultsDocument = serde_json::from_str(body).map_err(|e| QueryError::Malformed {
        message: e.to_string(),
    })?;

    Ok(doc
        .results
        .bindings
        .into_iter()
        .map(|binding| {
            binding
                .into_iter()
                .map(|(var, term)| (var, term.into_scalar()))
                .collect::<Row>()
        })
        .collect())
}

impl Term {
    fn into_scalar(self) -> String {
        if self.kind == "uri" {
            if let Some(local) = self.value.strip_prefix(WD_ENTITY_NS) {
                return local.to_string();
            }
        }
        self.value
    }
}
