//! Blocking HTTP client for the Wikidata query service.
//!
//! Uses `ureq` for synchronous requests. There is no retry: a failed call
//! surfaces as a [`QueryError`] and aborts the stage.

use std::io::Read;
use std::time::Duration;

use crate::error::{QueryError, QueryResult};

use super::{parse_results, Row, SparqlClient};

/// Maximum number of response-body bytes quoted in an HTTP status error.
const MAX_ERROR_BODY: usize = 500;

/// SPARQL client for a Wikidata-compatible endpoint.
pub struct WikidataClient {
    endpoint: String,
    agent: ureq::Agent,
}

impl WikidataClient {
    pub fn new(endpoint: &str, user_agent: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(user_agent)
            .build();
        Self {
            endpoint: endpoint.to_string(),
            agent,
        }
    }
}

impl SparqlClient for WikidataClient {
    fn select(&self, query: &str) -> QueryResult<Vec<Row>> {
        tracing::debug!(endpoint = %self.endpoint, "running sparql:\n{query}");

        let response = self
            .agent
            .get(&self.endpoint)
            .query("query", query)
            .set("Accept", "application/sparql-results+json")
            .call();

        match response {
            Ok(response) => {
                // into_string() caps bodies at 10 MB; large harvests exceed that.
                let mut body = String::new();
                response
                    .into_reader()
                    .read_to_string(&mut body)
                    .map_err(|e| QueryError::Transport {
                        endpoint: self.endpoint.clone(),
                        message: format!("failed to read body: {e}"),
                    })?;
                let rows = parse_results(&body)?;
                tracing::debug!(rows = rows.len(), "sparql query complete");
                Ok(rows)
            }
            Err(ureq::Error::Status(status, response)) => {
                let mut body = response.into_string().unwrap_or_default();
                if body.len() > MAX_ERROR_BODY {
                    let mut cut = MAX_ERROR_BODY;
                    while !body.is_char_boundary(cut) {
                        cut -= 1;
                    }
                    body.truncate(cut);
                    body.push_str("...");
                }
                Err(QueryError::Status { status, body })
            }
            Err(ureq::Error::Transport(transport)) => Err(QueryError::Transport {
                endpoint: self.endpoint.clone(),
                message: transport.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparql::templates;

    #[test]
    fn unreachable_endpoint_is_a_transport_error() {
        let client = WikidataClient::new(
            "http://127.0.0.1:9/sparql",
            "test",
            Duration::from_millis(200),
        );
        match client.select(templates::PREDICATE_CENSUS) {
            Err(QueryError::Transport { endpoint, .. }) => {
                assert_eq!(endpoint, "http://127.0.0.1:9/sparql");
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }
}
