//! SPARQL pattern evaluation: binding types, the `PatternEvaluator` seam,
//! and an HTTP client speaking the SPARQL 1.1 protocol with JSON results.

use crate::error::{OntopathError, Result};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Kind of RDF term bound to a variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermKind {
    /// A named entity (IRI)
    NamedEntity,
    /// A literal value
    Literal,
    /// A blank node
    Blank,
}

/// One bound term in a result row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub value: String,
    pub kind: TermKind,
}

impl Term {
    pub fn named(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            kind: TermKind::NamedEntity,
        }
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            kind: TermKind::Literal,
        }
    }
}

/// One solution row: variable name -> bound term.
pub type BindingRow = HashMap<String, Term>;

/// Anything that can evaluate a SPARQL query into binding rows.
///
/// The production implementation is [`SparqlClient`]; tests substitute
/// in-memory fakes.
#[allow(async_fn_in_trait)]
pub trait PatternEvaluator {
    async fn evaluate(&self, query: &str) -> Result<Vec<BindingRow>>;
}

/// SPARQL 1.1 JSON results format (`application/sparql-results+json`).
#[derive(Deserialize)]
struct SparqlJsonResults {
    results: SparqlJsonBindings,
}

#[derive(Deserialize)]
struct SparqlJsonBindings {
    bindings: Vec<HashMap<String, SparqlJsonTerm>>,
}

#[derive(Deserialize, Clone)]
struct SparqlJsonTerm {
    #[serde(rename = "type")]
    term_type: String,
    value: String,
}

impl SparqlJsonTerm {
    fn into_term(self) -> Term {
        let kind = match self.term_type.as_str() {
            "uri" => TermKind::NamedEntity,
            "bnode" => TermKind::Blank,
            // "literal" and the legacy "typed-literal"
            _ => TermKind::Literal,
        };
        Term {
            value: self.value,
            kind,
        }
    }
}

/// HTTP client for a remote SPARQL query endpoint.
pub struct SparqlClient {
    client: Client,
    endpoint: String,
}

impl SparqlClient {
    /// Create a client for the given query endpoint URL.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created (should not happen in
    /// normal operation).
    pub fn new(endpoint: String, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        Self { client, endpoint }
    }

    async fn evaluate_internal(&self, query: &str) -> Result<Vec<BindingRow>> {
        let start = std::time::Instant::now();

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/sparql-query")
            .header("Accept", "application/sparql-results+json")
            .body(query.to_string())
            .send()
            .await
            .map_err(|e| OntopathError::Sparql(format!("Network error: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());

            return Err(OntopathError::Sparql(format!(
                "Endpoint error {}: {}",
                status, body
            )));
        }

        let result: SparqlJsonResults = response
            .json()
            .await
            .map_err(|e| OntopathError::Sparql(format!("Failed to parse response: {}", e)))?;

        log::debug!(
            "SPARQL query returned {} rows in {:?}",
            result.results.bindings.len(),
            start.elapsed()
        );

        Ok(result
            .results
            .bindings
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|(var, term)| (var, term.into_term()))
                    .collect()
            })
            .collect())
    }
}

impl PatternEvaluator for SparqlClient {
    async fn evaluate(&self, query: &str) -> Result<Vec<BindingRow>> {
        self.evaluate_internal(query).await
    }
}
