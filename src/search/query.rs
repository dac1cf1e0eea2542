//! Query construction for the three search modes.
//!
//! Each builder assembles the exact JSON body the store will receive and
//! returns it as a [`BuiltQuery`]; the echoed/debug form is that same
//! body, so what is printed is what was sent. Parameter validation runs
//! before any embedding fetch, so invalid parameters never cost a network
//! round trip.

use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::embedding::{EmbeddingClient, EmbeddingError, EmbeddingVariant};

/// Which clauses a query carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Lexical,
    Vector,
    Hybrid,
}

impl SearchMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchMode::Lexical => "lexical",
            SearchMode::Vector => "vector",
            SearchMode::Hybrid => "hybrid",
        }
    }
}

/// Field/value equality filter, ANDed with the match clause.
#[derive(Debug, Clone)]
pub struct FilterClause {
    pub field: String,
    pub value: String,
}

impl FilterClause {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Nearest-neighbor parameters for vector and hybrid modes.
#[derive(Debug, Clone, Copy)]
pub struct VectorParams {
    pub variant: EmbeddingVariant,
    /// Neighbors requested.
    pub k: usize,
    /// Approximate-search oversampling factor; must be >= k.
    pub num_candidates: usize,
}

/// A query ready for execution. `body` is sent to the store verbatim and
/// doubles as the echoed form for `--print-query`.
#[derive(Debug, Clone)]
pub struct BuiltQuery {
    pub mode: SearchMode,
    pub body: Value,
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid search parameters: {0}")]
    InvalidSearchParameters(String),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
}

/// The knn clause of a vector or hybrid query.
#[derive(Debug, Serialize)]
struct KnnClause {
    field: &'static str,
    query_vector: Vec<f32>,
    k: usize,
    num_candidates: usize,
}

/// Builds structured queries, fetching embeddings on demand for the modes
/// that need one. Stateless across calls.
pub struct QueryBuilder<'a> {
    embedder: &'a EmbeddingClient,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(embedder: &'a EmbeddingClient) -> Self {
        Self { embedder }
    }

    /// Multi-field match over `fields`, ANDed with `filters`.
    pub fn build_lexical(
        &self,
        text: &str,
        fields: &[&str],
        filters: &[FilterClause],
        size: usize,
    ) -> Result<BuiltQuery, QueryError> {
        Ok(BuiltQuery {
            mode: SearchMode::Lexical,
            body: json!({
                "query": lexical_clause(text, fields, filters),
                "size": size,
            }),
        })
    }

    /// Approximate nearest-neighbor query over the variant's vector field.
    pub fn build_vector(
        &self,
        text: &str,
        params: VectorParams,
        size: usize,
    ) -> Result<BuiltQuery, QueryError> {
        validate_vector_params(&params)?;
        let query_vector = self.embedder.get_vector(text, params.variant)?;
        Ok(BuiltQuery {
            mode: SearchMode::Vector,
            body: json!({
                "knn": knn_clause(query_vector, &params),
                "size": size,
            }),
        })
    }

    /// One combined request carrying both the lexical and the knn clause.
    /// The store fuses the two signals into a single ranking; this side
    /// only packages the clauses and applies the final `size` cap.
    pub fn build_hybrid(
        &self,
        text: &str,
        params: VectorParams,
        fields: &[&str],
        filters: &[FilterClause],
        size: usize,
    ) -> Result<BuiltQuery, QueryError> {
        validate_vector_params(&params)?;
        let query_vector = self.embedder.get_vector(text, params.variant)?;
        Ok(BuiltQuery {
            mode: SearchMode::Hybrid,
            body: json!({
                "query": lexical_clause(text, fields, filters),
                "knn": knn_clause(query_vector, &params),
                "size": size,
            }),
        })
    }
}

fn validate_vector_params(params: &VectorParams) -> Result<(), QueryError> {
    if params.k == 0 {
        return Err(QueryError::InvalidSearchParameters(
            "k must be at least 1".to_string(),
        ));
    }
    if params.num_candidates < params.k {
        return Err(QueryError::InvalidSearchParameters(format!(
            "num_candidates ({}) must be >= k ({})",
            params.num_candidates, params.k
        )));
    }
    Ok(())
}

fn lexical_clause(text: &str, fields: &[&str], filters: &[FilterClause]) -> Value {
    let mut must = vec![json!({
        "multi_match": { "query": text, "fields": fields }
    })];
    for f in filters {
        must.push(json!({ "match": { (f.field.as_str()): f.value.as_str() } }));
    }
    json!({ "bool": { "must": must } })
}

fn knn_clause(query_vector: Vec<f32>, params: &VectorParams) -> KnnClause {
    KnnClause {
        field: params.variant.vector_field(),
        query_vector,
        k: params.k,
        num_candidates: params.num_candidates,
    }
}
