//! Embedding dispatch for semantic search.
//!
//! Vectors come from an external HTTP provider; this module owns the variant
//! vocabulary, the provider call, and the normalization the asymmetric
//! variant requires. No caching, no retries: one call per request, errors
//! surface to the caller.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Fixed dimension of every provider vector.
pub const EMBEDDING_DIM: usize = 768;

/// The two embedding spaces the index stores, each bound to its own
/// vector field and similarity metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingVariant {
    /// Mutual-similarity space; the store's cosine metric normalizes
    /// internally, so raw provider output is used as-is.
    Symmetric,
    /// Query-document space scored by dot product. Only meaningful over
    /// unit vectors, so the dispatcher L2-normalizes before handing back.
    Asymmetric,
}

impl EmbeddingVariant {
    /// Interchange token used on the provider wire and in config.
    pub fn as_str(self) -> &'static str {
        match self {
            EmbeddingVariant::Symmetric => "symmetric",
            EmbeddingVariant::Asymmetric => "asymmetric",
        }
    }

    /// Index field holding this variant's document vectors. One field per
    /// variant; no field stores both.
    pub fn vector_field(self) -> &'static str {
        match self {
            EmbeddingVariant::Symmetric => "sbert_symmetric_overview_embedding",
            EmbeddingVariant::Asymmetric => "sbert_asymmetric_overview_embedding",
        }
    }

    /// Similarity metric the store applies to this variant's field.
    pub fn similarity(self) -> &'static str {
        match self {
            EmbeddingVariant::Symmetric => "cosine",
            EmbeddingVariant::Asymmetric => "dot_product",
        }
    }
}

impl fmt::Display for EmbeddingVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmbeddingVariant {
    type Err = EmbeddingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "symmetric" => Ok(EmbeddingVariant::Symmetric),
            "asymmetric" => Ok(EmbeddingVariant::Asymmetric),
            other => Err(EmbeddingError::InvalidVariant(other.to_string())),
        }
    }
}

/// Errors from the embedding dispatch path.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding provider unavailable: {0}")]
    ProviderUnavailable(#[source] reqwest::Error),

    #[error("unknown embedding variant: {0:?} (expected \"symmetric\" or \"asymmetric\")")]
    InvalidVariant(String),

    #[error("provider returned a {got}-dimensional vector, expected {EMBEDDING_DIM}")]
    UnexpectedDimension { got: usize },
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    text: &'a str,
    #[serde(rename = "type")]
    variant: EmbeddingVariant,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

/// Blocking client for the embedding provider.
///
/// Built once at startup and shared by reference; holds no per-request
/// state, so concurrent callers need no locking.
pub struct EmbeddingClient {
    endpoint: String,
    http: reqwest::blocking::Client,
}

impl EmbeddingClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, EmbeddingError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(EmbeddingError::ProviderUnavailable)?;
        Ok(Self {
            endpoint: endpoint.to_string(),
            http,
        })
    }

    /// Fetch the embedding for `text` under `variant`.
    ///
    /// Asymmetric vectors are L2-normalized here; the provider does not
    /// guarantee unit length and the dot-product field assumes it.
    pub fn get_vector(
        &self,
        text: &str,
        variant: EmbeddingVariant,
    ) -> Result<Vec<f32>, EmbeddingError> {
        debug!(variant = variant.as_str(), chars = text.len(), "embedding_fetch");
        let response = self
            .http
            .post(&self.endpoint)
            .json(&EmbeddingRequest { text, variant })
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(EmbeddingError::ProviderUnavailable)?;

        let body: EmbeddingResponse = response
            .json()
            .map_err(EmbeddingError::ProviderUnavailable)?;

        if body.embedding.len() != EMBEDDING_DIM {
            return Err(EmbeddingError::UnexpectedDimension {
                got: body.embedding.len(),
            });
        }

        Ok(match variant {
            EmbeddingVariant::Symmetric => body.embedding,
            EmbeddingVariant::Asymmetric => l2_normalize(body.embedding),
        })
    }
}

/// Scale a vector to unit Euclidean norm. Zero vectors are returned
/// unchanged rather than divided by zero.
pub fn l2_normalize(v: Vec<f32>) -> Vec<f32> {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm <= f32::EPSILON {
        return v;
    }
    v.into_iter().map(|x| x / norm).collect()
}
