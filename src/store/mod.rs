//! Document/vector store client.
//!
//! Thin blocking HTTP client over the store's REST surface: index admin,
//! document upsert, and search execution. Search is a pure pass-through —
//! the store interprets the structured query body, including fusing the
//! lexical and knn signals of a hybrid query into one ranking. No retries
//! and no circuit breaking; transport failures surface immediately as
//! [`StoreError::Unavailable`].

pub mod schema;

use std::time::Duration;

use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, info};

use crate::embedding::EmbeddingVariant;
use crate::model::types::Movie;
use schema::IndexSchema;

/// Errors from store calls.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("search store unavailable: {0}")]
    Unavailable(#[source] reqwest::Error),

    #[error("store rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("store returned a response without a hits list")]
    MalformedResponse,
}

/// A raw hit exactly as the store returned it. Never constructed locally;
/// normalization into a canonical record happens in [`crate::search::hits`].
#[derive(Debug, Clone)]
pub struct RawHit(pub Value);

/// Blocking client for one index of the store.
pub struct StoreClient {
    base_url: String,
    index: String,
    http: reqwest::blocking::Client,
}

impl StoreClient {
    pub fn new(base_url: &str, index: &str, timeout: Duration) -> Result<Self, StoreError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(StoreError::Unavailable)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            index: index.to_string(),
            http,
        })
    }

    pub fn index_name(&self) -> &str {
        &self.index
    }

    fn index_url(&self, suffix: &str) -> String {
        format!("{}/{}{suffix}", self.base_url, self.index)
    }

    fn check(response: reqwest::blocking::Response) -> Result<reqwest::blocking::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(StoreError::Rejected {
            status: status.as_u16(),
            body,
        })
    }

    pub fn index_exists(&self) -> Result<bool, StoreError> {
        let response = self
            .http
            .head(self.index_url(""))
            .send()
            .map_err(StoreError::Unavailable)?;
        Ok(response.status().is_success())
    }

    /// Create the index from the declared schema. An existing index is left
    /// untouched unless `force` drops it first.
    pub fn create_index(&self, schema: &IndexSchema, force: bool) -> Result<(), StoreError> {
        if self.index_exists()? {
            if !force {
                info!(index = %self.index, "index exists, skipping creation");
                return Ok(());
            }
            info!(index = %self.index, "dropping existing index");
            let response = self
                .http
                .delete(self.index_url(""))
                .send()
                .map_err(StoreError::Unavailable)?;
            Self::check(response)?;
        }

        info!(index = %self.index, "creating index");
        let response = self
            .http
            .put(self.index_url(""))
            .json(&schema.creation_body())
            .send()
            .map_err(StoreError::Unavailable)?;
        Self::check(response)?;
        Ok(())
    }

    /// Upsert one movie document with its per-variant overview embeddings.
    pub fn save_movie(
        &self,
        movie: &Movie,
        symmetric: &[f32],
        asymmetric: &[f32],
    ) -> Result<(), StoreError> {
        let doc = json!({
            "id": movie.id,
            "title": movie.title,
            "overview": movie.overview,
            "genres": movie.genres,
            "director": movie.director,
            "protagonists": movie.protagonists,
            (EmbeddingVariant::Symmetric.vector_field()): symmetric,
            (EmbeddingVariant::Asymmetric.vector_field()): asymmetric,
        });
        let response = self
            .http
            .post(self.index_url("/_doc"))
            .json(&doc)
            .send()
            .map_err(StoreError::Unavailable)?;
        Self::check(response)?;
        Ok(())
    }

    /// Execute a structured search body and return the raw hit list in
    /// store order. No mode-specific branching happens here.
    pub fn execute(&self, body: &Value) -> Result<Vec<RawHit>, StoreError> {
        debug!(index = %self.index, "store_search");
        let response = self
            .http
            .post(self.index_url("/_search"))
            .json(body)
            .send()
            .map_err(StoreError::Unavailable)?;
        let response = Self::check(response)?;
        let payload: Value = response.json().map_err(StoreError::Unavailable)?;

        let hits = payload
            .get("hits")
            .and_then(|h| h.get("hits"))
            .and_then(|h| h.as_array())
            .ok_or(StoreError::MalformedResponse)?;

        Ok(hits.iter().cloned().map(RawHit).collect())
    }
}
