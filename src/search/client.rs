//! High-level, per-mode search execution.
//!
//! Ties the builder, the store, and hit normalization together: build a
//! query, execute it, normalize the hit list. Each call returns the
//! ordered canonical results plus the echoed query body for debugging.
//! Nothing is recovered locally — any failure aborts the call with no
//! partial result list.

use thiserror::Error;
use tracing::info;

use crate::model::types::SearchResult;
use crate::store::schema::LEXICAL_FIELDS;
use crate::store::{StoreClient, StoreError};
use serde_json::Value;

use super::hits::{self, HitError};
use super::query::{BuiltQuery, FilterClause, QueryBuilder, QueryError, VectorParams};

#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Hit(#[from] HitError),
}

/// One search surface over a builder and a store handle. Holds no mutable
/// state; independent callers can share it freely.
pub struct SearchClient<'a> {
    builder: QueryBuilder<'a>,
    store: &'a StoreClient,
}

impl<'a> SearchClient<'a> {
    pub fn new(builder: QueryBuilder<'a>, store: &'a StoreClient) -> Self {
        Self { builder, store }
    }

    pub fn search_lexical(
        &self,
        text: &str,
        filters: &[FilterClause],
        size: usize,
    ) -> Result<(Vec<SearchResult>, Value), SearchError> {
        let query = self.builder.build_lexical(text, &LEXICAL_FIELDS, filters, size)?;
        self.run(query)
    }

    pub fn search_vector(
        &self,
        text: &str,
        params: VectorParams,
        size: usize,
    ) -> Result<(Vec<SearchResult>, Value), SearchError> {
        let query = self.builder.build_vector(text, params, size)?;
        self.run(query)
    }

    pub fn search_hybrid(
        &self,
        text: &str,
        params: VectorParams,
        filters: &[FilterClause],
        size: usize,
    ) -> Result<(Vec<SearchResult>, Value), SearchError> {
        let query = self
            .builder
            .build_hybrid(text, params, &LEXICAL_FIELDS, filters, size)?;
        self.run(query)
    }

    fn run(&self, query: BuiltQuery) -> Result<(Vec<SearchResult>, Value), SearchError> {
        info!(
            mode = query.mode.as_str(),
            index = self.store.index_name(),
            "search_start"
        );
        let raw = self.store.execute(&query.body)?;
        let results = hits::normalize_all(&raw)?;
        info!(
            mode = query.mode.as_str(),
            hits = results.len(),
            "search_done"
        );
        Ok((results, query.body))
    }
}
