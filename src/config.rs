//! Process configuration.
//!
//! Everything is read from the environment exactly once at startup and
//! frozen into an [`AppConfig`] that is passed by reference into the
//! components that need it. No component reads the environment on its own
//! after this point.

use std::time::Duration;

/// Immutable runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the document/vector store.
    pub store_url: String,
    /// Full URL of the embedding provider endpoint.
    pub embedding_endpoint: String,
    /// Index to create, ingest into, and search.
    pub index_name: String,
    /// Per-call timeout for embedding provider requests.
    pub provider_timeout: Duration,
    /// Per-call timeout for store requests.
    pub store_timeout: Duration,
    /// HNSW graph degree for the vector fields.
    pub hnsw_m: u32,
    /// HNSW construction-time search breadth.
    pub hnsw_ef_construction: u32,
    /// Default result list cap.
    pub default_size: usize,
    /// Default neighbors requested by vector search.
    pub default_k: usize,
    /// Default approximate-search oversampling factor.
    pub default_num_candidates: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_url: "http://localhost:9200".to_string(),
            embedding_endpoint: "http://localhost:8000/embedding".to_string(),
            index_name: "movies".to_string(),
            provider_timeout: Duration::from_secs(10),
            store_timeout: Duration::from_secs(10),
            hnsw_m: 16,
            hnsw_ef_construction: 50,
            default_size: 20,
            default_k: 10,
            default_num_candidates: 75,
        }
    }
}

impl AppConfig {
    /// Load config from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(val) = dotenvy::var("MOVIES_STORE_URL") {
            cfg.store_url = val.trim_end_matches('/').to_string();
        }
        if let Ok(val) = dotenvy::var("MOVIES_EMBEDDING_ENDPOINT") {
            cfg.embedding_endpoint = val;
        }
        if let Ok(val) = dotenvy::var("MOVIES_INDEX_NAME") {
            cfg.index_name = val;
        }
        if let Ok(val) = dotenvy::var("MOVIES_PROVIDER_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                cfg.provider_timeout = Duration::from_secs(secs);
            }
        }
        if let Ok(val) = dotenvy::var("MOVIES_STORE_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                cfg.store_timeout = Duration::from_secs(secs);
            }
        }
        if let Ok(val) = dotenvy::var("MOVIES_HNSW_M") {
            if let Ok(m) = val.parse() {
                cfg.hnsw_m = m;
            }
        }
        if let Ok(val) = dotenvy::var("MOVIES_HNSW_EF_CONSTRUCTION") {
            if let Ok(ef) = val.parse() {
                cfg.hnsw_ef_construction = ef;
            }
        }
        if let Ok(val) = dotenvy::var("MOVIES_RESULT_SIZE") {
            if let Ok(size) = val.parse() {
                cfg.default_size = size;
            }
        }

        cfg
    }
}
