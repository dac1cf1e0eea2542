//! Normalized entity structs.

use serde::{Deserialize, Serialize};

/// One movie from the ingestion corpus. Vector fields are attached at
/// index time, not carried here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub protagonists: Vec<String>,
}

/// Canonical search hit, produced only by hit normalization.
///
/// Ordering in a result list follows the store's returned order; the
/// client never re-sorts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    pub overview: String,
    /// Relevance score, higher is better.
    pub score: f32,
}
