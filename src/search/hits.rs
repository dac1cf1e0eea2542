//! Raw-hit normalization.
//!
//! The store client surface emits hits in two shapes: the wire-native
//! nested form (`_source` + sibling `_score`) and a flattened object form
//! with the fields at the top level and the score carried in `meta`. Both
//! map to the same canonical [`SearchResult`]. Shape discrimination
//! happens exactly once per hit, here, at the executor boundary — call
//! sites never inspect raw hits themselves.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::model::types::SearchResult;
use crate::store::RawHit;

#[derive(Debug, Error)]
pub enum HitError {
    #[error("unrecognized hit shape: {0}")]
    UnknownShape(Value),
}

#[derive(Deserialize)]
struct SourceFields {
    id: String,
    title: String,
    #[serde(default)]
    overview: String,
}

#[derive(Deserialize)]
struct HitMeta {
    score: f32,
}

/// The two shapes the store surface is known to produce. Anything else is
/// an error, never silently coerced.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireHit {
    Nested {
        #[serde(rename = "_source")]
        source: SourceFields,
        #[serde(rename = "_score")]
        score: f32,
    },
    Flat {
        #[serde(flatten)]
        fields: SourceFields,
        meta: HitMeta,
    },
}

/// Map one raw hit to the canonical record, preserving nothing beyond the
/// canonical fields. Fails loudly on any third shape.
pub fn normalize(hit: &RawHit) -> Result<SearchResult, HitError> {
    let wire: WireHit = serde_json::from_value(hit.0.clone())
        .map_err(|_| HitError::UnknownShape(hit.0.clone()))?;

    Ok(match wire {
        WireHit::Nested { source, score } => SearchResult {
            id: source.id,
            title: source.title,
            overview: source.overview,
            score,
        },
        WireHit::Flat { fields, meta } => SearchResult {
            id: fields.id,
            title: fields.title,
            overview: fields.overview,
            score: meta.score,
        },
    })
}

/// Normalize a whole hit list, order-preserving. Any unrecognized hit
/// fails the whole list; no partial results.
pub fn normalize_all(hits: &[RawHit]) -> Result<Vec<SearchResult>, HitError> {
    hits.iter().map(normalize).collect()
}
