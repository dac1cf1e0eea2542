//! Index schema declaration.
//!
//! The field layout lives here as static configuration: analyzed text
//! fields for `title`/`overview`, exact-match keywords, and one dense
//! vector field per embedding variant, each bound to that variant's
//! similarity metric. Consumed once at index creation, never on the
//! query hot path.

use serde_json::{Value, json};

use crate::config::AppConfig;
use crate::embedding::{EMBEDDING_DIM, EmbeddingVariant};

/// Text fields the lexical clause matches over, in boost order.
pub const LEXICAL_FIELDS: [&str; 2] = ["title", "overview"];

/// Immutable index schema, built once from config at startup.
#[derive(Debug, Clone)]
pub struct IndexSchema {
    hnsw_m: u32,
    hnsw_ef_construction: u32,
}

impl IndexSchema {
    pub fn new(cfg: &AppConfig) -> Self {
        Self {
            hnsw_m: cfg.hnsw_m,
            hnsw_ef_construction: cfg.hnsw_ef_construction,
        }
    }

    /// Full index-creation body: settings plus mappings.
    pub fn creation_body(&self) -> Value {
        json!({
            "settings": {
                "number_of_shards": 1,
                "number_of_replicas": 0,
                "analysis": {
                    "filter": {
                        "english_stopwords": { "type": "stop", "stopwords": "_english_" },
                        "english_stemmer": { "type": "stemmer", "language": "english" },
                        "english_possessive_stemmer": {
                            "type": "stemmer",
                            "language": "possessive_english"
                        }
                    },
                    "analyzer": {
                        "default_analyzer": {
                            "tokenizer": "whitespace",
                            "char_filter": ["html_strip"],
                            "filter": [
                                "english_possessive_stemmer",
                                "lowercase",
                                "english_stopwords",
                                "english_stemmer"
                            ]
                        }
                    }
                }
            },
            "mappings": {
                "dynamic": false,
                "properties": {
                    "id": { "type": "keyword" },
                    "title": { "type": "text", "analyzer": "default_analyzer" },
                    "overview": { "type": "text", "analyzer": "default_analyzer" },
                    "genres": { "type": "keyword" },
                    "director": { "type": "keyword" },
                    "protagonists": { "type": "keyword" },
                    (EmbeddingVariant::Symmetric.vector_field()):
                        self.vector_mapping(EmbeddingVariant::Symmetric),
                    (EmbeddingVariant::Asymmetric.vector_field()):
                        self.vector_mapping(EmbeddingVariant::Asymmetric),
                }
            }
        })
    }

    fn vector_mapping(&self, variant: EmbeddingVariant) -> Value {
        json!({
            "type": "dense_vector",
            "dims": EMBEDDING_DIM,
            "index": true,
            "similarity": variant.similarity(),
            "index_options": {
                "type": "hnsw",
                "m": self.hnsw_m,
                "ef_construction": self.hnsw_ef_construction
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> IndexSchema {
        IndexSchema::new(&AppConfig::default())
    }

    #[test]
    fn declares_one_vector_field_per_variant() {
        let body = schema().creation_body();
        let props = &body["mappings"]["properties"];
        let sym = &props["sbert_symmetric_overview_embedding"];
        let asym = &props["sbert_asymmetric_overview_embedding"];
        assert_eq!(sym["similarity"], "cosine");
        assert_eq!(asym["similarity"], "dot_product");
        for field in [sym, asym] {
            assert_eq!(field["type"], "dense_vector");
            assert_eq!(field["dims"], 768);
            assert_eq!(field["index_options"]["type"], "hnsw");
        }
    }

    #[test]
    fn hnsw_tunables_come_from_config() {
        let mut cfg = AppConfig::default();
        cfg.hnsw_m = 32;
        cfg.hnsw_ef_construction = 200;
        let body = IndexSchema::new(&cfg).creation_body();
        let opts = &body["mappings"]["properties"]["sbert_symmetric_overview_embedding"]
            ["index_options"];
        assert_eq!(opts["m"], 32);
        assert_eq!(opts["ef_construction"], 200);
    }

    #[test]
    fn analyzer_pipeline_is_declared() {
        let body = schema().creation_body();
        let analyzer = &body["settings"]["analysis"]["analyzer"]["default_analyzer"];
        assert_eq!(analyzer["tokenizer"], "whitespace");
        assert_eq!(analyzer["char_filter"][0], "html_strip");
        let filters: Vec<&str> = analyzer["filter"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f.as_str().unwrap())
            .collect();
        assert!(filters.contains(&"lowercase"));
        assert!(filters.contains(&"english_stemmer"));
        assert!(filters.contains(&"english_possessive_stemmer"));
        assert!(filters.contains(&"english_stopwords"));
    }

    #[test]
    fn dynamic_mapping_is_disabled() {
        let body = schema().creation_body();
        assert_eq!(body["mappings"]["dynamic"], false);
    }
}
