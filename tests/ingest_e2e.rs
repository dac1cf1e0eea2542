//! Index bootstrap and corpus ingestion against stub services.

mod stub_helpers;

use std::io::Write;
use std::time::Duration;

use serde_json::json;
use tempfile::NamedTempFile;

use movie_search::config::AppConfig;
use movie_search::embedding::{EMBEDDING_DIM, EmbeddingClient};
use movie_search::indexer::{IngestOptions, ingest_movies};
use movie_search::store::StoreClient;
use movie_search::store::schema::IndexSchema;
use stub_helpers::StubServer;

const TIMEOUT: Duration = Duration::from_secs(5);

fn spawn_backend() -> StubServer {
    StubServer::spawn(|req| {
        if req.path.contains("/embedding") {
            let mut v = vec![0.0f32; EMBEDDING_DIM];
            v[0] = 2.0;
            (200, json!({ "embedding": v }).to_string())
        } else if req.method == "HEAD" {
            // Index does not exist yet.
            (404, String::new())
        } else {
            (200, json!({ "acknowledged": true }).to_string())
        }
    })
}

fn corpus(lines: &[serde_json::Value]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn create_index_sends_declared_schema() {
    let server = spawn_backend();
    let store = StoreClient::new(&server.base_url, "movies", TIMEOUT).unwrap();
    let schema = IndexSchema::new(&AppConfig::default());

    store.create_index(&schema, false).unwrap();

    let put = server
        .requests()
        .into_iter()
        .find(|r| r.method == "PUT")
        .expect("index creation PUT");
    assert_eq!(put.path, "/movies");
    let body = put.body.unwrap();
    assert_eq!(body["settings"]["number_of_shards"], 1);
    let props = &body["mappings"]["properties"];
    assert_eq!(props["sbert_symmetric_overview_embedding"]["similarity"], "cosine");
    assert_eq!(
        props["sbert_asymmetric_overview_embedding"]["similarity"],
        "dot_product"
    );
}

#[test]
fn ingest_uploads_one_document_per_movie_with_both_vectors() {
    let server = spawn_backend();
    let embedder =
        EmbeddingClient::new(&format!("{}/embedding", server.base_url), TIMEOUT).unwrap();
    let store = StoreClient::new(&server.base_url, "movies", TIMEOUT).unwrap();

    let file = corpus(&[
        json!({ "id": "m-1", "title": "First", "overview": "a space story" }),
        json!({ "id": "m-2", "title": "Second", "overview": "a heist story" }),
    ]);

    let count = ingest_movies(file.path(), &embedder, &store, &IngestOptions { limit: None })
        .unwrap();
    assert_eq!(count, 2);

    let docs: Vec<_> = server
        .requests()
        .into_iter()
        .filter(|r| r.path.ends_with("/_doc"))
        .collect();
    assert_eq!(docs.len(), 2);

    let body = docs[0].body.clone().unwrap();
    assert_eq!(body["id"], "m-1");
    assert_eq!(body["title"], "First");
    let sym = body["sbert_symmetric_overview_embedding"].as_array().unwrap();
    let asym = body["sbert_asymmetric_overview_embedding"].as_array().unwrap();
    assert_eq!(sym.len(), EMBEDDING_DIM);
    assert_eq!(asym.len(), EMBEDDING_DIM);
    // Symmetric stays raw, asymmetric is unit-normalized.
    assert!((sym[0].as_f64().unwrap() - 2.0).abs() < 1e-6);
    assert!((asym[0].as_f64().unwrap() - 1.0).abs() < 1e-6);
}

#[test]
fn ingest_respects_limit_and_skips_malformed_lines() {
    let server = spawn_backend();
    let embedder =
        EmbeddingClient::new(&format!("{}/embedding", server.base_url), TIMEOUT).unwrap();
    let store = StoreClient::new(&server.base_url, "movies", TIMEOUT).unwrap();

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", json!({ "id": "m-1", "title": "A", "overview": "x" })).unwrap();
    writeln!(file, "this is not json").unwrap();
    writeln!(file, "{}", json!({ "id": "m-2", "title": "B", "overview": "y" })).unwrap();
    writeln!(file, "{}", json!({ "id": "m-3", "title": "C", "overview": "z" })).unwrap();
    file.flush().unwrap();

    let count = ingest_movies(
        file.path(),
        &embedder,
        &store,
        &IngestOptions { limit: Some(2) },
    )
    .unwrap();
    assert_eq!(count, 2);

    let ids: Vec<String> = server
        .requests()
        .into_iter()
        .filter(|r| r.path.ends_with("/_doc"))
        .map(|r| r.body.unwrap()["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, ["m-1", "m-2"]);
}
