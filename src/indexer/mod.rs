//! Corpus ingestion.
//!
//! Reads movies from a JSON Lines file, fetches both overview embeddings
//! per movie from the provider, and upserts one document per movie into
//! the store. Sequential by design: ingestion is a one-shot bootstrap
//! step, not a hot path.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::embedding::{EmbeddingClient, EmbeddingVariant};
use crate::model::types::Movie;
use crate::store::StoreClient;

pub struct IngestOptions {
    /// Stop after this many movies; `None` ingests the whole corpus.
    pub limit: Option<usize>,
}

/// Ingest the corpus at `path`. Malformed lines are skipped with a
/// warning; provider or store failures abort the run.
pub fn ingest_movies(
    path: &Path,
    embedder: &EmbeddingClient,
    store: &StoreClient,
    opts: &IngestOptions,
) -> Result<usize> {
    let file = File::open(path)
        .with_context(|| format!("opening movies corpus at {}", path.display()))?;
    let reader = BufReader::new(file);

    info!(
        path = %path.display(),
        limit = ?opts.limit,
        index = store.index_name(),
        "ingest_start"
    );

    let bar = match opts.limit {
        Some(n) => ProgressBar::new(n as u64),
        None => ProgressBar::new_spinner(),
    };
    bar.set_style(
        ProgressStyle::with_template("{spinner} {pos} movies ingested {wide_bar} {elapsed}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut ingested = 0usize;
    for (line_no, line) in reader.lines().enumerate() {
        if let Some(limit) = opts.limit {
            if ingested >= limit {
                break;
            }
        }
        let line = line.with_context(|| format!("reading line {}", line_no + 1))?;
        if line.trim().is_empty() {
            continue;
        }

        let movie: Movie = match serde_json::from_str(&line) {
            Ok(m) => m,
            Err(e) => {
                warn!(line = line_no + 1, error = %e, "skipping malformed movie record");
                continue;
            }
        };

        let symmetric = embedder.get_vector(&movie.overview, EmbeddingVariant::Symmetric)?;
        let asymmetric = embedder.get_vector(&movie.overview, EmbeddingVariant::Asymmetric)?;
        store.save_movie(&movie, &symmetric, &asymmetric)?;

        ingested += 1;
        bar.inc(1);
    }
    bar.finish_and_clear();

    info!(ingested, "ingest_done");
    Ok(ingested)
}
