pub mod config;
pub mod embedding;
pub mod indexer;
pub mod model;
pub mod search;
pub mod store;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use dialoguer::Input;
use serde_json::Value;

use config::AppConfig;
use embedding::{EmbeddingClient, EmbeddingVariant};
use model::types::SearchResult;
use search::{FilterClause, QueryBuilder, SearchClient, VectorParams};
use store::StoreClient;
use store::schema::IndexSchema;

/// Command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "movies",
    version,
    about = "Lexical, vector, and hybrid search over a movie corpus"
)]
pub struct Cli {
    /// Create the index before entering the prompt loop
    #[arg(long)]
    pub create_index: bool,

    /// Drop an existing index before creating it
    #[arg(long)]
    pub force_index_creation: bool,

    /// Ingest the movie corpus before entering the prompt loop
    #[arg(long)]
    pub ingest_movies: bool,

    /// Ingest at most this many movies
    #[arg(long)]
    pub movies_limit: Option<usize>,

    /// Path to the movies corpus (JSON Lines)
    #[arg(long, default_value = "movies.jsonl")]
    pub movies_path: PathBuf,

    /// Index name (overrides MOVIES_INDEX_NAME)
    #[arg(long)]
    pub index_name: Option<String>,

    /// Embedding variant for vector and hybrid search
    #[arg(long, value_enum, default_value_t = EmbeddingVariant::Symmetric)]
    pub variant: EmbeddingVariant,

    /// Neighbors requested by vector search
    #[arg(short, long)]
    pub k: Option<usize>,

    /// Approximate-search oversampling factor
    #[arg(long)]
    pub num_candidates: Option<usize>,

    /// Result list cap
    #[arg(long)]
    pub size: Option<usize>,

    /// Equality filter for lexical/hybrid search, as field=value (repeatable)
    #[arg(long = "filter", value_parser = parse_filter)]
    pub filters: Vec<FilterClause>,

    /// Print the exact query body sent for each search
    #[arg(long)]
    pub print_query: bool,
}

fn parse_filter(raw: &str) -> Result<FilterClause, String> {
    match raw.split_once('=') {
        Some((field, value)) if !field.is_empty() && !value.is_empty() => {
            Ok(FilterClause::new(field, value))
        }
        _ => Err(format!("expected field=value, got {raw:?}")),
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut cfg = AppConfig::from_env();
    if let Some(name) = &cli.index_name {
        cfg.index_name = name.clone();
    }

    let embedder = EmbeddingClient::new(&cfg.embedding_endpoint, cfg.provider_timeout)
        .context("building embedding client")?;
    let store = StoreClient::new(&cfg.store_url, &cfg.index_name, cfg.store_timeout)
        .context("building store client")?;

    if cli.create_index {
        let schema = IndexSchema::new(&cfg);
        store
            .create_index(&schema, cli.force_index_creation)
            .context("creating index")?;
    }

    if cli.ingest_movies {
        let opts = indexer::IngestOptions {
            limit: cli.movies_limit,
        };
        let count = indexer::ingest_movies(&cli.movies_path, &embedder, &store, &opts)
            .context("ingesting movies")?;
        println!("Ingested {count} movies into {}", cfg.index_name);
    }

    prompt_loop(&cli, &cfg, &embedder, &store)
}

/// Interactive loop: per entered query run lexical, vector, and hybrid
/// search in sequence. An error in any mode aborts that iteration only;
/// the loop stays usable for the next query.
fn prompt_loop(
    cli: &Cli,
    cfg: &AppConfig,
    embedder: &EmbeddingClient,
    store: &StoreClient,
) -> Result<()> {
    let builder = QueryBuilder::new(embedder);
    let client = SearchClient::new(builder, store);

    let params = VectorParams {
        variant: cli.variant,
        k: cli.k.unwrap_or(cfg.default_k),
        num_candidates: cli.num_candidates.unwrap_or(cfg.default_num_candidates),
    };
    let size = cli.size.unwrap_or(cfg.default_size);

    loop {
        let query: String = Input::new()
            .with_prompt("Enter the sentence you want to query, or exit() to finish")
            .allow_empty(true)
            .interact_text()?;
        let query = query.trim().to_string();
        if query.is_empty() {
            continue;
        }
        if query == "exit()" {
            println!("Thanks for testing the movie search tool");
            return Ok(());
        }

        if let Err(e) = run_query_iteration(cli, &client, &query, params, size) {
            eprintln!("{} {e:#}", style("error:").red().bold());
        }
    }
}

fn run_query_iteration(
    cli: &Cli,
    client: &SearchClient<'_>,
    query: &str,
    params: VectorParams,
    size: usize,
) -> Result<()> {
    print_section("lexical");
    let (results, body) = client.search_lexical(query, &cli.filters, size)?;
    print_results(&results);
    maybe_print_query(cli, &body);

    print_section("vector");
    let (results, body) = client.search_vector(query, params, size)?;
    print_results(&results);
    maybe_print_query(cli, &body);

    print_section("hybrid");
    let (results, body) = client.search_hybrid(query, params, &cli.filters, size)?;
    print_results(&results);
    maybe_print_query(cli, &body);

    Ok(())
}

fn print_section(mode: &str) {
    println!("\n{}", style(format!("== {mode} search ==")).cyan().bold());
}

fn print_results(results: &[SearchResult]) {
    if results.is_empty() {
        println!("(no results)");
        return;
    }
    for r in results {
        println!("-----------------------------");
        println!("Title: {}", style(&r.title).bold());
        println!("Overview: {}", r.overview);
        println!("Score: {}", r.score);
    }
    println!("-----------------------------");
}

fn maybe_print_query(cli: &Cli, body: &Value) {
    if cli.print_query {
        println!("{}", style(body.to_string()).dim());
    }
}
