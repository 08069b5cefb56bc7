use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use semsearch_core::{Document, Scalar};
use semsearch_retrieval::{HashEmbedder, InMemoryVectorStore, Indexer, Retriever};

const EMBEDDING_DIMENSION: usize = 64;
const TOP_K: usize = 3;
const DEFAULT_QUERY: &str = "embedding database";

/// Semantic search over a built-in sample corpus.
#[derive(Parser)]
#[command(name = "semsearch", version, about)]
struct Cli {
    /// Free-text query; a demo query is used when omitted.
    query: Option<String>,
}

fn sample_articles() -> Vec<Document> {
    vec![
        Document::new("1", "ChromaDB is a vector database for building AI applications.")
            .with_metadata("title", "ChromaDB Overview"),
        Document::new("2", "Sentence transformers create embeddings for semantic search.")
            .with_metadata("title", "Sentence Transformers"),
        Document::new("3", "Keyword search matches exact terms in documents.")
            .with_metadata("title", "Traditional Search"),
    ]
}

async fn run(query: &str) -> Result<(), Box<dyn std::error::Error>> {
    let embedder = HashEmbedder::new(EMBEDDING_DIMENSION);
    let store = InMemoryVectorStore::new();

    let report = Indexer::new(embedder.clone(), store.clone())
        .ingest(sample_articles())
        .await?;
    for skipped in &report.skipped {
        eprintln!("skipped {}: {}", skipped.id, skipped.reason);
    }

    let retriever = Retriever::new(embedder, store);
    let results = retriever.query(query, TOP_K).await?;

    if results.is_empty() {
        println!("No matches found.");
        return Ok(());
    }

    for (rank, result) in results.iter().enumerate() {
        let title = result
            .document
            .metadata
            .get("title")
            .and_then(Scalar::as_str)
            .unwrap_or(&result.document.id);
        println!(
            "{}. {} (id={}, score={:.4})",
            rank + 1,
            title,
            result.document.id,
            result.score
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let query = cli.query.unwrap_or_else(|| DEFAULT_QUERY.to_string());

    match run(&query).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
