use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use semsearch_retrieval::{FileNameLoader, HashEmbedder, InMemoryVectorStore, Indexer, Retriever};
use semsearch_server::{router, sample_articles};

const EMBEDDING_DIMENSION: usize = 64;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // SEMSEARCH_DIR switches the corpus from the built-in demo articles to
    // the file names under a directory.
    let docs = match std::env::var("SEMSEARCH_DIR") {
        Ok(dir) => FileNameLoader::new(dir).load()?,
        Err(_) => sample_articles(),
    };

    let embedder = HashEmbedder::new(EMBEDDING_DIMENSION);
    let store = InMemoryVectorStore::new();
    let report = Indexer::new(embedder.clone(), store.clone())
        .ingest(docs)
        .await?;
    info!(
        indexed = report.indexed,
        skipped = report.skipped.len(),
        "corpus ingested"
    );

    let retriever = Arc::new(Retriever::new(embedder, store));
    let app = router(retriever);

    let addr = std::env::var("SEMSEARCH_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
