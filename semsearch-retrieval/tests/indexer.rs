use async_trait::async_trait;

use semsearch_core::{Document, Embedding, EmbeddingError, VectorStore};
use semsearch_retrieval::{HashEmbedder, InMemoryVectorStore, Indexer, RetrievalError};

/// Embedder that refuses any text containing a marker substring, for
/// exercising the per-document skip path.
#[derive(Clone)]
struct FlakyEmbedder {
    inner: HashEmbedder,
    poison: &'static str,
}

#[async_trait]
impl Embedding for FlakyEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.contains(self.poison) {
            return Err(EmbeddingError::InvalidResponse(format!(
                "cannot encode '{text}'"
            )));
        }
        self.inner.embed(text).await
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }
}

#[tokio::test]
async fn indexer_rejects_blank_id() {
    let indexer = Indexer::new(HashEmbedder::new(8), InMemoryVectorStore::new());

    let error = indexer
        .ingest(vec![Document::new("   ", "hello")])
        .await
        .unwrap_err();

    assert!(matches!(error, RetrievalError::InvalidId(id) if id.trim().is_empty()));
}

#[tokio::test]
async fn indexer_embeds_and_upserts_documents() {
    let embedder = HashEmbedder::new(8);
    let query_embedder = embedder.clone();
    let store = InMemoryVectorStore::new();
    let indexer = Indexer::new(embedder, store.clone());

    let report = indexer
        .ingest(vec![
            Document::new("doc-1", "first document"),
            Document::new("doc-2", "second document"),
        ])
        .await
        .unwrap();

    assert_eq!(report.indexed, 2);
    assert!(report.skipped.is_empty());

    let query_embedding = query_embedder.embed("first document").await.unwrap();
    let results = store.search(&query_embedding, 1).await.unwrap();
    assert_eq!(results[0].document.id, "doc-1");
    assert_eq!(results[0].document.content, "first document");
}

#[tokio::test]
async fn indexer_skips_failing_documents_and_keeps_the_rest() {
    let embedder = FlakyEmbedder {
        inner: HashEmbedder::new(8),
        poison: "unreadable",
    };
    let query_embedder = embedder.clone();
    let store = InMemoryVectorStore::new();
    let indexer = Indexer::new(embedder, store.clone());

    let report = indexer
        .ingest(vec![
            Document::new("good-1", "plain text"),
            Document::new("bad", "unreadable glyph soup"),
            Document::new("good-2", "more plain text"),
        ])
        .await
        .unwrap();

    assert_eq!(report.indexed, 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].id, "bad");
    assert!(report.skipped[0].reason.contains("cannot encode"));

    let query_embedding = query_embedder.embed("plain text").await.unwrap();
    let results = store.search(&query_embedding, 5).await.unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|result| result.document.id != "bad"));
}

#[tokio::test]
async fn indexer_reingestion_replaces_by_id() {
    let embedder = HashEmbedder::new(8);
    let query_embedder = embedder.clone();
    let store = InMemoryVectorStore::new();
    let indexer = Indexer::new(embedder, store.clone());

    indexer
        .ingest(vec![Document::new("doc", "old content")])
        .await
        .unwrap();
    indexer
        .ingest(vec![Document::new("doc", "new content")])
        .await
        .unwrap();

    let query_embedding = query_embedder.embed("new content").await.unwrap();
    let results = store.search(&query_embedding, 5).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].document.content, "new content");
}
