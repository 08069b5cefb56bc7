use async_trait::async_trait;

use semsearch_core::{Document, Embedding, EmbeddingError};
use semsearch_retrieval::{
    HashEmbedder, InMemoryVectorStore, Indexer, RetrievalError, Retriever,
};

/// Fake embedder with hand-placed vectors, so semantic proximity in tests is
/// controlled instead of depending on hash coincidences: animal-ish text
/// points one way, finance-ish text the other.
#[derive(Clone)]
struct TopicEmbedder;

#[async_trait]
impl Embedding for TopicEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let animals = ["cat", "kitten", "pet", "mammal"];
        let finance = ["stock", "market", "rose"];
        let lower = text.to_lowercase();
        let animal_hits = animals.iter().filter(|word| lower.contains(*word)).count() as f32;
        let finance_hits = finance.iter().filter(|word| lower.contains(*word)).count() as f32;
        Ok(vec![animal_hits, finance_hits, 1.0])
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }

    fn dimension(&self) -> usize {
        3
    }
}

#[tokio::test]
async fn retriever_returns_results() {
    let embedder = HashEmbedder::new(4);
    let store = InMemoryVectorStore::new();
    Indexer::new(embedder.clone(), store.clone())
        .ingest(vec![Document::new("doc", "hello")])
        .await
        .unwrap();

    let retriever = Retriever::new(embedder, store);
    let results = retriever.query("hello", 1).await.unwrap();
    assert_eq!(results[0].document.id, "doc");
}

#[tokio::test]
async fn retriever_ranks_semantically_closest_document_first() {
    let store = InMemoryVectorStore::new();
    Indexer::new(TopicEmbedder, store.clone())
        .ingest(vec![
            Document::new("a", "cats are mammals"),
            Document::new("b", "stocks rose today"),
        ])
        .await
        .unwrap();

    let retriever = Retriever::new(TopicEmbedder, store);
    let results = retriever.query("kittens and pets", 1).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].document.id, "a");
}

#[tokio::test]
async fn retriever_document_found_by_its_own_text() {
    let embedder = HashEmbedder::new(16);
    let store = InMemoryVectorStore::new();
    let docs = vec![
        Document::new("a", "cats are mammals"),
        Document::new("b", "stocks rose today"),
        Document::new("c", "rust is a systems language"),
    ];
    Indexer::new(embedder.clone(), store.clone())
        .ingest(docs.clone())
        .await
        .unwrap();

    let retriever = Retriever::new(embedder, store);
    for doc in &docs {
        let results = retriever.query(&doc.content, docs.len()).await.unwrap();
        assert!(results.iter().any(|result| result.document.id == doc.id));
    }
}

#[tokio::test]
async fn retriever_rejects_zero_top_k() {
    let retriever = Retriever::new(HashEmbedder::new(4), InMemoryVectorStore::new());
    let err = retriever.query("hello", 0).await.unwrap_err();
    assert!(matches!(err, RetrievalError::InvalidArgument(_)));
}

#[tokio::test]
async fn retriever_rejects_blank_query() {
    let retriever = Retriever::new(HashEmbedder::new(4), InMemoryVectorStore::new());
    let err = retriever.query("   ", 5).await.unwrap_err();
    assert!(matches!(err, RetrievalError::InvalidArgument(_)));
}

#[tokio::test]
async fn retriever_empty_index_returns_empty_results() {
    let retriever = Retriever::new(HashEmbedder::new(4), InMemoryVectorStore::new());
    let results = retriever.query("anything", 5).await.unwrap();
    assert!(results.is_empty());
}
