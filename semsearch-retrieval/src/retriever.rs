use async_trait::async_trait;

use semsearch_core::{Embedding, SearchResult, VectorStore};

use crate::{BaseRetriever, RetrievalError};

/// Query pipeline: embeds the query text and runs nearest-neighbor search.
/// Stateless between calls; the store's contents are the only persistence.
pub struct Retriever<E, S> {
    embedder: E,
    store: S,
}

impl<E, S> Retriever<E, S>
where
    E: Embedding,
    S: VectorStore,
{
    pub fn new(embedder: E, store: S) -> Self {
        Self { embedder, store }
    }

    /// Top-k search for `query`. `top_k` must be positive and the query must
    /// not be blank; an empty store yields an empty Vec, not an error.
    pub async fn query(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, RetrievalError> {
        if top_k == 0 {
            return Err(RetrievalError::InvalidArgument(
                "top_k must be greater than zero".to_string(),
            ));
        }
        if query.trim().is_empty() {
            return Err(RetrievalError::InvalidArgument(
                "query must not be empty".to_string(),
            ));
        }

        let embedding = self.embedder.embed(query).await?;
        let results = self.store.search(&embedding, top_k).await?;
        Ok(results)
    }
}

#[async_trait]
impl<E, S> BaseRetriever for Retriever<E, S>
where
    E: Embedding + Send + Sync,
    S: VectorStore + Send + Sync,
{
    async fn retrieve(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, RetrievalError> {
        self.query(query, top_k).await
    }
}
