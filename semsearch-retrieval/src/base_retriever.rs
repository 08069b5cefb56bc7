use async_trait::async_trait;

use semsearch_core::SearchResult;

use crate::error::RetrievalError;

/// Object-safe face of the query pipeline, so presentation layers can hold
/// `Arc<dyn BaseRetriever>` and tests can substitute fakes.
#[async_trait]
pub trait BaseRetriever: Send + Sync {
    /// Retrieve the documents most relevant to `query`, best first.
    async fn retrieve(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, RetrievalError>;
}
