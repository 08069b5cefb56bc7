use async_trait::async_trait;

use crate::{Document, StoreError};

/// A stored document together with its match quality. Higher scores are
/// better matches; stores that measure distance negate it on the way out.
#[derive(Clone, Debug)]
pub struct SearchResult {
    pub document: Document,
    pub score: f32,
}

/// Nearest-neighbor store keyed by document id. The store owns vectors and
/// metadata once upserted; every vector in one store has the same
/// dimensionality, fixed by the first upsert.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert-or-replace by id. Documents must carry an embedding; a later
    /// `search` can return every upserted entry.
    async fn upsert(&self, docs: Vec<Document>) -> Result<(), StoreError>;

    /// The `top_k` entries closest to `query_embedding`, best first. Ties
    /// break by insertion order. A store with fewer than `top_k` entries
    /// returns all of them; an empty store returns an empty Vec.
    async fn search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>, StoreError>;

    /// Remove entries by id; absent ids are ignored.
    async fn delete(&self, ids: &[String]) -> Result<(), StoreError>;
}
