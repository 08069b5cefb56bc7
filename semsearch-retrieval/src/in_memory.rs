use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use semsearch_core::{Document, SearchResult, StoreError, VectorStore};

#[derive(Default)]
struct StoreInner {
    // Slot order is insertion order; replacements keep their slot so that
    // equal-score results tie-break the same way across re-ingestion.
    docs: Vec<Option<Document>>,
    embeddings: Vec<Option<Vec<f32>>>,
    id_map: HashMap<String, usize>,
    dimension: Option<usize>,
}

/// Cosine-similarity store held entirely in memory. Cheap to construct, so
/// tests and the demo binaries build one per corpus.
#[derive(Clone, Default)]
pub struct InMemoryVectorStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn upsert(&self, docs: Vec<Document>) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;

        // Validate the whole batch before touching any slot, so a rejected
        // batch leaves the store exactly as it was.
        let mut expected_dimension = inner.dimension;
        for doc in &docs {
            if doc.id.trim().is_empty() {
                return Err(StoreError::InvalidId(doc.id.clone()));
            }

            let embedding = doc
                .embedding
                .as_ref()
                .ok_or_else(|| StoreError::MissingEmbedding { id: doc.id.clone() })?;
            match expected_dimension {
                Some(expected) if expected != embedding.len() => {
                    return Err(StoreError::DimensionMismatch {
                        expected,
                        got: embedding.len(),
                    });
                }
                None => expected_dimension = Some(embedding.len()),
                _ => {}
            }
        }
        inner.dimension = expected_dimension;

        for mut doc in docs {
            let Some(embedding) = doc.embedding.take() else {
                continue;
            };

            if let Some(&index) = inner.id_map.get(&doc.id) {
                inner.docs[index] = Some(doc);
                inner.embeddings[index] = Some(embedding);
            } else {
                let index = inner.docs.len();
                inner.id_map.insert(doc.id.clone(), index);
                inner.docs.push(Some(doc));
                inner.embeddings.push(Some(embedding));
            }
        }
        Ok(())
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>, StoreError> {
        let inner = self.inner.read().await;
        let expected = inner.dimension.unwrap_or(query_embedding.len());
        if expected != query_embedding.len() {
            return Err(StoreError::DimensionMismatch {
                expected,
                got: query_embedding.len(),
            });
        }

        let mut scored = Vec::new();
        for (idx, embedding) in inner.embeddings.iter().enumerate() {
            let Some(embedding) = embedding else { continue };
            let Some(doc) = inner.docs[idx].as_ref() else {
                continue;
            };
            let mut score = cosine_similarity(query_embedding, embedding);
            if score.is_nan() {
                score = f32::NEG_INFINITY;
            }
            let mut result_doc = doc.clone();
            result_doc.embedding = None;
            scored.push(SearchResult {
                document: result_doc,
                score,
            });
        }

        // Stable sort over slot order keeps insertion order on ties.
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap());
        scored.truncate(top_k);
        Ok(scored)
    }

    async fn delete(&self, ids: &[String]) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        for id in ids {
            if let Some(idx) = inner.id_map.remove(id) {
                inner.docs[idx] = None;
                inner.embeddings[idx] = None;
            }
        }
        Ok(())
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
