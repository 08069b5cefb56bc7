//! Chroma-backed [`VectorStore`] for semsearch.
//!
//! The collection's on-disk representation belongs entirely to Chroma; this
//! crate treats it as an opaque collection identified by name.

use std::sync::atomic::{AtomicUsize, Ordering};

use chroma::client::{ChromaAuthMethod, ChromaHttpClientError, ChromaHttpClientOptions};
use chroma::types::{IncludeList, MetadataValue, QueryResponse, UpdateMetadata, UpdateMetadataValue};
use chroma::{ChromaCollection, ChromaHttpClient};
use thiserror::Error;

use semsearch_core::{Document, Metadata, Scalar, SearchResult, StoreError, VectorStore};

#[derive(Debug, Error)]
pub enum ChromaStoreError {
    #[error("invalid endpoint URL: {0}")]
    InvalidEndpoint(String),
    #[error("chroma client error: {0}")]
    Client(#[from] ChromaHttpClientError),
    #[error("metadata key '{0}' is invalid for Chroma")]
    InvalidMetadataKey(String),
}

impl From<ChromaStoreError> for StoreError {
    fn from(value: ChromaStoreError) -> Self {
        StoreError::Internal(Box::new(value))
    }
}

pub struct ChromaVectorStore {
    collection: ChromaCollection,
    // Dimensionality observed on the first successful upsert; zero until
    // then. Lets dimension violations fail as DimensionMismatch locally
    // instead of surfacing as an opaque server rejection.
    dimension: AtomicUsize,
}

impl ChromaVectorStore {
    pub async fn new(
        endpoint: impl AsRef<str>,
        collection_name: impl Into<String>,
    ) -> Result<Self, ChromaStoreError> {
        let tenant_id =
            std::env::var("CHROMA_TENANT").unwrap_or_else(|_| "default_tenant".to_string());
        let database_name =
            std::env::var("CHROMA_DATABASE").unwrap_or_else(|_| "default_database".to_string());

        let options = ChromaHttpClientOptions {
            endpoint: endpoint
                .as_ref()
                .parse::<reqwest::Url>()
                .map_err(|err| ChromaStoreError::InvalidEndpoint(err.to_string()))?,
            auth_method: ChromaAuthMethod::None,
            tenant_id: Some(tenant_id),
            database_name: Some(database_name),
            ..Default::default()
        };

        let client = ChromaHttpClient::new(options);
        Self::with_client(client, collection_name).await
    }

    pub async fn with_client(
        client: ChromaHttpClient,
        collection_name: impl Into<String>,
    ) -> Result<Self, ChromaStoreError> {
        let collection = client
            .get_or_create_collection(collection_name.into(), None, None)
            .await?;
        Ok(Self {
            collection,
            dimension: AtomicUsize::new(0),
        })
    }

    pub fn collection_name(&self) -> &str {
        self.collection.name()
    }

    fn known_dimension(&self) -> Option<usize> {
        match self.dimension.load(Ordering::Relaxed) {
            0 => None,
            dimension => Some(dimension),
        }
    }
}

#[async_trait::async_trait]
impl VectorStore for ChromaVectorStore {
    async fn upsert(&self, docs: Vec<Document>) -> Result<(), StoreError> {
        if docs.is_empty() {
            return Ok(());
        }

        let mut ids = Vec::with_capacity(docs.len());
        let mut embeddings = Vec::with_capacity(docs.len());
        let mut documents = Vec::with_capacity(docs.len());
        let mut metadatas = Vec::with_capacity(docs.len());
        let mut expected_dimension = self.known_dimension();

        for mut doc in docs {
            if doc.id.trim().is_empty() {
                return Err(StoreError::InvalidId(doc.id));
            }

            let embedding = doc
                .embedding
                .take()
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

            let metadata = to_update_metadata(doc.metadata).map_err(StoreError::from)?;

            ids.push(doc.id);
            embeddings.push(embedding);
            documents.push(Some(doc.content));
            metadatas.push(Some(metadata));
        }

        self.collection
            .upsert(ids, embeddings, Some(documents), None, Some(metadatas))
            .await
            .map_err(ChromaStoreError::from)
            .map_err(StoreError::from)?;

        if let Some(dimension) = expected_dimension {
            self.dimension.store(dimension, Ordering::Relaxed);
        }
        Ok(())
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>, StoreError> {
        if let Some(expected) = self.known_dimension() {
            if expected != query_embedding.len() {
                return Err(StoreError::DimensionMismatch {
                    expected,
                    got: query_embedding.len(),
                });
            }
        }
        if top_k == 0 {
            return Ok(Vec::new());
        }

        let top_k_u32 = top_k.min(u32::MAX as usize) as u32;

        let response = self
            .collection
            .query(
                vec![query_embedding.to_vec()],
                Some(top_k_u32),
                None,
                None,
                Some(IncludeList::default_query()),
            )
            .await
            .map_err(ChromaStoreError::from)
            .map_err(StoreError::from)?;

        Ok(query_response_to_results(response))
    }

    async fn delete(&self, ids: &[String]) -> Result<(), StoreError> {
        if ids.is_empty() {
            return Ok(());
        }

        self.collection
            .delete(Some(ids.to_vec()), None, None)
            .await
            .map_err(ChromaStoreError::from)
            .map_err(StoreError::from)
            .map(|_| ())
    }
}

fn query_response_to_results(response: QueryResponse) -> Vec<SearchResult> {
    let ids = response.ids.into_iter().next().unwrap_or_default();
    let documents = response
        .documents
        .and_then(|mut batches| batches.pop())
        .unwrap_or_default();
    let metadatas = response
        .metadatas
        .and_then(|mut batches| batches.pop())
        .unwrap_or_default();
    let distances = response
        .distances
        .and_then(|mut batches| batches.pop())
        .unwrap_or_default();

    ids.into_iter()
        .enumerate()
        .map(|(idx, id)| {
            let content = documents
                .get(idx)
                .and_then(|value| value.clone())
                .unwrap_or_default();

            let metadata: Metadata = metadatas
                .get(idx)
                .cloned()
                .flatten()
                .unwrap_or_default()
                .into_iter()
                .filter_map(|(key, value)| metadata_value_to_scalar(value).map(|v| (key, v)))
                .collect();

            // Chroma reports distances (lower is closer); negate so the
            // VectorStore contract's higher-is-better ordering holds.
            let score = distances
                .get(idx)
                .copied()
                .flatten()
                .map(|distance| -distance)
                .unwrap_or(0.0);

            SearchResult {
                document: Document {
                    id,
                    content,
                    metadata,
                    embedding: None,
                },
                score,
            }
        })
        .collect()
}

// Non-scalar payload values (arrays written by other clients) have no home
// in the scalar metadata model and are dropped from results.
fn metadata_value_to_scalar(value: MetadataValue) -> Option<Scalar> {
    match value {
        MetadataValue::Bool(value) => Some(Scalar::Bool(value)),
        MetadataValue::Int(value) => Some(Scalar::Int(value)),
        MetadataValue::Float(value) => Some(Scalar::Float(value)),
        MetadataValue::Str(value) => Some(Scalar::Str(value)),
        _ => None,
    }
}

fn to_update_metadata(metadata: Metadata) -> Result<UpdateMetadata, ChromaStoreError> {
    let mut out = UpdateMetadata::new();

    for (key, value) in metadata {
        if key.starts_with('$') || key.starts_with('#') {
            return Err(ChromaStoreError::InvalidMetadataKey(key));
        }

        let value = match value {
            Scalar::Bool(value) => UpdateMetadataValue::Bool(value),
            Scalar::Int(value) => UpdateMetadataValue::Int(value),
            Scalar::Float(value) => UpdateMetadataValue::Float(value),
            Scalar::Str(value) => UpdateMetadataValue::Str(value),
        };
        out.insert(key, value);
    }

    Ok(out)
}
