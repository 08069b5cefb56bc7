use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::EmbeddingProviderError;
use semsearch_core::{Embedding, EmbeddingError};

/// Embedding provider backed by a local or remote Ollama server, speaking the
/// batch `/api/embed` endpoint so a whole ingest batch costs one round trip.
/// An empty string is forwarded to the model unchanged; whether it embeds or
/// errors is up to the model.
#[derive(Clone)]
pub struct OllamaEmbedding {
    endpoint: String,
    model: String,
    dimension: usize,
    http: Client,
}

impl OllamaEmbedding {
    pub fn new(base_url: String, model: String, dimension: usize) -> Self {
        Self {
            endpoint: format!("{}/api/embed", base_url.trim_end_matches('/')),
            model,
            dimension,
            http: Client::new(),
        }
    }

    async fn request_embeddings(
        &self,
        input: &[String],
    ) -> Result<Vec<Vec<f32>>, EmbeddingProviderError> {
        let request = EmbedRequest {
            model: &self.model,
            input,
        };
        let response: EmbedResponse = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|err| EmbeddingProviderError::Request(err.to_string()))?
            .error_for_status()
            .map_err(|err| EmbeddingProviderError::Request(err.to_string()))?
            .json()
            .await
            .map_err(|err| EmbeddingProviderError::Request(err.to_string()))?;

        if response.embeddings.len() != input.len() {
            return Err(EmbeddingProviderError::InvalidResponse(format!(
                "sent {} inputs, server returned {} embeddings",
                input.len(),
                response.embeddings.len()
            )));
        }
        for embedding in &response.embeddings {
            if embedding.len() != self.dimension {
                return Err(EmbeddingProviderError::InvalidResponse(format!(
                    "expected embedding dimension {}, got {}",
                    self.dimension,
                    embedding.len()
                )));
            }
        }

        Ok(response.embeddings)
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[async_trait]
impl Embedding for OllamaEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut embeddings = self.request_embeddings(&[text.to_string()]).await?;
        embeddings
            .pop()
            .ok_or_else(|| EmbeddingError::InvalidResponse("empty embeddings array".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.request_embeddings(texts).await?)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
