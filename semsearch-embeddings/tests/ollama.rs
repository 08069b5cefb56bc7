#![cfg(feature = "ollama")]

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use semsearch_core::{Embedding, EmbeddingError};
use semsearch_embeddings::OllamaEmbedding;

#[tokio::test]
async fn ollama_embedding_maps_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/embed"))
        .and(body_partial_json(json!({
            "model": "nomic-embed-text",
            "input": ["hello"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "embeddings": [[0.4, 0.5]]
        })))
        .mount(&server)
        .await;

    let embedder = OllamaEmbedding::new(server.uri(), "nomic-embed-text".to_string(), 2);
    let out = embedder.embed("hello").await.unwrap();
    assert_eq!(out, vec![0.4, 0.5]);
}

#[tokio::test]
async fn ollama_embedding_rejects_wrong_dimension() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/embed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "embeddings": [[0.4, 0.5, 0.6]]
        })))
        .mount(&server)
        .await;

    let embedder = OllamaEmbedding::new(server.uri(), "nomic-embed-text".to_string(), 2);
    let err = embedder.embed("hello").await.unwrap_err();
    assert!(matches!(err, EmbeddingError::InvalidResponse(_)));
}

#[tokio::test]
async fn ollama_embedding_rejects_truncated_batch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/embed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "embeddings": [[0.4, 0.5]]
        })))
        .mount(&server)
        .await;

    let embedder = OllamaEmbedding::new(server.uri(), "nomic-embed-text".to_string(), 2);
    let err = embedder
        .embed_batch(&["a".to_string(), "b".to_string()])
        .await
        .unwrap_err();
    assert!(matches!(err, EmbeddingError::InvalidResponse(_)));
}

#[tokio::test]
async fn ollama_embedding_surfaces_http_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/embed"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let embedder = OllamaEmbedding::new(server.uri(), "nomic-embed-text".to_string(), 2);
    let err = embedder.embed("hello").await.unwrap_err();
    assert!(matches!(err, EmbeddingError::Provider(_)));
}

#[tokio::test]
async fn ollama_embed_batch_is_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/embed"))
        .and(body_partial_json(json!({
            "input": ["a", "b"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "embeddings": [[1.0, 0.0], [0.0, 1.0]]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let embedder = OllamaEmbedding::new(server.uri(), "nomic-embed-text".to_string(), 2);
    let out = embedder
        .embed_batch(&["a".to_string(), "b".to_string()])
        .await
        .unwrap();
    assert_eq!(out, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    assert_eq!(embedder.dimension(), 2);
}

#[tokio::test]
async fn ollama_embed_batch_empty_input_skips_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/embed"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let embedder = OllamaEmbedding::new(server.uri(), "nomic-embed-text".to_string(), 2);
    let out = embedder.embed_batch(&[]).await.unwrap();
    assert!(out.is_empty());
}
