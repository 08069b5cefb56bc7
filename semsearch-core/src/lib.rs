mod document;
mod embedding;
mod error;
mod vector_store;

pub use document::{Document, Metadata, Scalar};
pub use embedding::Embedding;
pub use error::{EmbeddingError, StoreError};
pub use vector_store::{SearchResult, VectorStore};
