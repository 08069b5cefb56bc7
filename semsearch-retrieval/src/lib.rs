mod base_retriever;
mod error;
mod hash_embedder;
mod in_memory;
mod indexer;
mod loader;
mod retriever;

pub use base_retriever::BaseRetriever;
pub use error::{IngestionError, RetrievalError};
pub use hash_embedder::HashEmbedder;
pub use in_memory::InMemoryVectorStore;
pub use indexer::{Indexer, IngestReport, SkippedDocument};
pub use loader::FileNameLoader;
pub use retriever::Retriever;
