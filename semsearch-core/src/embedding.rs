use async_trait::async_trait;

use crate::EmbeddingError;

/// Maps text to fixed-length vectors. Implementations are pure with respect
/// to their input once constructed; the returned vectors always have
/// `dimension()` entries.
///
/// Behavior on the empty string is provider-defined: implementations must
/// embed it like any other input or fail with an error, never silently
/// substitute something else. Argument validation belongs to callers.
#[async_trait]
pub trait Embedding: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Batch form of [`embed`](Embedding::embed); output order matches input
    /// order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    fn dimension(&self) -> usize;
}
