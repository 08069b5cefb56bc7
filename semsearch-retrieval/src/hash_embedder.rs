use async_trait::async_trait;

use semsearch_core::{Embedding, EmbeddingError};

const LANE_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

// splitmix64 finalizer; each output bit depends on every input bit.
fn mix64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^= x >> 31;
    x
}

fn lane_hash(bytes: &[u8], lane: u64) -> u64 {
    let mut state = lane.wrapping_mul(LANE_GAMMA);
    for chunk in bytes.chunks(8) {
        let mut word = [0u8; 8];
        word[..chunk.len()].copy_from_slice(chunk);
        state = mix64(state ^ u64::from_le_bytes(word));
    }
    // Fold in the length so "a" and "a\0" stay distinct.
    mix64(state ^ bytes.len() as u64)
}

/// Deterministic embedder for tests and offline demos. Each vector component
/// is an independently seeded hash of the text, spread over [-1, 1), so
/// identical text always maps to the identical vector (including the empty
/// string, which hashes the empty byte sequence like any other input).
#[derive(Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn hash_to_vec(&self, text: &str) -> Vec<f32> {
        let bytes = text.as_bytes();
        (0..self.dimension)
            .map(|lane| {
                let hash = lane_hash(bytes, lane as u64 + 1);
                // Top 24 bits scaled into [-1, 1).
                ((hash >> 40) as f32 / (1u64 << 23) as f32) - 1.0
            })
            .collect()
    }
}

#[async_trait]
impl Embedding for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.hash_to_vec(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|text| self.hash_to_vec(text)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
