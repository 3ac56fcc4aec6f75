// Feature-hashing embedder: a deterministic, model-free provider.
//
// Each text becomes a bag of lemmas hashed into a fixed number of buckets,
// then L2-normalized. Similarity is lexical, not semantic: "deadline" and
// "tight schedule" land far apart. Useful offline and wherever a scoring
// run must be reproducible bit for bit.

use anyhow::Result;

use super::onnx::EMBEDDING_DIM;
use super::traits::{l2_normalize, Embedding, EmbeddingProvider};
use crate::text::Normalizer;

pub struct HashingEmbedder {
    normalizer: Normalizer,
    dim: usize,
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(Normalizer::default(), EMBEDDING_DIM)
    }
}

impl HashingEmbedder {
    pub fn new(normalizer: Normalizer, dim: usize) -> Self {
        Self {
            normalizer,
            dim: dim.max(1),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    fn embed_one(&self, text: &str) -> Embedding {
        let mut v = vec![0.0; self.dim];
        for lemma in self.normalizer.normalize(text) {
            let bucket = (fnv1a(lemma.as_bytes()) % self.dim as u64) as usize;
            v[bucket] += 1.0;
        }
        l2_normalize(&mut v);
        v
    }
}

impl EmbeddingProvider for HashingEmbedder {
    fn encode(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}

/// 64-bit FNV-1a. Stable across platforms and releases, unlike std's
/// `DefaultHasher`.
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    bytes.iter().fold(OFFSET, |hash, &b| {
        (hash ^ b as u64).wrapping_mul(PRIME)
    })
}
