// Content-addressed embedding cache.
//
// Anchor phrases and ideal answers get re-encoded on every scoring call.
// Wrapping a provider in `CachedEmbedder` keys vectors by the exact input
// text so those repeats are encoded once. Entries never go stale (same text,
// same vector) and are never evicted.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use tracing::debug;

use super::traits::{Embedding, EmbeddingProvider};

pub struct CachedEmbedder<P> {
    inner: P,
    cache: Mutex<HashMap<String, Embedding>>,
}

impl<P: EmbeddingProvider> CachedEmbedder<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Number of distinct texts cached so far.
    pub fn len(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: EmbeddingProvider> EmbeddingProvider for CachedEmbedder<P> {
    fn encode(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        // Collect distinct misses under the lock, then release it while the
        // inner provider runs.
        let misses: Vec<String> = {
            let cache = self
                .cache
                .lock()
                .map_err(|e| anyhow::anyhow!("Embedding cache lock poisoned: {}", e))?;
            let mut seen = std::collections::HashSet::new();
            texts
                .iter()
                .filter(|t| !cache.contains_key(t.as_str()) && seen.insert(t.as_str()))
                .cloned()
                .collect()
        };

        if !misses.is_empty() {
            let fresh = self.inner.encode(&misses)?;
            if fresh.len() != misses.len() {
                anyhow::bail!(
                    "Embedding provider returned {} vectors for {} texts",
                    fresh.len(),
                    misses.len()
                );
            }
            let mut cache = self
                .cache
                .lock()
                .map_err(|e| anyhow::anyhow!("Embedding cache lock poisoned: {}", e))?;
            cache.extend(misses.into_iter().zip(fresh));
        }

        let cache = self
            .cache
            .lock()
            .map_err(|e| anyhow::anyhow!("Embedding cache lock poisoned: {}", e))?;

        debug!(
            requested = texts.len(),
            cached = cache.len(),
            "Served embeddings from cache"
        );

        texts
            .iter()
            .map(|t| {
                cache
                    .get(t.as_str())
                    .cloned()
                    .ok_or_else(|| anyhow::anyhow!("Embedding missing from cache for {:?}", t))
            })
            .collect()
    }

    fn similarity(&self, a: &[f64], b: &[f64]) -> f64 {
        self.inner.similarity(a, b)
    }
}
