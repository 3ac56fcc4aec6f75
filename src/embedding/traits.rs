// Embedding provider trait: the swap-ready abstraction over sentence
// embedding backends.
//
// The default backend is the local ONNX sentence transformer. The hashing
// embedder is a deterministic, model-free stand-in, and the cache wrapper
// can sit in front of either.

use anyhow::Result;

/// A fixed-length, L2-normalized embedding vector.
pub type Embedding = Vec<f64>;

/// Trait for turning texts into normalized embedding vectors.
///
/// Implementations are constructed once and shared by reference across
/// scoring calls, so `encode` must be safe to call concurrently.
pub trait EmbeddingProvider: Send + Sync {
    /// Encode a batch of texts, returning one vector per input in order.
    ///
    /// Encoding is the dominant cost of scoring: callers should batch texts
    /// into as few calls as possible.
    fn encode(&self, texts: &[String]) -> Result<Vec<Embedding>>;

    /// Cosine similarity between two vectors produced by this provider.
    fn similarity(&self, a: &[f64], b: &[f64]) -> f64 {
        cosine_similarity(a, b)
    }
}

impl<P: EmbeddingProvider + ?Sized> EmbeddingProvider for Box<P> {
    fn encode(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        (**self).encode(texts)
    }

    fn similarity(&self, a: &[f64], b: &[f64]) -> f64 {
        (**self).similarity(a, b)
    }
}

/// Cosine similarity in [-1, 1].
///
/// Works on unnormalized input too. Returns 0.0 for empty, mismatched or
/// zero-magnitude vectors.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let mag_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    let denom = mag_a * mag_b;
    if denom < f64::EPSILON {
        0.0
    } else {
        (dot / denom).clamp(-1.0, 1.0)
    }
}

/// Scale a vector to unit length in place. Zero vectors are left alone.
pub fn l2_normalize(v: &mut [f64]) {
    let norm: f64 = v.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > f64::EPSILON {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

/// Highest similarity between `query` and any of `candidates`.
///
/// Returns `None` when there are no candidates.
pub fn max_similarity(
    provider: &dyn EmbeddingProvider,
    query: &[f64],
    candidates: &[Embedding],
) -> Option<f64> {
    candidates
        .iter()
        .map(|c| provider.similarity(query, c))
        .fold(None, |best, sim| match best {
            Some(b) if b >= sim => Some(b),
            _ => Some(sim),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_identical() {
        let a = vec![1.0, 2.0, 3.0];
        let sim = cosine_similarity(&a, &a);
        assert!((sim - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_cosine_orthogonal() {
        let sim = cosine_similarity(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]);
        assert!(sim.abs() < 1e-10);
    }

    #[test]
    fn test_cosine_opposite_is_negative_one() {
        let sim = cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]);
        assert!((sim + 1.0).abs() < 1e-10, "got {sim}");
    }

    #[test]
    fn test_cosine_proportional() {
        let sim = cosine_similarity(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]);
        assert!((sim - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_cosine_degenerate_inputs() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0, 2.0, 3.0]), 0.0);
    }

    #[test]
    fn test_cosine_is_symmetric() {
        let a = vec![1.0, 3.0, -2.0, 0.5];
        let b = vec![2.0, -1.0, 4.0, 0.0];
        assert!((cosine_similarity(&a, &b) - cosine_similarity(&b, &a)).abs() < 1e-10);
    }

    #[test]
    fn test_l2_normalize() {
        let mut v = vec![3.0, 4.0];
        l2_normalize(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-10);
        assert!((v[1] - 0.8).abs() < 1e-10);

        let mut zero = vec![0.0, 0.0];
        l2_normalize(&mut zero);
        assert_eq!(zero, vec![0.0, 0.0]);
    }

    struct Identity;

    impl EmbeddingProvider for Identity {
        fn encode(&self, _texts: &[String]) -> Result<Vec<Embedding>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_max_similarity() {
        let candidates = vec![vec![0.0, 1.0], vec![1.0, 1.0], vec![1.0, 0.0]];
        let best = max_similarity(&Identity, &[1.0, 0.0], &candidates).unwrap();
        assert!((best - 1.0).abs() < 1e-10);
        assert!(max_similarity(&Identity, &[1.0, 0.0], &[]).is_none());
    }
}
