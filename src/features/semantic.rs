// Semantic similarity between the answer and the ideal answer.
//
// Requires an embedding provider; there is no lexical fallback.

use anyhow::Result;
use tracing::debug;

use crate::embedding::EmbeddingProvider;
use crate::scoring::ScoreComponent;

pub fn semantic_similarity_score(
    user_text: &str,
    ideal_text: &str,
    provider: &dyn EmbeddingProvider,
) -> Result<ScoreComponent> {
    let embeddings = provider.encode(&[user_text.to_string(), ideal_text.to_string()])?;
    let [user, ideal] = embeddings.as_slice() else {
        anyhow::bail!(
            "Embedding provider returned {} vectors for 2 texts",
            embeddings.len()
        );
    };

    let raw = round_to_hundredths(provider.similarity(user, ideal));
    debug!(similarity = raw, "Semantic similarity");

    Ok(ScoreComponent::from_ratio(
        raw,
        format!("Cosine similarity between user and ideal answer: {raw:.2}"),
    ))
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
