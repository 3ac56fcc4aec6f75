// Keyword coverage with escalating match strategies.
//
// For each keyword the first strategy that fires wins:
//   1. lemma overlap with the answer           -> full credit
//   2. raw substring of the lowercased answer  -> full credit
//   3. semantic match against any sentence     -> partial credit
// Strategy 3 needs an embedding provider. Every keyword that reaches it is
// encoded together with the answer's sentences in a single batch.

use std::collections::HashSet;

use anyhow::Result;
use tracing::debug;

use crate::embedding::traits::max_similarity;
use crate::embedding::EmbeddingProvider;
use crate::scoring::{ScoreComponent, Thresholds};
use crate::text::Normalizer;

pub const NO_KEYWORDS_REASON: &str = "No keywords provided";
pub const NO_MATCHES_REASON: &str = "No significant keywords found";

pub fn keyword_coverage_score(
    user_text: &str,
    keywords: &[String],
    normalizer: &Normalizer,
    provider: Option<&dyn EmbeddingProvider>,
    thresholds: &Thresholds,
) -> Result<ScoreComponent> {
    // An empty requirement list earns nothing rather than full marks.
    if keywords.is_empty() {
        return Ok(ScoreComponent::new(0, NO_KEYWORDS_REASON));
    }

    let user_lemmas: HashSet<String> = normalizer.normalize(user_text).into_iter().collect();
    let user_lower = user_text.to_lowercase();

    let mut credit = 0.0;
    let mut matched: Vec<&str> = Vec::new();
    let mut unmatched: Vec<&str> = Vec::new();

    for keyword in keywords {
        let lemma_hit = normalizer
            .normalize(keyword)
            .iter()
            .any(|lemma| user_lemmas.contains(lemma));

        if lemma_hit || user_lower.contains(&keyword.to_lowercase()) {
            matched.push(keyword);
            credit += 1.0;
        } else {
            unmatched.push(keyword);
        }
    }

    let mut semantic: Vec<&str> = Vec::new();
    if let Some(provider) = provider {
        if !unmatched.is_empty() {
            let sentences = normalizer.split_sentences(user_text);
            if !sentences.is_empty() {
                let mut batch: Vec<String> = unmatched.iter().map(|k| k.to_string()).collect();
                batch.extend(sentences.iter().cloned());

                let embeddings = provider.encode(&batch)?;
                if embeddings.len() != batch.len() {
                    anyhow::bail!(
                        "Embedding provider returned {} vectors for {} texts",
                        embeddings.len(),
                        batch.len()
                    );
                }
                let (keyword_embeddings, sentence_embeddings) =
                    embeddings.split_at(unmatched.len());

                for (keyword, emb) in unmatched.iter().zip(keyword_embeddings) {
                    let best =
                        max_similarity(provider, emb, sentence_embeddings).unwrap_or(0.0);
                    debug!(keyword = *keyword, similarity = best, "Keyword semantic check");
                    if best > thresholds.keyword_semantic_threshold {
                        semantic.push(keyword);
                        credit += thresholds.keyword_semantic_credit;
                    }
                }
            }
        }
    }

    let coverage = (credit / keywords.len() as f64).min(1.0);

    let mut reason_parts = Vec::new();
    if !matched.is_empty() {
        reason_parts.push(format!("Matched: {}", matched.join(", ")));
    }
    if !semantic.is_empty() {
        reason_parts.push(format!("Semantic matches: {}", semantic.join(", ")));
    }
    let reason = if reason_parts.is_empty() {
        NO_MATCHES_REASON.to_string()
    } else {
        reason_parts.join("; ")
    };

    Ok(ScoreComponent::from_ratio(coverage, reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::Embedding;

    fn kw(words: &[&str]) -> Vec<String> {
        words.iter().map(|s| s.to_string()).collect()
    }

    /// Embeds every text as the same vector, so any semantic check passes.
    struct Uniform;

    impl EmbeddingProvider for Uniform {
        fn encode(&self, texts: &[String]) -> Result<Vec<Embedding>> {
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }
    }

    /// Keywords and sentences land orthogonal, so semantic checks fail.
    struct Orthogonal;

    impl EmbeddingProvider for Orthogonal {
        fn encode(&self, texts: &[String]) -> Result<Vec<Embedding>> {
            Ok(texts
                .iter()
                .map(|t| {
                    if t.contains('.') {
                        vec![0.0, 1.0]
                    } else {
                        vec![1.0, 0.0]
                    }
                })
                .collect())
        }
    }

    /// Fails if called at all.
    struct Unreachable;

    impl EmbeddingProvider for Unreachable {
        fn encode(&self, _texts: &[String]) -> Result<Vec<Embedding>> {
            anyhow::bail!("provider should not be called")
        }
    }

    #[test]
    fn test_empty_keywords_score_zero() {
        let n = Normalizer::default();
        let c = keyword_coverage_score("anything", &[], &n, None, &Thresholds::default()).unwrap();
        assert_eq!(c.score, 0);
        assert_eq!(c.reason, NO_KEYWORDS_REASON);
    }

    #[test]
    fn test_lemma_match_across_inflection() {
        let n = Normalizer::default();
        let c = keyword_coverage_score(
            "I broke the project into milestones.",
            &kw(&["milestone"]),
            &n,
            None,
            &Thresholds::default(),
        )
        .unwrap();
        assert_eq!(c.score, 100);
        assert_eq!(c.reason, "Matched: milestone");
    }

    #[test]
    fn test_substring_match() {
        let n = Normalizer::default();
        let c = keyword_coverage_score(
            "Our team adopted Site-Reliability practices.",
            &kw(&["site-reliability"]),
            &n,
            None,
            &Thresholds::default(),
        )
        .unwrap();
        assert_eq!(c.score, 100);
    }

    #[test]
    fn test_no_match_without_provider() {
        let n = Normalizer::default();
        let c = keyword_coverage_score(
            "I refactored the billing service.",
            &kw(&["kubernetes", "latency"]),
            &n,
            None,
            &Thresholds::default(),
        )
        .unwrap();
        assert_eq!(c.score, 0);
        assert_eq!(c.reason, NO_MATCHES_REASON);
    }

    #[test]
    fn test_partial_coverage() {
        let n = Normalizer::default();
        let c = keyword_coverage_score(
            "I refactored the billing service.",
            &kw(&["billing", "kubernetes", "latency", "refactor"]),
            &n,
            None,
            &Thresholds::default(),
        )
        .unwrap();
        assert_eq!(c.score, 50);
        assert_eq!(c.reason, "Matched: billing, refactor");
    }

    #[test]
    fn test_semantic_match_gives_partial_credit() {
        let n = Normalizer::default();
        let c = keyword_coverage_score(
            "I refactored the billing service.",
            &kw(&["billing", "kubernetes"]),
            &n,
            Some(&Uniform),
            &Thresholds::default(),
        )
        .unwrap();
        // (1.0 + 0.9) / 2 = 0.95
        assert_eq!(c.score, 95);
        assert_eq!(c.reason, "Matched: billing; Semantic matches: kubernetes");
    }

    #[test]
    fn test_semantic_below_threshold_gets_nothing() {
        let n = Normalizer::default();
        let c = keyword_coverage_score(
            "I refactored the billing service.",
            &kw(&["billing", "kubernetes"]),
            &n,
            Some(&Orthogonal),
            &Thresholds::default(),
        )
        .unwrap();
        assert_eq!(c.score, 50);
        assert_eq!(c.reason, "Matched: billing");
    }

    #[test]
    fn test_provider_skipped_when_all_matched() {
        let n = Normalizer::default();
        let c = keyword_coverage_score(
            "I refactored the billing service.",
            &kw(&["billing"]),
            &n,
            Some(&Unreachable),
            &Thresholds::default(),
        )
        .unwrap();
        assert_eq!(c.score, 100);
    }

    #[test]
    fn test_provider_skipped_when_no_sentences() {
        let n = Normalizer::default();
        let c = keyword_coverage_score(
            "ok",
            &kw(&["billing"]),
            &n,
            Some(&Unreachable),
            &Thresholds::default(),
        )
        .unwrap();
        assert_eq!(c.score, 0);
    }

    #[test]
    fn test_provider_error_propagates() {
        let n = Normalizer::default();
        let result = keyword_coverage_score(
            "I refactored the billing service.",
            &kw(&["kubernetes"]),
            &n,
            Some(&Unreachable),
            &Thresholds::default(),
        );
        assert!(result.is_err());
    }
}
