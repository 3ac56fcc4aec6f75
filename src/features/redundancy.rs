// Redundancy: lexical diversity of the answer's lemmas.

use std::collections::HashSet;

use crate::scoring::{ScoreComponent, Thresholds};
use crate::text::Normalizer;

pub const NO_CONTENT_REASON: &str = "No content";

const REPETITIVE_RATIO: f64 = 0.5;

/// `unique / total` over the lemma sequence, or `None` when there are no lemmas.
pub fn diversity_index(lemmas: &[String]) -> Option<f64> {
    if lemmas.is_empty() {
        return None;
    }
    let unique: HashSet<&str> = lemmas.iter().map(String::as_str).collect();
    Some(unique.len() as f64 / lemmas.len() as f64)
}

pub fn redundancy_score(
    user_text: &str,
    normalizer: &Normalizer,
    thresholds: &Thresholds,
) -> ScoreComponent {
    let lemmas = normalizer.normalize(user_text);
    let Some(ratio) = diversity_index(&lemmas) else {
        return ScoreComponent::new(100, NO_CONTENT_REASON);
    };

    if ratio < thresholds.diversity_cutoff {
        ScoreComponent::from_ratio(
            REPETITIVE_RATIO,
            format!("High repetition detected (diversity index: {ratio:.2})"),
        )
    } else {
        ScoreComponent::from_ratio(
            1.0,
            format!("Vocabulary diversity is good (index: {ratio:.2})"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_content_passes() {
        let n = Normalizer::default();
        let c = redundancy_score("", &n, &Thresholds::default());
        assert_eq!(c.score, 100);
        assert_eq!(c.reason, NO_CONTENT_REASON);
    }

    #[test]
    fn test_distinct_lemmas() {
        let n = Normalizer::default();
        let c = redundancy_score("kubernetes billing latency", &n, &Thresholds::default());
        assert_eq!(c.score, 100);
        assert_eq!(c.reason, "Vocabulary diversity is good (index: 1.00)");
    }

    #[test]
    fn test_repeated_lemma() {
        let n = Normalizer::default();
        let c = redundancy_score(
            "database database database database database",
            &n,
            &Thresholds::default(),
        );
        assert_eq!(c.score, 50);
        assert_eq!(c.reason, "High repetition detected (diversity index: 0.20)");
    }

    #[test]
    fn test_diversity_index_ratio() {
        let lemmas: Vec<String> = ["deploy", "deploy", "deploy", "rollback"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(diversity_index(&lemmas), Some(0.5));
        assert_eq!(diversity_index(&[]), None);
    }
}
