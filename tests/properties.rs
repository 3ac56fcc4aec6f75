// Property tests for the scoring pipeline.
//
// For arbitrary answer text: every score stays in range, the final score is
// the rounded weighted sum, and repeated calls agree. Keyword coverage never
// drops when a keyword the answer literally contains is added.

use proptest::prelude::*;

use rubric::embedding::{cosine_similarity, HashingEmbedder};
use rubric::features::keyword_coverage_score;
use rubric::scoring::{final_scoring, FeatureName, FeatureWeights, Thresholds};
use rubric::text::Normalizer;

const IDEAL: &str = "I prioritized the migration, coordinated with the billing team and \
     delivered the release on time.";

fn arb_words() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec("[a-z]{1,10}", 1..40)
}

fn arb_answer() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 .,!?'\n-]{0,300}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn final_score_in_range_and_weighted(answer in arb_answer(), keywords in arb_words()) {
        let embedder = HashingEmbedder::default();
        let result = final_scoring(&answer, IDEAL, &keywords, &embedder).unwrap();

        prop_assert!(result.final_score <= 100);
        prop_assert_eq!(result.explanation.len(), FeatureName::ALL.len());

        let weights = FeatureWeights::default();
        let expected: f64 = FeatureName::ALL
            .iter()
            .map(|&f| weights.weight(f) * result.feature_score(f) as f64)
            .sum();
        prop_assert_eq!(result.final_score, expected.round_ties_even() as u8);

        for component in result.explanation.values() {
            prop_assert!(component.score <= 100);
            prop_assert!(!component.reason.is_empty());
        }
    }

    #[test]
    fn scoring_is_idempotent(answer in arb_answer()) {
        let embedder = HashingEmbedder::default();
        let keywords = vec!["migration".to_string(), "billing".to_string()];
        let first = final_scoring(&answer, IDEAL, &keywords, &embedder).unwrap();
        let second = final_scoring(&answer, IDEAL, &keywords, &embedder).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn keyword_coverage_monotonic(
        words in arb_words(),
        keywords in proptest::collection::vec("[a-z]{3,10}", 1..6),
        pick in any::<prop::sample::Index>(),
    ) {
        let normalizer = Normalizer::default();
        let thresholds = Thresholds::default();
        let text = format!("{}.", words.join(" "));

        let before = keyword_coverage_score(&text, &keywords, &normalizer, None, &thresholds)
            .unwrap();

        let mut extended = keywords.clone();
        extended.push(pick.get(&words).clone());
        let after = keyword_coverage_score(&text, &extended, &normalizer, None, &thresholds)
            .unwrap();

        prop_assert!(after.score >= before.score, "{} < {}", after.score, before.score);
    }

    #[test]
    fn cosine_similarity_bounded(
        a in proptest::collection::vec(-10.0f64..10.0, 1..16),
        b in proptest::collection::vec(-10.0f64..10.0, 1..16),
    ) {
        let sim = cosine_similarity(&a, &b);
        prop_assert!((-1.0..=1.0).contains(&sim));
    }
}
