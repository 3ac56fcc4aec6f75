// Aggregator: runs every feature extractor and combines the results.
//
// A Scorer is built once and reused across calls. The embedding provider is
// not owned by the scorer; callers pass the same provider into each call.

use std::collections::BTreeMap;
use std::str::FromStr;

use anyhow::Result;
use tracing::{debug, info, warn};

use super::result::{FeatureName, ScoreComponent, ScoreResult};
use super::thresholds::Thresholds;
use super::weights::FeatureWeights;
use crate::embedding::EmbeddingProvider;
use crate::error::ScoringError;
use crate::features::{
    answer_length_score, keyword_coverage_score, redundancy_score, semantic_similarity_score,
    star_structure_score,
};
use crate::text::Normalizer;

/// What to do when a single feature extractor fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Abort the whole call with `ScoringError::Feature`.
    #[default]
    Propagate,
    /// Score the failed feature 0 and keep going.
    Isolate,
}

impl FromStr for FailurePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "propagate" => Ok(FailurePolicy::Propagate),
            "isolate" => Ok(FailurePolicy::Isolate),
            other => anyhow::bail!(
                "Unknown failure policy '{other}' (expected 'propagate' or 'isolate')"
            ),
        }
    }
}

pub struct Scorer {
    normalizer: Normalizer,
    weights: FeatureWeights,
    thresholds: Thresholds,
    policy: FailurePolicy,
}

impl Default for Scorer {
    fn default() -> Self {
        Self {
            normalizer: Normalizer::default(),
            weights: FeatureWeights::default(),
            thresholds: Thresholds::default(),
            policy: FailurePolicy::default(),
        }
    }
}

impl Scorer {
    /// Replace the weights. Fails unless they are non-negative and sum to 1.0.
    pub fn with_weights(mut self, weights: FeatureWeights) -> Result<Self> {
        weights.validate()?;
        self.weights = weights;
        Ok(self)
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.normalizer = self
            .normalizer
            .with_min_sentence_chars(thresholds.min_sentence_chars);
        self.thresholds = thresholds;
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the normalizer, keeping the configured sentence threshold.
    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer.with_min_sentence_chars(self.thresholds.min_sentence_chars);
        self
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn weights(&self) -> &FeatureWeights {
        &self.weights
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Score one answer. Every feature appears in the result's explanation.
    pub fn score(
        &self,
        user_text: &str,
        ideal_text: &str,
        keywords: &[String],
        provider: &dyn EmbeddingProvider,
    ) -> Result<ScoreResult> {
        let mut explanation = BTreeMap::new();

        for feature in FeatureName::ALL {
            let outcome = self.run_feature(feature, user_text, ideal_text, keywords, provider);
            let component = match outcome {
                Ok(component) => component,
                Err(e) => match self.policy {
                    FailurePolicy::Propagate => {
                        return Err(ScoringError::Feature { feature, source: e }.into());
                    }
                    FailurePolicy::Isolate => {
                        warn!(feature = %feature, error = %e, "Feature failed, scoring it 0");
                        ScoreComponent::new(0, format!("Feature unavailable: {e}"))
                    }
                },
            };
            debug!(
                feature = %feature,
                score = component.score,
                reason = %component.reason,
                "Feature scored"
            );
            explanation.insert(feature, component);
        }

        let final_score = self.weights.combine(&explanation);
        info!(final_score, "Answer scored");

        Ok(ScoreResult {
            final_score,
            explanation,
        })
    }

    fn run_feature(
        &self,
        feature: FeatureName,
        user_text: &str,
        ideal_text: &str,
        keywords: &[String],
        provider: &dyn EmbeddingProvider,
    ) -> Result<ScoreComponent> {
        match feature {
            FeatureName::SemanticSimilarity => {
                semantic_similarity_score(user_text, ideal_text, provider)
            }
            FeatureName::Keywords => keyword_coverage_score(
                user_text,
                keywords,
                &self.normalizer,
                Some(provider),
                &self.thresholds,
            ),
            FeatureName::Star => {
                star_structure_score(user_text, &self.normalizer, Some(provider), &self.thresholds)
            }
            FeatureName::Length => Ok(answer_length_score(user_text, &self.thresholds.length)),
            FeatureName::Redundancy => Ok(redundancy_score(
                user_text,
                &self.normalizer,
                &self.thresholds,
            )),
        }
    }
}

/// Score with the default weights, thresholds and normalizer.
///
/// Builds a fresh `Scorer` per call; hold a `Scorer` instead when scoring
/// many answers.
pub fn final_scoring(
    user_text: &str,
    ideal_text: &str,
    keywords: &[String],
    provider: &dyn EmbeddingProvider,
) -> Result<ScoreResult> {
    Scorer::default().score(user_text, ideal_text, keywords, provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::Embedding;

    struct Uniform;

    impl EmbeddingProvider for Uniform {
        fn encode(&self, texts: &[String]) -> Result<Vec<Embedding>> {
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }
    }

    struct Broken;

    impl EmbeddingProvider for Broken {
        fn encode(&self, _texts: &[String]) -> Result<Vec<Embedding>> {
            anyhow::bail!("model offline")
        }
    }

    const ANSWER: &str = "The deadline was tight. I prioritized the billing migration.";

    #[test]
    fn test_all_features_present() {
        let result = final_scoring(ANSWER, "ideal", &[], &Uniform).unwrap();
        for feature in FeatureName::ALL {
            assert!(result.component(feature).is_some(), "missing {feature}");
        }
    }

    #[test]
    fn test_final_score_is_weighted_sum() {
        let result = final_scoring(ANSWER, "ideal", &["billing".to_string()], &Uniform).unwrap();
        let expected = FeatureWeights::default().combine(&result.explanation);
        assert_eq!(result.final_score, expected);
    }

    #[test]
    fn test_propagate_wraps_feature_error() {
        let err = Scorer::default()
            .score(ANSWER, "ideal", &[], &Broken)
            .unwrap_err();
        match err.downcast_ref::<ScoringError>() {
            Some(ScoringError::Feature { feature, .. }) => {
                assert_eq!(*feature, FeatureName::SemanticSimilarity)
            }
            other => panic!("expected feature error, got {other:?}"),
        }
    }

    #[test]
    fn test_isolate_zeroes_failed_features() {
        let result = Scorer::default()
            .with_policy(FailurePolicy::Isolate)
            .score(ANSWER, "ideal", &[], &Broken)
            .unwrap();

        let semantic = result.component(FeatureName::SemanticSimilarity).unwrap();
        assert_eq!(semantic.score, 0);
        assert_eq!(semantic.reason, "Feature unavailable: model offline");

        let star = result.component(FeatureName::Star).unwrap();
        assert!(star.reason.starts_with("Feature unavailable"));

        // Lexical features are unaffected.
        assert!(result.feature_score(FeatureName::Redundancy) > 0);
        assert!(result.feature_score(FeatureName::Length) > 0);
    }

    #[test]
    fn test_with_weights_rejects_bad_sum() {
        let bad = FeatureWeights {
            star: 0.9,
            ..Default::default()
        };
        assert!(Scorer::default().with_weights(bad).is_err());
    }

    #[test]
    fn test_custom_weights_apply() {
        let semantic_only = FeatureWeights {
            semantic_similarity: 1.0,
            keywords: 0.0,
            star: 0.0,
            length: 0.0,
            redundancy: 0.0,
        };
        let scorer = Scorer::default().with_weights(semantic_only).unwrap();
        let result = scorer.score(ANSWER, "ideal", &[], &Uniform).unwrap();
        assert_eq!(result.final_score, 100);
    }

    #[test]
    fn test_failure_policy_from_str() {
        assert_eq!("isolate".parse::<FailurePolicy>().unwrap(), FailurePolicy::Isolate);
        assert_eq!(" Propagate ".parse::<FailurePolicy>().unwrap(), FailurePolicy::Propagate);
        assert!("ignore".parse::<FailurePolicy>().is_err());
    }
}
