// Feature weights for the final score.
//
// Semantic similarity and structure dominate; keyword coverage is kept low
// so that keyword stuffing can't carry an answer on its own.

use std::collections::BTreeMap;

use anyhow::Result;

use super::result::{round_score, FeatureName, ScoreComponent};
use crate::error::ScoringError;

/// Weight sums within this distance of 1.0 are accepted.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureWeights {
    pub semantic_similarity: f64,
    pub keywords: f64,
    pub star: f64,
    pub length: f64,
    pub redundancy: f64,
}

impl Default for FeatureWeights {
    fn default() -> Self {
        Self {
            semantic_similarity: 0.45,
            keywords: 0.15,
            star: 0.25,
            length: 0.10,
            redundancy: 0.05,
        }
    }
}

impl FeatureWeights {
    pub fn weight(&self, feature: FeatureName) -> f64 {
        match feature {
            FeatureName::SemanticSimilarity => self.semantic_similarity,
            FeatureName::Keywords => self.keywords,
            FeatureName::Star => self.star,
            FeatureName::Length => self.length,
            FeatureName::Redundancy => self.redundancy,
        }
    }

    pub fn sum(&self) -> f64 {
        FeatureName::ALL.iter().map(|&f| self.weight(f)).sum()
    }

    /// Weights must be non-negative and sum to 1.0.
    pub fn validate(&self) -> Result<()> {
        let sum = self.sum();
        let negative = FeatureName::ALL.iter().any(|&f| self.weight(f) < 0.0);
        if negative || (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ScoringError::InvalidWeights { sum }.into());
        }
        Ok(())
    }

    /// `round(sum(weight_f * score_f))` over the given components.
    /// Missing features contribute 0.
    pub fn combine(&self, components: &BTreeMap<FeatureName, ScoreComponent>) -> u8 {
        let total: f64 = components
            .iter()
            .map(|(&feature, c)| self.weight(feature) * c.score as f64)
            .sum();
        round_score(total)
    }
}
