// Score types shared by the feature extractors and the aggregator.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The five scored features. Serialized names match the JSON output
/// consumers expect (`semantic_similarity`, `keywords`, `STAR`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FeatureName {
    #[serde(rename = "semantic_similarity")]
    SemanticSimilarity,
    #[serde(rename = "keywords")]
    Keywords,
    #[serde(rename = "STAR")]
    Star,
    #[serde(rename = "length")]
    Length,
    #[serde(rename = "redundancy")]
    Redundancy,
}

impl FeatureName {
    pub const ALL: [FeatureName; 5] = [
        FeatureName::SemanticSimilarity,
        FeatureName::Keywords,
        FeatureName::Star,
        FeatureName::Length,
        FeatureName::Redundancy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureName::SemanticSimilarity => "semantic_similarity",
            FeatureName::Keywords => "keywords",
            FeatureName::Star => "STAR",
            FeatureName::Length => "length",
            FeatureName::Redundancy => "redundancy",
        }
    }
}

impl fmt::Display for FeatureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of one feature extractor: a 0-100 score and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub score: u8,
    pub reason: String,
}

impl ScoreComponent {
    /// Build a component from an integer score, clamped to 100.
    pub fn new(score: u8, reason: impl Into<String>) -> Self {
        Self {
            score: score.min(100),
            reason: reason.into(),
        }
    }

    /// Build a component from a raw 0.0-1.0 value (`score = round(raw * 100)`).
    pub fn from_ratio(raw: f64, reason: impl Into<String>) -> Self {
        Self::new(round_score(raw * 100.0), reason)
    }
}

/// Final score plus the per-feature breakdown. All five features are
/// always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub final_score: u8,
    pub explanation: BTreeMap<FeatureName, ScoreComponent>,
}

impl ScoreResult {
    pub fn component(&self, feature: FeatureName) -> Option<&ScoreComponent> {
        self.explanation.get(&feature)
    }

    /// Score of one feature, 0 if somehow absent.
    pub fn feature_score(&self, feature: FeatureName) -> u8 {
        self.component(feature).map(|c| c.score).unwrap_or(0)
    }
}

/// Round to the nearest integer in [0, 100], ties to even.
///
/// NaN maps to 0.
pub fn round_score(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 100.0).round_ties_even() as u8
}
