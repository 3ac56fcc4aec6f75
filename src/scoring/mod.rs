// Scoring: per-feature components, weights, thresholds and the aggregator
// that combines them into a final 0-100 score.

pub mod aggregate;
pub mod result;
pub mod thresholds;
pub mod weights;

pub use aggregate::{final_scoring, FailurePolicy, Scorer};
pub use result::{round_score, FeatureName, ScoreComponent, ScoreResult};
pub use thresholds::{LengthBounds, Thresholds};
pub use weights::FeatureWeights;
