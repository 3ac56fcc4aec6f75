// Typed errors for the cases a caller may want to match on.
//
// Everything else flows through anyhow with context strings. These variants
// are raised via `anyhow::Error::from` so callers can `downcast_ref` them.

use thiserror::Error;

use crate::scoring::FeatureName;

#[derive(Debug, Error)]
pub enum ScoringError {
    /// A hard dependency (embedding model, tokenizer) could not be loaded.
    #[error("{resource} unavailable: {detail}")]
    ResourceUnavailable { resource: String, detail: String },

    /// Feature weights must sum to 1.0.
    #[error("feature weights must sum to 1.0, got {sum:.4}")]
    InvalidWeights { sum: f64 },

    /// An extractor failed and the failure policy is to propagate.
    #[error("{feature} feature failed")]
    Feature {
        feature: FeatureName,
        #[source]
        source: anyhow::Error,
    },
}

impl ScoringError {
    pub fn resource_unavailable(resource: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::ResourceUnavailable {
            resource: resource.into(),
            detail: detail.into(),
        }
    }
}
