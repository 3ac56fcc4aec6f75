// STAR structure detection (Situation, Task, Action, Result).
//
// With an embedding provider, each component is detected when some answer
// sentence is close enough to one of the component's anchor phrases. Without
// one, anchors are searched as plain substrings.

use std::fmt;

use anyhow::Result;
use tracing::debug;

use crate::embedding::traits::max_similarity;
use crate::embedding::{Embedding, EmbeddingProvider};
use crate::scoring::{ScoreComponent, Thresholds};
use crate::text::Normalizer;

pub const NO_TEXT_REASON: &str = "No text provided";
pub const NO_STRUCTURE_REASON: &str = "No clear STAR structure detected";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarComponent {
    Situation,
    Task,
    Action,
    Result,
}

impl StarComponent {
    pub fn as_str(&self) -> &'static str {
        match self {
            StarComponent::Situation => "Situation",
            StarComponent::Task => "Task",
            StarComponent::Action => "Action",
            StarComponent::Result => "Result",
        }
    }

    /// Exemplar phrases for this component.
    pub fn anchors(&self) -> &'static [&'static str] {
        match self {
            StarComponent::Situation => &[
                "situation",
                "context",
                "background",
                "when I was",
                "the problem was",
                "faced a challenge",
                "time constraint",
                "deadline",
                "given a task",
                "assigned to",
                "working on",
                "during",
                "at the time",
            ],
            StarComponent::Task => &[
                "task",
                "goal",
                "objective",
                "needed to",
                "required to",
                "had to",
                "my responsibility",
                "deliver",
                "ensure",
                "achieve",
            ],
            StarComponent::Action => &[
                "action",
                "I did",
                "I implemented",
                "I started",
                "steps I took",
                "decided to",
                "I broke",
                "I prioritized",
                "I coordinated",
                "I created",
                "I analyzed",
                "I worked",
                "I collaborated",
                "I developed",
            ],
            StarComponent::Result => &[
                "result",
                "outcome",
                "consequence",
                "achieved",
                "learned",
                "improved",
                "revenue",
                "delivered",
                "completed",
                "success",
                "impact",
                "on time",
            ],
        }
    }
}

impl fmt::Display for StarComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const STAR_COMPONENTS: [StarComponent; 4] = [
    StarComponent::Situation,
    StarComponent::Task,
    StarComponent::Action,
    StarComponent::Result,
];

pub fn star_structure_score(
    user_text: &str,
    normalizer: &Normalizer,
    provider: Option<&dyn EmbeddingProvider>,
    thresholds: &Thresholds,
) -> Result<ScoreComponent> {
    let sentences = normalizer.split_sentences(user_text);
    if sentences.is_empty() {
        return Ok(ScoreComponent::new(0, NO_TEXT_REASON));
    }

    let detected = match provider {
        Some(provider) => {
            detect_semantic(&sentences, provider, thresholds.star_similarity_threshold)?
        }
        None => detect_lexical(user_text),
    };

    let reason = if detected.is_empty() {
        NO_STRUCTURE_REASON.to_string()
    } else {
        let names: Vec<&str> = detected.iter().map(|c| c.as_str()).collect();
        format!("STAR structure found: {}", names.join(", "))
    };

    Ok(ScoreComponent::from_ratio(
        detected.len() as f64 / STAR_COMPONENTS.len() as f64,
        reason,
    ))
}

/// Encode the sentences and every anchor phrase in one batch, then check
/// each component's sentence x anchor similarity matrix against the
/// threshold.
fn detect_semantic(
    sentences: &[String],
    provider: &dyn EmbeddingProvider,
    threshold: f64,
) -> Result<Vec<StarComponent>> {
    let mut batch: Vec<String> = sentences.to_vec();
    for component in STAR_COMPONENTS {
        batch.extend(component.anchors().iter().map(|a| a.to_string()));
    }

    let embeddings = provider.encode(&batch)?;
    if embeddings.len() != batch.len() {
        anyhow::bail!(
            "Embedding provider returned {} vectors for {} texts",
            embeddings.len(),
            batch.len()
        );
    }

    let (sentence_embeddings, mut rest) = embeddings.split_at(sentences.len());
    let mut detected = Vec::new();

    for component in STAR_COMPONENTS {
        let (anchor_embeddings, tail) = rest.split_at(component.anchors().len());
        rest = tail;

        let best = matrix_max(provider, sentence_embeddings, anchor_embeddings);
        debug!(component = component.as_str(), similarity = best, "STAR anchor check");
        if best > threshold {
            detected.push(component);
        }
    }

    Ok(detected)
}

fn matrix_max(
    provider: &dyn EmbeddingProvider,
    rows: &[Embedding],
    cols: &[Embedding],
) -> f64 {
    rows.iter()
        .filter_map(|row| max_similarity(provider, row, cols))
        .fold(f64::NEG_INFINITY, f64::max)
}

fn detect_lexical(user_text: &str) -> Vec<StarComponent> {
    let lower = user_text.to_lowercase();
    STAR_COMPONENTS
        .into_iter()
        .filter(|component| {
            component
                .anchors()
                .iter()
                .any(|anchor| lower.contains(&anchor.to_lowercase()))
        })
        .collect()
}
