// Tuning constants for the feature extractors.
//
// The keyword and STAR similarity thresholds differ (0.30 vs 0.28) and are
// kept separate on purpose: they were tuned independently.

use crate::text::normalizer::DEFAULT_MIN_SENTENCE_CHARS;

/// Max keyword/sentence similarity must exceed this for a semantic match.
pub const KEYWORD_SEMANTIC_THRESHOLD: f64 = 0.30;

/// Partial credit for a semantic keyword match (exact matches get 1.0).
pub const KEYWORD_SEMANTIC_CREDIT: f64 = 0.9;

/// Max sentence/anchor similarity must exceed this to detect a STAR component.
pub const STAR_SIMILARITY_THRESHOLD: f64 = 0.28;

/// Unique/total lemma ratios below this count as repetitive.
pub const DIVERSITY_CUTOFF: f64 = 0.35;

pub const DEFAULT_MIN_WORDS: usize = 40;
pub const DEFAULT_MAX_WORDS: usize = 400;

/// Word-count bounds for the length feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthBounds {
    pub min_words: usize,
    pub max_words: usize,
}

impl Default for LengthBounds {
    fn default() -> Self {
        Self {
            min_words: DEFAULT_MIN_WORDS,
            max_words: DEFAULT_MAX_WORDS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Thresholds {
    pub keyword_semantic_threshold: f64,
    pub keyword_semantic_credit: f64,
    pub star_similarity_threshold: f64,
    pub diversity_cutoff: f64,
    pub min_sentence_chars: usize,
    pub length: LengthBounds,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            keyword_semantic_threshold: KEYWORD_SEMANTIC_THRESHOLD,
            keyword_semantic_credit: KEYWORD_SEMANTIC_CREDIT,
            star_similarity_threshold: STAR_SIMILARITY_THRESHOLD,
            diversity_cutoff: DIVERSITY_CUTOFF,
            min_sentence_chars: DEFAULT_MIN_SENTENCE_CHARS,
            length: LengthBounds::default(),
        }
    }
}
