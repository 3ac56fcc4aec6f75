// Text normalization: tokenizing, lemmatizing and sentence splitting.
//
// The lemmatizer is a soft dependency: a missing lexicon degrades output
// quality but never fails the scoring pipeline.

pub mod lemma;
pub mod normalizer;

pub use lemma::{Lemmatizer, LexiconLemmatizer, PassthroughLemmatizer, RuleLemmatizer};
pub use normalizer::Normalizer;
