// Normalizer: turns free text into lemma sequences and sentences.
//
// Tokens are runs of Unicode letters and digits (apostrophes kept inside a
// word), so accented words survive intact. Stopwords are the NLTK English
// list plus a few extra function words, matched against the surface token
// so "was" is dropped before it would lemmatize to "be".

use std::collections::HashSet;
use std::path::Path;

use regex_lite::Regex;
use stop_words::{get, LANGUAGE};
use tracing::warn;

use super::lemma::{Lemmatizer, LexiconLemmatizer, PassthroughLemmatizer, RuleLemmatizer};

/// Sentence fragments this short (in characters) are treated as noise.
pub const DEFAULT_MIN_SENTENCE_CHARS: usize = 5;

/// Function words missing from the NLTK list.
const EXTRA_STOP_WORDS: &[&str] = &[
    "also", "could", "would", "might", "must", "may", "shall", "cannot", "us", "however", "yet",
    "though", "although", "whether", "either", "neither", "every", "whose", "upon", "within",
    "without", "across", "among", "since", "unless", "onto", "toward", "towards", "via", "per",
    "thus", "therefore", "hence", "whereas", "whatever", "whenever", "wherever", "already",
    "always", "never", "often", "perhaps", "rather", "quite", "almost", "even", "else", "ever",
    "still", "much", "many", "another", "anyone", "someone", "everyone", "something",
    "anything", "everything", "nothing",
];

/// Abbreviations whose trailing period never ends a sentence.
const ABBREVIATIONS: &[&str] = &[
    "e.g.", "i.e.", "cf.", "vs.", "approx.", "dr.", "mr.", "mrs.", "ms.", "prof.", "st.", "jr.",
    "sr.",
];

pub struct Normalizer {
    stop_words: HashSet<String>,
    lemmatizer: Box<dyn Lemmatizer>,
    boundary_pattern: Regex,
    min_sentence_chars: usize,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(Box::new(RuleLemmatizer))
    }
}

impl Normalizer {
    pub fn new(lemmatizer: Box<dyn Lemmatizer>) -> Self {
        let mut stop_words: HashSet<String> = get(LANGUAGE::English).into_iter().collect();
        stop_words.extend(EXTRA_STOP_WORDS.iter().map(|w| w.to_string()));

        Self {
            stop_words,
            lemmatizer,
            boundary_pattern: Regex::new(r#"[.!?]+["')\]]*(?:\s+|$)"#)
                .expect("valid boundary pattern"),
            min_sentence_chars: DEFAULT_MIN_SENTENCE_CHARS,
        }
    }

    /// Normalizer without lemmatization. Tokens are still lowercased and
    /// filtered for stopwords.
    pub fn passthrough() -> Self {
        Self::new(Box::new(PassthroughLemmatizer))
    }

    /// Build a normalizer backed by a lexicon file.
    ///
    /// The lexicon is optional: if it can't be loaded we log and keep the
    /// built-in rules instead of failing.
    pub fn with_lexicon(path: &Path) -> Self {
        match LexiconLemmatizer::load(path) {
            Ok(lexicon) => Self::new(Box::new(lexicon)),
            Err(e) => {
                warn!(
                    path = %path.display(),
                    "Lemma lexicon unavailable, using built-in rules: {e:#}"
                );
                Self::default()
            }
        }
    }

    pub fn with_min_sentence_chars(mut self, min_chars: usize) -> Self {
        self.min_sentence_chars = min_chars;
        self
    }

    /// Name of the active lemmatizer, for diagnostics.
    pub fn lemmatizer_name(&self) -> &'static str {
        self.lemmatizer.name()
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    /// Lowercased word tokens with punctuation removed. Stopwords are kept.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase().replace('\u{2019}', "'");
        lower
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .map(|word| word.trim_matches('\''))
            .filter(|word| !word.is_empty())
            .map(|word| word.strip_suffix("'s").unwrap_or(word).to_string())
            .collect()
    }

    /// Lemmas of the non-stopword tokens, in text order.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        self.tokens(text)
            .into_iter()
            .filter(|token| !self.is_stop_word(token))
            .map(|token| self.lemmatizer.lemma(&token))
            .filter(|lemma| !lemma.is_empty())
            .collect()
    }

    /// Split text into trimmed sentences, dropping fragments of
    /// `min_sentence_chars` characters or fewer.
    ///
    /// A terminator only ends a sentence when whitespace (or the end of the
    /// text) follows it. A terminator followed by a lowercase word, or a
    /// period closing a known abbreviation, does not.
    pub fn split_sentences(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut start = 0;
        for m in self.boundary_pattern.find_iter(text) {
            let head = text[start..m.end()].trim_end();
            if ends_sentence(head, &text[m.end()..]) {
                self.push_sentence(&mut sentences, head);
                start = m.end();
            }
        }
        self.push_sentence(&mut sentences, &text[start..]);
        sentences
    }

    fn push_sentence(&self, sentences: &mut Vec<String>, candidate: &str) {
        let sentence = candidate.trim();
        if sentence.chars().count() > self.min_sentence_chars {
            sentences.push(sentence.to_string());
        }
    }
}

fn ends_sentence(head: &str, rest: &str) -> bool {
    let Some(next) = rest.chars().next() else {
        return true;
    };
    if next.is_lowercase() {
        return false;
    }
    let last_word = head
        .trim_end_matches(['"', '\'', ')', ']'])
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or_default()
        .trim_start_matches(['"', '\'', '(', '['])
        .to_lowercase();
    !ABBREVIATIONS.contains(&last_word.as_str())
}
