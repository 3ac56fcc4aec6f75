// Lemmatizers: map a lowercased surface token to its dictionary form.
//
// The rule lemmatizer is the built-in linguistic resource: an irregular-form
// table plus English suffix rules. It is not a full morphological analyzer,
// but it covers the inflections that matter for keyword matching
// ("prioritized" -> "prioritize", "milestones" -> "milestone").
//
// A lexicon file (one `form<TAB>lemma` pair per line) can layer exact
// lookups on top of the rules.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

/// Trait for lemmatizing a single lowercased token.
pub trait Lemmatizer: Send + Sync {
    /// Return the lemma for `token`. Tokens are already lowercased.
    fn lemma(&self, token: &str) -> String;

    /// Short name for diagnostics.
    fn name(&self) -> &'static str;
}

/// No lemmatization at all. Used when lemmatization is disabled.
pub struct PassthroughLemmatizer;

impl Lemmatizer for PassthroughLemmatizer {
    fn lemma(&self, token: &str) -> String {
        token.to_string()
    }

    fn name(&self) -> &'static str {
        "passthrough"
    }
}

/// Built-in suffix-rule lemmatizer with an irregular-form table.
#[derive(Debug, Default)]
pub struct RuleLemmatizer;

impl Lemmatizer for RuleLemmatizer {
    fn lemma(&self, token: &str) -> String {
        apply_rules(token)
    }

    fn name(&self) -> &'static str {
        "rules"
    }
}

/// Exact-match lexicon loaded from disk, falling back to the rules for
/// forms the lexicon doesn't list.
#[derive(Debug)]
pub struct LexiconLemmatizer {
    entries: HashMap<String, String>,
    fallback: RuleLemmatizer,
}

impl LexiconLemmatizer {
    /// Load a tab-separated `form<TAB>lemma` file.
    ///
    /// Blank lines and lines starting with `#` are skipped. A line without
    /// a tab is an error (the file is probably not a lexicon).
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read lexicon {}", path.display()))?;

        let mut entries = HashMap::new();
        for (line_no, line) in raw.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (form, lemma) = line.split_once('\t').with_context(|| {
                format!(
                    "Malformed lexicon line {} in {}: expected form<TAB>lemma",
                    line_no + 1,
                    path.display()
                )
            })?;
            entries.insert(form.trim().to_lowercase(), lemma.trim().to_lowercase());
        }

        debug!(entries = entries.len(), path = %path.display(), "Loaded lemma lexicon");
        Ok(Self::from_entries(entries))
    }

    pub fn from_entries(entries: HashMap<String, String>) -> Self {
        Self {
            entries,
            fallback: RuleLemmatizer,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Lemmatizer for LexiconLemmatizer {
    fn lemma(&self, token: &str) -> String {
        match self.entries.get(token) {
            Some(lemma) => lemma.clone(),
            None => self.fallback.lemma(token),
        }
    }

    fn name(&self) -> &'static str {
        "lexicon"
    }
}

const IRREGULAR: &[(&str, &str)] = &[
    ("am", "be"),
    ("is", "be"),
    ("are", "be"),
    ("was", "be"),
    ("were", "be"),
    ("been", "be"),
    ("did", "do"),
    ("does", "do"),
    ("done", "do"),
    ("had", "have"),
    ("has", "have"),
    ("went", "go"),
    ("goes", "go"),
    ("gone", "go"),
    ("made", "make"),
    ("took", "take"),
    ("taken", "take"),
    ("taking", "take"),
    ("spoke", "speak"),
    ("spoken", "speak"),
    ("led", "lead"),
    ("ran", "run"),
    ("built", "build"),
    ("broke", "break"),
    ("broken", "break"),
    ("began", "begin"),
    ("begun", "begin"),
    ("brought", "bring"),
    ("bought", "buy"),
    ("thought", "think"),
    ("taught", "teach"),
    ("caught", "catch"),
    ("sought", "seek"),
    ("found", "find"),
    ("gave", "give"),
    ("given", "give"),
    ("got", "get"),
    ("gotten", "get"),
    ("kept", "keep"),
    ("left", "leave"),
    ("met", "meet"),
    ("paid", "pay"),
    ("said", "say"),
    ("saw", "see"),
    ("seen", "see"),
    ("sent", "send"),
    ("spent", "spend"),
    ("stood", "stand"),
    ("told", "tell"),
    ("understood", "understand"),
    ("won", "win"),
    ("wrote", "write"),
    ("written", "write"),
    ("chose", "choose"),
    ("chosen", "choose"),
    ("knew", "know"),
    ("known", "know"),
    ("felt", "feel"),
    ("held", "hold"),
    ("drove", "drive"),
    ("driven", "drive"),
    ("grew", "grow"),
    ("grown", "grow"),
    ("lost", "lose"),
    ("heard", "hear"),
    ("meant", "mean"),
    ("people", "person"),
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("better", "good"),
    ("best", "good"),
    ("worse", "bad"),
    ("worst", "bad"),
];

/// Words that look inflected but aren't.
const KEEP: &[&str] = &[
    "during",
    "morning",
    "evening",
    "nothing",
    "something",
    "anything",
    "everything",
    "ceiling",
    "hundred",
    "series",
    "species",
    "news",
];

/// Stem endings that lost a silent `e` when the suffix was added
/// ("prioritiz" -> "prioritize", "coordinat" -> "coordinate").
const E_RESTORE: &[&str] = &[
    "iz", "ys", "iv", "ov", "ev", "lv", "rv", "ag", "ac", "uc", "nc", "rc", "rg", "dg", "bl", "um",
    "as", "vid", "cid", "ibut", "mput",
];

/// Endings that only take a restored `e` after a consonant
/// ("coordinat" -> "coordinate" but "treat" stays).
const E_RESTORE_AFTER_CONSONANT: &[&str] = &["at", "ak"];

fn apply_rules(word: &str) -> String {
    if let Some(&(_, lemma)) = IRREGULAR.iter().find(|(form, _)| *form == word) {
        return lemma.to_string();
    }
    if word.len() <= 3 || !word.is_ascii() || KEEP.contains(&word) {
        return word.to_string();
    }

    if let Some(stem) = word.strip_suffix("ies") {
        if stem.len() >= 2 {
            return format!("{stem}y");
        }
    }
    if let Some(stem) = word.strip_suffix("ied") {
        if stem.len() >= 2 {
            return format!("{stem}y");
        }
    }
    if word.ends_with("eed") {
        return word.to_string();
    }
    if let Some(stem) = word.strip_suffix("ing") {
        return strip_verbal_suffix(word, stem);
    }
    if let Some(stem) = word.strip_suffix("ed") {
        return strip_verbal_suffix(word, stem);
    }
    if let Some(stem) = word.strip_suffix("es") {
        if ["ss", "sh", "ch", "x"].iter().any(|end| stem.ends_with(end)) {
            return stem.to_string();
        }
    }
    if word.ends_with('s') && !["ss", "us", "is"].iter().any(|end| word.ends_with(end)) {
        return word[..word.len() - 1].to_string();
    }

    word.to_string()
}

fn strip_verbal_suffix(word: &str, stem: &str) -> String {
    if stem.len() < 3 || !stem.bytes().any(is_vowel) {
        return word.to_string();
    }
    restore_stem(stem)
}

fn restore_stem(stem: &str) -> String {
    let bytes = stem.as_bytes();
    let n = bytes.len();

    // planned -> plan, but called -> call, passed -> pass
    if bytes[n - 1] == bytes[n - 2]
        && !is_vowel(bytes[n - 1])
        && !matches!(bytes[n - 1], b'l' | b's' | b'z')
    {
        return stem[..n - 1].to_string();
    }

    if E_RESTORE.iter().any(|end| stem.ends_with(end)) {
        return format!("{stem}e");
    }
    if n >= 3
        && !is_vowel(bytes[n - 3])
        && E_RESTORE_AFTER_CONSONANT
            .iter()
            .any(|end| stem.ends_with(end))
    {
        return format!("{stem}e");
    }

    stem.to_string()
}

fn is_vowel(b: u8) -> bool {
    matches!(b, b'a' | b'e' | b'i' | b'o' | b'u')
}
