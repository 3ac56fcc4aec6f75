use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::scoring::{FailurePolicy, LengthBounds, Scorer, Thresholds};
use crate::text::Normalizer;

pub const DEFAULT_QUESTIONS_PATH: &str = "./data/questions.json";

/// Which embedding backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedderBackend {
    /// Local ONNX sentence-transformer (default). Needs the model files.
    Onnx,
    /// Deterministic bag-of-lemmas hashing. No model, lexical only.
    Hashing,
}

impl FromStr for EmbedderBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "onnx" => Ok(EmbedderBackend::Onnx),
            "hashing" => Ok(EmbedderBackend::Hashing),
            other => anyhow::bail!("Unknown embedder '{other}' (expected 'onnx' or 'hashing')"),
        }
    }
}

/// Which lemmatizer the normalizer should use when no lexicon is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LemmatizerKind {
    Rules,
    None,
}

impl FromStr for LemmatizerKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rules" => Ok(LemmatizerKind::Rules),
            "none" => Ok(LemmatizerKind::None),
            other => anyhow::bail!("Unknown lemmatizer '{other}' (expected 'rules' or 'none')"),
        }
    }
}

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Every
/// setting has a default, so an empty environment is valid.
#[derive(Debug, Clone)]
pub struct Config {
    pub embedder: EmbedderBackend,
    /// Base directory for downloaded models
    pub model_dir: PathBuf,
    pub questions_path: PathBuf,
    /// Optional `form<TAB>lemma` lexicon; takes precedence over `lemmatizer`
    pub lexicon_path: Option<PathBuf>,
    pub lemmatizer: LemmatizerKind,
    pub failure_policy: FailurePolicy,
    pub length: LengthBounds,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let embedder = match get("RUBRIC_EMBEDDER") {
            Some(v) => v.parse().context("Invalid RUBRIC_EMBEDDER")?,
            None => EmbedderBackend::Onnx,
        };

        let lemmatizer = match get("RUBRIC_LEMMATIZER") {
            Some(v) => v.parse().context("Invalid RUBRIC_LEMMATIZER")?,
            None => LemmatizerKind::Rules,
        };

        let failure_policy = match get("RUBRIC_FAILURE_POLICY") {
            Some(v) => v.parse().context("Invalid RUBRIC_FAILURE_POLICY")?,
            None => FailurePolicy::default(),
        };

        let defaults = LengthBounds::default();
        let length = LengthBounds {
            min_words: parse_count(
                get("RUBRIC_MIN_WORDS"),
                "RUBRIC_MIN_WORDS",
                defaults.min_words,
            )?,
            max_words: parse_count(
                get("RUBRIC_MAX_WORDS"),
                "RUBRIC_MAX_WORDS",
                defaults.max_words,
            )?,
        };
        if length.min_words > length.max_words {
            anyhow::bail!(
                "RUBRIC_MIN_WORDS ({}) is greater than RUBRIC_MAX_WORDS ({})",
                length.min_words,
                length.max_words
            );
        }

        Ok(Self {
            embedder,
            model_dir: get("RUBRIC_MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(crate::embedding::download::default_model_dir),
            questions_path: get("RUBRIC_QUESTIONS")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_QUESTIONS_PATH)),
            lexicon_path: get("RUBRIC_LEXICON").map(PathBuf::from),
            lemmatizer,
            failure_policy,
            length,
        })
    }

    /// Validate that the chosen embedder has what it needs.
    /// For ONNX the model files must exist (or the user should run download-model).
    pub fn require_embedder(&self) -> Result<()> {
        match self.embedder {
            EmbedderBackend::Onnx => {
                if !crate::embedding::download::embedding_files_present(&self.model_dir) {
                    anyhow::bail!(
                        "Embedding model files not found in {}\n\
                         Run `rubric download-model` to download them.\n\
                         Or set RUBRIC_EMBEDDER=hashing to score without a model.",
                        crate::embedding::download::embedding_model_dir(&self.model_dir).display()
                    );
                }
                Ok(())
            }
            EmbedderBackend::Hashing => Ok(()),
        }
    }

    /// Check that the question bank exists.
    pub fn require_questions(&self) -> Result<()> {
        if !self.questions_path.exists() {
            anyhow::bail!(
                "Question bank not found at {}\n\
                 Set RUBRIC_QUESTIONS to the path of a questions JSON file.",
                self.questions_path.display()
            );
        }
        Ok(())
    }

    /// Build the normalizer: lexicon if configured, else the chosen lemmatizer.
    pub fn normalizer(&self) -> Normalizer {
        match (&self.lexicon_path, self.lemmatizer) {
            (Some(path), _) => Normalizer::with_lexicon(path),
            (None, LemmatizerKind::Rules) => Normalizer::default(),
            (None, LemmatizerKind::None) => Normalizer::passthrough(),
        }
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            length: self.length,
            ..Thresholds::default()
        }
    }

    /// A scorer with this configuration's normalizer, thresholds and policy.
    pub fn scorer(&self) -> Scorer {
        Scorer::default()
            .with_thresholds(self.thresholds())
            .with_normalizer(self.normalizer())
            .with_policy(self.failure_policy)
    }
}

fn parse_count(value: Option<String>, name: &str, default: usize) -> Result<usize> {
    match value {
        Some(v) => v
            .trim()
            .parse()
            .with_context(|| format!("{name} must be a non-negative integer, got '{v}'")),
        None => Ok(default),
    }
}
