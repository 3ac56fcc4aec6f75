// Environment diagnostics: model files, embedder backend, lexicon and
// question bank.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use crate::config::{Config, EmbedderBackend};
use crate::embedding::download::{embedding_files_present, embedding_model_dir};
use crate::questions::load_questions;

/// Display environment status to the terminal.
pub fn show(config: &Config) -> Result<()> {
    let backend = match config.embedder {
        EmbedderBackend::Onnx => "onnx",
        EmbedderBackend::Hashing => "hashing (lexical only)",
    };
    println!("Embedder: {backend}");

    let embed_dir = embedding_model_dir(&config.model_dir);
    if embedding_files_present(&config.model_dir) {
        let size = dir_size(&embed_dir)
            .map(format_bytes)
            .unwrap_or_else(|| "unknown".to_string());
        println!("Model: {} ({})", embed_dir.display(), size);
    } else {
        println!("Model: {}", "not downloaded".yellow());
        println!("  Run `rubric download-model` to fetch it");
    }

    let normalizer = config.normalizer();
    match &config.lexicon_path {
        Some(path) => println!(
            "Lemmatizer: {} ({})",
            normalizer.lemmatizer_name(),
            path.display()
        ),
        None => println!("Lemmatizer: {}", normalizer.lemmatizer_name()),
    }

    println!(
        "Failure policy: {:?}  |  Length bounds: {}-{} words",
        config.failure_policy, config.length.min_words, config.length.max_words
    );

    match load_questions(&config.questions_path) {
        Ok(questions) => println!(
            "Question bank: {} questions ({})",
            questions.len(),
            config.questions_path.display()
        ),
        Err(e) => {
            println!("Question bank: {}", "unavailable".red());
            println!("  {e:#}");
        }
    }

    if let Err(e) = config.require_embedder() {
        println!("\n{}", "Scoring is not ready:".red().bold());
        println!("{e}");
    }

    Ok(())
}

fn dir_size(dir: &Path) -> Option<u64> {
    let entries = std::fs::read_dir(dir).ok()?;
    let total = entries
        .filter_map(|e| e.ok())
        .filter_map(|e| e.metadata().ok())
        .filter(|m| m.is_file())
        .map(|m| m.len())
        .sum();
    Some(total)
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
