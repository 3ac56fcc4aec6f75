use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde_json::json;
use tracing::{info, warn};

use rubric::config::{Config, EmbedderBackend};
use rubric::embedding::download::embedding_model_dir;
use rubric::embedding::{
    CachedEmbedder, EmbeddingProvider, HashingEmbedder, SentenceEmbedder, EMBEDDING_DIM,
};
use rubric::questions::{find_question, load_answers, load_questions};

/// Rubric: score interview answers against an ideal answer.
///
/// Combines semantic similarity, keyword coverage, STAR structure, length
/// and vocabulary diversity into a single 0-100 score with reasons.
#[derive(Parser)]
#[command(name = "rubric", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one answer
    Score {
        /// Question id from the question bank
        #[arg(long, conflicts_with_all = ["ideal", "keywords"])]
        question: Option<u32>,

        /// Ideal answer text (instead of --question)
        #[arg(long)]
        ideal: Option<String>,

        /// Expected keyword; repeat for several
        #[arg(long = "keyword")]
        keywords: Vec<String>,

        /// Read the answer from a file
        #[arg(long, conflicts_with = "answer")]
        answer_file: Option<PathBuf>,

        /// The answer text (read from stdin when omitted)
        answer: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Score a JSON array of {"question": id, "answer": text} records
    Batch {
        file: PathBuf,

        /// Print the results as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the question bank
    Questions,

    /// Download the ONNX sentence embedding model (~90 MB)
    DownloadModel,

    /// Show environment status (model files, embedder, lexicon, questions)
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("rubric=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Score {
            question,
            ideal,
            keywords,
            answer_file,
            answer,
            json,
        } => {
            let config = Config::load()?;

            let (ideal_text, keywords) = match (question, ideal) {
                (Some(id), _) => {
                    config.require_questions()?;
                    let questions = load_questions(&config.questions_path)?;
                    let q = find_question(&questions, id).with_context(|| {
                        format!("No question with id {id}. Run `rubric questions` to list them.")
                    })?;
                    if !json {
                        println!("{} {}", "Question:".bold(), q.question_text);
                    }
                    (q.ideal_answer.clone(), q.keywords.clone())
                }
                (None, Some(ideal)) => (ideal, keywords),
                (None, None) => anyhow::bail!("Pass either --question ID or --ideal TEXT"),
            };

            let answer = read_answer(answer, answer_file)?;
            if answer.trim().is_empty() {
                warn!("Answer is empty");
            }

            let embedder = create_embedder(&config)?;
            let scorer = config.scorer();
            let result = scorer.score(&answer, &ideal_text, &keywords, embedder.as_ref())?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                rubric::output::terminal::display_score_result(&result, scorer.weights());
            }
        }

        Commands::Batch { file, json } => {
            let config = Config::load()?;
            config.require_questions()?;
            let questions = load_questions(&config.questions_path)?;
            let records = load_answers(&file)?;

            // Ideal answers and STAR anchors repeat across records.
            let embedder = CachedEmbedder::new(create_embedder(&config)?);
            let scorer = config.scorer();

            info!("Scoring {} answers", records.len());

            let mut output = Vec::with_capacity(records.len());
            for (i, record) in records.iter().enumerate() {
                let q = find_question(&questions, record.question).with_context(|| {
                    format!("Record {i}: no question with id {}", record.question)
                })?;
                let result = scorer.score(&record.answer, &q.ideal_answer, &q.keywords, &embedder)?;

                if json {
                    output.push(json!({
                        "question": record.question,
                        "final_score": result.final_score,
                        "explanation": result.explanation,
                    }));
                } else {
                    println!(
                        "\n{} {}",
                        format!("[{}]", record.question).cyan(),
                        rubric::output::truncate_chars(&q.question_text, 80)
                    );
                    rubric::output::terminal::display_score_result(&result, scorer.weights());
                }
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!(
                    "Scored {} answers ({} distinct texts embedded)",
                    records.len(),
                    embedder.len()
                );
            }
        }

        Commands::Questions => {
            let config = Config::load()?;
            config.require_questions()?;
            let questions = load_questions(&config.questions_path)?;
            rubric::output::terminal::display_questions(&questions);
        }

        Commands::DownloadModel => {
            let config = Config::load()?;
            let model_dir = &config.model_dir;

            println!("Downloading embedding model...");
            println!("  Destination: {}", model_dir.display());

            rubric::embedding::download::download_model(model_dir).await?;

            println!("\n{}", "Model downloaded successfully.".bold());
            println!("You can now run `rubric score --question 0 \"your answer\"`.");
        }

        Commands::Status => {
            let config = Config::load()?;
            rubric::status::show(&config)?;
        }
    }

    Ok(())
}

/// Answer text from the positional argument, a file, or stdin.
fn read_answer(answer: Option<String>, answer_file: Option<PathBuf>) -> Result<String> {
    if let Some(text) = answer {
        return Ok(text);
    }
    if let Some(path) = answer_file {
        return std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read answer file {}", path.display()));
    }
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read answer from stdin")?;
    Ok(text)
}

/// Create the embedding provider for the configured backend.
fn create_embedder(config: &Config) -> Result<Box<dyn EmbeddingProvider>> {
    match config.embedder {
        EmbedderBackend::Onnx => {
            config.require_embedder()?;
            info!("Using local ONNX sentence embedder");
            let embedder = SentenceEmbedder::load(&embedding_model_dir(&config.model_dir))?;
            Ok(Box::new(embedder))
        }
        EmbedderBackend::Hashing => {
            info!("Using hashing embedder (no model, lexical similarity only)");
            Ok(Box::new(HashingEmbedder::new(config.normalizer(), EMBEDDING_DIM)))
        }
    }
}
