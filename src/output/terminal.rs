// Colored terminal output for score results and the question bank.
//
// main.rs display calls delegate here. JSON output bypasses this module.

use colored::Colorize;

use crate::questions::{effective_id, Question};
use crate::scoring::{FeatureName, FeatureWeights, ScoreResult};

/// Display one scored answer with its per-feature breakdown.
pub fn display_score_result(result: &ScoreResult, weights: &FeatureWeights) {
    println!(
        "\n{} {}",
        "=== Answer Score:".bold(),
        format!("{}/100 ===", result.final_score).bold()
    );
    println!("  Grade: {}", colorize_grade(result.final_score));
    println!();

    println!(
        "  {:<20} {:>5}  {:>6}  {}",
        "Feature".dimmed(),
        "Score".dimmed(),
        "Weight".dimmed(),
        "Reason".dimmed(),
    );
    println!("  {}", "-".repeat(78).dimmed());

    for feature in FeatureName::ALL {
        let Some(component) = result.component(feature) else {
            continue;
        };
        let score = format!("{:>5}", component.score);
        println!(
            "  {:<20} {}  {:>6.2}  {}",
            feature.as_str(),
            colorize_score(component.score, &score),
            weights.weight(feature),
            super::truncate_chars(&component.reason, 60),
        );
    }
    println!();
}

/// Display the question bank with ids and keyword lists.
pub fn display_questions(questions: &[Question]) {
    if questions.is_empty() {
        println!("No questions in the question bank.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Question Bank ({} questions) ===", questions.len()).bold()
    );
    println!();

    for (index, question) in questions.iter().enumerate() {
        println!(
            "  [{}] {}",
            effective_id(question, index).to_string().cyan(),
            super::truncate_chars(&question.question_text, 100)
        );
        if !question.keywords.is_empty() {
            println!("      keywords: {}", question.keywords.join(", ").dimmed());
        }
    }
    println!();
}

/// Letter-ish label for a final score.
pub fn grade_label(score: u8) -> &'static str {
    match score {
        80..=100 => "Strong",
        60..=79 => "Solid",
        40..=59 => "Developing",
        _ => "Weak",
    }
}

fn colorize_grade(score: u8) -> colored::ColoredString {
    let label = grade_label(score);
    match score {
        80..=100 => label.green().bold(),
        60..=79 => label.green(),
        40..=59 => label.yellow(),
        _ => label.red(),
    }
}

fn colorize_score(score: u8, text: &str) -> colored::ColoredString {
    match score {
        80..=100 => text.green(),
        50..=79 => text.yellow(),
        _ => text.red(),
    }
}
