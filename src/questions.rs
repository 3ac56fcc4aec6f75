// Question bank: interview questions with their ideal answers and keywords.
//
// Loaded once from a JSON array and treated as read-only afterwards.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Explicit id; questions without one are addressed by position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(alias = "question")]
    pub question_text: String,
    pub ideal_answer: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// One answer to score in batch mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question: u32,
    pub answer: String,
}

/// Load the question bank from a JSON file.
pub fn load_questions(path: &Path) -> Result<Vec<Question>> {
    if !path.exists() {
        anyhow::bail!("Questions file not found at {}", path.display());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let questions: Vec<Question> = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid question bank JSON in {}", path.display()))?;
    Ok(questions)
}

/// Load batch answers from a JSON file.
pub fn load_answers(path: &Path) -> Result<Vec<AnswerRecord>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Invalid answers JSON in {}", path.display()))
}

/// The id a question is addressed by: its explicit id, or its position.
pub fn effective_id(question: &Question, index: usize) -> u32 {
    question.id.unwrap_or(index as u32)
}

pub fn find_question(questions: &[Question], id: u32) -> Option<&Question> {
    questions
        .iter()
        .enumerate()
        .find(|(index, q)| effective_id(q, *index) == id)
        .map(|(_, q)| q)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Vec<Question> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_missing_fields_default() {
        let qs = parse(r#"[{"question": "Tell me about a conflict.", "ideal_answer": "..."}]"#);
        assert_eq!(qs[0].id, None);
        assert_eq!(qs[0].question_text, "Tell me about a conflict.");
        assert!(qs[0].keywords.is_empty());
    }

    #[test]
    fn test_find_by_explicit_id() {
        let qs = parse(
            r#"[
                {"id": 7, "question_text": "a", "ideal_answer": "x"},
                {"id": 3, "question_text": "b", "ideal_answer": "y"}
            ]"#,
        );
        assert_eq!(find_question(&qs, 3).unwrap().question_text, "b");
        assert!(find_question(&qs, 0).is_none());
    }

    #[test]
    fn test_find_by_position() {
        let qs = parse(
            r#"[
                {"question_text": "a", "ideal_answer": "x"},
                {"question_text": "b", "ideal_answer": "y"}
            ]"#,
        );
        assert_eq!(find_question(&qs, 1).unwrap().question_text, "b");
        assert!(find_question(&qs, 2).is_none());
    }

    #[test]
    fn test_missing_file() {
        let err = load_questions(Path::new("/nonexistent/questions.json")).unwrap_err();
        assert!(err.to_string().contains("Questions file not found"));
    }
}
