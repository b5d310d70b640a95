//! Interview Questions: ten targeted questions from a parsed resume and a JD.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::prompts::{QUESTIONS_PROMPT_TEMPLATE, QUESTIONS_SYSTEM};
use crate::llm_client::prompts::fill_template;
use crate::llm_client::{Generation, GenerationRequest};
use crate::models::resume::QuestionSetRow;
use crate::normalize::fields::{opt_text, text, text_list, KeyPath};
use crate::normalize::retry::StructuredRequest;
use crate::normalize::Shape;

pub const MAX_QUESTIONS: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Behavioral,
    #[default]
    Technical,
    Coding,
    Design,
    Aptitude,
}

impl QuestionType {
    fn from_label(label: &str) -> Self {
        let label = label.to_lowercase();
        if label.contains("behavio") {
            Self::Behavioral
        } else if label.contains("coding") || label.contains("programming") {
            Self::Coding
        } else if label.contains("design") {
            Self::Design
        } else if label.contains("aptitude") {
            Self::Aptitude
        } else {
            Self::Technical
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn from_label(label: &str) -> Self {
        let label = label.to_lowercase();
        if label.contains("easy") {
            Self::Easy
        } else if label.contains("hard") {
            Self::Hard
        } else {
            Self::Medium
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewQuestion {
    pub question: String,
    pub question_type: QuestionType,
    pub difficulty: Difficulty,
    pub rationale: String,
    pub related_skills: Vec<String>,
}

const QUESTION: &[KeyPath] = &[&["question"], &["Question"], &["text"], &["prompt"]];
const QUESTION_TYPE: &[KeyPath] = &[
    &["question_type"],
    &["questionType"],
    &["type"],
    &["category"],
];
const DIFFICULTY: &[KeyPath] = &[&["difficulty"], &["Difficulty"], &["level"]];
const RATIONALE: &[KeyPath] = &[&["rationale"], &["Rationale"], &["reason"], &["why"]];
const RELATED_SKILLS: &[KeyPath] = &[&["related_skills"], &["relatedSkills"], &["skills"]];

impl InterviewQuestion {
    /// `None` when the entry carries no question text.
    pub fn normalize(value: &Value) -> Option<Self> {
        let question = opt_text(value, QUESTION)?;
        Some(Self {
            question,
            question_type: opt_text(value, QUESTION_TYPE)
                .map(|t| QuestionType::from_label(&t))
                .unwrap_or_default(),
            difficulty: opt_text(value, DIFFICULTY)
                .map(|d| Difficulty::from_label(&d))
                .unwrap_or_default(),
            rationale: text(value, RATIONALE, ""),
            related_skills: text_list(value, RELATED_SKILLS),
        })
    }
}

/// Normalizes a parsed array; entries without question text are dropped and at most
/// `MAX_QUESTIONS` are kept.
pub fn normalize_questions(value: &Value) -> Vec<InterviewQuestion> {
    value
        .as_array()
        .map(Vec::as_slice)
        .unwrap_or(&[])
        .iter()
        .filter_map(InterviewQuestion::normalize)
        .take(MAX_QUESTIONS)
        .collect()
}

/// Builds the question request from the candidate profile and the JD text.
pub fn questions_request(resume_json: &Value, jd_text: &str) -> StructuredRequest {
    let resume_json = resume_json.to_string();
    let prompt = fill_template(
        QUESTIONS_PROMPT_TEMPLATE,
        &[("resume_json", resume_json.as_str()), ("jd_text", jd_text)],
    );
    StructuredRequest::new(
        GenerationRequest::new(prompt, QUESTIONS_SYSTEM).with_max_output_tokens(4096),
        Shape::Array,
    )
}

/// Stores a generated question set against the resume it was generated for.
pub async fn save_question_set(
    pool: &PgPool,
    user_id: Uuid,
    resume_id: Uuid,
    questions: &[InterviewQuestion],
    generation: &Generation,
) -> Result<QuestionSetRow, AppError> {
    let questions = serde_json::to_value(questions).map_err(anyhow::Error::from)?;
    let row = sqlx::query_as(
        r#"
        INSERT INTO question_sets
            (id, user_id, resume_id, questions, request_id, processing_time_ms)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(resume_id)
    .bind(questions)
    .bind(&generation.request_id)
    .bind(generation.processing_time_ms as i64)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_mixed_key_styles() {
        let value = json!([
            {"question": "Tell me about a conflict.", "type": "Behavioral", "difficulty": "EASY",
             "rationale": "Team fit", "relatedSkills": ["communication"]},
            {"Question": "Design a URL shortener", "questionType": "system design", "level": "Hard"},
            {"question": "Reverse a list", "question_type": "coding"}
        ]);
        let questions = normalize_questions(&value);
        assert_eq!(questions.len(), 3);
        assert_eq!(questions[0].question_type, QuestionType::Behavioral);
        assert_eq!(questions[0].difficulty, Difficulty::Easy);
        assert_eq!(questions[0].related_skills, vec!["communication"]);
        assert_eq!(questions[1].question_type, QuestionType::Design);
        assert_eq!(questions[1].difficulty, Difficulty::Hard);
        assert_eq!(questions[2].difficulty, Difficulty::Medium);
        assert_eq!(questions[2].rationale, "");
    }

    #[test]
    fn test_defaults_for_unknown_labels() {
        let q = InterviewQuestion::normalize(&json!({"question": "Q", "type": "trivia"})).unwrap();
        assert_eq!(q.question_type, QuestionType::Technical);
        assert_eq!(q.difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_drops_empty_and_caps_at_ten() {
        let mut entries = vec![json!({"question": "  "}), json!({"rationale": "orphan"})];
        entries.extend((0..14).map(|i| json!({"question": format!("Q{i}")})));
        let questions = normalize_questions(&Value::Array(entries));
        assert_eq!(questions.len(), MAX_QUESTIONS);
        assert_eq!(questions[0].question, "Q0");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let value = json!([{"question": "Why Rust?", "type": "technical", "relatedSkills": "rust, memory safety"}]);
        let once = normalize_questions(&value);
        let twice = normalize_questions(&serde_json::to_value(&once).unwrap());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_request_is_array_shaped() {
        let request = questions_request(&json!({"skills": ["rust"]}), "Backend role");
        assert_eq!(request.shape, Shape::Array);
        assert!(request.primary.prompt.contains(r#"{"skills":["rust"]}"#));
        assert!(request.primary.prompt.contains("Backend role"));
    }
}
