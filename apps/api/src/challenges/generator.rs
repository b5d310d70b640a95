//! Daily challenge generation: one personalized practice question per day.
//!
//! Generation never fails the request: an unusable or failed answer is replaced by a
//! template challenge picked deterministically from the calendar day.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;
use uuid::Uuid;

use crate::challenges::prompts::{CHALLENGE_PROMPT_TEMPLATE, CHALLENGE_SYSTEM};
use crate::llm_client::prompts::fill_template;
use crate::llm_client::GenerationRequest;
use crate::llm_log::{generate_logged, record, LogContext};
use crate::models::resume::ResumeRow;
use crate::normalize::excerpt;
use crate::normalize::fields::{opt_text, text, text_list, KeyPath};
use crate::normalize::retry::StructuredRequest;
use crate::normalize::Shape;
use crate::state::AppState;

const PROFILE_TEXT_CHARS: usize = 4000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeDraft {
    pub challenge_type: String,
    /// "Easy" | "Medium" | "Hard"
    pub difficulty: String,
    pub question: String,
    pub answer: String,
}

const CHALLENGE_TYPE: &[KeyPath] = &[
    &["challenge_type"],
    &["challengeType"],
    &["type"],
    &["category"],
];
const DIFFICULTY: &[KeyPath] = &[&["difficulty"], &["Difficulty"], &["level"]];
const QUESTION: &[KeyPath] = &[&["question"], &["Question"], &["challenge"], &["prompt"]];
const ANSWER: &[KeyPath] = &[&["answer"], &["Answer"], &["solution"]];
const SKILLS: &[KeyPath] = &[&["skills"]];

/// Maps a free-form difficulty onto the stored labels.
pub fn canonical_difficulty(label: &str) -> &'static str {
    let label = label.to_lowercase();
    if label.contains("easy") {
        "Easy"
    } else if label.contains("hard") {
        "Hard"
    } else {
        "Medium"
    }
}

impl ChallengeDraft {
    /// `None` when the answer has no question text.
    pub fn normalize(value: &Value) -> Option<Self> {
        let question = opt_text(value, QUESTION)?;
        Some(Self {
            challenge_type: text(value, CHALLENGE_TYPE, "general").to_lowercase(),
            difficulty: canonical_difficulty(&text(value, DIFFICULTY, "Medium")).to_string(),
            question,
            answer: text(value, ANSWER, ""),
        })
    }

    /// Template challenge for `day`, centred on the user's first skill.
    pub fn fallback(day: NaiveDate, skill: Option<&str>) -> Self {
        const TYPES: [&str; 4] = ["coding", "aptitude", "sql", "interview"];
        const DIFFICULTIES: [&str; 3] = ["Easy", "Medium", "Hard"];
        let n = day.ordinal0() as usize;
        let challenge_type = TYPES[n % TYPES.len()];
        let skill = skill.unwrap_or("problem-solving");
        Self {
            challenge_type: challenge_type.to_string(),
            difficulty: DIFFICULTIES[n % DIFFICULTIES.len()].to_string(),
            question: format!(
                "Create a short {challenge_type} exercise focusing on {skill}. Keep it concise and practical."
            ),
            answer: "Outline your approach and verify it with at least one example.".to_string(),
        }
    }
}

/// What the prompt knows about the user, taken from their latest resume.
#[derive(Debug, Clone, Default)]
pub struct ChallengeProfile {
    pub resume_text: String,
    pub jd_text: String,
    pub skills: Vec<String>,
}

impl ChallengeProfile {
    pub fn from_resume(resume: Option<&ResumeRow>) -> Self {
        resume
            .map(|r| Self {
                resume_text: excerpt(&r.resume_text, PROFILE_TEXT_CHARS),
                jd_text: excerpt(&r.jd_text, PROFILE_TEXT_CHARS),
                skills: text_list(&r.parsed_data, SKILLS),
            })
            .unwrap_or_default()
    }
}

fn or_general<'a>(text: &'a str, general: &'a str) -> &'a str {
    if text.trim().is_empty() {
        general
    } else {
        text
    }
}

pub fn challenge_request(profile: &ChallengeProfile) -> StructuredRequest {
    let skills = if profile.skills.is_empty() {
        "programming, problem-solving".to_string()
    } else {
        profile.skills.join(", ")
    };
    let prompt = fill_template(
        CHALLENGE_PROMPT_TEMPLATE,
        &[
            ("skills", skills.as_str()),
            (
                "resume_text",
                or_general(&profile.resume_text, "General software engineering resume"),
            ),
            (
                "jd_text",
                or_general(&profile.jd_text, "Generic placement-oriented job description"),
            ),
        ],
    );
    StructuredRequest::new(
        GenerationRequest::new(prompt, CHALLENGE_SYSTEM)
            .with_temperature(0.5)
            .with_max_output_tokens(1024),
        Shape::Object,
    )
}

/// Asks the model for a challenge, falling back to the day's template on any failure.
pub async fn generate_challenge(
    state: &AppState,
    user_id: Uuid,
    profile: &ChallengeProfile,
    today: NaiveDate,
) -> ChallengeDraft {
    let context = LogContext {
        user_id,
        endpoint: "/api/v1/challenges",
        prompt_type: "daily_challenge",
        request_data: json!({ "skills": profile.skills }),
    };
    let fallback = || ChallengeDraft::fallback(today, profile.skills.first().map(String::as_str));

    match generate_logged(&state.db, state.llm.as_ref(), &challenge_request(profile), &context).await {
        Ok(response) => match ChallengeDraft::normalize(&response.value) {
            Some(draft) => {
                let logged = serde_json::to_value(&draft).unwrap_or(Value::Null);
                record(&state.db, context.success(logged, &response.generation)).await;
                draft
            }
            None => {
                warn!(%user_id, "Challenge answer had no question, using template");
                record(&state.db, context.failure("answer had no question".into())).await;
                fallback()
            }
        },
        Err(e) => {
            warn!(%user_id, "Challenge generation failed, using template: {e}");
            fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_camel_case() {
        let draft = ChallengeDraft::normalize(&json!({
            "challengeType": "SQL",
            "difficulty": "hard",
            "question": "Find the second highest salary.",
            "answer": "Use DENSE_RANK."
        }))
        .unwrap();
        assert_eq!(draft.challenge_type, "sql");
        assert_eq!(draft.difficulty, "Hard");
        assert_eq!(draft.answer, "Use DENSE_RANK.");
    }

    #[test]
    fn test_normalize_defaults() {
        let draft = ChallengeDraft::normalize(&json!({"question": "Q?", "difficulty": "tricky"})).unwrap();
        assert_eq!(draft.challenge_type, "general");
        assert_eq!(draft.difficulty, "Medium");
        assert_eq!(draft.answer, "");
        assert!(ChallengeDraft::normalize(&json!({"answer": "orphan"})).is_none());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = ChallengeDraft::normalize(&json!({"type": "Coding", "level": "EASY", "question": "Q"})).unwrap();
        let twice = ChallengeDraft::normalize(&serde_json::to_value(&once).unwrap()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_fallback_is_deterministic_per_day() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let a = ChallengeDraft::fallback(day, Some("Rust"));
        let b = ChallengeDraft::fallback(day, Some("Rust"));
        assert_eq!(a, b);
        assert_eq!(a.challenge_type, "aptitude");
        assert_eq!(a.difficulty, "Medium");
        assert!(a.question.contains("Rust"));

        let next = ChallengeDraft::fallback(day.succ_opt().unwrap(), None);
        assert_eq!(next.challenge_type, "sql");
        assert!(next.question.contains("problem-solving"));
    }

    #[test]
    fn test_request_uses_generic_profile_when_empty() {
        let request = challenge_request(&ChallengeProfile::default());
        assert!(request.primary.prompt.contains("programming, problem-solving"));
        assert!(request.primary.prompt.contains("General software engineering resume"));
    }
}
