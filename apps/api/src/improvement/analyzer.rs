//! Resume Improver: request construction and input resolution.

use crate::improvement::prompts::{
    IMPROVER_PROMPT_TEMPLATE, IMPROVER_STRICT_PROMPT_TEMPLATE, IMPROVER_STRICT_SYSTEM,
    IMPROVER_SYSTEM,
};
use crate::llm_client::prompts::{fill_template, STRICT_TEMPERATURE};
use crate::llm_client::GenerationRequest;
use crate::models::resume::ResumeRow;
use crate::normalize::retry::StructuredRequest;
use crate::normalize::Shape;
use crate::resume::parser::ParsedResume;

/// Stored resume text shorter than this is replaced by the flattened parsed profile.
pub const MIN_RESUME_TEXT_CHARS: usize = 10;

const IMPROVER_MAX_TOKENS: u32 = 8192;

/// Primary analysis prompt with the dedicated strict fallback.
pub fn improvement_request(resume_text: &str, jd_text: &str) -> StructuredRequest {
    let fill = |template: &str| {
        fill_template(template, &[("resume_text", resume_text), ("jd_text", jd_text)])
    };
    let primary = GenerationRequest::new(fill(IMPROVER_PROMPT_TEMPLATE), IMPROVER_SYSTEM)
        .with_max_output_tokens(IMPROVER_MAX_TOKENS);
    let strict = GenerationRequest::new(fill(IMPROVER_STRICT_PROMPT_TEMPLATE), IMPROVER_STRICT_SYSTEM)
        .with_temperature(STRICT_TEMPERATURE)
        .with_max_output_tokens(IMPROVER_MAX_TOKENS);
    StructuredRequest::new(primary, Shape::Object).with_strict(strict)
}

/// The resume text to analyze for a stored resume.
pub fn usable_resume_text(resume: &ResumeRow) -> String {
    if resume.resume_text.trim().chars().count() >= MIN_RESUME_TEXT_CHARS {
        resume.resume_text.clone()
    } else {
        ParsedResume::normalize(&resume.parsed_data).to_plain_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::improvement::schema::ResumeImprovement;
    use crate::normalize::retry::generate_structured;
    use crate::normalize::retry::testing::ScriptedModel;
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    fn resume(text: &str) -> ResumeRow {
        ResumeRow {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            resume_text: text.to_string(),
            jd_text: "Rust backend role".to_string(),
            parsed_data: json!({"name": "Ada", "skills": ["Rust"]}),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_short_resume_text_falls_back_to_profile() {
        assert_eq!(usable_resume_text(&resume("  cv  ")), "Name: Ada\nSkills: Rust");
        let full = "Ada Lovelace, engineer with ten years of Rust";
        assert_eq!(usable_resume_text(&resume(full)), full);
    }

    #[test]
    fn test_strict_variant_is_the_dedicated_prompt() {
        let request = improvement_request("MY RESUME", "THE JD");
        assert!(request.primary.prompt.contains("MY RESUME"));
        assert!(request.strict.prompt.contains("THE JD"));
        assert_eq!(request.strict.system, IMPROVER_STRICT_SYSTEM);
        assert_eq!(request.strict.temperature, STRICT_TEMPERATURE);
    }

    #[test]
    fn test_placeholder_text_in_resume_is_not_expanded() {
        let request = improvement_request("see {jd_text} below", "THE JD");
        for prompt in [&request.primary.prompt, &request.strict.prompt] {
            assert!(prompt.contains("see {jd_text} below"));
            assert_eq!(prompt.matches("THE JD").count(), 1);
        }
    }

    #[tokio::test]
    async fn test_prose_answer_recovers_through_strict_retry() {
        let model = ScriptedModel::answering(&[
            "Sure! Here is the analysis you asked for, with scores out of 100.",
            "```json\n{\u{201C}summary\u{201D}: \u{201C}Close match\u{201D}, \"overallScore\": 71, \"recommendations\": [],}\n```",
        ]);
        let response = generate_structured(&model, &improvement_request("r", "j"))
            .await
            .unwrap();
        assert_eq!(response.attempts, 2);
        let improvement = ResumeImprovement::normalize(&response.value);
        assert_eq!(improvement.analysis.summary, "Close match");
        assert_eq!(improvement.analysis.overall_score, 71);
        assert_eq!(model.calls(), 2);
    }
}
