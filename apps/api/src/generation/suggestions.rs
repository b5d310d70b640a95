//! Resume Suggestions: resume-vs-JD advice grouped into four buckets.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::generation::prompts::{SUGGESTIONS_PROMPT_TEMPLATE, SUGGESTIONS_SYSTEM};
use crate::llm_client::prompts::fill_template;
use crate::llm_client::GenerationRequest;
use crate::normalize::fields::{text_list, KeyPath};
use crate::normalize::retry::StructuredRequest;
use crate::normalize::Shape;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeSuggestions {
    pub missing_skills: Vec<String>,
    pub content_improvements: Vec<String>,
    pub keyword_optimization: Vec<String>,
    pub formatting_tone: Vec<String>,
}

const MISSING_SKILLS: &[KeyPath] = &[
    &["missing_skills"],
    &["missingSkills"],
    &["Missing Skills"],
    &["Missing_Skills"],
];
const CONTENT_IMPROVEMENTS: &[KeyPath] = &[
    &["content_improvements"],
    &["contentImprovements"],
    &["Content Improvements"],
    &["Content_Improvements"],
];
const KEYWORD_OPTIMIZATION: &[KeyPath] = &[
    &["keyword_optimization"],
    &["keywordOptimization"],
    &["Keyword Optimization"],
    &["Keyword_Optimization"],
];
const FORMATTING_TONE: &[KeyPath] = &[
    &["formatting_tone"],
    &["formattingTone"],
    &["Formatting / Tone"],
    &["Formatting/Tone"],
    &["Formatting_Tone"],
];

impl ResumeSuggestions {
    pub fn normalize(value: &Value) -> Self {
        Self {
            missing_skills: text_list(value, MISSING_SKILLS),
            content_improvements: text_list(value, CONTENT_IMPROVEMENTS),
            keyword_optimization: text_list(value, KEYWORD_OPTIMIZATION),
            formatting_tone: text_list(value, FORMATTING_TONE),
        }
    }
}

pub fn suggestions_request(resume_text: &str, jd_text: &str) -> StructuredRequest {
    let prompt = fill_template(
        SUGGESTIONS_PROMPT_TEMPLATE,
        &[("resume_text", resume_text), ("jd_text", jd_text)],
    );
    StructuredRequest::new(
        GenerationRequest::new(prompt, SUGGESTIONS_SYSTEM).with_max_output_tokens(4096),
        Shape::Object,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_heading_style_keys() {
        let value = json!({
            "Missing Skills": ["Kubernetes", "gRPC"],
            "contentImprovements": "Quantify impact\nLead with outcomes",
            "Formatting / Tone": ["Use active voice"]
        });
        let suggestions = ResumeSuggestions::normalize(&value);
        assert_eq!(suggestions.missing_skills, vec!["Kubernetes", "gRPC"]);
        assert_eq!(
            suggestions.content_improvements,
            vec!["Quantify impact", "Lead with outcomes"]
        );
        assert!(suggestions.keyword_optimization.is_empty());
        assert_eq!(suggestions.formatting_tone, vec!["Use active voice"]);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let value = json!({"missingSkills": ["Rust"], "Keyword Optimization": ["tokio"]});
        let once = ResumeSuggestions::normalize(&value);
        let twice = ResumeSuggestions::normalize(&serde_json::to_value(&once).unwrap());
        assert_eq!(once, twice);
    }
}
